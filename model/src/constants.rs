/// Helper macro to avoid retyping the base domain-like name of the operator when creating further
/// string constants from it. When given no parameters, this returns the base domain-like name.
/// When given a string literal parameter it adds `/parameter` to the end.
macro_rules! rhdh {
    () => {
        "rhdh.redhat.com"
    };
    ($s:literal) => {
        concat!(rhdh!(), "/", $s)
    };
}

// System identifiers
pub const API_GROUP: &str = rhdh!();
pub const API_VERSION: &str = rhdh!("v1alpha3");
pub const KIND: &str = "Backstage";

// Annotation keys
pub const DEFAULT_MOUNT_PATH_ANNOTATION: &str = rhdh!("default-mount-path");
pub const CONFIGURED_NAME_ANNOTATION: &str = rhdh!("configured-name");

// Configuration file identifiers
pub const DYNAMIC_PLUGINS_FILE: &str = "dynamic-plugins.yaml";
pub const PVCS_FILE: &str = "pvcs.yaml";

// Component names
pub const BACKSTAGE: &str = "backstage";
pub const DYNAMIC_PLUGINS_INIT_CONTAINER: &str = "install-dynamic-plugins";
pub const OPERATOR: &str = "backstage-operator";

// Object name suffixes
pub const DYNAMIC_PLUGINS_OBJECT: &str = "backstage-dynamic-plugins";
pub const PVCS_OBJECT: &str = "backstage";

// Environment variables
pub const ENV_BACKSTAGE_IMAGE: &str = "RELATED_IMAGE_backstage";

// Paths
pub const DEFAULT_MOUNT_DIR: &str = "/opt/app-root/src";

// Standard tags https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
pub const APP_NAME: &str = "app.kubernetes.io/name";
pub const APP_INSTANCE: &str = "app.kubernetes.io/instance";
pub const APP_PART_OF: &str = "app.kubernetes.io/part-of";
pub const APP_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// The longest name allowed for an RFC 1123 label.
pub const RFC1123_LABEL_MAX_LEN: usize = 63;

#[test]
fn rhdh_constants_macro_test() {
    assert_eq!("rhdh.redhat.com", rhdh!());
    assert_eq!("rhdh.redhat.com/v1alpha3", API_VERSION);
    assert_eq!(
        "rhdh.redhat.com/default-mount-path",
        DEFAULT_MOUNT_PATH_ANNOTATION
    );
}
