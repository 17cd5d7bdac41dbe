use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A request for a running Backstage application instance. The `CustomResource` derive also
/// produces a struct named `Backstage` which represents the instance object in the k8s API.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "rhdh.redhat.com",
    kind = "Backstage",
    namespaced,
    plural = "backstages",
    shortname = "bs",
    singular = "backstage",
    version = "v1alpha3"
)]
#[serde(rename_all = "camelCase")]
pub struct BackstageSpec {
    /// Configuration of the Backstage application.
    pub application: Option<Application>,
    /// Per-instance replacements for the operator's default configuration files.
    pub raw_runtime_config: Option<RuntimeConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// The name of a ConfigMap holding the `dynamic-plugins.yaml` consumed by the dynamic plugins
    /// init container.
    pub dynamic_plugins_config_map_name: Option<String>,
    /// Extra objects mounted into the Backstage container.
    pub extra_files: Option<ExtraFiles>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraFiles {
    /// Directory that extra files are mounted under when no explicit path is given.
    pub mount_path: Option<String>,
    /// PersistentVolumeClaims to mount into the Backstage container.
    pub pvcs: Option<Vec<PvcRef>>,
}

/// A reference to a PersistentVolumeClaim template by name.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvcRef {
    pub name: String,
    /// Exact mount path. When absent the path is derived from the extra files mount path.
    pub mount_path: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// The name of a ConfigMap whose keys replace default configuration files of the same name.
    pub backstage_config: Option<String>,
}

impl Backstage {
    /// The name of the dynamic plugins ConfigMap, if the instance names one.
    pub fn dynamic_plugins_source(&self) -> Option<&str> {
        self.application()
            .and_then(|a| a.dynamic_plugins_config_map_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// The PersistentVolumeClaims requested by the instance, in declaration order.
    pub fn pvc_requests(&self) -> &[PvcRef] {
        self.extra_files()
            .and_then(|f| f.pvcs.as_deref())
            .unwrap_or_default()
    }

    /// The directory extra files are mounted under, if the instance overrides it.
    pub fn extra_files_mount_path(&self) -> Option<&str> {
        self.extra_files()
            .and_then(|f| f.mount_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    /// The name of the ConfigMap holding raw default configuration overrides.
    pub fn raw_config_source(&self) -> Option<&str> {
        self.spec
            .raw_runtime_config
            .as_ref()
            .and_then(|c| c.backstage_config.as_deref())
            .filter(|name| !name.is_empty())
    }

    fn application(&self) -> Option<&Application> {
        self.spec.application.as_ref()
    }

    fn extra_files(&self) -> Option<&ExtraFiles> {
        self.application().and_then(|a| a.extra_files.as_ref())
    }
}

impl PvcRef {
    /// The explicit mount path, treating an empty string as absent.
    pub fn specified_mount_path(&self) -> Option<&str> {
        self.mount_path.as_deref().filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_strings_are_absent() {
        let backstage = Backstage::new(
            "bs",
            BackstageSpec {
                application: Some(Application {
                    dynamic_plugins_config_map_name: Some(String::new()),
                    extra_files: Some(ExtraFiles {
                        mount_path: Some(String::new()),
                        pvcs: Some(vec![PvcRef {
                            name: "data".to_string(),
                            mount_path: Some(String::new()),
                        }]),
                    }),
                }),
                raw_runtime_config: None,
            },
        );
        assert!(backstage.dynamic_plugins_source().is_none());
        assert!(backstage.extra_files_mount_path().is_none());
        assert_eq!(backstage.pvc_requests().len(), 1);
        assert!(backstage.pvc_requests()[0].specified_mount_path().is_none());
    }

    #[test]
    fn deserialize_camel_case() {
        let backstage: Backstage = serde_yaml::from_str(
            r#"
apiVersion: rhdh.redhat.com/v1alpha3
kind: Backstage
metadata:
  name: my-backstage
spec:
  application:
    dynamicPluginsConfigMapName: my-plugins
    extraFiles:
      mountPath: /opt/extra-files
      pvcs:
        - name: cache
          mountPath: /opt/cache
"#,
        )
        .unwrap();
        assert_eq!(backstage.dynamic_plugins_source(), Some("my-plugins"));
        assert_eq!(backstage.extra_files_mount_path(), Some("/opt/extra-files"));
        assert_eq!(
            backstage.pvc_requests()[0].specified_mount_path(),
            Some("/opt/cache")
        );
    }
}
