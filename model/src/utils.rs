use crate::constants::{
    APP_INSTANCE, APP_MANAGED_BY, APP_NAME, APP_PART_OF, BACKSTAGE, OPERATOR,
    RFC1123_LABEL_MAX_LEN,
};
use crate::error::{self, Result};
use crate::Backstage;
use k8s_openapi::api::core::v1::{Container, PodSpec, Volume, VolumeMount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Resource, ResourceExt};
use regex::Regex;
use snafu::ensure;
use std::collections::BTreeMap;

const NON_LABEL_CHARS_REGEX: &str = "[^a-z0-9-]+";

lazy_static::lazy_static! {
    static ref NON_LABEL_CHARS: Regex = {
        #[allow(clippy::unwrap_used)]
        let regex = Regex::new(NON_LABEL_CHARS_REGEX).unwrap();
        regex
    };
}

/// Turns `name` into a valid RFC 1123 label: lowercase alphanumerics and `-`, starting and ending
/// with an alphanumeric, at most 63 characters.
pub fn to_rfc1123_label(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced = NON_LABEL_CHARS.replace_all(&lowered, "-");
    let truncated: String = replaced.chars().take(RFC1123_LABEL_MAX_LEN).collect();
    truncated.trim_matches('-').to_string()
}

/// The name of an object owned by instance `backstage_name`.
pub fn generate_runtime_object_name(backstage_name: &str, object_type: &str) -> String {
    format!("{}-{}", object_type, backstage_name)
}

pub(crate) fn add_annotation(meta: &mut ObjectMeta, key: &str, value: String) {
    meta.annotations
        .get_or_insert_with(BTreeMap::new)
        .insert(key.to_string(), value);
}

/// Assigns the namespace, labels and controller owner reference that tie an object to its
/// instance.
pub(crate) fn set_meta_info(meta: &mut ObjectMeta, backstage: &Backstage) {
    let name = backstage.name_any();
    meta.namespace = backstage.namespace();
    meta.labels
        .get_or_insert_with(BTreeMap::new)
        .extend(create_labels(&name));
    if let Some(owner) = backstage.controller_owner_ref(&()) {
        meta.owner_references = Some(vec![owner]);
    }
}

/// Creates the labels that we add to objects owned by an instance.
fn create_labels<S>(instance: S) -> BTreeMap<String, String>
where
    S: AsRef<str>,
{
    [
        (APP_NAME, BACKSTAGE),
        (APP_INSTANCE, instance.as_ref()),
        (APP_PART_OF, BACKSTAGE),
        (APP_MANAGED_BY, OPERATOR),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect()
}

/// Adds `volume` to the pod. A volume of the same name is only accepted when it is identical to
/// `volume`, which is the case when a pass runs again over its own output.
pub(crate) fn upsert_volume(pod_spec: &mut PodSpec, volume: Volume) -> Result<()> {
    let volumes = pod_spec.volumes.get_or_insert_with(Vec::new);
    match volumes.iter().find(|v| v.name == volume.name) {
        Some(existing) => ensure!(
            existing == &volume,
            error::VolumeConflictSnafu { name: volume.name }
        ),
        None => volumes.push(volume),
    }
    Ok(())
}

/// Adds `mount` to the container, replacing any mount of the same volume at the same path.
pub(crate) fn upsert_volume_mount(container: &mut Container, mount: VolumeMount) {
    let mounts = container.volume_mounts.get_or_insert_with(Vec::new);
    match mounts
        .iter_mut()
        .find(|m| m.name == mount.name && m.mount_path == mount.mount_path)
    {
        Some(existing) => *existing = mount,
        None => mounts.push(mount),
    }
}
