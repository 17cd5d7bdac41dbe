use crate::error::Result;
use crate::multiobject::from_dynamic_object;
use crate::Backstage;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim};
use kube::core::DynamicObject;
use log::debug;
use std::collections::BTreeMap;

/// Configuration objects fetched from the cluster for one instance. Providers only read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalConfig {
    /// The ConfigMap named by the instance as its dynamic plugins source.
    pub dynamic_plugins: Option<ConfigMap>,
    /// PersistentVolumeClaim templates, keyed by name.
    pub extra_pvcs: BTreeMap<String, PersistentVolumeClaim>,
    /// Replacement content for default configuration files, keyed by file identifier.
    pub raw_config: BTreeMap<String, String>,
}

impl ExternalConfig {
    /// Sorts already-fetched objects into the store. Only the objects referenced by `backstage`
    /// are kept.
    pub fn from_objects<I>(backstage: &Backstage, objects: I) -> Result<Self>
    where
        I: IntoIterator<Item = DynamicObject>,
    {
        let mut config = Self::default();
        for object in objects {
            let kind = object
                .types
                .as_ref()
                .map(|t| t.kind.as_str())
                .unwrap_or_default()
                .to_string();
            let name = object.metadata.name.clone().unwrap_or_default();
            match kind.as_str() {
                "ConfigMap" if backstage.dynamic_plugins_source() == Some(name.as_str()) => {
                    config.dynamic_plugins = Some(from_dynamic_object(object)?);
                }
                "ConfigMap" if backstage.raw_config_source() == Some(name.as_str()) => {
                    let raw: ConfigMap = from_dynamic_object(object)?;
                    config.raw_config = raw.data.unwrap_or_default();
                }
                "PersistentVolumeClaim"
                    if backstage.pvc_requests().iter().any(|r| r.name == name) =>
                {
                    config
                        .extra_pvcs
                        .insert(name, from_dynamic_object(object)?);
                }
                _ => debug!("Ignoring unreferenced {} '{}'", kind, name),
            }
        }
        Ok(config)
    }

    /// The PersistentVolumeClaim template named `name`.
    pub fn pvc(&self, name: &str) -> Option<&PersistentVolumeClaim> {
        self.extra_pvcs.get(name)
    }
}
