use crate::error::{self, Result};
use crate::Registry;
use kube::core::DynamicObject;
use log::{debug, info};
use serde::Deserialize;
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::path::Path;

/// The operator's default configuration: for each configuration file identifier, the manifests the
/// file holds. Loaded once at start-up.
#[derive(Clone, Debug, Default)]
pub struct DefaultConfig {
    files: BTreeMap<String, Vec<DynamicObject>>,
}

impl DefaultConfig {
    /// Reads `<dir>/<key>` for every registered provider that supports default configuration.
    /// Missing files are skipped.
    pub fn load<P>(dir: P, registry: &Registry) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let mut config = Self::default();
        for descriptor in registry.descriptors().iter().filter(|d| d.supports_default()) {
            let path = dir.join(descriptor.key());
            if !path.is_file() {
                debug!("No default configuration at '{}'", path.display());
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .context(error::DefaultConfigReadSnafu { path: &path })?;
            config.insert_yaml(descriptor.key(), &content)?;
            info!("Loaded default configuration '{}'", path.display());
        }
        Ok(config)
    }

    /// Parses `yaml` and stores the manifests under `key`, replacing earlier content.
    pub fn insert_yaml(&mut self, key: &str, yaml: &str) -> Result<()> {
        let objects = parse_manifests(key, yaml)?;
        self.files.insert(key.to_string(), objects);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[DynamicObject]> {
        self.files.get(key).map(|objects| objects.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parses a multi-document YAML stream into kind-erased objects. Empty documents are skipped.
pub fn parse_manifests(key: &str, yaml: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value =
            serde_yaml::Value::deserialize(document).context(error::ConfigParseSnafu { key })?;
        if value.is_null() {
            continue;
        }
        let object: DynamicObject =
            serde_yaml::from_value(value).context(error::ConfigParseSnafu { key })?;
        objects.push(object);
    }
    Ok(objects)
}
