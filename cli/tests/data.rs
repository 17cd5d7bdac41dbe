use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

/// Returns the path to the example Backstage instance.
pub fn backstage_path() -> PathBuf {
    data_dir().join("backstage.yaml")
}

/// Returns the path to the example deployment descriptor.
pub fn deployment_path() -> PathBuf {
    data_dir().join("deployment.yaml")
}

/// Returns the path to the ConfigMaps and PersistentVolumeClaims the instance refers to.
pub fn external_path() -> PathBuf {
    data_dir().join("external.yaml")
}

/// Returns the path to the default configuration directory.
pub fn default_config_path() -> PathBuf {
    data_dir().join("default-config")
}
