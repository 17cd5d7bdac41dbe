use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a Backstage model. Every variant aborts the pass it occurs in.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to read default configuration '{}': {}", path.display(), source))]
    DefaultConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to parse configuration '{}': {}", key, source))]
    ConfigParse {
        key: String,
        source: serde_yaml::Error,
    },

    #[snafu(display(
        "Unable to convert '{}' object into a {}: {}",
        name,
        kind,
        source
    ))]
    DynamicConversion {
        kind: String,
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("Configuration '{}' is registered more than once", key))]
    DuplicateRegistration { key: String },

    #[snafu(display(
        "Dynamic plugins ConfigMap '{}' expects exactly one key named '{}' but found {:?}",
        name,
        expected,
        actual
    ))]
    DynamicPluginsKey {
        name: String,
        expected: String,
        actual: Vec<String>,
    },

    #[snafu(display(
        "Dynamic plugins ConfigMap '{}' is named by the instance but was not found",
        name
    ))]
    DynamicPluginsNotFound { name: String },

    #[snafu(display("The deployment descriptor has no pod template spec"))]
    MissingPodSpec,

    #[snafu(display("The deployment descriptor has no containers"))]
    MissingContainer,

    #[snafu(display(
        "Dynamic plugins are configured but no init container named '{}' is defined",
        name
    ))]
    MissingInitContainer { name: String },

    #[snafu(display("A {} object in '{}' has no name", kind, key))]
    MissingName { kind: String, key: String },

    #[snafu(display("Unable to serialize {}: {}", what, source))]
    Serialize {
        what: String,
        source: serde_yaml::Error,
    },

    #[snafu(display("Unable to read operator settings from the environment: {}", source))]
    Settings { source: envy::Error },

    #[snafu(display("Configuration '{}' expects at most one object but found {}", key, count))]
    TooManyObjects { key: String, count: usize },

    #[snafu(display("Payload is not a {}: found '{}'", expected, actual))]
    TypeMismatch { expected: String, actual: String },

    #[snafu(display(
        "Volume '{}' already exists in the deployment with a different source",
        name
    ))]
    VolumeConflict { name: String },
}
