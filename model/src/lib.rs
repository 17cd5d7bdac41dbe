/*!

This library assembles the Kubernetes manifests that run a Backstage instance. A [`Registry`] of
resource providers is populated once at start-up. For every pass, a [`BackstageModel`] is built
from a deployment descriptor, each registered provider is asked to contribute, and the descriptor
is mutated in place in registration order.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use backstage::{
    Application, Backstage, BackstageSpec, ExtraFiles, PvcRef, RuntimeConfig,
};
pub use default_config::{parse_manifests, DefaultConfig};
pub use deployment::BackstageDeployment;
pub use error::{Error, Result};
pub use external_config::ExternalConfig;
pub use model::BackstageModel;
pub use multiobject::MultiObject;
pub use registry::{ProviderDescriptor, ProviderFactory, Registry};
pub use runtime::{Manifest, RuntimeObject};
pub use settings::OperatorSettings;

mod backstage;
pub mod constants;
mod default_config;
mod deployment;
mod error;
mod external_config;
mod model;
pub mod mount;
mod multiobject;
pub mod providers;
mod registry;
mod runtime;
mod settings;
pub mod utils;
