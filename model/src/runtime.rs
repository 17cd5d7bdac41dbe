use crate::error::Result;
use crate::{Backstage, BackstageModel};
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::DynamicObject;
use serde::Serialize;
use std::fmt::Debug;

/// A cluster manifest owned by a provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Manifest {
    ConfigMap(ConfigMap),
    PersistentVolumeClaim(PersistentVolumeClaim),
}

impl Manifest {
    pub fn kind(&self) -> &'static str {
        match self {
            Manifest::ConfigMap(_) => <ConfigMap as k8s_openapi::Resource>::KIND,
            Manifest::PersistentVolumeClaim(_) => {
                <PersistentVolumeClaim as k8s_openapi::Resource>::KIND
            }
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Manifest::ConfigMap(cm) => &cm.metadata,
            Manifest::PersistentVolumeClaim(pvc) => &pvc.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or("")
    }
}

/// The lifecycle every resource provider implements. A pass drives the operations in this order:
///
/// 1. [`RuntimeObject::set_object`], when the provider's configuration file has default content,
/// 2. [`RuntimeObject::add_to_model`], which decides whether the provider takes part in the pass,
/// 3. [`RuntimeObject::update_and_validate`], which mutates the deployment descriptor,
/// 4. [`RuntimeObject::set_meta_info`], which assigns derived names and ownership.
///
/// Providers that `add_to_model` rejects are dropped before step 3.
pub trait RuntimeObject: Debug + Send {
    /// The configuration file identifier this provider is registered under.
    fn key(&self) -> &'static str;

    /// An empty instance of the payload kind this provider owns.
    fn empty_object(&self) -> Manifest;

    /// The payload manifests currently held by the provider.
    fn object(&self) -> Vec<Manifest>;

    /// Replaces the payload with objects of unknown static kind, for example objects read from
    /// default configuration or previously applied to the cluster.
    fn set_object(&mut self, objects: Vec<DynamicObject>) -> Result<()>;

    /// Builds the payload for `backstage` and returns whether the provider is applicable.
    fn add_to_model(&mut self, model: &BackstageModel, backstage: &Backstage) -> Result<bool>;

    /// Validates the payload against the model and mutates the deployment descriptor.
    fn update_and_validate(&mut self, model: &mut BackstageModel, backstage: &Backstage)
        -> Result<()>;

    /// Assigns derived names, labels and owner references once all structural changes are done.
    fn set_meta_info(&mut self, backstage: &Backstage);
}
