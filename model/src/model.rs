use crate::default_config::parse_manifests;
use crate::error::{self, Result};
use crate::{
    Backstage, BackstageDeployment, DefaultConfig, ExternalConfig, Manifest, OperatorSettings,
    ProviderDescriptor, Registry, RuntimeObject,
};
use k8s_openapi::api::apps::v1::Deployment;
use kube::core::DynamicObject;
use kube::ResourceExt;
use log::{debug, info, trace};
use snafu::ResultExt;

/// Everything produced for one instance during one pass: the deployment descriptor and the
/// providers that took part. A model is built fresh for every pass and discarded afterwards.
#[derive(Debug)]
pub struct BackstageModel {
    deployment: BackstageDeployment,
    external_config: ExternalConfig,
    settings: OperatorSettings,
    runtime_objects: Vec<Box<dyn RuntimeObject>>,
}

impl BackstageModel {
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment: BackstageDeployment::new(deployment),
            external_config: ExternalConfig::default(),
            settings: OperatorSettings::default(),
            runtime_objects: Vec::new(),
        }
    }

    /// Sets the operator settings consulted by providers during the pass.
    pub fn with_settings(mut self, settings: OperatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn deployment(&self) -> &BackstageDeployment {
        &self.deployment
    }

    pub(crate) fn deployment_mut(&mut self) -> &mut BackstageDeployment {
        &mut self.deployment
    }

    pub fn into_deployment(self) -> Deployment {
        self.deployment.into_deployment()
    }

    pub fn external_config(&self) -> &ExternalConfig {
        &self.external_config
    }

    pub fn settings(&self) -> &OperatorSettings {
        &self.settings
    }

    /// Adds an active provider. The caller must not add two providers of the same kind.
    pub fn set_runtime_object(&mut self, object: Box<dyn RuntimeObject>) {
        self.runtime_objects.push(object)
    }

    /// The active providers in activation order.
    pub fn runtime_objects(&self) -> &[Box<dyn RuntimeObject>] {
        &self.runtime_objects
    }

    /// The active provider registered under `key`.
    pub fn runtime_object(&self, key: &str) -> Option<&dyn RuntimeObject> {
        self.runtime_objects
            .iter()
            .find(|o| o.key() == key)
            .map(|o| o.as_ref())
    }

    /// Every payload manifest owned by the active providers.
    pub fn manifests(&self) -> Vec<Manifest> {
        self.runtime_objects
            .iter()
            .flat_map(|o| o.object())
            .collect()
    }

    /// Runs one pass for `backstage`:
    ///
    /// 1. every registered provider is instantiated, hydrated from default configuration when it
    ///    supports it, and asked whether it applies; applicable providers become active,
    /// 2. every active provider validates its payload and mutates the deployment descriptor,
    /// 3. every active provider assigns derived names and ownership.
    ///
    /// The first error aborts the pass and the deployment descriptor is restored to what it was
    /// before the pass started.
    pub fn run_pass(
        &mut self,
        registry: &Registry,
        defaults: &DefaultConfig,
        backstage: &Backstage,
        external_config: ExternalConfig,
    ) -> Result<()> {
        info!("Building model for '{}'", backstage.name_any());
        self.external_config = external_config;
        let snapshot = self.deployment.clone();
        let result = self.contribute(registry, defaults, backstage);
        if result.is_err() {
            self.deployment = snapshot;
            self.runtime_objects.clear();
        }
        result
    }

    fn contribute(
        &mut self,
        registry: &Registry,
        defaults: &DefaultConfig,
        backstage: &Backstage,
    ) -> Result<()> {
        for descriptor in registry.descriptors() {
            let mut object = descriptor.instantiate();
            if let Some(objects) = self.default_objects(descriptor, defaults)? {
                object.set_object(objects)?;
            }
            if object.add_to_model(self, backstage)? {
                debug!("Provider '{}' is active", descriptor.key());
                self.set_runtime_object(object);
            } else {
                trace!("Provider '{}' does not apply", descriptor.key());
            }
        }

        let mut objects = std::mem::take(&mut self.runtime_objects);
        let result = objects
            .iter_mut()
            .try_for_each(|object| object.update_and_validate(self, backstage));
        self.runtime_objects = objects;
        result?;

        for object in self.runtime_objects.iter_mut() {
            object.set_meta_info(backstage);
        }
        Ok(())
    }

    /// Default content for `descriptor`. Raw configuration supplied with the instance replaces the
    /// operator's default configuration file of the same name.
    fn default_objects(
        &self,
        descriptor: &ProviderDescriptor,
        defaults: &DefaultConfig,
    ) -> Result<Option<Vec<DynamicObject>>> {
        if !descriptor.supports_default() {
            return Ok(None);
        }
        if let Some(raw) = self.external_config.raw_config.get(descriptor.key()) {
            debug!("Using raw configuration for '{}'", descriptor.key());
            return parse_manifests(descriptor.key(), raw).map(Some);
        }
        Ok(defaults.get(descriptor.key()).map(|objects| objects.to_vec()))
    }

    /// Renders the deployment followed by every payload manifest as a multi-document YAML stream.
    pub fn to_yaml(&self) -> Result<String> {
        let mut documents = vec![serde_yaml::to_string(self.deployment.deployment())
            .context(error::SerializeSnafu { what: "deployment" })?];
        for manifest in self.manifests() {
            documents.push(serde_yaml::to_string(&manifest).context(error::SerializeSnafu {
                what: format!("{} '{}'", manifest.kind(), manifest.name()),
            })?);
        }
        Ok(documents
            .iter()
            .map(|doc| doc.trim_start_matches("---\n"))
            .collect::<Vec<_>>()
            .join("---\n"))
    }
}
