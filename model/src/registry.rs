use crate::constants::{DYNAMIC_PLUGINS_FILE, PVCS_FILE};
use crate::error::{self, Result};
use crate::providers::{BackstagePvcs, DynamicPlugins};
use crate::RuntimeObject;
use log::trace;
use snafu::ensure;
use std::fmt::{Debug, Formatter};

/// Produces a fresh, empty provider.
pub type ProviderFactory = fn() -> Box<dyn RuntimeObject>;

/// Describes how to create the provider for one configuration file.
#[derive(Clone, Copy)]
pub struct ProviderDescriptor {
    key: &'static str,
    factory: ProviderFactory,
    supports_default: bool,
}

impl ProviderDescriptor {
    /// The configuration file identifier, e.g. `pvcs.yaml`.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Whether the provider can be hydrated from the operator's default configuration.
    pub fn supports_default(&self) -> bool {
        self.supports_default
    }

    pub fn instantiate(&self) -> Box<dyn RuntimeObject> {
        (self.factory)()
    }
}

impl Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("key", &self.key)
            .field("supports_default", &self.supports_default)
            .finish()
    }
}

/// The set of known providers, in registration order. A registry is populated once at start-up
/// and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    descriptors: Vec<ProviderDescriptor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every provider this crate knows about.
    pub fn initialize() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(DYNAMIC_PLUGINS_FILE, DynamicPlugins::factory, false)?;
        registry.register(PVCS_FILE, BackstagePvcs::factory, true)?;
        Ok(registry)
    }

    /// Adds a provider. Registering the same `key` twice is a programming error and is reported
    /// as `DuplicateRegistration`.
    pub fn register(
        &mut self,
        key: &'static str,
        factory: ProviderFactory,
        supports_default: bool,
    ) -> Result<()> {
        ensure!(
            self.lookup(key).is_none(),
            error::DuplicateRegistrationSnafu { key }
        );
        trace!("Registering provider for '{}'", key);
        self.descriptors.push(ProviderDescriptor {
            key,
            factory,
            supports_default,
        });
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<&ProviderDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;

    #[test]
    fn initialize_keeps_registration_order() {
        let registry = Registry::initialize().unwrap();
        let keys: Vec<_> = registry.descriptors().iter().map(|d| d.key()).collect();
        assert_eq!(keys, vec![DYNAMIC_PLUGINS_FILE, PVCS_FILE]);
        assert!(!registry.lookup(DYNAMIC_PLUGINS_FILE).unwrap().supports_default());
        assert!(registry.lookup(PVCS_FILE).unwrap().supports_default());
        assert!(registry.lookup("route.yaml").is_none());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = Registry::initialize().unwrap();
        let err = registry
            .register(PVCS_FILE, BackstagePvcs::factory, true)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRegistration { key } if key == PVCS_FILE));
        assert_eq!(registry.descriptors().len(), 2);
    }

    #[test]
    fn factory_produces_fresh_provider() {
        let registry = Registry::initialize().unwrap();
        let provider = registry.lookup(PVCS_FILE).unwrap().instantiate();
        assert_eq!(provider.key(), PVCS_FILE);
        assert!(provider.object().is_empty());
    }
}
