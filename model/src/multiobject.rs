use crate::error::{self, Result};
use kube::core::DynamicObject;
use serde::de::DeserializeOwned;
use snafu::{ensure, ResultExt};

/// An ordered collection of manifests that all share the concrete kind `K`. One provider can own
/// any number of manifests of its kind through a `MultiObject`.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiObject<K> {
    items: Vec<K>,
}

impl<K> Default for MultiObject<K> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<K> MultiObject<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: K) {
        self.items.push(item)
    }

    pub fn items(&self) -> &[K] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [K] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.items.iter()
    }
}

impl<K> MultiObject<K>
where
    K: k8s_openapi::Resource + DeserializeOwned,
{
    /// Converts kind-erased objects into a `MultiObject` of `K`. Fails on the first object that is
    /// not a `K`.
    pub fn from_dynamic<I>(objects: I) -> Result<Self>
    where
        I: IntoIterator<Item = DynamicObject>,
    {
        let items = objects
            .into_iter()
            .map(from_dynamic_object::<K>)
            .collect::<Result<Vec<K>>>()?;
        Ok(Self { items })
    }
}

impl<K> IntoIterator for MultiObject<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a MultiObject<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Converts a single kind-erased object into a `K`, checking its `kind` first so that a mismatch is
/// reported with the offending kind.
pub fn from_dynamic_object<K>(object: DynamicObject) -> Result<K>
where
    K: k8s_openapi::Resource + DeserializeOwned,
{
    let actual = object
        .types
        .as_ref()
        .map(|types| types.kind.clone())
        .unwrap_or_default();
    ensure!(
        actual == K::KIND,
        error::TypeMismatchSnafu {
            expected: K::KIND,
            actual,
        }
    );
    let name = object.metadata.name.clone().unwrap_or_default();
    let value = serde_json::to_value(&object).context(error::DynamicConversionSnafu {
        kind: K::KIND,
        name: &name,
    })?;
    serde_json::from_value(value).context(error::DynamicConversionSnafu { kind: K::KIND, name })
}
