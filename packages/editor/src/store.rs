//! # Style/Metadata Store
//!
//! Per-block style and metadata live outside the list, keyed by item id. The
//! core only writes through [`BlockStore`]; reading back is the property
//! panel's business.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::item::ItemId;

/// Partial style: CSS property (camelCase, as the browser's style objects
/// spell it) → value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylePatch(pub BTreeMap<String, String>);

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(property.into(), value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    /// Later keys win
    pub fn merge(&mut self, other: &StylePatch) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Partial metadata: caption text, placeholder, label, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Later keys win
    pub fn merge(&mut self, other: &Metadata) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Write side of the style/metadata store
pub trait BlockStore {
    /// Merge `patch` into the style of `id`
    fn set_style(&mut self, id: ItemId, patch: StylePatch);

    /// Merge `patch` into the metadata of `id`
    fn set_metadata(&mut self, id: ItemId, patch: Metadata);

    /// Drop everything held for `id`. Stores that keep history may ignore it.
    fn remove(&mut self, _id: ItemId) {}
}

impl<S: BlockStore + ?Sized> BlockStore for &mut S {
    fn set_style(&mut self, id: ItemId, patch: StylePatch) {
        (**self).set_style(id, patch);
    }

    fn set_metadata(&mut self, id: ItemId, patch: Metadata) {
        (**self).set_metadata(id, patch);
    }

    fn remove(&mut self, id: ItemId) {
        (**self).remove(id);
    }
}

/// In-memory store, shared with the rendering layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    styles: BTreeMap<ItemId, StylePatch>,
    metadata: BTreeMap<ItemId, Metadata>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, id: ItemId) -> Option<&StylePatch> {
        self.styles.get(&id)
    }

    pub fn metadata(&self, id: ItemId) -> Option<&Metadata> {
        self.metadata.get(&id)
    }

    /// Number of blocks with a style or metadata entry
    pub fn len(&self) -> usize {
        self.styles
            .keys()
            .chain(self.metadata.keys().filter(|id| !self.styles.contains_key(id)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.metadata.is_empty()
    }
}

impl BlockStore for MemoryStore {
    fn set_style(&mut self, id: ItemId, patch: StylePatch) {
        self.styles.entry(id).or_default().merge(&patch);
    }

    fn set_metadata(&mut self, id: ItemId, patch: Metadata) {
        self.metadata.entry(id).or_default().merge(&patch);
    }

    fn remove(&mut self, id: ItemId) {
        self.styles.remove(&id);
        self.metadata.remove(&id);
    }
}
