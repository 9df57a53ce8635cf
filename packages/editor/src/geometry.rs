//! # Geometry Snapshot
//!
//! Measured screen position of rendered items, in the scroll container's
//! coordinate space. Owned by the rendering layer; the core only reads it.
//!
//! Measurements trail the list by one render pass. After a swap the snapshot
//! still describes the old order until the next refresh, and a just-inserted
//! item has no entry yet. Readers treat a missing entry as "unmeasured".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::item::ItemId;
use crate::list::ItemList;

/// Top offset and height of one rendered item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Pointer location reported by the drag layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Source of item measurements
pub trait GeometryProvider {
    /// Measured geometry for `id`, `None` if it has not been rendered yet
    fn geometry(&self, id: ItemId) -> Option<Geometry>;
}

/// Id → geometry map, refreshed once per render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometrySnapshot {
    entries: HashMap<ItemId, Geometry>,
}

impl GeometrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite one measurement
    pub fn measure(&mut self, id: ItemId, geometry: Geometry) {
        self.entries.insert(id, geometry);
    }

    pub fn forget(&mut self, id: ItemId) {
        self.entries.remove(&id);
    }

    /// Replace every entry with a fresh render pass
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = (ItemId, Geometry)>) {
        self.entries = entries.into_iter().collect();
    }

    /// Drop measurements for items that left the list
    pub fn retain_items(&mut self, list: &ItemList) {
        self.entries.retain(|id, _| list.contains(*id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GeometryProvider for GeometrySnapshot {
    fn geometry(&self, id: ItemId) -> Option<Geometry> {
        self.entries.get(&id).copied()
    }
}

impl FromIterator<(ItemId, Geometry)> for GeometrySnapshot {
    fn from_iter<I: IntoIterator<Item = (ItemId, Geometry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for GeometrySnapshot {
    type Item = (ItemId, Geometry);
    type IntoIter = std::collections::hash_map::IntoIter<ItemId, Geometry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P: GeometryProvider + ?Sized> GeometryProvider for &P {
    fn geometry(&self, id: ItemId) -> Option<Geometry> {
        (**self).geometry(id)
    }
}
