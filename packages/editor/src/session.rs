//! # Canvas Session
//!
//! Routes drag-gesture callbacks to the reorder engine or the insertion
//! protocol and keeps the current list snapshot.
//!
//! Events are processed one at a time, each to completion. The rendering
//! layer reads [`Canvas::items`] after every update, re-measures, and feeds
//! the new geometry back through [`Canvas::set_geometry`].

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::EditorConfig;
use crate::defaults::DefaultsTable;
use crate::geometry::{Geometry, GeometrySnapshot, PointerPosition};
use crate::ids::IdAllocator;
use crate::insertion::{DroppedBlock, InsertionProtocol};
use crate::item::{BlockSubtype, Item, ItemId};
use crate::list::ItemList;
use crate::reorder::ReorderEngine;
use crate::store::{BlockStore, MemoryStore};

/// What a drag started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragSource {
    /// A block already on the canvas
    Block { id: ItemId },

    /// A palette entry that creates a block of `subtype`
    Palette { subtype: BlockSubtype },
}

/// Gesture callbacks from the drag layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureEvent {
    DragStart { source: DragSource },
    Drag { pointer: PointerPosition },
    DragEnd,
    DragCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveDrag {
    Block(ItemId),
    Palette,
}

/// Before/after snapshots of one processed event
#[derive(Debug, Clone)]
pub struct CanvasUpdate {
    pub previous: ItemList,
    pub current: ItemList,

    /// Set when the event dropped a new block
    pub dropped: Option<DroppedBlock>,
}

impl CanvasUpdate {
    /// Whether the event produced a new snapshot
    pub fn changed(&self) -> bool {
        !self.current.same_snapshot(&self.previous)
    }
}

/// One canvas being edited
pub struct Canvas<S: BlockStore = MemoryStore> {
    items: ItemList,
    geometry: GeometrySnapshot,
    config: EditorConfig,
    defaults: DefaultsTable,
    ids: IdAllocator,
    store: S,
    reorder: ReorderEngine,
    insertion: InsertionProtocol,

    /// Unbounded until the drag layer reports it
    viewport_width: f64,

    active: Option<ActiveDrag>,
}

impl Canvas<MemoryStore> {
    /// Canvas backed by an in-memory store
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: BlockStore> Canvas<S> {
    /// Empty canvas plus whatever `config.seed` lists
    pub fn with_store(config: EditorConfig, store: S) -> Self {
        let seed = config.seed.clone();
        let mut canvas = Self::with_items(config, store, ItemList::new());
        for subtype in seed {
            canvas.append_block(subtype);
        }
        canvas
    }

    /// Canvas over an existing list. Existing blocks are not re-seeded.
    pub fn with_items(config: EditorConfig, store: S, items: ItemList) -> Self {
        Self {
            ids: IdAllocator::after(&items, config.id_policy),
            defaults: config.defaults_table(),
            reorder: ReorderEngine::new(config.reorder_threshold),
            insertion: InsertionProtocol::new(config.insertion_threshold, config.drop_margin),
            items,
            geometry: GeometrySnapshot::new(),
            config,
            store,
            viewport_width: f64::INFINITY,
            active: None,
        }
    }

    /// Process one gesture callback
    #[instrument(level = "debug", skip(self), fields(version = self.items.version()))]
    pub fn handle(&mut self, event: GestureEvent) -> CanvasUpdate {
        match event {
            GestureEvent::DragStart { source } => self.drag_start(source),
            GestureEvent::Drag { pointer } => self.drag(pointer),
            GestureEvent::DragEnd => self.drag_end(),
            GestureEvent::DragCancel => self.drag_cancel(),
        }
    }

    pub fn drag_start(&mut self, source: DragSource) -> CanvasUpdate {
        let previous = self.items.clone();

        if self.active.is_some() {
            debug!("Drag started while another is active, cancelling it");
            self.drag_cancel();
        }

        match source {
            DragSource::Block { id } => {
                if id != ItemId::CURSOR && self.items.contains(id) {
                    self.active = Some(ActiveDrag::Block(id));
                } else {
                    debug!(%id, "Drag start for a block not on the canvas");
                }
            }
            DragSource::Palette { subtype } => {
                self.items = self.insertion.on_drag_start(&self.items, subtype);
                self.active = Some(ActiveDrag::Palette);
            }
        }

        self.update_from(previous, None)
    }

    pub fn drag(&mut self, pointer: PointerPosition) -> CanvasUpdate {
        let previous = self.items.clone();

        match self.active {
            Some(ActiveDrag::Block(id)) => {
                self.items = self.reorder.on_drag(&self.items, id, pointer.y, &self.geometry);
            }
            Some(ActiveDrag::Palette) => {
                self.items =
                    self.insertion
                        .on_drag(&self.items, pointer, self.viewport_width, &self.geometry);
            }
            None => {}
        }

        self.update_from(previous, None)
    }

    pub fn drag_end(&mut self) -> CanvasUpdate {
        let previous = self.items.clone();
        let mut dropped = None;

        match self.active.take() {
            Some(ActiveDrag::Block(_)) => {
                self.items = self.reorder.on_drag_end(&self.items);
            }
            Some(ActiveDrag::Palette) => {
                let outcome = self.insertion.on_drag_end(
                    &self.items,
                    &mut self.ids,
                    &mut self.store,
                    &self.defaults,
                );
                self.items = outcome.list;
                dropped = outcome.dropped;
            }
            None => {}
        }

        self.update_from(previous, dropped)
    }

    /// Abort the active drag. Block moves already made stay.
    pub fn drag_cancel(&mut self) -> CanvasUpdate {
        let previous = self.items.clone();

        match self.active.take() {
            Some(ActiveDrag::Block(_)) => {
                self.items = self.reorder.on_drag_end(&self.items);
            }
            Some(ActiveDrag::Palette) => {
                self.items = self.insertion.cancel(&self.items);
            }
            None => {}
        }

        self.update_from(previous, None)
    }

    /// Add a block at the bottom with its defaults
    pub fn append_block(&mut self, subtype: BlockSubtype) -> ItemId {
        let id = self.ids.next(&self.items);
        self.items = self.items.append(Item::block(id, subtype));
        self.defaults.seed(&mut self.store, id, subtype);
        debug!(%id, %subtype, "Appended block");
        id
    }

    /// Remove a block and everything held for it
    pub fn remove_block(&mut self, id: ItemId) -> bool {
        let next = self.items.remove(id);
        if next.same_snapshot(&self.items) {
            return false;
        }

        if self.active == Some(ActiveDrag::Block(id)) {
            self.active = None;
        }
        self.items = next;
        self.geometry.forget(id);
        self.store.remove(id);
        debug!(%id, "Removed block");
        true
    }

    /// Replace geometry with a fresh render pass. Entries for items not on
    /// the canvas are dropped.
    pub fn set_geometry(&mut self, geometry: GeometrySnapshot) {
        self.geometry.replace_all(geometry);
        self.geometry.retain_items(&self.items);
    }

    pub fn measure(&mut self, id: ItemId, geometry: Geometry) {
        self.geometry.measure(id, geometry);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn items(&self) -> &ItemList {
        &self.items
    }

    pub fn geometry(&self) -> &GeometrySnapshot {
        &self.geometry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Whether releasing the palette drag now would drop a block
    pub fn show_drop(&self) -> bool {
        self.insertion.show_drop()
    }

    fn update_from(&self, previous: ItemList, dropped: Option<DroppedBlock>) -> CanvasUpdate {
        CanvasUpdate {
            previous,
            current: self.items.clone(),
            dropped,
        }
    }
}
