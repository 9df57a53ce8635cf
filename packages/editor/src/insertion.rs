//! # Cursor/Insertion Protocol
//!
//! Dragging a new block in from the palette. A cursor placeholder joins the
//! list at drag start so the reorder rule can move it like any other item; at
//! drag end it becomes the new block or disappears.
//!
//! ## State Machine
//!
//! ```text
//!          drag start              drag end / cancel
//!   Idle ─────────────▶ Dragging ─────────────────────▶ Idle
//!   (no cursor)         (cursor in list,                (no cursor)
//!                        show_drop tracks pointer)
//! ```
//!
//! ## Invariants
//!
//! 1. Only one palette drag at a time; a second start is ignored
//! 2. After drag end or cancel the list holds no cursor, whatever happened
//!    during the drag
//! 3. A block materializes only if `show_drop` was set when the drag ended
//!
//! A move that cannot find the cursor is dropped, not treated as an error.

use tracing::{debug, info, instrument, trace};

use crate::defaults::DefaultsTable;
use crate::geometry::{GeometryProvider, PointerPosition};
use crate::ids::IdAllocator;
use crate::item::{BlockSubtype, Item, ItemId};
use crate::list::ItemList;
use crate::reorder::{decide, SwapThreshold};
use crate::store::BlockStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionState {
    #[default]
    Idle,

    Dragging {
        subtype: BlockSubtype,

        /// Releasing now would create the block
        show_drop: bool,
    },
}

/// A block created by a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedBlock {
    pub id: ItemId,
    pub index: usize,
    pub subtype: BlockSubtype,
}

/// Result of ending a palette drag
#[derive(Debug, Clone)]
pub struct DropOutcome {
    pub list: ItemList,
    pub dropped: Option<DroppedBlock>,
}

/// Drives one palette drag at a time
#[derive(Debug, Clone)]
pub struct InsertionProtocol {
    threshold: SwapThreshold,
    drop_margin: f64,
    state: InsertionState,
}

impl InsertionProtocol {
    pub fn new(threshold: SwapThreshold, drop_margin: f64) -> Self {
        Self {
            threshold,
            drop_margin,
            state: InsertionState::Idle,
        }
    }

    pub fn state(&self) -> InsertionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InsertionState::Dragging { .. })
    }

    pub fn show_drop(&self) -> bool {
        matches!(self.state, InsertionState::Dragging { show_drop: true, .. })
    }

    /// Begin a palette drag: the cursor goes to the end of the list
    #[instrument(level = "debug", skip(self, list), fields(len = list.len()))]
    pub fn on_drag_start(&mut self, list: &ItemList, subtype: BlockSubtype) -> ItemList {
        if self.is_dragging() {
            debug!("Palette drag already in progress, ignoring start");
            return list.clone();
        }

        let list = if list.has_cursor() {
            debug!("Removing stale cursor");
            list.remove_cursor()
        } else {
            list.clone()
        };

        self.state = InsertionState::Dragging {
            subtype,
            show_drop: false,
        };
        list.insert_cursor(list.len())
    }

    /// One pointer-move of the palette drag
    pub fn on_drag(
        &mut self,
        list: &ItemList,
        pointer: PointerPosition,
        viewport_width: f64,
        geometry: &impl GeometryProvider,
    ) -> ItemList {
        let InsertionState::Dragging { show_drop, .. } = &mut self.state else {
            return list.clone();
        };

        let Some(index) = list.cursor_index() else {
            trace!("Cursor not in list, skipping move");
            return list.clone();
        };

        *show_drop = viewport_width - pointer.x > self.drop_margin;

        match decide(list, index, pointer.y, geometry, self.threshold) {
            Some(decision) => {
                debug!(
                    from = decision.from,
                    to = decision.to,
                    direction = ?decision.direction,
                    "Moving cursor"
                );
                decision.apply(list)
            }
            None => list.clone(),
        }
    }

    /// Finish the palette drag
    ///
    /// With `show_drop` set, the cursor's slot becomes a new block and its
    /// defaults are written to `store`. Otherwise the cursor is discarded.
    pub fn on_drag_end(
        &mut self,
        list: &ItemList,
        ids: &mut IdAllocator,
        store: &mut impl BlockStore,
        defaults: &DefaultsTable,
    ) -> DropOutcome {
        let state = std::mem::take(&mut self.state);

        let (list, dropped) = match (state, list.cursor_index()) {
            (
                InsertionState::Dragging {
                    subtype,
                    show_drop: true,
                },
                Some(index),
            ) => {
                let id = ids.next(list);
                let next = list.replace_cursor(Some(Item::block(id, subtype)));

                if next.contains(id) {
                    defaults.seed(store, id, subtype);
                    info!(%id, index, %subtype, "Dropped new block");
                    (next, Some(DroppedBlock { id, index, subtype }))
                } else {
                    (next, None)
                }
            }
            (InsertionState::Dragging { show_drop: true, .. }, None) => {
                debug!("Palette drag ended without a cursor in the list");
                (list.clone(), None)
            }
            (InsertionState::Dragging { .. }, _) => {
                debug!("Palette drag ended outside the drop zone");
                (list.replace_cursor(None), None)
            }
            (InsertionState::Idle, _) => (list.clone(), None),
        };

        DropOutcome {
            list: list.remove_cursor(),
            dropped,
        }
    }

    /// Abandon the palette drag without dropping
    pub fn cancel(&mut self, list: &ItemList) -> ItemList {
        self.state = InsertionState::Idle;
        list.remove_cursor()
    }
}

impl Default for InsertionProtocol {
    fn default() -> Self {
        Self::new(SwapThreshold::Top, 200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, GeometrySnapshot};
    use crate::store::MemoryStore;

    const VIEWPORT: f64 = 1000.0;

    #[test]
    fn test_start_appends_cursor() {
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);

        assert_eq!(list.items(), &[Item::cursor()]);
        assert!(protocol.is_dragging());
        assert!(!protocol.show_drop());
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);
        let again = protocol.on_drag_start(&list, BlockSubtype::Input);

        assert!(again.same_snapshot(&list));
        assert_eq!(
            protocol.state(),
            InsertionState::Dragging {
                subtype: BlockSubtype::Text,
                show_drop: false
            }
        );
    }

    #[test]
    fn test_show_drop_tracks_right_edge_distance() {
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);
        let geometry = GeometrySnapshot::new();

        protocol.on_drag(&list, PointerPosition::new(700.0, 0.0), VIEWPORT, &geometry);
        assert!(protocol.show_drop());

        // Exactly at the margin does not count
        protocol.on_drag(&list, PointerPosition::new(800.0, 0.0), VIEWPORT, &geometry);
        assert!(!protocol.show_drop());
    }

    #[test]
    fn test_move_without_cursor_is_skipped() {
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);
        let without = list.remove_cursor();

        let after = protocol.on_drag(
            &without,
            PointerPosition::new(0.0, 0.0),
            VIEWPORT,
            &GeometrySnapshot::new(),
        );
        assert!(after.same_snapshot(&without));
        assert!(!protocol.show_drop());
    }

    #[test]
    fn test_cursor_uses_top_threshold() {
        let a = Item::block(ItemId(1), BlockSubtype::Text);
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::from_items([a]).unwrap(), BlockSubtype::Text);
        let geometry: GeometrySnapshot = [(ItemId(1), Geometry::new(10.0, 100.0))]
            .into_iter()
            .collect();

        // Inside A but below its top: the cursor stays put
        let list = protocol.on_drag(&list, PointerPosition::new(0.0, 50.0), VIEWPORT, &geometry);
        assert_eq!(list.cursor_index(), Some(1));

        let list = protocol.on_drag(&list, PointerPosition::new(0.0, 5.0), VIEWPORT, &geometry);
        assert_eq!(list.cursor_index(), Some(0));
    }

    #[test]
    fn test_end_outside_drop_zone_discards_cursor() {
        let mut protocol = InsertionProtocol::default();
        let mut ids = IdAllocator::default();
        let mut store = MemoryStore::new();

        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Input);
        let outcome = protocol.on_drag_end(&list, &mut ids, &mut store, &DefaultsTable::default());

        assert!(outcome.list.is_empty());
        assert_eq!(outcome.dropped, None);
        assert!(store.is_empty());
        assert!(!protocol.is_dragging());
    }

    #[test]
    fn test_end_in_drop_zone_creates_block_in_cursor_slot() {
        let mut protocol = InsertionProtocol::default();
        let mut ids = IdAllocator::new(crate::ids::IdPolicy::Monotonic);
        let mut store = MemoryStore::new();
        let seeded = ItemList::from_items([
            Item::block(ItemId(1), BlockSubtype::Text),
            Item::block(ItemId(2), BlockSubtype::Text),
        ])
        .unwrap();
        ids.observe(ItemId(2));

        let list = protocol.on_drag_start(&seeded, BlockSubtype::Checkbox);
        let list = protocol.on_drag(
            &list,
            PointerPosition::new(0.0, 9999.0),
            VIEWPORT,
            &GeometrySnapshot::new(),
        );
        let outcome = protocol.on_drag_end(&list, &mut ids, &mut store, &DefaultsTable::default());

        let dropped = outcome.dropped.unwrap();
        assert_eq!(dropped.index, 2);
        assert_eq!(dropped.id, ItemId(3));
        assert_eq!(outcome.list.block_ids(), vec![ItemId(1), ItemId(2), ItemId(3)]);
        assert_eq!(
            store.metadata(ItemId(3)).unwrap().get("label").unwrap(),
            "Checkbox"
        );
    }

    #[test]
    fn test_end_in_drop_zone_without_cursor_drops_nothing() {
        let mut protocol = InsertionProtocol::default();
        let mut store = MemoryStore::new();

        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);
        protocol.on_drag(
            &list,
            PointerPosition::new(0.0, 0.0),
            VIEWPORT,
            &GeometrySnapshot::new(),
        );
        assert!(protocol.show_drop());

        let lost = list.remove_cursor();
        let outcome = protocol.on_drag_end(
            &lost,
            &mut IdAllocator::default(),
            &mut store,
            &DefaultsTable::default(),
        );

        assert!(outcome.list.is_empty());
        assert_eq!(outcome.dropped, None);
        assert!(store.is_empty());
        assert_eq!(protocol.state(), InsertionState::Idle);
    }

    #[test]
    fn test_cancel_removes_cursor() {
        let mut protocol = InsertionProtocol::default();
        let list = protocol.on_drag_start(&ItemList::new(), BlockSubtype::Text);
        let list = protocol.cancel(&list);

        assert!(!list.has_cursor());
        assert_eq!(protocol.state(), InsertionState::Idle);
    }

    #[test]
    fn test_end_while_idle_strips_stray_cursor() {
        let mut protocol = InsertionProtocol::default();
        let stray = ItemList::new().insert_cursor(0);

        let outcome = protocol.on_drag_end(
            &stray,
            &mut IdAllocator::default(),
            &mut MemoryStore::new(),
            &DefaultsTable::default(),
        );
        assert!(!outcome.list.has_cursor());
    }
}
