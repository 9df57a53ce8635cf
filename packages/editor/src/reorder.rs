//! # Drag-Reorder Engine
//!
//! Decides, once per pointer-move, whether the dragged item trades places
//! with a neighbor.
//!
//! ## Decision rule
//!
//! With the dragged item at `index` and the pointer at `y`:
//!
//! 1. If an item exists at `index + 1`, is measured, and `y > top`, swap down.
//! 2. Otherwise, if an item exists at `index - 1`, is measured, and `y` is above
//!    its threshold, swap up. The threshold is `top + height` for
//!    [`SwapThreshold::Bottom`] and `top` for [`SwapThreshold::Top`].
//! 3. Otherwise nothing happens this tick.
//!
//! At most one swap per call. A long drag moves one slot per event until the
//! pointer settles. Nothing is decided on release.
//!
//! An unmeasured neighbor skips that neighbor's check only, so an unmeasured
//! item below still lets the upward check run.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::geometry::GeometryProvider;
use crate::item::ItemId;
use crate::list::ItemList;

/// Where the upward check draws its line on the neighbor above
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapThreshold {
    /// `y < top`
    Top,

    /// `y < top + height`
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// A swap the engine chose for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapDecision {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

impl SwapDecision {
    /// Apply to the list the decision was made against
    pub fn apply(&self, list: &ItemList) -> ItemList {
        list.swap(self.from, self.to)
    }
}

/// Pure decision for the item at `index`
pub fn decide(
    list: &ItemList,
    index: usize,
    pointer_y: f64,
    geometry: &impl GeometryProvider,
    threshold: SwapThreshold,
) -> Option<SwapDecision> {
    if index >= list.len() {
        return None;
    }

    if let Some(below) = list.get(index + 1) {
        match geometry.geometry(below.id) {
            Some(g) if pointer_y > g.top => {
                return Some(SwapDecision {
                    from: index,
                    to: index + 1,
                    direction: Direction::Down,
                });
            }
            Some(_) => {}
            None => trace!(neighbor = %below.id, "Neighbor below is unmeasured"),
        }
    }

    let above = index.checked_sub(1).and_then(|i| list.get(i))?;
    let Some(g) = geometry.geometry(above.id) else {
        trace!(neighbor = %above.id, "Neighbor above is unmeasured");
        return None;
    };

    let line = match threshold {
        SwapThreshold::Top => g.top,
        SwapThreshold::Bottom => g.bottom(),
    };

    (pointer_y < line).then_some(SwapDecision {
        from: index,
        to: index - 1,
        direction: Direction::Up,
    })
}

/// Reorders an existing block while it is dragged
#[derive(Debug, Clone, Copy)]
pub struct ReorderEngine {
    threshold: SwapThreshold,
}

impl ReorderEngine {
    pub fn new(threshold: SwapThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> SwapThreshold {
        self.threshold
    }

    /// Handle one pointer-move for the block `dragged`
    ///
    /// The block is located by id, since its index shifts with every swap.
    #[instrument(level = "trace", skip(self, list, geometry), fields(version = list.version()))]
    pub fn on_drag(
        &self,
        list: &ItemList,
        dragged: ItemId,
        pointer_y: f64,
        geometry: &impl GeometryProvider,
    ) -> ItemList {
        let Some(index) = list.position(dragged) else {
            trace!(%dragged, "Dragged block is not in the list");
            return list.clone();
        };

        match decide(list, index, pointer_y, geometry, self.threshold) {
            Some(decision) => {
                debug!(
                    %dragged,
                    from = decision.from,
                    to = decision.to,
                    direction = ?decision.direction,
                    "Swapping dragged block"
                );
                decision.apply(list)
            }
            None => list.clone(),
        }
    }

    /// Commit a finished drag
    ///
    /// Positions were settled during the drag; this only re-snapshots so the
    /// rendering layer re-measures.
    pub fn on_drag_end(&self, list: &ItemList) -> ItemList {
        list.refresh()
    }
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new(SwapThreshold::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, GeometrySnapshot};
    use crate::item::{BlockSubtype, Item};

    /// 100px blocks, 10px apart, starting at y = 10
    fn column(ids: &[u64]) -> (ItemList, GeometrySnapshot) {
        let list = ItemList::from_items(
            ids.iter()
                .map(|&id| Item::block(ItemId(id), BlockSubtype::Text)),
        )
        .unwrap();
        let geometry = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (ItemId(id), Geometry::new(10.0 + 110.0 * i as f64, 100.0)))
            .collect();
        (list, geometry)
    }

    #[test]
    fn test_below_takes_precedence() {
        let (list, mut geometry) = column(&[1, 2, 3]);

        // Both hold at y = 60: past 3's top and inside 1
        geometry.measure(ItemId(3), Geometry::new(50.0, 100.0));

        let decision = decide(&list, 1, 60.0, &geometry, SwapThreshold::Bottom).unwrap();
        assert_eq!(decision.direction, Direction::Down);
        assert_eq!((decision.from, decision.to), (1, 2));
    }

    #[test]
    fn test_strict_comparison_at_top_edge() {
        let (list, geometry) = column(&[1, 2]);
        // 2's top is 120; equal is not past it
        assert_eq!(decide(&list, 0, 120.0, &geometry, SwapThreshold::Bottom), None);
        assert!(decide(&list, 0, 120.5, &geometry, SwapThreshold::Bottom).is_some());
    }

    #[test]
    fn test_threshold_variants_differ_above() {
        let (list, geometry) = column(&[1, 2]);
        // 1 spans 10..110. Pointer at 50 is inside it.
        assert!(decide(&list, 1, 50.0, &geometry, SwapThreshold::Bottom).is_some());
        assert_eq!(decide(&list, 1, 50.0, &geometry, SwapThreshold::Top), None);
        assert!(decide(&list, 1, 5.0, &geometry, SwapThreshold::Top).is_some());
    }

    #[test]
    fn test_unmeasured_below_still_checks_above() {
        let (list, mut geometry) = column(&[1, 2, 3]);
        geometry.forget(ItemId(3));

        let decision = decide(&list, 1, 20.0, &geometry, SwapThreshold::Bottom).unwrap();
        assert_eq!(decision.direction, Direction::Up);
    }

    #[test]
    fn test_index_out_of_range() {
        let (list, geometry) = column(&[1]);
        assert_eq!(decide(&list, 3, 0.0, &geometry, SwapThreshold::Top), None);
    }

    #[test]
    fn test_engine_follows_block_by_id() {
        let (list, geometry) = column(&[1, 2, 3, 4]);
        let engine = ReorderEngine::default();

        // Drag block 2 past 3's top, then past 4's top using stale geometry
        let list = engine.on_drag(&list, ItemId(2), 235.0, &geometry);
        assert_eq!(list.block_ids(), vec![ItemId(1), ItemId(3), ItemId(2), ItemId(4)]);

        let list = engine.on_drag(&list, ItemId(2), 345.0, &geometry);
        assert_eq!(list.block_ids(), vec![ItemId(1), ItemId(3), ItemId(4), ItemId(2)]);
    }

    #[test]
    fn test_drag_end_keeps_order() {
        let (list, _) = column(&[1, 2]);
        let committed = ReorderEngine::default().on_drag_end(&list);
        assert_eq!(committed, list);
        assert!(!committed.same_snapshot(&list));
    }
}
