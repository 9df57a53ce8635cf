//! # Ordered Item List
//!
//! The canvas contents, top to bottom. The list is the single source of truth
//! for render order.
//!
//! Every operation takes `&self` and hands back a new snapshot. The old
//! snapshot is never touched, so a consumer holding the previous list can diff
//! it against the new one. Snapshots share storage until they diverge.
//!
//! ## Invariants
//!
//! 1. At most one cursor item
//! 2. Block ids are pairwise distinct and never [`ItemId::CURSOR`]
//! 3. A reorder is a permutation: no item is created or lost by a swap
//!
//! The plain methods ([`ItemList::swap`], [`ItemList::insert_cursor`], ...) are
//! no-ops on failure and return the unchanged list. Use
//! [`ListMutation::apply`] to get the rejection reason instead.

use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::item::{Item, ItemId};
use crate::mutations::{ListError, ListMutation};

/// Immutable snapshot of the canvas list
#[derive(Debug, Clone)]
pub struct ItemList {
    items: Arc<[Item]>,

    /// Increments on every snapshot that differs from its parent
    version: u64,
}

impl ItemList {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::<Item>::new()),
            version: 0,
        }
    }

    /// Create a pre-seeded list, validating the invariants
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, ListError> {
        let items: Vec<Item> = items.into_iter().collect();

        let mut seen = HashSet::new();
        let mut cursors = 0;
        for item in &items {
            if item.is_cursor() {
                if item.id != ItemId::CURSOR {
                    return Err(ListError::InvalidCursorId(item.id));
                }
                cursors += 1;
                if cursors > 1 {
                    return Err(ListError::CursorAlreadyPresent);
                }
            } else {
                if item.id == ItemId::CURSOR {
                    return Err(ListError::ReservedId(item.id));
                }
                if !seen.insert(item.id) {
                    return Err(ListError::DuplicateId(item.id));
                }
            }
        }

        Ok(Self {
            items: Arc::from(items),
            version: 0,
        })
    }

    /// Build the successor snapshot
    pub(crate) fn derive(&self, items: Vec<Item>) -> Self {
        Self {
            items: Arc::from(items),
            version: self.version + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Index of the item with `id`
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Index of the cursor, if one is in the list
    pub fn cursor_index(&self) -> Option<usize> {
        self.items.iter().position(Item::is_cursor)
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor_index().is_some()
    }

    /// Ids of the blocks in render order, cursor excluded
    pub fn block_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| !item.is_cursor())
            .map(|item| item.id)
            .collect()
    }

    pub fn max_block_id(&self) -> Option<ItemId> {
        self.items
            .iter()
            .filter(|item| !item.is_cursor())
            .map(|item| item.id)
            .max()
    }

    /// Whether `other` is this exact snapshot, not just equal contents
    pub fn same_snapshot(&self, other: &ItemList) -> bool {
        Arc::ptr_eq(&self.items, &other.items) && self.version == other.version
    }

    /// Exchange two adjacent items
    #[must_use]
    pub fn swap(&self, a: usize, b: usize) -> ItemList {
        self.apply_or_keep(ListMutation::Swap { a, b })
    }

    /// Insert the cursor at `index` (clamped to the end)
    #[must_use]
    pub fn insert_cursor(&self, index: usize) -> ItemList {
        self.apply_or_keep(ListMutation::InsertCursor { index })
    }

    #[must_use]
    pub fn remove_cursor(&self) -> ItemList {
        self.apply_or_keep(ListMutation::RemoveCursor)
    }

    /// Put `with` in the cursor's slot, or drop the cursor when `None`
    #[must_use]
    pub fn replace_cursor(&self, with: Option<Item>) -> ItemList {
        self.apply_or_keep(ListMutation::ReplaceCursor { with })
    }

    #[must_use]
    pub fn append(&self, item: Item) -> ItemList {
        self.apply_or_keep(ListMutation::Append { item })
    }

    /// Remove a block by id
    #[must_use]
    pub fn remove(&self, id: ItemId) -> ItemList {
        self.apply_or_keep(ListMutation::Remove { id })
    }

    /// Same items, fresh snapshot
    #[must_use]
    pub fn refresh(&self) -> ItemList {
        self.apply_or_keep(ListMutation::Refresh)
    }

    fn apply_or_keep(&self, mutation: ListMutation) -> ItemList {
        match mutation.apply(self) {
            Ok(list) => list,
            Err(error) => {
                debug!(%error, ?mutation, version = self.version, "List mutation rejected");
                self.clone()
            }
        }
    }
}

impl Default for ItemList {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents only. Use [`ItemList::same_snapshot`] for identity.
impl PartialEq for ItemList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemList {}

impl Serialize for ItemList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.as_ref().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::BlockSubtype;

    fn blocks(ids: &[u64]) -> ItemList {
        ItemList::from_items(
            ids.iter()
                .map(|&id| Item::block(ItemId(id), BlockSubtype::Text)),
        )
        .unwrap()
    }

    fn ids(list: &ItemList) -> Vec<u64> {
        list.items().iter().map(|item| item.id.0).collect()
    }

    #[test]
    fn test_swap_adjacent() {
        let list = blocks(&[1, 2, 3, 4]);
        let swapped = list.swap(1, 2);

        assert_eq!(ids(&swapped), vec![1, 3, 2, 4]);
        assert_eq!(swapped.version(), list.version() + 1);

        // The original snapshot is untouched
        assert_eq!(ids(&list), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_swap_out_of_bounds_is_noop() {
        let list = blocks(&[1, 2]);

        assert!(list.swap(1, 2).same_snapshot(&list));
        assert!(list.swap(usize::MAX, 0).same_snapshot(&list));
    }

    #[test]
    fn test_swap_non_adjacent_is_noop() {
        let list = blocks(&[1, 2, 3]);
        assert!(list.swap(0, 2).same_snapshot(&list));
        assert!(list.swap(1, 1).same_snapshot(&list));
    }

    #[test]
    fn test_insert_cursor_rejects_second_cursor() {
        let list = blocks(&[1]).insert_cursor(0);
        assert_eq!(list.cursor_index(), Some(0));

        let again = list.insert_cursor(1);
        assert!(again.same_snapshot(&list));
        assert_eq!(again.items().iter().filter(|i| i.is_cursor()).count(), 1);
    }

    #[test]
    fn test_insert_cursor_clamps_to_end() {
        let list = blocks(&[1, 2]).insert_cursor(99);
        assert_eq!(list.cursor_index(), Some(2));
    }

    #[test]
    fn test_remove_cursor_without_cursor_is_noop() {
        let list = blocks(&[1, 2]);
        assert!(list.remove_cursor().same_snapshot(&list));
    }

    #[test]
    fn test_replace_cursor_keeps_slot() {
        let list = blocks(&[1, 2]).insert_cursor(1);
        let replaced = list.replace_cursor(Some(Item::block(ItemId(7), BlockSubtype::Input)));

        assert_eq!(ids(&replaced), vec![1, 7, 2]);
        assert!(!replaced.has_cursor());
    }

    #[test]
    fn test_replace_cursor_with_none_drops_it() {
        let list = blocks(&[1]).insert_cursor(0);
        assert_eq!(ids(&list.replace_cursor(None)), vec![1]);
    }

    #[test]
    fn test_replace_cursor_rejects_duplicate_id() {
        let list = blocks(&[1, 2]).insert_cursor(0);
        let replaced = list.replace_cursor(Some(Item::block(ItemId(2), BlockSubtype::Text)));
        assert!(replaced.same_snapshot(&list));
    }

    #[test]
    fn test_append_rejects_duplicates_and_cursor() {
        let list = blocks(&[1]);

        assert!(list
            .append(Item::block(ItemId(1), BlockSubtype::Checkbox))
            .same_snapshot(&list));
        assert!(list.append(Item::cursor()).same_snapshot(&list));
        assert_eq!(ids(&list.append(Item::block(ItemId(5), BlockSubtype::Checkbox))), vec![1, 5]);
    }

    #[test]
    fn test_remove_block() {
        let list = blocks(&[1, 2, 3]);
        assert_eq!(ids(&list.remove(ItemId(2))), vec![1, 3]);
        assert!(list.remove(ItemId(9)).same_snapshot(&list));
    }

    #[test]
    fn test_refresh_is_new_snapshot_with_same_contents() {
        let list = blocks(&[1, 2]);
        let refreshed = list.refresh();

        assert_eq!(refreshed, list);
        assert!(!refreshed.same_snapshot(&list));
        assert_eq!(refreshed.version(), 1);
    }

    #[test]
    fn test_from_items_validates() {
        let dup = ItemList::from_items([
            Item::block(ItemId(1), BlockSubtype::Text),
            Item::block(ItemId(1), BlockSubtype::Input),
        ]);
        assert_eq!(dup.unwrap_err(), ListError::DuplicateId(ItemId(1)));

        let two_cursors = ItemList::from_items([Item::cursor(), Item::cursor()]);
        assert_eq!(two_cursors.unwrap_err(), ListError::CursorAlreadyPresent);

        let reserved = ItemList::from_items([Item::block(ItemId::CURSOR, BlockSubtype::Text)]);
        assert_eq!(reserved.unwrap_err(), ListError::ReservedId(ItemId::CURSOR));
    }

    #[test]
    fn test_block_ids_skip_cursor() {
        let list = blocks(&[4, 2]).insert_cursor(1);
        assert_eq!(list.block_ids(), vec![ItemId(4), ItemId(2)]);
        assert_eq!(list.max_block_id(), Some(ItemId(4)));
    }
}
