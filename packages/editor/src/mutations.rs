//! # List Mutations
//!
//! Every change to the canvas list is one of these operations.
//!
//! ## Mutation Semantics
//!
//! ### Swap
//! - Exchanges two adjacent items; the only reordering primitive
//! - Fails on an out-of-range or non-adjacent index
//!
//! ### InsertCursor / RemoveCursor / ReplaceCursor
//! - At most one cursor exists; a second insert fails
//! - Removing or replacing a missing cursor is a no-op, not a failure
//! - Replacement keeps the cursor's slot
//!
//! ### Append / Remove
//! - Blocks only; the cursor goes through the cursor operations
//! - Append fails on a duplicate id
//!
//! ### Refresh
//! - Same items in a new snapshot, used to commit a finished drag

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{Item, ItemId};
use crate::list::ItemList;

/// Operations on the canvas list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ListMutation {
    /// Exchange the items at two adjacent indices
    Swap { a: usize, b: usize },

    /// Insert the cursor placeholder (index clamped to the end)
    InsertCursor { index: usize },

    /// Drop the cursor placeholder if present
    RemoveCursor,

    /// Replace the cursor in place, or drop it when `with` is `None`
    ReplaceCursor { with: Option<Item> },

    /// Add a block at the end
    Append { item: Item },

    /// Remove a block by id
    Remove { id: ItemId },

    /// Re-snapshot without changing order
    Refresh,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Indices {a} and {b} are not adjacent")]
    NotAdjacent { a: usize, b: usize },

    #[error("A cursor is already in the list")]
    CursorAlreadyPresent,

    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),

    #[error("Item id {0} is reserved for the cursor")]
    ReservedId(ItemId),

    #[error("Cursor item carries id {0}")]
    InvalidCursorId(ItemId),

    #[error("Cursor items cannot be used here")]
    CursorNotAllowed,

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
}

impl ListMutation {
    /// Apply against a snapshot, producing its successor
    ///
    /// Operations that turn out to be no-ops hand back the same snapshot.
    pub fn apply(&self, list: &ItemList) -> Result<ItemList, ListError> {
        self.validate(list)?;

        match self {
            ListMutation::Swap { a, b } => {
                let mut items = list.items().to_vec();
                items.swap(*a, *b);
                Ok(list.derive(items))
            }

            ListMutation::InsertCursor { index } => {
                let mut items = list.items().to_vec();
                let insert_index = (*index).min(items.len());
                items.insert(insert_index, Item::cursor());
                Ok(list.derive(items))
            }

            ListMutation::RemoveCursor => match list.cursor_index() {
                Some(cursor) => {
                    let mut items = list.items().to_vec();
                    items.remove(cursor);
                    Ok(list.derive(items))
                }
                None => Ok(list.clone()),
            },

            ListMutation::ReplaceCursor { with } => {
                let Some(cursor) = list.cursor_index() else {
                    return Ok(list.clone());
                };

                let mut items = list.items().to_vec();
                match with {
                    Some(item) => items[cursor] = *item,
                    None => {
                        items.remove(cursor);
                    }
                }
                Ok(list.derive(items))
            }

            ListMutation::Append { item } => {
                let mut items = list.items().to_vec();
                items.push(*item);
                Ok(list.derive(items))
            }

            ListMutation::Remove { id } => {
                let mut items = list.items().to_vec();
                items.retain(|item| item.id != *id);
                Ok(list.derive(items))
            }

            ListMutation::Refresh => Ok(list.derive(list.items().to_vec())),
        }
    }

    /// Validate without applying
    pub fn validate(&self, list: &ItemList) -> Result<(), ListError> {
        match self {
            ListMutation::Swap { a, b } => {
                let len = list.len();
                for &index in [a, b] {
                    if index >= len {
                        return Err(ListError::IndexOutOfBounds { index, len });
                    }
                }

                if a.abs_diff(*b) != 1 {
                    return Err(ListError::NotAdjacent { a: *a, b: *b });
                }

                Ok(())
            }

            ListMutation::InsertCursor { .. } => {
                if list.has_cursor() {
                    return Err(ListError::CursorAlreadyPresent);
                }
                Ok(())
            }

            ListMutation::RemoveCursor => Ok(()),

            ListMutation::ReplaceCursor { with } => match with {
                Some(item) if list.has_cursor() => Self::validate_new_block(list, item),
                _ => Ok(()),
            },

            ListMutation::Append { item } => Self::validate_new_block(list, item),

            ListMutation::Remove { id } => {
                if *id == ItemId::CURSOR {
                    return Err(ListError::CursorNotAllowed);
                }
                if !list.contains(*id) {
                    return Err(ListError::ItemNotFound(*id));
                }
                Ok(())
            }

            ListMutation::Refresh => Ok(()),
        }
    }

    fn validate_new_block(list: &ItemList, item: &Item) -> Result<(), ListError> {
        if item.is_cursor() {
            return Err(ListError::CursorNotAllowed);
        }
        if item.id == ItemId::CURSOR {
            return Err(ListError::ReservedId(item.id));
        }
        if list.contains(item.id) {
            return Err(ListError::DuplicateId(item.id));
        }
        Ok(())
    }
}
