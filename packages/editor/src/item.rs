//! # Canvas Items
//!
//! One row of the canvas list. Position is never stored on the item; it is
//! the item's index in the [`ItemList`](crate::ItemList).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EditorError;

/// Stable identity of a canvas item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Reserved for the drag-in placeholder. Block ids never take this value.
    pub const CURSOR: ItemId = ItemId(0);
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendered form of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockSubtype {
    Text,
    Input,
    InputContainer,
    Checkbox,
}

impl BlockSubtype {
    pub const ALL: [BlockSubtype; 4] = [
        BlockSubtype::Text,
        BlockSubtype::Input,
        BlockSubtype::InputContainer,
        BlockSubtype::Checkbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockSubtype::Text => "text",
            BlockSubtype::Input => "input",
            BlockSubtype::InputContainer => "input-container",
            BlockSubtype::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for BlockSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockSubtype {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockSubtype::ALL
            .into_iter()
            .find(|subtype| subtype.as_str() == s)
            .ok_or_else(|| EditorError::UnknownSubtype(s.to_string()))
    }
}

/// What an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "subtype", rename_all = "lowercase")]
pub enum ItemKind {
    /// A real element on the canvas
    Block(BlockSubtype),

    /// Transient placeholder for a palette drag in progress
    Cursor,
}

/// A single row in the canvas list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn block(id: ItemId, subtype: BlockSubtype) -> Self {
        Self {
            id,
            kind: ItemKind::Block(subtype),
        }
    }

    pub fn cursor() -> Self {
        Self {
            id: ItemId::CURSOR,
            kind: ItemKind::Cursor,
        }
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self.kind, ItemKind::Cursor)
    }

    /// Block subtype, `None` for the cursor
    pub fn subtype(&self) -> Option<BlockSubtype> {
        match self.kind {
            ItemKind::Block(subtype) => Some(subtype),
            ItemKind::Cursor => None,
        }
    }
}
