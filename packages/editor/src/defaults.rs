//! Default style and metadata for freshly dropped blocks

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::{BlockSubtype, ItemId};
use crate::store::{BlockStore, Metadata, StylePatch};

/// What a new block of one subtype starts with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDefaults {
    #[serde(default)]
    pub style: StylePatch,

    #[serde(default)]
    pub metadata: Metadata,
}

impl BlockDefaults {
    /// Built-in payload for `subtype`
    pub fn builtin(subtype: BlockSubtype) -> Self {
        match subtype {
            BlockSubtype::Text => Self {
                style: StylePatch::new().with("fontSize", "16px"),
                metadata: Metadata::new().with("text", "Text"),
            },
            BlockSubtype::Input => Self {
                style: StylePatch::new().with("width", "100%").with("height", "30px"),
                metadata: Metadata::new().with("placeholder", "Placeholder"),
            },
            BlockSubtype::InputContainer => Self {
                style: StylePatch::new().with("fontSize", "14px"),
                metadata: Metadata::new()
                    .with("label", "Label")
                    .with("placeholder", "Placeholder"),
            },
            BlockSubtype::Checkbox => Self {
                style: StylePatch::new(),
                metadata: Metadata::new().with("label", "Checkbox").with("checked", false),
            },
        }
    }
}

/// Defaults for every subtype
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsTable {
    entries: BTreeMap<BlockSubtype, BlockDefaults>,
}

impl DefaultsTable {
    /// Built-ins with `overrides` merged on top, key by key
    pub fn with_overrides(overrides: &BTreeMap<BlockSubtype, BlockDefaults>) -> Self {
        let mut table = Self::default();
        for (subtype, extra) in overrides {
            let entry = table.entries.entry(*subtype).or_default();
            entry.style.merge(&extra.style);
            entry.metadata.merge(&extra.metadata);
        }
        table
    }

    pub fn get(&self, subtype: BlockSubtype) -> BlockDefaults {
        self.entries
            .get(&subtype)
            .cloned()
            .unwrap_or_else(|| BlockDefaults::builtin(subtype))
    }

    /// Write the defaults for a new block into `store`
    pub fn seed(&self, store: &mut impl BlockStore, id: ItemId, subtype: BlockSubtype) {
        let defaults = self.get(subtype);
        store.set_style(id, defaults.style);
        store.set_metadata(id, defaults.metadata);
    }
}

impl Default for DefaultsTable {
    fn default() -> Self {
        Self {
            entries: BlockSubtype::ALL
                .into_iter()
                .map(|subtype| (subtype, BlockDefaults::builtin(subtype)))
                .collect(),
        }
    }
}
