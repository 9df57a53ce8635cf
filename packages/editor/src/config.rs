use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::defaults::{BlockDefaults, DefaultsTable};
use crate::ids::IdPolicy;
use crate::item::BlockSubtype;
use crate::reorder::SwapThreshold;
use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "blockcanvas.config.json";

/// Canvas configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// A palette drag only drops once the pointer is further than this many
    /// pixels from the viewport's right edge
    #[serde(default = "default_drop_margin")]
    pub drop_margin: f64,

    /// Upward threshold when reordering an existing block
    #[serde(default = "default_reorder_threshold")]
    pub reorder_threshold: SwapThreshold,

    /// Upward threshold when moving the palette cursor
    #[serde(default = "default_insertion_threshold")]
    pub insertion_threshold: SwapThreshold,

    #[serde(default)]
    pub id_policy: IdPolicy,

    /// Per-subtype overrides merged over the built-in defaults
    #[serde(default)]
    pub defaults: BTreeMap<BlockSubtype, BlockDefaults>,

    /// Blocks a new canvas starts with, top to bottom
    #[serde(default)]
    pub seed: Vec<BlockSubtype>,
}

fn default_drop_margin() -> f64 {
    200.0
}

fn default_reorder_threshold() -> SwapThreshold {
    SwapThreshold::Bottom
}

fn default_insertion_threshold() -> SwapThreshold {
    SwapThreshold::Top
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            // Return default config if none exists
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn defaults_table(&self) -> DefaultsTable {
        DefaultsTable::with_overrides(&self.defaults)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drop_margin: default_drop_margin(),
            reorder_threshold: default_reorder_threshold(),
            insertion_threshold: default_insertion_threshold(),
            id_policy: IdPolicy::default(),
            defaults: BTreeMap::new(),
            seed: vec![],
        }
    }
}
