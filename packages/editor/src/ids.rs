//! Block id allocation

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::item::ItemId;
use crate::list::ItemList;

/// How dropped blocks get their ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdPolicy {
    /// Counter that never repeats until `u64::MAX` is handed out
    #[default]
    Monotonic,

    /// `len * 2 + 1` of the list at drop time, for fixtures built around
    /// that numbering. Falls back to the counter on collision.
    LengthDerived,
}

/// Hands out block ids
#[derive(Debug, Clone)]
pub struct IdAllocator {
    policy: IdPolicy,
    next: u64,
}

impl IdAllocator {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            next: ItemId::CURSOR.0 + 1,
        }
    }

    /// Allocator whose counter starts past every block already in `list`
    pub fn after(list: &ItemList, policy: IdPolicy) -> Self {
        let mut allocator = Self::new(policy);
        for id in list.block_ids() {
            allocator.observe(id);
        }
        allocator
    }

    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Note an id issued elsewhere so the counter never hands it out
    pub fn observe(&mut self, id: ItemId) {
        self.next = self.next.max(id.0.saturating_add(1));
    }

    /// Id for a block about to join `list`
    pub fn next(&mut self, list: &ItemList) -> ItemId {
        if self.policy == IdPolicy::LengthDerived {
            let derived = ItemId(list.len() as u64 * 2 + 1);
            if !list.contains(derived) {
                self.observe(derived);
                return derived;
            }
            warn!(%derived, len = list.len(), "Length-derived id collides, using counter");
        }

        self.next_monotonic(list)
    }

    fn next_monotonic(&mut self, list: &ItemList) -> ItemId {
        let first = ItemId::CURSOR.0 + 1;
        let mut id = self.next.max(first);
        // Externally appended blocks may not have been observed
        while list.contains(ItemId(id)) {
            id = match id.checked_add(1) {
                Some(next) => next,
                None => {
                    warn!("Id counter exhausted, reusing a free id");
                    first
                }
            };
        }
        self.next = id.checked_add(1).unwrap_or(first);
        ItemId(id)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(IdPolicy::Monotonic)
    }
}
