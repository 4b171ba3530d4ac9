//! Event payloads the host hands to the plugin.
//!
//! The host owns dispatch. It builds one of these, passes it to the matching
//! `ProtectionGems::on_*` handler, and applies whatever the handler left in it.

use super::types::{ItemStack, PlayerId};

/// A player clicked a slot while holding `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryClickEvent {
    pub who_clicked: PlayerId,
    pub slot: usize,
    /// What the player is holding on the cursor.
    pub cursor: Option<ItemStack>,
    /// What sits in the clicked slot.
    pub current: Option<ItemStack>,
    cancelled: bool,
}

impl InventoryClickEvent {
    pub fn new(
        who_clicked: PlayerId,
        slot: usize,
        cursor: Option<ItemStack>,
        current: Option<ItemStack>,
    ) -> Self {
        Self {
            who_clicked,
            slot,
            cursor,
            current,
            cancelled: false,
        }
    }

    /// When cancelled the host skips its own click handling and keeps
    /// `cursor`/`current` exactly as the handler left them.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A player died; `drops` is what the host is about to spill on the ground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDeathEvent {
    pub player: PlayerId,
    pub drops: Vec<ItemStack>,
}

/// A player respawned. Inventory changes must wait for the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRespawnEvent {
    pub player: PlayerId,
}
