//! The host side of the plugin boundary.
//!
//! [`GameHost`] is everything the plugin needs from a game server. A real server
//! implements it over its own player and world objects. [`LocalHost`] is a
//! small in-process server (players, ground items, a tick queue) used by the
//! tests and by embedders that do not have one.

use std::collections::{HashMap, VecDeque};

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::InventoryConfig;
use crate::gems::events::{InventoryClickEvent, PlayerDeathEvent, PlayerRespawnEvent};
use crate::gems::inventory::Inventory;
use crate::gems::plugin::{PendingRestore, ProtectionGems, RestoreReport};
use crate::gems::types::{ItemStack, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("world", 0.0, 64.0, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub inventory: Inventory,
    /// Item held on the mouse cursor while an inventory is open.
    pub cursor: Option<ItemStack>,
    pub location: Location,
}

/// What the plugin needs from a game server.
pub trait GameHost {
    /// Resolve an online player by name.
    fn player_by_name(&self, name: &str) -> Option<PlayerId>;

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState>;

    /// Spawn `item` on the ground at `location`.
    fn drop_item(&mut self, location: &Location, item: ItemStack);

    /// Run `task` at the start of the next tick, after the current event finishes.
    fn schedule_next_tick(&mut self, task: PendingRestore);

    fn send_message(&mut self, player: &PlayerId, message: &str);
}

/// In-process host with a tick queue.
#[derive(Debug, Default)]
pub struct LocalHost {
    players: HashMap<PlayerId, PlayerState>,
    ground: Vec<(Location, ItemStack)>,
    next_tick: VecDeque<PendingRestore>,
    inbox: HashMap<PlayerId, Vec<String>>,
    inventory_config: InventoryConfig,
}

impl LocalHost {
    pub fn new(inventory_config: InventoryConfig) -> Self {
        Self {
            inventory_config,
            ..Default::default()
        }
    }

    /// Bring a player online with an empty inventory.
    pub fn join(&mut self, name: &str) -> PlayerId {
        let id = Uuid::new_v4();
        self.players.insert(
            id,
            PlayerState {
                id,
                name: name.to_string(),
                inventory: Inventory::from_config(&self.inventory_config),
                cursor: None,
                location: Location::default(),
            },
        );
        id
    }

    pub fn leave(&mut self, id: &PlayerId) -> Option<PlayerState> {
        self.players.remove(id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Items lying in the world.
    pub fn ground(&self) -> &[(Location, ItemStack)] {
        &self.ground
    }

    /// Messages sent to `player` so far.
    pub fn messages(&self, player: &PlayerId) -> &[String] {
        self.inbox.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pending_tasks(&self) -> usize {
        self.next_tick.len()
    }

    /// Run everything scheduled for this tick.
    pub fn run_tick(&mut self) -> Vec<RestoreReport> {
        let tasks: Vec<PendingRestore> = self.next_tick.drain(..).collect();
        let mut reports = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.run(self) {
                Ok(report) => reports.push(report),
                Err(e) => debug!("scheduled restore did not complete: {}", e),
            }
        }
        reports
    }

    /// The player clicks `slot` with whatever is on their cursor.
    ///
    /// Returns whether the plugin took over the click. Otherwise the cursor and
    /// slot are swapped, which is all the vanilla handling this host models.
    pub fn click(&mut self, plugin: &ProtectionGems, player: &PlayerId, slot: usize) -> bool {
        let Some(state) = self.players.get(player) else {
            return false;
        };
        let mut event = InventoryClickEvent::new(
            *player,
            slot,
            state.cursor.clone(),
            state.inventory.slot(slot).cloned(),
        );

        plugin.on_inventory_click(&mut event, self);

        let Some(state) = self.players.get_mut(player) else {
            return false;
        };
        if event.is_cancelled() {
            state.inventory.set_slot(slot, event.current);
            state.cursor = event.cursor;
            true
        } else {
            let previous = state.inventory.slot(slot).cloned();
            state.inventory.set_slot(slot, state.cursor.take());
            state.cursor = previous;
            false
        }
    }

    /// Kill the player: everything they carry drops unless the plugin keeps it.
    ///
    /// Returns the stacks that hit the ground.
    pub fn kill(&mut self, plugin: &ProtectionGems, player: &PlayerId) -> Vec<ItemStack> {
        let Some(state) = self.players.get(player) else {
            return Vec::new();
        };
        let drops: Vec<ItemStack> = state
            .inventory
            .contents()
            .cloned()
            .chain(state.cursor.clone())
            .collect();
        let mut event = PlayerDeathEvent {
            player: *player,
            drops,
        };

        plugin.on_player_death(&mut event, self);

        if let Some(state) = self.players.get_mut(player) {
            state.inventory.clear();
            state.cursor = None;
            let location = state.location.clone();
            for item in &event.drops {
                self.ground.push((location.clone(), item.clone()));
            }
        }
        event.drops
    }

    /// Respawn the player. Restoration happens on the next [`LocalHost::run_tick`].
    pub fn respawn(&mut self, plugin: &ProtectionGems, player: &PlayerId) -> bool {
        if !self.players.contains_key(player) {
            return false;
        }
        plugin.on_player_respawn(&PlayerRespawnEvent { player: *player }, self)
    }
}

impl GameHost for LocalHost {
    /// Exact (case-insensitive) name first, then the closest name starting with `name`.
    fn player_by_name(&self, name: &str) -> Option<PlayerId> {
        let wanted = name.to_lowercase();
        if let Some(p) = self
            .players
            .values()
            .find(|p| p.name.to_lowercase() == wanted)
        {
            return Some(p.id);
        }
        self.players
            .values()
            .filter(|p| p.name.to_lowercase().starts_with(&wanted))
            .min_by_key(|p| p.name.len().saturating_sub(wanted.len()))
            .map(|p| p.id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    fn drop_item(&mut self, location: &Location, item: ItemStack) {
        self.ground.push((location.clone(), item));
    }

    fn schedule_next_tick(&mut self, task: PendingRestore) {
        self.next_tick.push_back(task);
    }

    fn send_message(&mut self, player: &PlayerId, message: &str) {
        self.inbox
            .entry(*player)
            .or_default()
            .push(message.to_string());
    }
}
