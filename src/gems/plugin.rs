//! Host binding for protection gems.
//!
//! [`ProtectionGems`] is what a server registers: lifecycle hooks, the three
//! event handlers and the command. Each handler marshals host state into the
//! pure functions in [`super::handlers`] and writes the results back.
//! Faults are logged and reported; none of them escape to the host.

use std::sync::Arc;

use log::{debug, error, info, warn};

use super::codec::ProtectionCodec;
use super::commands::{self, CommandParseError, GemCommand};
use super::errors::GemError;
use super::events::{InventoryClickEvent, PlayerDeathEvent, PlayerRespawnEvent};
use super::gem::GemSpec;
use super::handlers;
use super::storage::{EscrowStore, SledEscrowStore};
use super::types::{ItemStack, PlayerId, ProtectedItemRecord};
use crate::config::Config;
use crate::host::GameHost;
use crate::logutil::{escape_log, log_label};

/// Escrowed items waiting for the host's next tick after a respawn.
///
/// Inventory changes are unsafe while the respawn event is being handled, so
/// the handler hands this to [`GameHost::schedule_next_tick`] instead.
pub struct PendingRestore {
    player: PlayerId,
    items: Vec<ItemStack>,
    store: Arc<dyn EscrowStore>,
}

/// What a restore did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub placed: Vec<ItemStack>,
    pub dropped: Vec<ItemStack>,
}

impl std::fmt::Debug for PendingRestore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRestore")
            .field("player", &self.player)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl PendingRestore {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn items(&self) -> &[ItemStack] {
        &self.items
    }

    /// Clear the record, then put the items back and drop what does not fit.
    ///
    /// The record is cleared even when some items had to be dropped. If the
    /// player has left, or the record cannot be cleared, the inventory is not
    /// touched and the record waits for the next respawn.
    pub fn run<H: GameHost + ?Sized>(self, host: &mut H) -> Result<RestoreReport, GemError> {
        let Some(player) = host.player_mut(&self.player) else {
            warn!(
                "escrow restore skipped: player {} is no longer online",
                self.player
            );
            return Err(GemError::PlayerOffline(self.player.to_string()));
        };

        let outcome = handlers::on_respawn(&self.items, &player.inventory);

        // Items only come back once the record is gone.
        if let Err(e) = self.store.delete(&self.player) {
            error!("failed to clear escrow record for {}: {}", self.player, e);
            return Err(e);
        }

        player.inventory = outcome.inventory;
        let location = player.location.clone();

        for item in &outcome.overflow {
            host.drop_item(&location, item.clone());
        }

        info!(
            "restored {} protected stacks to {} ({} dropped)",
            outcome.placed.len(),
            self.player,
            outcome.overflow.len()
        );
        Ok(RestoreReport {
            placed: outcome.placed,
            dropped: outcome.overflow,
        })
    }
}

/// The protection gems feature, bound to a host.
pub struct ProtectionGems {
    config: Config,
    gem: GemSpec,
    codec: ProtectionCodec,
    store: Arc<dyn EscrowStore>,
    enabled: bool,
}

impl ProtectionGems {
    pub fn new(config: Config, store: Arc<dyn EscrowStore>) -> Result<Self, GemError> {
        let gem = config.gem_spec()?;
        let codec = config.protection_codec();
        Ok(Self {
            config,
            gem,
            codec,
            store,
            enabled: false,
        })
    }

    /// Use a sled store under `config.storage.data_dir`.
    pub fn open(config: Config) -> Result<Self, GemError> {
        let store = SledEscrowStore::open(&config.storage.data_dir)?;
        Self::new(config, Arc::new(store))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gem(&self) -> &GemSpec {
        &self.gem
    }

    pub fn codec(&self) -> &ProtectionCodec {
        &self.codec
    }

    pub fn store(&self) -> &Arc<dyn EscrowStore> {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        info!(
            "ProtectionGems enabled (gem: {} {}, +{} charges per gem)",
            self.gem.material(),
            log_label(self.gem.display_name()),
            self.codec.increment()
        );
        match self.store.list() {
            Ok(pending) if !pending.is_empty() => {
                info!("{} escrow records awaiting respawn", pending.len())
            }
            Ok(_) => {}
            Err(e) => warn!("could not list escrow records: {}", e),
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        info!("ProtectionGems disabled");
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Apply a gem held on the cursor to the clicked item.
    ///
    /// On success the event is cancelled with the new target and cursor in
    /// it. On a fault the clicker gets the error message and the event is
    /// left untouched, so no gem is spent.
    pub fn on_inventory_click<H: GameHost + ?Sized>(
        &self,
        event: &mut InventoryClickEvent,
        host: &mut H,
    ) {
        let result = handlers::on_combine(
            event.cursor.as_ref(),
            event.current.as_ref(),
            &self.gem,
            &self.codec,
        );
        match result {
            Ok(Some(outcome)) => {
                debug!(
                    "gem applied by {} to {} (now {} charges)",
                    event.who_clicked, outcome.target.material, outcome.charges
                );
                event.current = Some(outcome.target);
                event.cursor = outcome.cursor;
                event.set_cancelled(true);
            }
            Ok(None) => {}
            Err(e) => {
                error!("failed to apply protection gem for {}: {}", event.who_clicked, e);
                host.send_message(&event.who_clicked, &self.config.messages.render_error());
            }
        }
    }

    /// Withhold protected drops and escrow them until respawn.
    ///
    /// Returns how many stacks were escrowed. If the record cannot be stored the
    /// event is left as it was and everything drops normally.
    pub fn on_player_death<H: GameHost + ?Sized>(
        &self,
        event: &mut PlayerDeathEvent,
        host: &mut H,
    ) -> usize {
        let outcome = handlers::on_death(event.drops.clone(), &self.codec);
        if outcome.escrow.is_empty() {
            return 0;
        }

        if let Err(e) = self.escrow(event.player, outcome.escrow.clone()) {
            error!("failed to escrow protected items for {}: {}", event.player, e);
            return 0;
        }

        if let Some(player) = host.player_mut(&event.player) {
            for item in &outcome.protected {
                player.inventory.remove_item(item);
            }
        }

        let count = outcome.escrow.len();
        event.drops = outcome.kept_drops;
        info!("escrowed {} protected stacks for {}", count, event.player);
        count
    }

    fn escrow(&self, player: PlayerId, mut items: Vec<ItemStack>) -> Result<(), GemError> {
        // A record left over from an unrestored death keeps its items.
        if let Some(existing) = self.store.get(&player)? {
            warn!(
                "merging with unrestored escrow record for {} ({} stacks)",
                player,
                existing.items.len()
            );
            let mut merged = existing.items;
            merged.append(&mut items);
            items = merged;
        }
        self.store.put(&ProtectedItemRecord::new(player, items))
    }

    /// Queue restoration of escrowed items for the next tick.
    ///
    /// Returns whether anything was scheduled.
    pub fn on_player_respawn<H: GameHost + ?Sized>(
        &self,
        event: &PlayerRespawnEvent,
        host: &mut H,
    ) -> bool {
        match self.store.get(&event.player) {
            Ok(Some(record)) => {
                debug!(
                    "scheduling restore of {} stacks for {}",
                    record.items.len(),
                    event.player
                );
                host.schedule_next_tick(PendingRestore {
                    player: event.player,
                    items: record.items,
                    store: Arc::clone(&self.store),
                });
                true
            }
            Ok(None) => false,
            Err(e) => {
                error!("failed to read escrow record for {}: {}", event.player, e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Command
    // ------------------------------------------------------------------

    /// Handle `/protectiongem <args>`; returns the replies for the sender.
    ///
    /// `None` when `command` is not ours.
    pub fn on_command<H: GameHost + ?Sized>(
        &self,
        sender: &str,
        command: &str,
        args: &[&str],
        host: &mut H,
    ) -> Option<Vec<String>> {
        if !commands::is_gem_command(command) {
            return None;
        }
        let messages = &self.config.messages;

        let (target, raw_amount) = match commands::parse_command(args) {
            Ok(GemCommand::Give { player, amount }) => (player, amount),
            Err(CommandParseError::Usage) => return Some(vec![messages.render_usage()]),
        };

        let Some(player_id) = host.player_by_name(&target) else {
            return Some(vec![messages.render_player_not_found(&target)]);
        };

        let Some(amount) = commands::parse_amount(&raw_amount) else {
            return Some(vec![messages.render_invalid_amount(&raw_amount)]);
        };

        match self.give_gems(&player_id, amount, host) {
            Ok(name) => {
                info!(
                    target: "security",
                    "{} gave {} protection gems to {}",
                    escape_log(sender),
                    amount,
                    escape_log(&name)
                );
                Some(vec![messages.render_gem_given(amount, &name)])
            }
            Err(e) => {
                error!("failed to give protection gems to {}: {}", escape_log(&target), e);
                Some(vec![messages.render_error()])
            }
        }
    }

    /// Put `amount` gems in the player's inventory, dropping any that do not fit.
    /// Returns the player's name.
    pub fn give_gems<H: GameHost + ?Sized>(
        &self,
        player_id: &PlayerId,
        amount: u32,
        host: &mut H,
    ) -> Result<String, GemError> {
        let gems = self.gem.create(amount)?;
        let player = host
            .player_mut(player_id)
            .ok_or_else(|| GemError::PlayerOffline(player_id.to_string()))?;

        let outcome = player.inventory.add_item(gems);
        let name = player.name.clone();
        let location = player.location.clone();

        if let Some(leftover) = outcome.leftover {
            debug!("{} gems did not fit for {}, dropping", leftover.amount, name);
            host.drop_item(&location, leftover);
        }
        Ok(name)
    }
}
