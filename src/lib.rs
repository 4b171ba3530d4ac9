//! # Protection Gems
//!
//! Consumable gems that let an item survive its owner's death. Applying a gem
//! to an item writes a charge counter into the item's lore; when the owner dies,
//! items carrying a counter are held back from the death drops, spend one
//! charge, and are handed back on respawn.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use protection_gems::config::Config;
//! use protection_gems::gems::ProtectionGems;
//! use protection_gems::host::LocalHost;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_create("config.toml").await?;
//!     let mut host = LocalHost::new(config.inventory.clone());
//!     let mut gems = ProtectionGems::open(config)?;
//!     gems.enable();
//!
//!     host.join("Alice");
//!     let replies = gems.on_command("console", "protectiongem", &["give", "Alice", "2"], &mut host);
//!     println!("{:?}", replies);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`gems`] - codec, gem identity, inventory, escrow storage and the plugin itself
//! - [`host`] - the `GameHost` boundary and an in-process host
//! - [`config`] - configuration loading and validation
//! - [`logutil`] - log sanitising helpers
//!
//! ```text
//! ┌─────────────────┐
//! │   Game Host     │ ← events, players, scheduler
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ ProtectionGems  │ ← marshaling, error boundary
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ Handlers/Codec  │ ← pure logic
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Escrow Store   │ ← sled, flushed per write
//! └─────────────────┘
//! ```

pub mod config;
pub mod gems;
pub mod host;
pub mod logutil;
