//! # Configuration Management Module
//!
//! Loads, validates and writes the protection-gems configuration file.
//!
//! ## Configuration Structure
//!
//! - [`GemConfig`] - what a protection gem looks like
//! - [`ProtectionConfig`] - counter lore template and charges per gem
//! - [`MessagesConfig`] - user-facing message templates
//! - [`InventoryConfig`] - player inventory shape used by the local host
//! - [`StorageConfig`] - where escrow records are persisted
//! - [`LoggingConfig`] - logging level, optional log file and security log
//!
//! ## Configuration File Format
//!
//! TOML, every key optional:
//!
//! ```toml
//! [gem]
//! material = "EMERALD"
//! name = "&6&lProtection Gem"
//!
//! [protection]
//! lore = "&6&lCharges: %amount%"
//! added_amount = 3
//!
//! [messages]
//! player_not_found = "&cPlayer %player% not found"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use protection_gems::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_create("config.toml").await?;
//!     println!("Charges per gem: {}", config.protection.added_amount);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::gems::codec::{ProtectionCodec, AMOUNT_PLACEHOLDER};
use crate::gems::errors::GemError;
use crate::gems::gem::GemSpec;
use crate::gems::markup;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GemConfig {
    /// Item category a gem is made of.
    pub material: String,
    /// Display label, `&` colour codes allowed.
    pub name: String,
}

impl Default for GemConfig {
    fn default() -> Self {
        Self {
            material: "EMERALD".to_string(),
            name: "&6&lProtection Gem".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Counter line template; must contain `%amount%` exactly once.
    pub lore: String,
    /// Charges added per gem applied.
    pub added_amount: u32,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            lore: "&6&lCharges: %amount%".to_string(),
            added_amount: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub usage: String,
    /// `%player%` is the name that was looked up.
    pub player_not_found: String,
    /// `%amount%` is the rejected token.
    pub invalid_amount: String,
    /// `%amount%` and `%player%`.
    pub gem_given: String,
    pub error: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            usage: "Usage: /protectiongem give <player> <amount>".to_string(),
            player_not_found: "Player %player% not found".to_string(),
            invalid_amount: "Invalid amount".to_string(),
            gem_given: "Gave %amount% Protection Gems to %player%".to_string(),
            error: "An error occurred while handling the Protection Gem".to_string(),
        }
    }
}

/// Inventory limits for players on the local host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    /// Number of slots.
    pub capacity: usize,
    /// Largest stack a slot may hold.
    pub max_stack_size: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 36,
            max_stack_size: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sled database directory holding escrow records.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/protected-items".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    /// Separate file for `security` target records (gem grants, purges).
    pub security_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            security_file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gem: GemConfig,
    pub protection: ProtectionConfig,
    pub messages: MessagesConfig,
    pub inventory: InventoryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to load config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.display(), e))?;

        Ok(())
    }

    /// Load `path`, writing the defaults there first if it does not exist yet.
    pub async fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !fs::try_exists(path).await.unwrap_or(false) {
            log::info!("No config at {}, writing defaults", path.display());
            Self::create_default(path).await?;
        }
        Self::load(path).await
    }

    /// Reject settings that would make gems or counters unusable.
    pub fn validate(&self) -> Result<()> {
        self.gem_spec()
            .map_err(|e| anyhow!("gem.material: {}", e))?;

        let placeholders = self.protection.lore.matches(AMOUNT_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(anyhow!(
                "protection.lore must contain {} exactly once (found {})",
                AMOUNT_PLACEHOLDER,
                placeholders
            ));
        }
        if self.protection_codec().prefix().is_empty() {
            return Err(anyhow!(
                "protection.lore needs fixed text before {}",
                AMOUNT_PLACEHOLDER
            ));
        }
        if self.inventory.capacity == 0 {
            return Err(anyhow!("inventory.capacity must be at least 1"));
        }
        if self.inventory.max_stack_size == 0 {
            return Err(anyhow!("inventory.max_stack_size must be at least 1"));
        }
        Ok(())
    }

    pub fn gem_spec(&self) -> Result<GemSpec, GemError> {
        GemSpec::new(&self.gem.material, &self.gem.name)
    }

    pub fn protection_codec(&self) -> ProtectionCodec {
        ProtectionCodec::new(&self.protection.lore, self.protection.added_amount)
    }
}

// Placeholders are filled after normalizing so player input keeps its `&`.
impl MessagesConfig {
    pub fn render_usage(&self) -> String {
        markup::normalize(&self.usage)
    }

    pub fn render_player_not_found(&self, player: &str) -> String {
        markup::normalize(&self.player_not_found).replace("%player%", player)
    }

    pub fn render_invalid_amount(&self, raw_amount: &str) -> String {
        markup::normalize(&self.invalid_amount).replace("%amount%", raw_amount)
    }

    pub fn render_gem_given(&self, amount: u32, player: &str) -> String {
        markup::normalize(&self.gem_given)
            .replace("%amount%", &amount.to_string())
            .replace("%player%", player)
    }

    pub fn render_error(&self) -> String {
        markup::normalize(&self.error)
    }
}
