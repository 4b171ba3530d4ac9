use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::GemError;

/// Stable player identity as issued by the host.
pub type PlayerId = Uuid;

pub const PROTECTED_ITEMS_SCHEMA_VERSION: u8 = 1;

// ============================================================================
// Materials
// ============================================================================

/// Item category name as used by the host (`EMERALD`, `DIAMOND_SWORD`, ...).
///
/// Materials are owned by the host; this crate only needs a validated,
/// canonical spelling to compare against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material(String);

impl Material {
    pub const AIR: &'static str = "AIR";

    /// Parse a material name. Case-insensitive; `minecraft:` namespaces are accepted.
    pub fn parse(raw: &str) -> Result<Self, GemError> {
        let trimmed = raw.trim();
        let name = trimmed
            .strip_prefix("minecraft:")
            .unwrap_or(trimmed)
            .to_ascii_uppercase();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(GemError::InvalidMaterial(raw.to_string()));
        }
        Ok(Self(name))
    }

    pub fn air() -> Self {
        Self(Self::AIR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Air variants are "nothing" in a slot and never carry metadata.
    pub fn is_air(&self) -> bool {
        matches!(self.0.as_str(), "AIR" | "CAVE_AIR" | "VOID_AIR")
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Item stacks
// ============================================================================

/// A stack of identical items together with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u32,
    /// Rendered display label, if the item has been renamed.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Free-text lore lines. `None` means the item never had lore attached.
    #[serde(default)]
    pub lore: Option<Vec<String>>,
}

impl ItemStack {
    pub fn new(material: Material, amount: u32) -> Self {
        Self {
            material,
            amount,
            display_name: None,
            lore: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// True for air or a stack with nothing left in it.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.material.is_air()
    }

    /// Lore lines for reading; absent lore reads as no lines.
    pub fn lore_lines(&self) -> &[String] {
        self.lore.as_deref().unwrap_or(&[])
    }

    /// Lore lines for writing; absent lore becomes a fresh empty list.
    pub fn lore_mut(&mut self) -> &mut Vec<String> {
        self.lore.get_or_insert_with(Vec::new)
    }

    /// Same material and metadata, ignoring amount. Similar stacks merge.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.display_name == other.display_name
            && self.lore_lines() == other.lore_lines()
    }
}

// ============================================================================
// Escrow records
// ============================================================================

/// Items withheld from a player's death drops, pending their next respawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedItemRecord {
    pub player_id: PlayerId,
    pub items: Vec<ItemStack>,
    pub stored_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ProtectedItemRecord {
    pub fn new(player_id: PlayerId, items: Vec<ItemStack>) -> Self {
        Self {
            player_id,
            items,
            stored_at: Utc::now(),
            schema_version: PROTECTED_ITEMS_SCHEMA_VERSION,
        }
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.amount).sum()
    }
}
