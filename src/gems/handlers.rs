//! Pure event logic: explicit inputs in, explicit outputs back.
//!
//! Nothing here touches storage or the host. `ProtectionGems` does the
//! marshaling around these functions.

use super::codec::ProtectionCodec;
use super::errors::GemError;
use super::gem::GemSpec;
use super::inventory::Inventory;
use super::types::ItemStack;

/// Result of applying one gem to a target item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOutcome {
    /// The target with its counter raised.
    pub target: ItemStack,
    /// The gem stack less one; `None` once the last gem is used.
    pub cursor: Option<ItemStack>,
    /// Charges on the target afterwards.
    pub charges: u32,
}

/// Apply the gem held on the cursor to `target`.
///
/// `Ok(None)` means the click is not a gem application and the host should
/// handle it normally. On error nothing has been changed.
pub fn on_combine(
    cursor: Option<&ItemStack>,
    target: Option<&ItemStack>,
    gem: &GemSpec,
    codec: &ProtectionCodec,
) -> Result<Option<CombineOutcome>, GemError> {
    let Some(cursor) = cursor.filter(|c| gem.is_gem(c)) else {
        return Ok(None);
    };
    let Some(target) = target.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if cursor.amount == 0 {
        return Err(GemError::EmptyStack(gem.display_name().to_string()));
    }

    let mut target = target.clone();
    let charges = codec.add_item_charge(&mut target)?;

    let remaining = cursor.amount - 1;
    let cursor = (remaining > 0).then(|| {
        let mut gems = cursor.clone();
        gems.amount = remaining;
        gems
    });

    Ok(Some(CombineOutcome {
        target,
        cursor,
        charges,
    }))
}

/// Death drops split into what falls and what is held for respawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeathOutcome {
    /// Drops that fall to the ground as usual.
    pub kept_drops: Vec<ItemStack>,
    /// The protected drops as they were, for removal from the inventory.
    pub protected: Vec<ItemStack>,
    /// The protected drops after one charge was spent on each.
    pub escrow: Vec<ItemStack>,
}

/// Partition `drops` and spend one charge on every protected item.
pub fn on_death(drops: Vec<ItemStack>, codec: &ProtectionCodec) -> DeathOutcome {
    let (protected, kept_drops): (Vec<ItemStack>, Vec<ItemStack>) = drops
        .into_iter()
        .partition(|item| codec.item_has_protection(item));

    let escrow = protected
        .iter()
        .cloned()
        .map(|mut item| {
            codec.consume_item_charge(&mut item);
            item
        })
        .collect();

    DeathOutcome {
        kept_drops,
        protected,
        escrow,
    }
}

/// Where escrowed items end up on respawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespawnOutcome {
    /// The player's inventory with everything that fit added.
    pub inventory: Inventory,
    /// What went into the inventory.
    pub placed: Vec<ItemStack>,
    /// What did not fit and must be dropped in the world.
    pub overflow: Vec<ItemStack>,
}

/// Place `items` into a copy of `inventory`. The caller commits the copy in one step.
pub fn on_respawn(items: &[ItemStack], inventory: &Inventory) -> RespawnOutcome {
    let mut inventory = inventory.clone();
    let mut placed = Vec::new();
    let mut overflow = Vec::new();

    for item in items.iter().filter(|i| !i.is_empty()) {
        let outcome = inventory.add_item(item.clone());
        if outcome.placed > 0 {
            let mut fitted = item.clone();
            fitted.amount = outcome.placed;
            placed.push(fitted);
        }
        overflow.extend(outcome.leftover);
    }

    RespawnOutcome {
        inventory,
        placed,
        overflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gems::types::Material;

    fn gem() -> GemSpec {
        GemSpec::new("EMERALD", "&6&lProtection Gem").unwrap()
    }

    fn codec() -> ProtectionCodec {
        ProtectionCodec::new("&6&lCharges: %amount%", 3)
    }

    fn sword() -> ItemStack {
        ItemStack::new(Material::parse("DIAMOND_SWORD").unwrap(), 1)
    }

    #[test]
    fn test_combine_gem_onto_fresh_sword() {
        let gems = gem().create(2).unwrap();
        let outcome = on_combine(Some(&gems), Some(&sword()), &gem(), &codec())
            .unwrap()
            .expect("handled");
        assert_eq!(outcome.charges, 3);
        assert_eq!(outcome.target.lore_lines(), &["§6§lCharges: 3".to_string()]);
        assert_eq!(outcome.cursor.unwrap().amount, 1);
    }

    #[test]
    fn test_combine_last_gem_empties_cursor() {
        let gems = gem().create(1).unwrap();
        let outcome = on_combine(Some(&gems), Some(&sword()), &gem(), &codec())
            .unwrap()
            .unwrap();
        assert!(outcome.cursor.is_none());
    }

    #[test]
    fn test_combine_ignores_non_gem_cursor() {
        let rock = ItemStack::new(Material::parse("STONE").unwrap(), 1);
        assert!(on_combine(Some(&rock), Some(&sword()), &gem(), &codec())
            .unwrap()
            .is_none());
        assert!(on_combine(None, Some(&sword()), &gem(), &codec())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_combine_ignores_empty_target() {
        let gems = gem().create(1).unwrap();
        let air = ItemStack::new(Material::air(), 1);
        assert!(on_combine(Some(&gems), Some(&air), &gem(), &codec())
            .unwrap()
            .is_none());
        assert!(on_combine(Some(&gems), None, &gem(), &codec())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_combine_overflow_is_error() {
        let gems = gem().create(1).unwrap();
        let maxed = sword().with_lore([codec().render(u32::MAX)]);
        assert!(on_combine(Some(&gems), Some(&maxed), &gem(), &codec()).is_err());
    }

    #[test]
    fn test_death_partitions_and_consumes() {
        let protected = sword().with_lore(["Sharp", "§6§lCharges: 5"]);
        let plain = ItemStack::new(Material::parse("DIRT").unwrap(), 12);
        let outcome = on_death(vec![plain.clone(), protected.clone()], &codec());

        assert_eq!(outcome.kept_drops, vec![plain]);
        assert_eq!(outcome.protected, vec![protected]);
        assert_eq!(
            outcome.escrow[0].lore_lines(),
            &["Sharp".to_string(), "§6§lCharges: 1".to_string()]
        );
    }

    #[test]
    fn test_death_with_zero_counter_still_protects_once() {
        let item = sword().with_lore(["§6§lCharges: 0"]);
        let outcome = on_death(vec![item], &codec());
        assert!(outcome.kept_drops.is_empty());
        assert_eq!(outcome.escrow[0].lore, None);
    }

    #[test]
    fn test_respawn_places_and_overflows() {
        let mut inventory = Inventory::new(1, 64);
        inventory.add_item(ItemStack::new(Material::parse("STONE").unwrap(), 64));

        let items = vec![sword()];
        let outcome = on_respawn(&items, &inventory);
        assert!(outcome.placed.is_empty());
        assert_eq!(outcome.overflow, items);
        // Caller's inventory is untouched.
        assert_eq!(inventory.count_similar(&sword()), 0);
    }

    #[test]
    fn test_respawn_partial_stack_overflow() {
        let inventory = Inventory::new(1, 64);
        let arrows = ItemStack::new(Material::parse("ARROW").unwrap(), 70)
            .with_lore(["§6§lCharges: 1"]);
        let outcome = on_respawn(&[arrows], &inventory);
        assert_eq!(outcome.placed[0].amount, 64);
        assert_eq!(outcome.overflow[0].amount, 6);
    }
}
