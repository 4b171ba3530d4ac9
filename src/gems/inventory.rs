//! Slot-based player inventory with stacking.

use serde::{Deserialize, Serialize};

use super::types::ItemStack;
use crate::config::InventoryConfig;

/// Result of placing one stack into an inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Items that found a slot.
    pub placed: u32,
    /// Whatever did not fit, if anything.
    pub leftover: Option<ItemStack>,
}

/// Fixed number of slots, each holding at most one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    max_stack_size: u32,
}

impl Inventory {
    pub fn new(capacity: usize, max_stack_size: u32) -> Self {
        Self {
            slots: vec![None; capacity],
            max_stack_size: max_stack_size.max(1),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.capacity, config.max_stack_size)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(index).and_then(|s| s.as_mut())
    }

    /// Replace a slot's contents. Empty stacks clear the slot. Out-of-range is a no-op.
    pub fn set_slot(&mut self, index: usize, item: Option<ItemStack>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = item.filter(|i| !i.is_empty());
        }
    }

    /// Non-empty stacks in slot order.
    pub fn contents(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    /// Total amount of stacks similar to `item`.
    pub fn count_similar(&self, item: &ItemStack) -> u32 {
        self.contents()
            .filter(|s| s.is_similar(item))
            .map(|s| s.amount)
            .sum()
    }

    pub fn contains_similar(&self, item: &ItemStack) -> bool {
        self.contents().any(|s| s.is_similar(item))
    }

    /// Place `item`, topping up similar stacks first, then filling empty slots.
    pub fn add_item(&mut self, item: ItemStack) -> AddOutcome {
        if item.is_empty() {
            return AddOutcome {
                placed: 0,
                leftover: None,
            };
        }

        let mut remaining = item.amount;
        let max = self.max_stack_size;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.is_similar(&item) && stack.amount < max {
                let moved = (max - stack.amount).min(remaining);
                stack.amount += moved;
                remaining -= moved;
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let moved = max.min(remaining);
                let mut stack = item.clone();
                stack.amount = moved;
                *slot = Some(stack);
                remaining -= moved;
            }
        }

        let leftover = (remaining > 0).then(|| {
            let mut rest = item.clone();
            rest.amount = remaining;
            rest
        });
        AddOutcome {
            placed: item.amount - remaining,
            leftover,
        }
    }

    /// Place several stacks; returns whatever did not fit.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = ItemStack>) -> Vec<ItemStack> {
        items
            .into_iter()
            .filter_map(|item| self.add_item(item).leftover)
            .collect()
    }

    /// Remove up to `item.amount` of similar items. Returns how many were removed.
    pub fn remove_item(&mut self, item: &ItemStack) -> u32 {
        let mut remaining = item.amount;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot else {
                continue;
            };
            if !stack.is_similar(item) {
                continue;
            }
            if stack.amount <= remaining {
                remaining -= stack.amount;
                *slot = None;
            } else {
                stack.amount -= remaining;
                remaining = 0;
            }
        }
        item.amount - remaining
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gems::types::Material;

    fn stack(name: &str, amount: u32) -> ItemStack {
        ItemStack::new(Material::parse(name).unwrap(), amount)
    }

    #[test]
    fn test_add_item_creates_new_stack() {
        let mut inv = Inventory::new(4, 64);
        let outcome = inv.add_item(stack("IRON_SWORD", 1));
        assert_eq!(outcome.placed, 1);
        assert!(outcome.leftover.is_none());
        assert_eq!(inv.slot(0).unwrap().material.as_str(), "IRON_SWORD");
    }

    #[test]
    fn test_add_item_tops_up_similar_stack() {
        let mut inv = Inventory::new(4, 64);
        inv.add_item(stack("EMERALD", 60));
        inv.add_item(stack("EMERALD", 10));
        assert_eq!(inv.slot(0).unwrap().amount, 64);
        assert_eq!(inv.slot(1).unwrap().amount, 6);
    }

    #[test]
    fn test_add_item_reports_leftover_when_full() {
        let mut inv = Inventory::new(1, 64);
        inv.add_item(stack("STONE", 64));
        let outcome = inv.add_item(stack("DIRT", 5));
        assert_eq!(outcome.placed, 0);
        assert_eq!(outcome.leftover.unwrap().amount, 5);
    }

    #[test]
    fn test_add_item_partial_fit() {
        let mut inv = Inventory::new(2, 16);
        let outcome = inv.add_item(stack("EMERALD", 40));
        assert_eq!(outcome.placed, 32);
        assert_eq!(outcome.leftover.unwrap().amount, 8);
    }

    #[test]
    fn test_remove_item_across_stacks() {
        let mut inv = Inventory::new(3, 10);
        inv.add_item(stack("ARROW", 25));
        let removed = inv.remove_item(&stack("ARROW", 15));
        assert_eq!(removed, 15);
        assert_eq!(inv.count_similar(&stack("ARROW", 1)), 10);
    }

    #[test]
    fn test_remove_nonexistent_item() {
        let mut inv = Inventory::new(3, 10);
        assert_eq!(inv.remove_item(&stack("ARROW", 1)), 0);
    }

    #[test]
    fn test_different_lore_does_not_stack() {
        let mut inv = Inventory::new(3, 64);
        inv.add_item(stack("IRON_SWORD", 1));
        inv.add_item(stack("IRON_SWORD", 1).with_lore(["Charges: 3"]));
        assert!(inv.slot(1).is_some());
    }

    #[test]
    fn test_set_slot_ignores_empty_stack() {
        let mut inv = Inventory::new(2, 64);
        inv.set_slot(0, Some(stack("STONE", 0)));
        assert!(inv.slot(0).is_none());
    }
}
