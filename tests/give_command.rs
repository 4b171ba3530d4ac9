//! The `/protectiongem give` command.

mod common;

use protection_gems::gems::{ItemStack, PendingRestore, PlayerId};
use protection_gems::host::{GameHost, Location, PlayerState};
use uuid::Uuid;

use common::memory_setup;

/// Host that resolves every name but has no state for the player behind it.
#[derive(Default)]
struct VanishingHost {
    drops: Vec<ItemStack>,
}

impl GameHost for VanishingHost {
    fn player_by_name(&self, _name: &str) -> Option<PlayerId> {
        Some(Uuid::new_v4())
    }

    fn player_mut(&mut self, _id: &PlayerId) -> Option<&mut PlayerState> {
        None
    }

    fn drop_item(&mut self, _location: &Location, item: ItemStack) {
        self.drops.push(item);
    }

    fn schedule_next_tick(&mut self, _task: PendingRestore) {}

    fn send_message(&mut self, _player: &PlayerId, _message: &str) {}
}

#[test]
fn test_give_adds_gems() {
    let (plugin, mut host) = memory_setup();
    let alice = host.join("Alice");

    let replies = plugin
        .on_command("console", "protectiongem", &["give", "Alice", "5"], &mut host)
        .unwrap();
    assert_eq!(replies, vec!["Gave 5 Protection Gems to Alice".to_string()]);

    let gem = plugin.gem().create(1).unwrap();
    let state = host.player(&alice).unwrap();
    assert_eq!(state.inventory.count_similar(&gem), 5);
    assert!(plugin.gem().is_gem(state.inventory.slot(0).unwrap()));
}

#[test]
fn test_give_unknown_player() {
    let (plugin, mut host) = memory_setup();
    let alice = host.join("Alice");

    let replies = plugin
        .on_command("console", "protectiongem", &["give", "UnknownName", "5"], &mut host)
        .unwrap();
    assert_eq!(replies, vec!["Player UnknownName not found".to_string()]);
    assert_eq!(host.player(&alice).unwrap().inventory.contents().count(), 0);
}

#[test]
fn test_unknown_player_reported_before_bad_amount() {
    let (plugin, mut host) = memory_setup();
    let replies = plugin
        .on_command("console", "protectiongem", &["give", "Nobody", "abc"], &mut host)
        .unwrap();
    assert_eq!(replies, vec!["Player Nobody not found".to_string()]);
}

#[test]
fn test_give_rejects_bad_amounts() {
    let (plugin, mut host) = memory_setup();
    let alice = host.join("Alice");
    for bad in ["0", "-3", "lots"] {
        let replies = plugin
            .on_command("console", "protectiongem", &["give", "Alice", bad], &mut host)
            .unwrap();
        assert_eq!(replies, vec!["Invalid amount".to_string()], "amount {bad}");
    }
    assert_eq!(host.player(&alice).unwrap().inventory.contents().count(), 0);
}

#[test]
fn test_wrong_shape_prints_usage() {
    let (plugin, mut host) = memory_setup();
    host.join("Alice");
    for args in [vec![], vec!["give", "Alice"], vec!["take", "Alice", "1"]] {
        let replies = plugin
            .on_command("console", "protectiongem", &args, &mut host)
            .unwrap();
        assert_eq!(
            replies,
            vec!["Usage: /protectiongem give <player> <amount>".to_string()]
        );
    }
}

#[test]
fn test_other_commands_are_ignored() {
    let (plugin, mut host) = memory_setup();
    assert!(plugin
        .on_command("console", "spawn", &["give", "Alice", "1"], &mut host)
        .is_none());
}

#[test]
fn test_give_overflow_drops_at_feet() {
    let (plugin, mut host) = memory_setup();
    let alice = host.join("Alice");
    let capacity = host.player(&alice).unwrap().inventory.capacity() as u32;

    plugin
        .on_command(
            "console",
            "protectiongem",
            &["give", "Alice", &(capacity * 64 + 10).to_string()],
            &mut host,
        )
        .unwrap();

    assert_eq!(host.ground().len(), 1);
    assert_eq!(host.ground()[0].1.amount, 10);
}

#[test]
fn test_give_matches_name_prefix() {
    let (plugin, mut host) = memory_setup();
    host.join("Alexander");
    let replies = plugin
        .on_command("console", "protectiongem", &["give", "alex", "1"], &mut host)
        .unwrap();
    assert_eq!(replies, vec!["Gave 1 Protection Gems to Alexander".to_string()]);
}

#[test]
fn test_give_fault_replies_with_error_message() {
    let (plugin, _) = memory_setup();
    let mut host = VanishingHost::default();

    let replies = plugin
        .on_command("console", "protectiongem", &["give", "Ghost", "3"], &mut host)
        .unwrap();
    assert_eq!(
        replies,
        vec!["An error occurred while handling the Protection Gem".to_string()]
    );
    assert!(host.drops.is_empty());
}
