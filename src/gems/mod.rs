//! Protection gems: counter codec, gem identity, escrow storage and the
//! host-facing plugin that ties them together.

pub mod codec;
pub mod commands;
pub mod errors;
pub mod events;
pub mod gem;
pub mod handlers;
pub mod inventory;
pub mod markup;
pub mod plugin;
pub mod storage;
pub mod types;

pub use codec::{ProtectionCodec, AMOUNT_PLACEHOLDER};
pub use commands::{parse_amount, parse_command, GemCommand, COMMAND_NAME};
pub use errors::GemError;
pub use events::{InventoryClickEvent, PlayerDeathEvent, PlayerRespawnEvent};
pub use gem::GemSpec;
pub use handlers::{on_combine, on_death, on_respawn, CombineOutcome, DeathOutcome, RespawnOutcome};
pub use inventory::{AddOutcome, Inventory};
pub use plugin::{PendingRestore, ProtectionGems, RestoreReport};
pub use storage::{EscrowStore, MemoryEscrowStore, SledEscrowStore};
pub use types::*;
