use thiserror::Error;

/// Errors that can arise while applying gems or persisting escrow records.
#[derive(Debug, Error)]
pub enum GemError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configured material name does not map to a known item category.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Adding charges would overflow the counter.
    #[error("protection counter overflow: {current} + {added}")]
    ChargeOverflow { current: u32, added: u32 },

    /// Operation attempted on a stack with no items in it.
    #[error("empty item stack: {0}")]
    EmptyStack(String),

    /// The referenced player is not online on the host.
    #[error("player offline: {0}")]
    PlayerOffline(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Internal error (unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
