use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use log::debug;
use sled::IVec;

use super::errors::GemError;
use super::types::{PlayerId, ProtectedItemRecord, PROTECTED_ITEMS_SCHEMA_VERSION};

const TREE_PROTECTED_ITEMS: &str = "protected_items";
const KEY_PREFIX: &str = "protected-items.";

/// Persistence for escrow records, one per player.
///
/// Implementations must make every mutation durable before returning.
pub trait EscrowStore: Send + Sync {
    fn get(&self, player: &PlayerId) -> Result<Option<ProtectedItemRecord>, GemError>;

    /// Insert or replace the record for `record.player_id`.
    fn put(&self, record: &ProtectedItemRecord) -> Result<(), GemError>;

    /// Remove the record; returns whether one existed.
    fn delete(&self, player: &PlayerId) -> Result<bool, GemError>;

    /// Every pending record.
    fn list(&self) -> Result<Vec<ProtectedItemRecord>, GemError>;
}

/// Sled-backed escrow storage.
pub struct SledEscrowStore {
    _db: sled::Db,
    records: sled::Tree,
}

impl SledEscrowStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GemError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let records = db.open_tree(TREE_PROTECTED_ITEMS)?;
        Ok(Self { _db: db, records })
    }

    fn record_key(player: &PlayerId) -> Vec<u8> {
        format!("{}{}", KEY_PREFIX, player).into_bytes()
    }

    fn serialize(record: &ProtectedItemRecord) -> Result<Vec<u8>, GemError> {
        Ok(bincode::serialize(record)?)
    }

    fn deserialize(bytes: IVec) -> Result<ProtectedItemRecord, GemError> {
        let record: ProtectedItemRecord = bincode::deserialize(&bytes)?;
        if record.schema_version != PROTECTED_ITEMS_SCHEMA_VERSION {
            return Err(GemError::SchemaMismatch {
                entity: "protected_items",
                expected: PROTECTED_ITEMS_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }
}

impl EscrowStore for SledEscrowStore {
    fn get(&self, player: &PlayerId) -> Result<Option<ProtectedItemRecord>, GemError> {
        let Some(bytes) = self.records.get(Self::record_key(player))? else {
            return Ok(None);
        };
        Ok(Some(Self::deserialize(bytes)?))
    }

    fn put(&self, record: &ProtectedItemRecord) -> Result<(), GemError> {
        let key = Self::record_key(&record.player_id);
        let bytes = Self::serialize(record)?;
        self.records.insert(key, bytes)?;
        self.records.flush()?;
        debug!(
            "escrow stored for {} ({} items)",
            record.player_id,
            record.items.len()
        );
        Ok(())
    }

    fn delete(&self, player: &PlayerId) -> Result<bool, GemError> {
        let existed = self.records.remove(Self::record_key(player))?.is_some();
        self.records.flush()?;
        debug!("escrow cleared for {} (existed: {})", player, existed);
        Ok(existed)
    }

    fn list(&self) -> Result<Vec<ProtectedItemRecord>, GemError> {
        let mut out = Vec::new();
        for entry in self.records.scan_prefix(KEY_PREFIX.as_bytes()) {
            let (_, bytes) = entry?;
            out.push(Self::deserialize(bytes)?);
        }
        Ok(out)
    }
}

/// In-memory escrow storage for tests and hosts without a data directory.
#[derive(Default)]
pub struct MemoryEscrowStore {
    records: Mutex<HashMap<PlayerId, ProtectedItemRecord>>,
}

impl MemoryEscrowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PlayerId, ProtectedItemRecord>>, GemError> {
        self.records
            .lock()
            .map_err(|_| GemError::Internal("escrow store lock poisoned".to_string()))
    }
}

impl EscrowStore for MemoryEscrowStore {
    fn get(&self, player: &PlayerId) -> Result<Option<ProtectedItemRecord>, GemError> {
        Ok(self.lock()?.get(player).cloned())
    }

    fn put(&self, record: &ProtectedItemRecord) -> Result<(), GemError> {
        self.lock()?.insert(record.player_id, record.clone());
        Ok(())
    }

    fn delete(&self, player: &PlayerId) -> Result<bool, GemError> {
        Ok(self.lock()?.remove(player).is_some())
    }

    fn list(&self) -> Result<Vec<ProtectedItemRecord>, GemError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}
