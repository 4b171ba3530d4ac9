//! Test utilities & fixtures.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use protection_gems::config::Config;
use protection_gems::gems::{
    EscrowStore, GemError, ItemStack, Material, MemoryEscrowStore, PlayerId, ProtectedItemRecord,
    ProtectionGems, SledEscrowStore,
};
use protection_gems::host::LocalHost;

/// Plugin with default config and an in-memory store, plus an empty host.
pub fn memory_setup() -> (ProtectionGems, LocalHost) {
    let config = Config::default();
    let host = LocalHost::new(config.inventory.clone());
    let mut plugin =
        ProtectionGems::new(config, Arc::new(MemoryEscrowStore::new())).expect("plugin");
    plugin.enable();
    (plugin, host)
}

/// Plugin backed by sled under `dir`, plus an empty host.
#[allow(dead_code)]
pub fn sled_setup(dir: &std::path::Path) -> (ProtectionGems, LocalHost) {
    let config = Config::default();
    let host = LocalHost::new(config.inventory.clone());
    let store = SledEscrowStore::open(dir).expect("store");
    let mut plugin = ProtectionGems::new(config, Arc::new(store)).expect("plugin");
    plugin.enable();
    (plugin, host)
}

#[allow(dead_code)]
pub fn item(material: &str, amount: u32) -> ItemStack {
    ItemStack::new(Material::parse(material).expect("material"), amount)
}

/// In-memory store whose deletes can be switched to fail.
#[allow(dead_code)]
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryEscrowStore,
    fail_deletes: AtomicBool,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl EscrowStore for FlakyStore {
    fn get(&self, player: &PlayerId) -> Result<Option<ProtectedItemRecord>, GemError> {
        self.inner.get(player)
    }

    fn put(&self, record: &ProtectedItemRecord) -> Result<(), GemError> {
        self.inner.put(record)
    }

    fn delete(&self, player: &PlayerId) -> Result<bool, GemError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(GemError::Internal("delete refused".to_string()));
        }
        self.inner.delete(player)
    }

    fn list(&self) -> Result<Vec<ProtectedItemRecord>, GemError> {
        self.inner.list()
    }
}

/// Plugin over a [`FlakyStore`] the test keeps a handle to.
#[allow(dead_code)]
pub fn flaky_setup() -> (ProtectionGems, LocalHost, Arc<FlakyStore>) {
    let config = Config::default();
    let host = LocalHost::new(config.inventory.clone());
    let store = Arc::new(FlakyStore::default());
    let mut plugin = ProtectionGems::new(config, store.clone()).expect("plugin");
    plugin.enable();
    (plugin, host, store)
}
