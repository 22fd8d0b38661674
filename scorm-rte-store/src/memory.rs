//! In-memory store.

use scorm_rte_core::error::ScormError;
use scorm_rte_core::persistence::Persistence;
use scorm_rte_core::types::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Shared {
    data: Mutex<DataMap>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

/// In-process store.
///
/// Clones share the same map, so a host can hand one clone to the adapter and
/// keep another to inspect what was committed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with previously saved values
    pub fn with_data(data: DataMap) -> Self {
        let store = Self::default();
        *store.lock() = data;
        store
    }

    /// Make every subsequent load and save fail with a persistence error
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of the last saved values
    pub fn data(&self) -> DataMap {
        self.lock().clone()
    }

    /// Value saved for one element
    pub fn get(&self, element: &str) -> Option<String> {
        self.lock().get(element).cloned()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.shared.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DataMap> {
        self.shared
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, operation: &str) -> Result<(), ScormError> {
        if self.shared.failing.load(Ordering::SeqCst) {
            return Err(ScormError::persistence(format!(
                "memory store {} refused",
                operation
            )));
        }
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn info(&self) -> Arc<PersistenceInfo> {
        PersistenceInfo::new("memory", "In-memory store")
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        self.check("load")?;
        Ok(self.data())
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        self.check("save")?;
        *self.lock() = data.clone();
        self.shared.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
