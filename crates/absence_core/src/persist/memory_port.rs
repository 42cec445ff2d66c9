//! In-process blob storage.

use super::{PersistResult, PersistencePort};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared in-memory port.
///
/// Clones share the same map, so a store and a registry built from clones of
/// one port observe each other's writes, and a fresh load from any clone
/// sees the latest blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPort {
    blobs: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistencePort for MemoryPort {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> PersistResult<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
