//! Persisted flag storage.
//!
//! The session persists exactly one kind of data: boolean flags keyed by a
//! stable string (today, whether the filter hint was shown). The store is
//! a trait so the session can run against a redb file in production and an
//! in-memory map in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SearchSession                            │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │     FlagStore       │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                    ▲         ▲                              │
//! │                    │         │                              │
//! │      ┌─────────────┴─┐   ┌───┴─────────────┐                │
//! │      │ RedbFlagStore │   │ MemoryFlagStore │                │
//! │      └───────────────┘   └─────────────────┘                │
//! │           (prod)              (test)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod redb;
pub mod schema;

pub use self::redb::RedbFlagStore;
pub use schema::{StoreMetadata, SCHEMA_VERSION};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, StorageError};

/// Boolean key-value persistence.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the session driver holds the
/// store on its own task.
pub trait FlagStore: Send + Sync {
    /// Reads a flag; `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_flag(&self, key: &str) -> Result<Option<bool>>;

    /// Writes a flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_flag(&self, key: &str, value: bool) -> Result<()>;
}

impl<S: FlagStore + ?Sized> FlagStore for Arc<S> {
    fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        (**self).get_flag(key)
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        (**self).set_flag(key, value)
    }
}

/// In-memory [`FlagStore`].
///
/// Clones share the same map, which lets a test play "the next session"
/// against the flags the previous one wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryFlagStore {
    flags: Arc<Mutex<HashMap<String, bool>>>,
}

impl MemoryFlagStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of flags written.
    pub fn len(&self) -> usize {
        self.flags.lock().map(|flags| flags.len()).unwrap_or(0)
    }

    /// Returns true if no flag was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        let flags = self
            .flags
            .lock()
            .map_err(|_| StorageError::transaction("flag map poisoned"))?;
        Ok(flags.get(key).copied())
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        let mut flags = self
            .flags
            .lock()
            .map_err(|_| StorageError::transaction("flag map poisoned"))?;
        flags.insert(key.to_string(), value);
        Ok(())
    }
}
