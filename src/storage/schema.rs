//! Flag store schema definitions and versioning.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. Opening a file
//! written with a different version fails with
//! [`StorageError::SchemaVersionMismatch`](crate::StorageError::SchemaVersionMismatch).
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                               │
//! │   Key: &str                                                  │
//! │   Value: &[u8] (bincode-serialized StoreMetadata)            │
//! │   Entries: "store_metadata" -> StoreMetadata                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ FLAGS_TABLE                                                  │
//! │   Key: &str (stable flag key, e.g. "filter-hint-shown")      │
//! │   Value: &[u8] (bincode-serialized bool)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::TableDefinition;
use serde::{Deserialize, Serialize};

/// Current schema version.
///
/// Increment this when making breaking changes to the schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum length of a flag key in bytes.
pub const MAX_FLAG_KEY_LENGTH: usize = 256;

/// Store-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Persisted boolean flags.
pub const FLAGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("flags");

/// Metadata stored under `"store_metadata"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Creation time, Unix milliseconds.
    pub created_at: i64,

    /// Last open time, Unix milliseconds (updated on each open).
    pub last_opened_at: i64,
}

impl StoreMetadata {
    /// Creates metadata for a fresh store.
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates `last_opened_at`.
    pub fn touch(&mut self) {
        self.last_opened_at = now_millis().max(self.last_opened_at);
    }

    /// Checks if this metadata matches the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
