//! redb-backed flag store.
//!
//! Flags live in a single [redb](https://docs.rs/redb) file next to the
//! rest of the client's state, so they survive reloads and restarts.
//!
//! # File Layout
//!
//! When you open a store at `./byrdocs.flags`, redb creates:
//! - `./byrdocs.flags` - Main database file
//! - `./byrdocs.flags.lock` - Lock file for writer coordination (may not be visible)

use std::path::{Path, PathBuf};

use ::redb::Database;
use tracing::{debug, info, instrument, warn};

use super::schema::{
    StoreMetadata, FLAGS_TABLE, MAX_FLAG_KEY_LENGTH, METADATA_TABLE, SCHEMA_VERSION,
};
use super::FlagStore;
use crate::error::{Result, SearchError, StorageError, ValidationError};

/// Metadata key in the metadata table.
const METADATA_KEY: &str = "store_metadata";

/// Persistent [`FlagStore`] on a redb file.
///
/// # Thread Safety
///
/// `RedbFlagStore` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbFlagStore {
    db: Database,
    metadata: StoreMetadata,
    path: PathBuf,
}

impl RedbFlagStore {
    /// Opens or creates a flag store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is corrupted or not a flag store
    /// - The file is locked by another process
    /// - Schema version doesn't match
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use byrdocs::{FlagStore, RedbFlagStore};
    ///
    /// let store = RedbFlagStore::open("./byrdocs.flags")?;
    /// store.set_flag("filter-hint-shown", true)?;
    /// # Ok::<(), byrdocs::SearchError>(())
    /// ```
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let exists = path.exists();

        debug!(exists, "Opening flag store");

        let db = Self::create_database(path)?;

        if exists {
            Self::open_existing(db, path.to_path_buf())
        } else {
            Self::initialize_new(db, path.to_path_buf())
        }
    }

    fn create_database(path: &Path) -> Result<Database> {
        // redb has no typed lock-conflict variant; match on the message.
        let db = Database::builder().create(path).map_err(|e| {
            if e.to_string().contains("locked") {
                StorageError::DatabaseLocked
            } else {
                StorageError::Redb(e.to_string())
            }
        })?;
        Ok(db)
    }

    fn initialize_new(db: Database, path: PathBuf) -> Result<Self> {
        info!(path = %path.display(), "Initializing new flag store");

        let metadata = StoreMetadata::new();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            let _ = write_txn.open_table(FLAGS_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        Ok(Self { db, metadata, path })
    }

    fn open_existing(db: Database, path: PathBuf) -> Result<Self> {
        let read_txn = db.begin_read().map_err(StorageError::from)?;

        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing store metadata"))?;

            bincode::deserialize::<StoreMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        if !metadata.is_compatible() {
            warn!(
                expected = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Schema version mismatch"
            );
            return Err(SearchError::Storage(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let mut metadata = metadata;
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            path = %path.display(),
            schema_version = metadata.schema_version,
            "Flag store opened"
        );

        Ok(Self { db, metadata, path })
    }

    /// Returns the store metadata.
    #[inline]
    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    /// Returns the path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the store.
    ///
    /// redb flushes on drop, so this always succeeds today; it exists so
    /// callers have an explicit point at which the file is released.
    pub fn close(self) -> Result<()> {
        info!(path = %self.path.display(), "Flag store closed");
        Ok(())
    }
}

fn validate_key(key: &str) -> std::result::Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::required_field("key"));
    }
    if key.len() > MAX_FLAG_KEY_LENGTH {
        return Err(ValidationError::invalid_field(
            "key",
            format!("must be at most {} bytes", MAX_FLAG_KEY_LENGTH),
        ));
    }
    Ok(())
}

impl FlagStore for RedbFlagStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        validate_key(key)?;

        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(FLAGS_TABLE)?;

        let value = match table.get(key)? {
            Some(bytes) => Some(bincode::deserialize::<bool>(bytes.value()).map_err(|e| {
                StorageError::corrupted(format!("Invalid value for flag {}: {}", key, e))
            })?),
            None => None,
        };
        Ok(value)
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        validate_key(key)?;

        let bytes = bincode::serialize(&value)?;
        let write_txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = write_txn.open_table(FLAGS_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(key, value, "Flag persisted");
        Ok(())
    }
}
