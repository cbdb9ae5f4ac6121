//! Error types for the search session.
//!
//! The crate uses a hierarchical error system:
//! - `SearchError` is the top-level error returned by all public APIs
//! - Specific error types (`FetchError`, `ParamError`, `StorageError`,
//!   `ValidationError`) provide detail
//!
//! Session operations themselves never fail: fetch and storage errors are
//! caught where they occur and turned into session state (an empty catalog,
//! a notice, a hint that shows again). The error types surface from the
//! building blocks (loaders, flag stores, configuration) and from the
//! driver handle once a session has been torn down.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use byrdocs::{CatalogLoader, Config, Result};
//!
//! async fn example(source: &dyn byrdocs::JsonSource) -> Result<()> {
//!     let catalog = CatalogLoader::new(&Config::default()).load(source).await?;
//!     println!("{} documents", catalog.len());
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias for search session operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Top-level error enum for all public operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Catalog or announcement feed could not be fetched or decoded.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Navigable URL query is malformed.
    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    /// Persistent flag storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// The session has been torn down and no longer accepts events.
    #[error("Session closed")]
    SessionClosed,
}

impl SearchError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Returns true if this is a URL parameter error.
    pub fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the session was already closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::SessionClosed)
    }
}

/// Network and decoding failures for remote JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Request to {url} failed: {reason}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport-level reason.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("Request to {url} returned status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body was received but is not the expected JSON shape.
    #[error("Malformed response from {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message.
        reason: String,
    },
}

impl FetchError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the URL the failed request targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }
}

/// Malformed navigable URL parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// `c` holds something other than `all`, `book`, `test` or `doc`.
    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),

    /// A parameter could not be decoded.
    #[error("Malformed parameter '{param}': {reason}")]
    Malformed {
        /// Parameter name.
        param: String,
        /// Why decoding failed.
        reason: String,
    },
}

impl ParamError {
    /// Creates a malformed parameter error.
    pub fn malformed(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the persisted flag store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store file or data is corrupted.
    #[error("Store corrupted: {0}")]
    Corrupted(String),

    /// Store is locked by another process.
    #[error("Store is locked by another writer")]
    DatabaseLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Store schema version doesn't match expected version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Expected schema version.
        expected: u32,
        /// Actual schema version found in the store.
        found: u32,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a transaction error with the given message.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

// Conversions from redb error types
impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<redb::DatabaseError> for SearchError {
    fn from(err: redb::DatabaseError) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

impl From<redb::TransactionError> for SearchError {
    fn from(err: redb::TransactionError) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for SearchError {
    fn from(err: redb::CommitError) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for SearchError {
    fn from(err: redb::TableError) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for SearchError {
    fn from(err: redb::StorageError) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for SearchError {
    fn from(err: bincode::Error) -> Self {
        SearchError::Storage(StorageError::from(err))
    }
}

/// Validation errors for caller-provided data.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }
}
