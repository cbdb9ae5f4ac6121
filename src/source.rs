//! Remote JSON sources.
//!
//! The catalog and the announcement feed are plain `GET` requests for JSON
//! documents. [`JsonSource`] abstracts the transport so sessions can be
//! driven against an in-memory [`StaticSource`] in tests and against
//! [`HttpSource`] (feature `http`) in production.
//!
//! No retry layer is provided: a failed fetch is reported once and the
//! session degrades to an empty catalog.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::FetchError;

/// Transport for fetching a JSON document by URL.
///
/// Implementations must be `Send + Sync`: fetches run on spawned tasks
/// that share one source.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Fetches the raw body of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if no response arrived and
    /// [`FetchError::Status`] for non-success statuses. Decoding is the
    /// caller's job.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP transport backed by `reqwest`.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Creates an HTTP source with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: std::time::Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("byrdocs-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::SearchError::config(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Creates an HTTP source using the configured request timeout.
    pub fn from_config(config: &crate::Config) -> crate::Result<Self> {
        Self::new(config.request_timeout)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl JsonSource for HttpSource {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        tracing::debug!(bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}

/// In-memory source serving canned responses.
///
/// Cloning shares the response table, so a test can keep a handle and
/// change responses after the source was handed to a session.
///
/// ```rust
/// use byrdocs::StaticSource;
///
/// let source = StaticSource::new()
///     .with_body("https://example.org/meta.json", "[]")
///     .with_status("https://example.org/feed.json", 502);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    responses: Arc<RwLock<HashMap<String, Result<Vec<u8>, FetchError>>>>,
}

impl StaticSource {
    /// Creates a source with no responses; every URL fails with 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.set(url, Ok(body.into()));
        self
    }

    /// Answers `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        let err = FetchError::status(url.clone(), status);
        self.set(url, Err(err));
        self
    }

    /// Replaces the response for `url`.
    pub fn set(&self, url: impl Into<String>, response: Result<Vec<u8>, FetchError>) {
        let mut responses = self
            .responses
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        responses.insert(url.into(), response);
    }
}

#[async_trait]
impl JsonSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let responses = self
            .responses
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::status(url, 404)))
    }
}
