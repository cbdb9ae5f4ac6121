//! Catalog loading module.
//!
//! The **catalog** is the full list of documents, fetched once when a
//! session mounts and read-only afterwards. Loading normalizes every
//! record; today that means synthesizing exam paper titles (see
//! [`exam_title`]).
//!
//! # Operations
//!
//! - [`CatalogLoader::load`] - fetch + decode + normalize
//! - [`Catalog::from_json`] - decode + normalize an already fetched body
//! - [`Catalog::normalize`] - normalize decoded records
//!
//! A failed load is reported as a [`FetchError`]; the session turns it
//! into an empty catalog with `catalog_ready == false`.

use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::document::{exam_title, Document};
use crate::error::FetchError;
use crate::source::JsonSource;

/// The normalized, immutable document list.
///
/// Cloning is cheap (the list is shared), which lets every resolution run
/// against the same allocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    documents: Arc<[Document]>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalizes decoded records into a catalog.
    ///
    /// Exam papers get their synthesized title; every other field is kept
    /// as delivered.
    pub fn normalize(documents: Vec<Document>) -> Self {
        let documents: Vec<Document> = documents
            .into_iter()
            .map(|mut doc| {
                if let Document::Test { data, .. } = &mut doc {
                    data.title = Some(exam_title(data));
                }
                doc
            })
            .collect();

        Self {
            documents: documents.into(),
        }
    }

    /// Decodes a catalog body (a JSON array of documents) and normalizes it.
    ///
    /// `url` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] if the body is not an array of
    /// well-formed documents.
    pub fn from_json(url: &str, body: &[u8]) -> Result<Self, FetchError> {
        let documents: Vec<Document> =
            serde_json::from_slice(body).map_err(|e| FetchError::decode(url, e.to_string()))?;
        Ok(Self::normalize(documents))
    }

    /// Returns the documents as a shared slice.
    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Finds a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }
}

impl Deref for Catalog {
    type Target = [Document];

    fn deref(&self) -> &Self::Target {
        &self.documents
    }
}

/// Fetches the catalog from its configured URL.
#[derive(Clone, Debug)]
pub struct CatalogLoader {
    url: String,
}

impl CatalogLoader {
    /// Creates a loader for the configured catalog URL.
    pub fn new(config: &Config) -> Self {
        Self::with_url(config.catalog_url.clone())
    }

    /// Creates a loader for an explicit URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the catalog URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches, decodes and normalizes the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure or malformed JSON. No
    /// retry is attempted.
    #[instrument(skip(self, source), fields(url = %self.url))]
    pub async fn load(&self, source: &dyn JsonSource) -> Result<Catalog, FetchError> {
        debug!("Fetching catalog");
        let body = source.fetch(&self.url).await?;
        let catalog = Catalog::from_json(&self.url, &body)?;
        info!(documents = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}
