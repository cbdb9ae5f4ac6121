//! Resource links and display helpers.
//!
//! Every document is addressable under a static prefix by its id and file
//! type. Covers live next to the content as `.webp` (list thumbnail) and
//! `.jpg` (full size). Previews go through an external viewer page that
//! receives the content URL as its `file` parameter.

use crate::config::Config;
use crate::query::form_encode;

use super::types::Document;

/// Builds per-item resource URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLinks {
    prefix: String,
    viewer_path: String,
}

impl ResourceLinks {
    /// Creates a link builder; a trailing `/` on the prefix is ignored.
    pub fn new(static_prefix: impl Into<String>, viewer_path: impl Into<String>) -> Self {
        let prefix: String = static_prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            viewer_path: viewer_path.into(),
        }
    }

    /// Creates a link builder from the session configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.static_prefix.clone(), config.viewer_path.clone())
    }

    /// `{prefix}/{id}.{filetype}`
    pub fn content(&self, doc: &Document) -> String {
        format!("{}/{}.{}", self.prefix, doc.id(), doc.filetype())
    }

    /// `{prefix}/{id}.webp`
    pub fn cover_thumbnail(&self, doc: &Document) -> String {
        format!("{}/{}.webp", self.prefix, doc.id())
    }

    /// `{prefix}/{id}.jpg`
    pub fn cover_full(&self, doc: &Document) -> String {
        format!("{}/{}.jpg", self.prefix, doc.id())
    }

    /// Content URL carrying the download filename as a query parameter.
    pub fn download(&self, doc: &Document) -> String {
        format!(
            "{}?filename={}",
            self.content(doc),
            form_encode(&doc.filename())
        )
    }

    /// Viewer page URL for a resource.
    pub fn viewer(&self, resource: &str) -> String {
        format!("{}?file={}", self.viewer_path, urlencoding::encode(resource))
    }

    /// Only PDFs can be shown in the viewer.
    pub fn can_preview(doc: &Document) -> bool {
        doc.filetype() == "pdf"
    }
}

/// Formats a byte count with binary units and two decimals.
///
/// ```rust
/// use byrdocs::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 Bytes");
/// assert_eq!(format_file_size(1536), "1.50 KiB");
/// ```
pub fn format_file_size(size: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    let bytes = size as f64;
    if size < KIB {
        format!("{} Bytes", size)
    } else if size < MIB {
        format!("{:.2} KiB", bytes / KIB as f64)
    } else if size < GIB {
        format!("{:.2} MiB", bytes / MIB as f64)
    } else {
        format!("{:.2} GiB", bytes / GIB as f64)
    }
}
