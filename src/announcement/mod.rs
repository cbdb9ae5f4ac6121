//! Site announcement module.
//!
//! Announcements are blog posts tagged for the landing page. They are
//! cosmetic: a failed fetch leaves the list empty and is only logged.
//!
//! # Selection
//!
//! - the item carries the configured announcement tag
//! - title and summary are both present and non-empty
//! - newest `date_modified` first; items whose date does not parse sort last

pub mod types;

pub use types::{Announcement, Feed, FeedItem};

use chrono::DateTime;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::FetchError;
use crate::source::JsonSource;

/// Filters and orders feed items into announcements.
pub fn select_announcements(feed: Feed, tag: &str) -> Vec<Announcement> {
    let mut announcements: Vec<Announcement> = feed
        .items
        .into_iter()
        .filter(|item| item.tags.iter().any(|t| t == tag))
        .filter_map(|item| {
            let title = item.title.filter(|t| !t.is_empty())?;
            let summary = item.summary.filter(|s| !s.is_empty())?;
            let modified_at = item
                .date_modified
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.timestamp_millis());
            Some(Announcement {
                id: item.id,
                url: item.url,
                title,
                summary,
                modified_at,
            })
        })
        .collect();

    // `None < Some(_)`, so reversing the comparison puts undated items last.
    // The sort is stable: equal dates keep feed order.
    announcements.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    announcements
}

/// Fetches the announcement feed.
#[derive(Clone, Debug)]
pub struct FeedLoader {
    url: String,
    tag: String,
}

impl FeedLoader {
    /// Creates a loader for the configured feed URL and tag.
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.feed_url.clone(),
            tag: config.announcement_tag.clone(),
        }
    }

    /// Fetches the feed and selects the announcements.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure or malformed JSON.
    #[instrument(skip(self, source), fields(url = %self.url))]
    pub async fn load(&self, source: &dyn JsonSource) -> Result<Vec<Announcement>, FetchError> {
        let body = source.fetch(&self.url).await?;
        let feed: Feed = serde_json::from_slice(&body)
            .map_err(|e| FetchError::decode(&self.url, e.to_string()))?;
        let announcements = select_announcements(feed, &self.tag);
        debug!(count = announcements.len(), "Announcements loaded");
        Ok(announcements)
    }
}
