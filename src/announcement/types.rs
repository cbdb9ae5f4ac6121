//! Data types for the announcement feed.
//!
//! The feed is a JSON Feed document; only the fields the landing page
//! shows are modelled.

use serde::{Deserialize, Serialize};

/// A feed item as delivered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item id.
    #[serde(default)]
    pub id: String,

    /// Link to the full post.
    #[serde(default)]
    pub url: Option<String>,

    /// Post title.
    #[serde(default)]
    pub title: Option<String>,

    /// Short HTML summary.
    #[serde(default)]
    pub summary: Option<String>,

    /// Tags attached to the post.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Last modification time (RFC 3339).
    #[serde(default)]
    pub date_modified: Option<String>,
}

/// The feed envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Feed items, newest first by convention (not relied upon).
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

/// A site announcement shown below the search box before the first query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Item id.
    pub id: String,

    /// Link opened when the card is clicked.
    pub url: Option<String>,

    /// Announcement title (non-empty).
    pub title: String,

    /// HTML summary (non-empty).
    pub summary: String,

    /// Modification time in Unix milliseconds, if it parsed.
    pub modified_at: Option<i64>,
}
