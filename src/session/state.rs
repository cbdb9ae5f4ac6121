//! Read-only session snapshot handed to the renderer.

use std::sync::Arc;

use crate::announcement::Announcement;
use crate::document::Document;
use crate::preview::PreviewSlot;
use crate::types::{Category, SessionId, ViewportClass};

/// Everything the page needs to render one frame.
///
/// Snapshots are cheap to clone: the result and announcement lists are
/// shared with the session.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSessionState {
    /// Session this snapshot belongs to.
    pub id: SessionId,

    /// Raw keyword, updated per keystroke.
    pub keyword: String,

    /// Keyword the results were resolved against.
    pub debounced_keyword: String,

    /// True while `debounced_keyword` lags behind `keyword`.
    pub debouncing: bool,

    /// Category filter.
    pub category: Category,

    /// Result layout shown (set by the first query, reset by `clear`).
    pub expanded: bool,

    /// Search input pinned to the top of the viewport.
    pub input_pinned: bool,

    /// Open preview and its surface.
    pub preview: PreviewSlot,

    /// Viewport class last observed.
    pub viewport: ViewportClass,

    /// Catalog loaded successfully.
    pub catalog_ready: bool,

    /// Catalog fetch still in flight.
    pub catalog_loading: bool,

    /// Why the catalog failed to load, if it did.
    pub catalog_error: Option<String>,

    /// A resolution for the current query is in flight.
    pub resolving: bool,

    /// Visible results, in resolver order.
    pub results: Arc<[Document]>,

    /// The filter hint has been shown (in this or an earlier session).
    pub filter_hint_shown: bool,

    /// Site announcements, newest first.
    pub announcements: Arc<[Announcement]>,

    /// The session has been torn down.
    pub closed: bool,
}

impl SearchSessionState {
    /// Resource shown in the mobile drawer.
    #[inline]
    pub fn mobile_preview(&self) -> Option<&str> {
        self.preview.mobile()
    }

    /// Resource shown in the desktop side panel.
    #[inline]
    pub fn desktop_preview(&self) -> Option<&str> {
        self.preview.desktop()
    }

    /// Spinner shown in the search box.
    #[inline]
    pub fn busy(&self) -> bool {
        self.catalog_loading || self.debouncing || self.resolving
    }

    /// The input holds text (the clear button is shown).
    #[inline]
    pub fn has_query(&self) -> bool {
        !self.keyword.is_empty()
    }

    /// Announcements to render: only on the landing layout.
    pub fn visible_announcements(&self) -> &[Announcement] {
        if self.expanded {
            &[]
        } else {
            &self.announcements[..]
        }
    }
}
