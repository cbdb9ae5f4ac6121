//! Session inputs and outputs.

use crate::announcement::Announcement;
use crate::catalog::Catalog;
use crate::document::Document;
use crate::error::FetchError;
use crate::notify::Notice;
use crate::preview::LayoutChange;
use crate::query::UrlQuery;
use crate::resolve::Ticket;
use crate::types::Category;

/// A key press seen by the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Key value as reported by the browser (`"/"`, `"a"`, `"Enter"`).
    pub key: String,
    /// Ctrl held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
    /// Meta held.
    pub meta: bool,
    /// Focus was on the document body rather than a control.
    pub body_focused: bool,
}

impl KeyPress {
    /// An unmodified key press with the body focused.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            meta: false,
            body_focused: true,
        }
    }

    /// Sets whether the body had focus.
    pub fn body_focused(mut self, focused: bool) -> Self {
        self.body_focused = focused;
        self
    }

    /// Adds the Ctrl modifier.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// A single character typed without a command modifier.
    pub fn is_printable(&self) -> bool {
        self.key.chars().count() == 1 && !(self.ctrl || self.alt || self.meta)
    }
}

/// Everything that can happen to a session.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The input text changed.
    KeywordChanged(String),
    /// A category tab was selected.
    CategorySelected(Category),
    /// The logo was clicked: back to the landing layout.
    Cleared,
    /// The input's clear button was clicked.
    KeywordCleared,
    /// The URL query changed from outside (history navigation).
    Navigated(String),
    /// A result's preview was requested.
    PreviewRequested(String),
    /// The mobile drawer was dismissed.
    DrawerClosed,
    /// The desktop side panel was dismissed.
    PanelClosed,
    /// The window was resized.
    ViewportResized {
        /// New viewport width in CSS pixels.
        width: u32,
    },
    /// The page scrolled.
    Scrolled {
        /// Top offset of the search input's anchor, in CSS pixels.
        anchor_top: f64,
    },
    /// A key was pressed.
    KeyPressed(KeyPress),
    /// The catalog fetch settled.
    CatalogLoaded(Result<Catalog, FetchError>),
    /// The announcement fetch settled.
    AnnouncementsLoaded(Result<Vec<Announcement>, FetchError>),
    /// A resolution finished.
    ResolutionCompleted {
        /// Ticket the resolution was started with.
        ticket: Ticket,
        /// Matching documents.
        results: Vec<Document>,
    },
}

/// Work the session asks its host to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Replace the URL query (no new history entry).
    ReplaceUrl(UrlQuery),
    /// Move keyboard focus to the search input.
    FocusInput,
    /// Show a notice.
    Notify(Notice),
    /// Apply a side panel layout change.
    Layout(LayoutChange),
    /// Fetch the catalog and report back with [`SessionEvent::CatalogLoaded`].
    LoadCatalog,
    /// Fetch announcements and report back with [`SessionEvent::AnnouncementsLoaded`].
    LoadAnnouncements,
    /// Resolve results and report back with [`SessionEvent::ResolutionCompleted`].
    Resolve(Ticket),
}
