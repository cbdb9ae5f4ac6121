//! # BYR Docs search
//!
//! Search session controller for the BYR Docs document repository: books,
//! exam papers and course materials.
//!
//! The crate owns the stateful part of the search page. It loads the
//! catalog, debounces the query and keeps it in sync with the navigable
//! URL, resolves filtered results without ever showing a stale set, routes
//! previews between a mobile drawer and a desktop side panel, and tracks
//! the sticky search bar. Rendering is someone else's job: the session
//! hands out [`SearchSessionState`] snapshots and [`Effect`]s.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use byrdocs::prelude::*;
//!
//! let config = Config::default();
//! let source = Arc::new(HttpSource::from_config(&config)?);
//! let flags = Arc::new(RedbFlagStore::open("./byrdocs.flags")?);
//!
//! // Mount the page from its URL query
//! let handle = SessionDriver::spawn(
//!     config,
//!     Capabilities::new(source).with_flags(flags),
//!     "?q=linear+algebra&c=book",
//! )?;
//!
//! // Feed UI events in, render snapshots out
//! handle.send(SessionEvent::KeywordChanged("linear algebra done right".into()))?;
//! while let Ok(update) = handle.updates().recv() {
//!     if let SessionUpdate::State(state) = update {
//!         render(&state);
//!     }
//! }
//!
//! handle.shutdown();
//! ```
//!
//! ## Key Concepts
//!
//! ### Session
//!
//! A [`SearchSession`] is a plain state machine: every transition takes the
//! current instant and returns effects. [`SessionDriver`] runs one on a
//! tokio task with real timers and I/O; tests drive it directly.
//!
//! ### Debounce
//!
//! Keystrokes update the keyword immediately, while the URL and the
//! results follow after an idle window ([`Config::debounce_delay`]).
//! Intermediate keywords never reach the URL.
//!
//! ### Preview slot
//!
//! At most one document is previewed at a time, either in the mobile drawer
//! or in the desktop side panel depending on the [`ViewportClass`]. Resizing
//! across the breakpoint moves the preview instead of dropping it.
//!
//! ## Features
//!
//! - `http` (default) - [`HttpSource`], a `reqwest`-backed [`JsonSource`]
//!
//! ## Thread Safety
//!
//! All injected capabilities are `Send + Sync`. A session's state is only
//! mutated on its driver task, one event at a time.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod capability;
mod config;
mod error;
mod notify;
mod source;
mod sticky;
mod types;

pub mod debounce;
pub mod storage;

// Domain modules
mod announcement;
mod catalog;
mod document;
mod hint;
mod preview;
mod query;
mod resolve;
mod session;

// ============================================================================
// Public API re-exports
// ============================================================================

// Session
pub use session::{
    Effect, KeyPress, SearchSession, SearchSessionState, SessionDriver, SessionEvent,
    SessionHandle, SessionUpdate, FOCUS_KEY, SHORTCUT_TIP,
};

// Configuration
pub use config::{Config, DEFAULT_CATALOG_URL, DEFAULT_FEED_URL, MAX_DEBOUNCE_DELAY};

// Error handling
pub use error::{FetchError, ParamError, Result, SearchError, StorageError, ValidationError};

// Core types
pub use types::{Category, SessionId, ViewportClass};

// Domain types
pub use announcement::{select_announcements, Announcement, Feed, FeedItem, FeedLoader};
pub use catalog::{Catalog, CatalogLoader};
pub use document::{
    exam_title, format_file_size, Book, Course, CourseMaterial, Document, ExamContent, ExamPaper,
    ExamTime, ResourceLinks, Semester,
};
pub use hint::{HintGate, FILTER_HINT};
pub use preview::{LayoutChange, PreviewRouter, PreviewSlot};
pub use query::{QueryController, QueryTick, UrlQuery, CATEGORY_PARAM, KEYWORD_PARAM};
pub use resolve::{KeywordResolver, ResolutionTracker, Resolver, Ticket};
pub use sticky::{StickyHeader, DEFAULT_PIN_THRESHOLD_PX};

// Capabilities
pub use capability::{
    Capabilities, FixedViewport, LayoutListener, LayoutLog, Navigator, UrlHistory,
    ViewportObserver,
};
pub use notify::{Notice, NoticeKind, NoticeLog, Notifier};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{JsonSource, StaticSource};
pub use storage::{FlagStore, MemoryFlagStore, RedbFlagStore};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common usage.
///
/// ```rust
/// use byrdocs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::capability::Capabilities;
    pub use crate::config::Config;
    pub use crate::error::{Result, SearchError};
    pub use crate::session::{
        Effect, SearchSession, SearchSessionState, SessionDriver, SessionEvent, SessionUpdate,
    };
    #[cfg(feature = "http")]
    pub use crate::source::HttpSource;
    pub use crate::source::StaticSource;
    pub use crate::storage::{FlagStore, MemoryFlagStore, RedbFlagStore};
    pub use crate::types::{Category, ViewportClass};
}
