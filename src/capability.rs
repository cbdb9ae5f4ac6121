//! Injected page capabilities.
//!
//! The session never touches the page directly. Everything it needs from
//! the outside world comes through these traits, bundled in
//! [`Capabilities`] for the driver.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::notify::{NoticeLog, Notifier};
use crate::preview::LayoutChange;
use crate::query::UrlQuery;
use crate::resolve::{KeywordResolver, Resolver};
use crate::source::JsonSource;
use crate::storage::{FlagStore, MemoryFlagStore};

/// Rewrites the navigable URL's query without adding a history entry.
pub trait Navigator: Send + Sync {
    /// Replaces the current query string.
    fn replace_query(&self, query: &UrlQuery);
}

/// Receives side panel visibility changes.
pub trait LayoutListener: Send + Sync {
    /// Applies `change` to the page layout.
    fn layout_changed(&self, change: LayoutChange);
}

/// Reports the current viewport width.
pub trait ViewportObserver: Send + Sync {
    /// Current viewport width in CSS pixels.
    fn width(&self) -> u32;
}

/// A viewport whose width is set by hand.
#[derive(Debug, Default)]
pub struct FixedViewport {
    width: AtomicU32,
}

impl FixedViewport {
    /// Creates a viewport of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
        }
    }

    /// Changes the width.
    pub fn set_width(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }
}

impl ViewportObserver for FixedViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}

/// Records every URL written, for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct UrlHistory {
    writes: Arc<Mutex<Vec<UrlQuery>>>,
}

impl UrlHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query written so far, oldest first.
    pub fn writes(&self) -> Vec<UrlQuery> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The query currently in the URL.
    pub fn current(&self) -> Option<UrlQuery> {
        self.writes().pop()
    }
}

impl Navigator for UrlHistory {
    fn replace_query(&self, query: &UrlQuery) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
    }
}

/// Records every layout change, for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct LayoutLog {
    changes: Arc<Mutex<Vec<LayoutChange>>>,
}

impl LayoutLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every change so far, oldest first.
    pub fn changes(&self) -> Vec<LayoutChange> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LayoutListener for LayoutLog {
    fn layout_changed(&self, change: LayoutChange) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change);
    }
}

/// Everything a [`SessionDriver`](crate::SessionDriver) talks to.
#[derive(Clone)]
pub struct Capabilities {
    /// Catalog and feed transport.
    pub source: Arc<dyn JsonSource>,
    /// Result matcher.
    pub resolver: Arc<dyn Resolver>,
    /// Persisted hint flags.
    pub flags: Arc<dyn FlagStore>,
    /// URL writer.
    pub navigator: Arc<dyn Navigator>,
    /// Notice presenter.
    pub notifier: Arc<dyn Notifier>,
    /// Side panel layout.
    pub layout: Arc<dyn LayoutListener>,
    /// Viewport width at mount.
    pub viewport: Arc<dyn ViewportObserver>,
}

impl Capabilities {
    /// Bundles `source` with in-memory defaults for everything else.
    ///
    /// Defaults: [`KeywordResolver`], [`MemoryFlagStore`], [`UrlHistory`],
    /// [`NoticeLog`], [`LayoutLog`] and a 1280 px [`FixedViewport`].
    pub fn new(source: Arc<dyn JsonSource>) -> Self {
        Self {
            source,
            resolver: Arc::new(KeywordResolver::new()),
            flags: Arc::new(MemoryFlagStore::new()),
            navigator: Arc::new(UrlHistory::new()),
            notifier: Arc::new(NoticeLog::new()),
            layout: Arc::new(LayoutLog::new()),
            viewport: Arc::new(FixedViewport::new(1280)),
        }
    }

    /// Replaces the resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the flag store.
    pub fn with_flags(mut self, flags: Arc<dyn FlagStore>) -> Self {
        self.flags = flags;
        self
    }

    /// Replaces the navigator.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Replaces the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the layout listener.
    pub fn with_layout(mut self, layout: Arc<dyn LayoutListener>) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the viewport observer.
    pub fn with_viewport(mut self, viewport: Arc<dyn ViewportObserver>) -> Self {
        self.viewport = viewport;
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}
