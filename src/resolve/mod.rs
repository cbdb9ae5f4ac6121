//! Filtered result resolution.
//!
//! Matching itself sits behind the [`Resolver`] trait; the session only
//! needs it to be pure. What the session does own is ordering: resolutions
//! may finish out of order, so each one carries a [`Ticket`] and only the
//! most recently issued ticket is allowed to publish its results.
//!
//! # Example
//!
//! ```rust
//! use byrdocs::{Category, ResolutionTracker};
//!
//! let mut tracker = ResolutionTracker::new();
//! let a = tracker.begin("A", Category::All);
//! let b = tracker.begin("B", Category::All);
//!
//! assert!(tracker.complete(&b));
//! // A finished later but was superseded
//! assert!(!tracker.complete(&a));
//! ```

mod keyword;

pub use keyword::KeywordResolver;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::types::Category;

/// Produces the visible result set for a keyword and category.
///
/// Implementations must be pure: the same inputs yield the same ordered
/// output. They run off the session's event loop, hence `Send + Sync`.
pub trait Resolver: Send + Sync {
    /// Returns the documents matching `keyword` within `category`.
    fn search(&self, documents: &[Document], keyword: &str, category: Category) -> Vec<Document>;
}

impl<R: Resolver + ?Sized> Resolver for std::sync::Arc<R> {
    fn search(&self, documents: &[Document], keyword: &str, category: Category) -> Vec<Document> {
        (**self).search(documents, keyword, category)
    }
}

/// Identity of one resolution request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// Monotonic request number; higher is newer.
    pub generation: u64,
    /// Debounced keyword being resolved.
    pub keyword: String,
    /// Category being resolved.
    pub category: Category,
}

/// Issues tickets and decides which completions may publish.
#[derive(Clone, Debug, Default)]
pub struct ResolutionTracker {
    generation: u64,
    in_flight: Option<Ticket>,
}

impl ResolutionTracker {
    /// Creates a tracker with nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a resolution, superseding any still in flight.
    pub fn begin(&mut self, keyword: impl Into<String>, category: Category) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            keyword: keyword.into(),
            category,
        };
        debug!(
            generation = ticket.generation,
            keyword = %ticket.keyword,
            category = %ticket.category,
            "Resolution started"
        );
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Records a completion; returns true if its results may be shown.
    ///
    /// Only the latest ticket is accepted, whatever the completion order.
    pub fn complete(&mut self, ticket: &Ticket) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Stale resolution dropped"
            );
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Invalidates whatever is in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// True while the latest ticket has not completed.
    #[inline]
    pub fn is_resolving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The ticket currently in flight.
    #[inline]
    pub fn in_flight(&self) -> Option<&Ticket> {
        self.in_flight.as_ref()
    }

    /// Number of tickets issued or invalidated so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
