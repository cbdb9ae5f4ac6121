//! Query state: keyword, category and the expanded flag, mirrored into the URL.
//!
//! The raw keyword changes on every keystroke. Its debounced projection and
//! the URL write share one idle window, so the URL and the result list
//! settle together. Category changes are discrete and hit the URL at once.
//!
//! Intermediate keywords never reach the URL: each keystroke replaces the
//! pending write, and a category change or reset drops it outright.

mod url;

pub use url::{UrlQuery, CATEGORY_PARAM, KEYWORD_PARAM};

pub(crate) use url::form_encode;

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::debounce::{Debounced, DebouncedFn};
use crate::types::Category;

/// What a [`QueryController::poll`] produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryTick {
    /// A URL write that became due.
    pub url: Option<UrlQuery>,
    /// True if the debounced keyword changed.
    pub keyword_settled: bool,
}

/// Debounced `setQuery`: the last `(keyword, category)` becomes the URL.
type UrlWrite = DebouncedFn<(String, Category), fn((String, Category)) -> UrlQuery>;

fn write_url((keyword, category): (String, Category)) -> UrlQuery {
    UrlQuery::new(keyword, category)
}

/// Owns the query half of the session state.
#[derive(Clone, Debug)]
pub struct QueryController {
    keyword: Debounced<String>,
    category: Category,
    expanded: bool,
    url_write: UrlWrite,
}

impl QueryController {
    /// Creates an empty controller with the given idle window.
    pub fn new(delay: Duration) -> Self {
        Self {
            keyword: Debounced::new(String::new(), delay),
            category: Category::All,
            expanded: false,
            url_write: DebouncedFn::new(delay, write_url as fn(_) -> _),
        }
    }

    /// Creates a controller restored from a URL query.
    pub fn from_url(query: &UrlQuery, delay: Duration) -> Self {
        let mut controller = Self::new(delay);
        controller.restore(query);
        controller
    }

    /// Restores keyword and category from the URL without writing it back.
    ///
    /// The keyword is applied without a settling period. A non-empty
    /// keyword expands the layout; an empty one leaves it as it was.
    pub fn restore(&mut self, query: &UrlQuery) {
        self.keyword.reset(query.keyword.clone());
        self.category = query.category;
        self.expanded |= !query.keyword.is_empty();
        self.url_write.cancel();
    }

    /// Records a keystroke.
    ///
    /// Expands the layout and schedules a URL write of the new keyword with
    /// the current category.
    pub fn set_keyword(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.expanded = true;
        self.url_write.call((text.clone(), self.category), now);
        self.keyword.set(text, now);
    }

    /// Selects a category and returns the URL to write immediately.
    ///
    /// A keyword write still waiting is dropped; the returned query already
    /// carries the latest keyword.
    pub fn set_category(&mut self, category: Category) -> UrlQuery {
        self.category = category;
        if self.url_write.is_pending() {
            debug!("Pending URL write superseded by category change");
        }
        self.url_write.cancel();
        UrlQuery::new(self.keyword.latest().clone(), category)
    }

    /// Resets keyword, category and layout; returns the (empty) URL to write.
    pub fn clear(&mut self) -> UrlQuery {
        self.keyword.reset(String::new());
        self.category = Category::All;
        self.expanded = false;
        self.url_write.cancel();
        UrlQuery::default()
    }

    /// Empties the keyword only; returns the URL to write.
    ///
    /// Category and the expanded layout are kept.
    pub fn clear_keyword(&mut self) -> UrlQuery {
        self.keyword.reset(String::new());
        self.url_write.cancel();
        UrlQuery::new("", self.category)
    }

    /// Advances the debounce windows to `now`.
    pub fn poll(&mut self, now: Instant) -> QueryTick {
        QueryTick {
            keyword_settled: self.keyword.poll(now),
            url: self.url_write.poll(now),
        }
    }

    /// Drops every pending change.
    pub fn cancel(&mut self) {
        self.keyword.cancel();
        self.url_write.cancel();
    }

    /// Returns the earliest pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.keyword.deadline(), self.url_write.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Raw keyword as typed.
    #[inline]
    pub fn keyword(&self) -> &str {
        self.keyword.latest()
    }

    /// Settled keyword that results are resolved against.
    #[inline]
    pub fn debounced_keyword(&self) -> &str {
        self.keyword.stable()
    }

    /// True while the debounced keyword lags behind the raw one.
    #[inline]
    pub fn is_debouncing(&self) -> bool {
        self.keyword.is_settling()
    }

    /// Selected category.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// True once a query has been entered (until `clear`).
    #[inline]
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// True if a URL write is waiting.
    #[inline]
    pub fn has_pending_url_write(&self) -> bool {
        self.url_write.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_restore_from_url() {
        let (query, _) = UrlQuery::parse_lossy("?q=linear+algebra&c=book");
        let controller = QueryController::from_url(&query, WINDOW);

        assert_eq!(controller.keyword(), "linear algebra");
        assert_eq!(controller.debounced_keyword(), "linear algebra");
        assert_eq!(controller.category(), Category::Book);
        assert!(controller.expanded());
        assert!(!controller.is_debouncing());
    }

    #[test]
    fn test_restore_category_only_stays_collapsed() {
        let controller = QueryController::from_url(&UrlQuery::new("", Category::Doc), WINDOW);
        assert_eq!(controller.category(), Category::Doc);
        assert!(!controller.expanded());
    }

    #[test]
    fn test_keystrokes_coalesce_to_one_url_write() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);

        controller.set_keyword("l", t0);
        controller.set_keyword("li", t0 + ms(100));
        controller.set_keyword("lin", t0 + ms(200));
        assert_eq!(controller.keyword(), "lin");
        assert!(controller.expanded());

        for step in [300, 500, 699] {
            assert_eq!(controller.poll(t0 + ms(step)), QueryTick::default());
        }

        let tick = controller.poll(t0 + ms(700));
        assert_eq!(tick.url, Some(UrlQuery::new("lin", Category::All)));
        assert!(tick.keyword_settled);
        assert_eq!(controller.debounced_keyword(), "lin");

        assert_eq!(controller.poll(t0 + ms(5_000)), QueryTick::default());
    }

    #[test]
    fn test_category_writes_immediately_and_supersedes_pending() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);

        controller.set_keyword("os", t0);
        let url = controller.set_category(Category::Test);
        assert_eq!(url, UrlQuery::new("os", Category::Test));
        assert!(!controller.has_pending_url_write());

        // The keyword itself keeps settling
        let tick = controller.poll(t0 + WINDOW);
        assert!(tick.url.is_none());
        assert!(tick.keyword_settled);
    }

    #[test]
    fn test_keyword_after_category_uses_new_category() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);

        controller.set_category(Category::Book);
        controller.set_keyword("calc", t0);
        let tick = controller.poll(t0 + WINDOW);
        assert_eq!(tick.url, Some(UrlQuery::new("calc", Category::Book)));
    }

    #[test]
    fn test_url_write_and_keyword_settle_together() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);
        controller.set_category(Category::Doc);
        controller.set_keyword("a", t0);
        controller.set_keyword("ab", t0 + ms(300));

        assert_eq!(controller.deadline(), Some(t0 + ms(800)));
        let tick = controller.poll(t0 + ms(800));
        assert_eq!(tick.url, Some(UrlQuery::new("ab", Category::Doc)));
        assert!(tick.keyword_settled);
        assert!(!controller.has_pending_url_write());
    }

    #[test]
    fn test_clear_resets_everything() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);
        controller.set_category(Category::Doc);
        controller.set_keyword("abc", t0);

        assert_eq!(controller.clear(), UrlQuery::default());
        assert_eq!(controller.keyword(), "");
        assert_eq!(controller.debounced_keyword(), "");
        assert_eq!(controller.category(), Category::All);
        assert!(!controller.expanded());
        assert!(controller.deadline().is_none());
        assert_eq!(controller.poll(t0 + ms(5_000)), QueryTick::default());
    }

    #[test]
    fn test_clear_keyword_keeps_category_and_layout() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);
        controller.set_category(Category::Test);
        controller.set_keyword("abc", t0);

        assert_eq!(controller.clear_keyword(), UrlQuery::new("", Category::Test));
        assert_eq!(controller.keyword(), "");
        assert_eq!(controller.category(), Category::Test);
        assert!(controller.expanded());
        assert!(controller.deadline().is_none());
    }

    #[test]
    fn test_restore_drops_pending_write() {
        let t0 = Instant::now();
        let mut controller = QueryController::new(WINDOW);
        controller.set_keyword("typed", t0);

        controller.restore(&UrlQuery::new("back", Category::Book));
        assert_eq!(controller.keyword(), "back");
        assert!(controller.poll(t0 + WINDOW).url.is_none());
    }
}
