//! The search session state machine.
//!
//! [`SearchSession`] owns every piece of mutable page state and changes it
//! only in [`handle`](SearchSession::handle) and
//! [`tick`](SearchSession::tick). Both take the current instant; nothing in
//! here sleeps, spawns or performs I/O. Instead each transition returns the
//! [`Effect`]s its host must carry out (write the URL, start a fetch, start
//! a resolution), and completions come back in as [`SessionEvent`]s.
//!
//! That split keeps the session deterministic: tests drive it with
//! synthetic instants, and the [`SessionDriver`] runs the same code on a
//! tokio task.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use byrdocs::{Category, Config, Effect, MemoryFlagStore, SearchSession};
//!
//! let (session, effects) = SearchSession::mount(
//!     Config::default(),
//!     "?q=linear+algebra&c=book",
//!     1280,
//!     Arc::new(MemoryFlagStore::new()),
//! )?;
//!
//! let state = session.state();
//! assert_eq!(state.keyword, "linear algebra");
//! assert_eq!(state.category, Category::Book);
//! assert!(state.expanded);
//! assert!(effects.contains(&Effect::LoadCatalog));
//! # Ok::<(), byrdocs::SearchError>(())
//! ```

mod driver;
mod event;
mod state;

pub use driver::{SessionDriver, SessionHandle, SessionUpdate};
pub use event::{Effect, KeyPress, SessionEvent};
pub use state::SearchSessionState;

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::announcement::Announcement;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::document::Document;
use crate::error::{FetchError, ParamError, Result};
use crate::hint::{HintGate, FILTER_HINT};
use crate::notify::Notice;
use crate::preview::PreviewRouter;
use crate::query::{QueryController, UrlQuery};
use crate::resolve::{ResolutionTracker, Ticket};
use crate::sticky::StickyHeader;
use crate::storage::FlagStore;
use crate::types::{Category, SessionId};

/// Tip shown the first time the user types while the page body has focus.
pub const SHORTCUT_TIP: &str = "按 / 即可跳到搜索框";

/// Key that jumps to the search input.
pub const FOCUS_KEY: &str = "/";

/// Notice shown when the catalog cannot be loaded.
const CATALOG_ERROR: &str = "文档目录加载失败";

/// Notice shown for an unusable URL parameter.
const PARAM_ERROR: &str = "链接参数无效";

#[derive(Clone, Debug, PartialEq)]
enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

/// One mounted search page.
#[derive(Debug)]
pub struct SearchSession {
    id: SessionId,
    config: Config,
    query: QueryController,
    router: PreviewRouter,
    sticky: StickyHeader,
    filter_hint: HintGate,
    filter_hint_shown: bool,
    shortcut_tip_shown: bool,
    catalog: Catalog,
    catalog_status: CatalogStatus,
    announcements: Arc<[Announcement]>,
    tracker: ResolutionTracker,
    results: Arc<[Document]>,
    closed: bool,
}

impl SearchSession {
    /// Mounts a session from the page's URL query and viewport width.
    ///
    /// Keyword and category are restored from `url_query` immediately, with
    /// no settling period. Unusable parameters fall back to their defaults
    /// and are reported as notices. The returned effects start the catalog
    /// and announcement fetches and focus the input.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`](crate::SearchError::Validation)
    /// if `config` is invalid.
    pub fn mount(
        config: Config,
        url_query: &str,
        viewport_width: u32,
        flags: Arc<dyn FlagStore>,
    ) -> Result<(Self, Vec<Effect>)> {
        config.validate()?;

        let id = SessionId::new();
        let mut effects = Vec::new();

        let (query, errors) = UrlQuery::parse_lossy(url_query);
        report_param_errors(errors, &mut effects);

        let filter_hint = HintGate::new(config.filter_hint_key.clone(), flags);
        let filter_hint_shown = !filter_hint.should_show();

        let session = Self {
            id,
            query: QueryController::from_url(&query, config.debounce_delay),
            router: PreviewRouter::new(config.viewport_class(viewport_width)),
            sticky: StickyHeader::new(config.pin_threshold_px),
            filter_hint,
            filter_hint_shown,
            shortcut_tip_shown: false,
            catalog: Catalog::empty(),
            catalog_status: CatalogStatus::Loading,
            announcements: Vec::new().into(),
            tracker: ResolutionTracker::new(),
            results: Vec::new().into(),
            closed: false,
            config,
        };

        effects.push(Effect::FocusInput);
        effects.push(Effect::LoadCatalog);
        effects.push(Effect::LoadAnnouncements);

        info!(
            session_id = %id,
            keyword = %session.query.keyword(),
            category = %session.query.category(),
            viewport = ?session.router.viewport(),
            "Session mounted"
        );

        Ok((session, effects))
    }

    /// Applies one event at `now`.
    ///
    /// Debounce windows that elapsed before `now` are settled first, so
    /// the event sees the same state a timely [`tick`](Self::tick) would
    /// have left. Events after [`close`](Self::close) are ignored.
    pub fn handle(&mut self, event: SessionEvent, now: Instant) -> Vec<Effect> {
        if self.closed {
            trace!(session_id = %self.id, ?event, "Event after teardown ignored");
            return Vec::new();
        }

        let mut effects = self.tick(now);

        match event {
            SessionEvent::KeywordChanged(text) => {
                self.query.set_keyword(text, now);
            }
            SessionEvent::CategorySelected(category) => {
                self.select_category(category, &mut effects);
            }
            SessionEvent::Cleared => {
                let url = self.query.clear();
                effects.push(Effect::ReplaceUrl(url));
                effects.push(Effect::FocusInput);
                self.refresh_results(&mut effects);
            }
            SessionEvent::KeywordCleared => {
                let url = self.query.clear_keyword();
                effects.push(Effect::ReplaceUrl(url));
                effects.push(Effect::FocusInput);
                self.refresh_results(&mut effects);
            }
            SessionEvent::Navigated(raw) => {
                self.navigate(&raw, &mut effects);
            }
            SessionEvent::PreviewRequested(url) => {
                effects.extend(self.router.request(url).map(Effect::Layout));
            }
            SessionEvent::DrawerClosed => {
                effects.extend(self.router.close_drawer().map(Effect::Layout));
            }
            SessionEvent::PanelClosed => {
                effects.extend(self.router.close_panel().map(Effect::Layout));
            }
            SessionEvent::ViewportResized { width } => {
                let class = self.config.viewport_class(width);
                effects.extend(self.router.viewport_changed(class).map(Effect::Layout));
            }
            SessionEvent::Scrolled { anchor_top } => {
                if self.sticky.observe(anchor_top) {
                    trace!(pinned = self.sticky.is_pinned(), "Search input pin changed");
                }
            }
            SessionEvent::KeyPressed(key) => {
                self.key_pressed(&key, &mut effects);
            }
            SessionEvent::CatalogLoaded(result) => {
                self.catalog_loaded(result, &mut effects);
            }
            SessionEvent::AnnouncementsLoaded(result) => match result {
                Ok(announcements) => self.announcements = announcements.into(),
                Err(e) => debug!(error = %e, "Announcements unavailable"),
            },
            SessionEvent::ResolutionCompleted { ticket, results } => {
                self.resolution_completed(&ticket, results);
            }
        }

        effects
    }

    /// Settles debounce windows that elapsed by `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        let tick = self.query.poll(now);
        if let Some(url) = tick.url {
            debug!(query = %url, "URL query written");
            effects.push(Effect::ReplaceUrl(url));
        }
        if tick.keyword_settled {
            self.refresh_results(&mut effects);
        }
        effects
    }

    /// When the next debounce window elapses, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }
        self.query.deadline()
    }

    /// Tears the session down.
    ///
    /// Pending URL writes and keyword changes are dropped and in-flight
    /// resolutions invalidated; later events and completions are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.query.cancel();
        self.tracker.cancel();
        info!(session_id = %self.id, "Session closed");
    }

    /// Returns a snapshot for rendering.
    pub fn state(&self) -> SearchSessionState {
        SearchSessionState {
            id: self.id,
            keyword: self.query.keyword().to_string(),
            debounced_keyword: self.query.debounced_keyword().to_string(),
            debouncing: self.query.is_debouncing(),
            category: self.query.category(),
            expanded: self.query.expanded(),
            input_pinned: self.sticky.is_pinned(),
            preview: self.router.slot().clone(),
            viewport: self.router.viewport(),
            catalog_ready: self.catalog_status == CatalogStatus::Ready,
            catalog_loading: self.catalog_status == CatalogStatus::Loading,
            catalog_error: match &self.catalog_status {
                CatalogStatus::Failed(reason) => Some(reason.clone()),
                _ => None,
            },
            resolving: self.tracker.is_resolving(),
            results: Arc::clone(&self.results),
            filter_hint_shown: self.filter_hint_shown,
            announcements: Arc::clone(&self.announcements),
            closed: self.closed,
        }
    }

    /// The loaded catalog (empty until it loads).
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The session's configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session id.
    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// True after [`close`](Self::close).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn select_category(&mut self, category: Category, effects: &mut Vec<Effect>) {
        let url = self.query.set_category(category);
        debug!(query = %url, "URL query written");
        effects.push(Effect::ReplaceUrl(url));

        if category == Category::Test && !self.filter_hint_shown && self.filter_hint.show_once() {
            self.filter_hint_shown = true;
            effects.push(Effect::Notify(Notice::info(FILTER_HINT).persistent()));
        }
        self.refresh_results(effects);
    }

    fn navigate(&mut self, raw: &str, effects: &mut Vec<Effect>) {
        let (query, errors) = UrlQuery::parse_lossy(raw);
        report_param_errors(errors, effects);

        // Our own writes come back as navigations; they change nothing.
        if query.keyword == self.query.keyword() && query.category == self.query.category() {
            return;
        }
        debug!(query = %query, "Restoring from navigation");
        self.query.restore(&query);
        self.refresh_results(effects);
    }

    fn key_pressed(&mut self, key: &KeyPress, effects: &mut Vec<Effect>) {
        if !key.body_focused {
            return;
        }
        if key.key == FOCUS_KEY {
            effects.push(Effect::FocusInput);
        } else if !self.shortcut_tip_shown && key.is_printable() {
            self.shortcut_tip_shown = true;
            effects.push(Effect::Notify(Notice::tip(SHORTCUT_TIP)));
        }
    }

    fn catalog_loaded(
        &mut self,
        result: std::result::Result<Catalog, FetchError>,
        effects: &mut Vec<Effect>,
    ) {
        match result {
            Ok(catalog) => {
                info!(session_id = %self.id, documents = catalog.len(), "Catalog ready");
                self.catalog = catalog;
                self.catalog_status = CatalogStatus::Ready;
                self.refresh_results(effects);
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Catalog unavailable");
                self.catalog_status = CatalogStatus::Failed(e.to_string());
                effects.push(Effect::Notify(
                    Notice::error(CATALOG_ERROR).with_description(e.to_string()),
                ));
            }
        }
    }

    fn resolution_completed(&mut self, ticket: &Ticket, results: Vec<Document>) {
        if self.tracker.complete(ticket) {
            debug!(
                generation = ticket.generation,
                count = results.len(),
                "Results published"
            );
            self.results = results.into();
        }
    }

    /// Starts a resolution for the current debounced query.
    fn refresh_results(&mut self, effects: &mut Vec<Effect>) {
        if self.catalog_status != CatalogStatus::Ready {
            return;
        }
        let keyword = self.query.debounced_keyword();
        if keyword.is_empty() {
            self.tracker.cancel();
            self.results = Vec::new().into();
            return;
        }
        let ticket = self.tracker.begin(keyword, self.query.category());
        effects.push(Effect::Resolve(ticket));
    }
}

fn report_param_errors(errors: Vec<ParamError>, effects: &mut Vec<Effect>) {
    for err in errors {
        warn!(error = %err, "Ignoring URL parameter");
        effects.push(Effect::Notify(
            Notice::error(PARAM_ERROR).with_description(err.to_string()),
        ));
    }
}
