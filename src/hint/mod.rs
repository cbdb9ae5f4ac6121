//! First-use hints.
//!
//! A hint is shown at most once per client: the gate consults a persisted
//! flag and sets it when the hint is shown. Storage failures never block
//! the page; an unreadable flag counts as "not shown yet" and a failed
//! write is logged. Within one session the gate also remembers in memory,
//! so even a store that cannot persist never shows the hint twice.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::FlagStore;

/// Hint text shown the first time the exam paper filter is used.
pub const FILTER_HINT: &str = "使用筛选功能缩小搜索范围";

/// One-shot hint backed by a persisted flag.
#[derive(Clone)]
pub struct HintGate {
    key: String,
    store: Arc<dyn FlagStore>,
    shown_this_session: bool,
}

impl HintGate {
    /// Creates a gate over `store` under the flag `key`.
    pub fn new(key: impl Into<String>, store: Arc<dyn FlagStore>) -> Self {
        Self {
            key: key.into(),
            store,
            shown_this_session: false,
        }
    }

    /// Returns true if the hint has not been shown yet.
    pub fn should_show(&self) -> bool {
        if self.shown_this_session {
            return false;
        }
        match self.store.get_flag(&self.key) {
            Ok(Some(true)) => false,
            Ok(_) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cannot read hint flag, assuming not shown");
                true
            }
        }
    }

    /// Records that the hint was shown.
    pub fn mark_shown(&mut self) {
        self.shown_this_session = true;
        match self.store.set_flag(&self.key, true) {
            Ok(()) => debug!(key = %self.key, "Hint marked shown"),
            Err(e) => warn!(key = %self.key, error = %e, "Cannot persist hint flag"),
        }
    }

    /// Marks the hint shown if it was not; returns true if it should be shown now.
    pub fn show_once(&mut self) -> bool {
        if !self.should_show() {
            return false;
        }
        self.mark_shown();
        true
    }

    /// The persisted flag key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for HintGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintGate")
            .field("key", &self.key)
            .field("shown_this_session", &self.shown_this_session)
            .finish_non_exhaustive()
    }
}
