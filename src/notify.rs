//! User-visible notices.
//!
//! The session decides *that* something should be shown; presentation
//! (toasts, banners, durations on screen) belongs to the [`Notifier`] the
//! application injects.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Neutral information, e.g. a usage hint.
    Info,
    /// A dismissable tip with an acknowledgement action.
    Tip,
    /// Something went wrong but the page keeps working.
    Error,
}

/// A message for the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Main line.
    pub message: String,
    /// Optional second line.
    pub description: Option<String>,
    /// Label of the acknowledgement button, if any.
    pub action: Option<String>,
    /// Stays until dismissed instead of timing out.
    pub persistent: bool,
}

impl Notice {
    /// An informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
            description: None,
            action: None,
            persistent: false,
        }
    }

    /// A tip acknowledged with "OK".
    pub fn tip(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Tip,
            action: Some("OK".to_string()),
            ..Self::info(message)
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            ..Self::info(message)
        }
    }

    /// Adds a second line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Keeps the notice until the user dismisses it.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// Presents notices to the user.
pub trait Notifier: Send + Sync {
    /// Shows `notice`. Must not block.
    fn notify(&self, notice: Notice);
}

/// A [`Notifier`] that records every notice, for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
