//! Configuration types for the search session.
//!
//! The [`Config`] struct controls session behavior including:
//! - Where the catalog and the announcement feed are fetched from
//! - How resource links are built (static prefix, viewer path)
//! - Timing and layout constants (debounce delay, pin threshold, breakpoint)
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use byrdocs::Config;
//!
//! // Use defaults (production endpoints, 500 ms debounce)
//! let config = Config::default();
//!
//! // Point at a mirror with a snappier debounce
//! let config = Config {
//!     catalog_url: "https://mirror.example.org/metadata2.json".to_string(),
//!     debounce_delay: Duration::from_millis(250),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use crate::error::ValidationError;
use crate::types::ViewportClass;

/// Default catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://files.byrdocs.org/metadata2.json";

/// Default announcement feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://blog.byrdocs.org/feed.json";

/// Upper bound for the debounce delay.
pub const MAX_DEBOUNCE_DELAY: Duration = Duration::from_secs(10);

/// Session configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use byrdocs::Config;
///
/// let config = Config {
///     static_prefix: "https://cdn.example.org/files".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the JSON document catalog.
    pub catalog_url: String,

    /// URL of the JSON announcement feed.
    pub feed_url: String,

    /// Prefix for per-item resource URLs (`{prefix}/{id}.{filetype}`).
    pub static_prefix: String,

    /// Path of the external document viewer page.
    pub viewer_path: String,

    /// Idle interval before a typed keyword settles.
    ///
    /// Shared by result debouncing and URL writes so both settle together.
    /// Default: 500 ms
    pub debounce_delay: Duration,

    /// Anchor offset (in px) at or below which the search input is pinned.
    pub pin_threshold_px: f64,

    /// Viewport widths strictly below this are narrow.
    pub mobile_breakpoint_px: u32,

    /// Feed tag that marks an item as a site announcement.
    pub announcement_tag: String,

    /// Persisted key of the category filter hint.
    pub filter_hint_key: String,

    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            static_prefix: "/files".to_string(),
            viewer_path: "/pdf-viewer/web/viewer.html".to_string(),
            debounce_delay: Duration::from_millis(500),
            pin_threshold_px: 16.0,
            mobile_breakpoint_px: 768,
            announcement_tag: "主站公告".to_string(),
            filter_hint_key: "filter-hint-shown".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically when a session is mounted. You can also call
    /// this explicitly to check configuration up front.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `catalog_url`, `feed_url` or `filter_hint_key` is empty
    /// - `debounce_delay` is zero or longer than 10 s
    /// - `pin_threshold_px` is negative or not finite
    /// - `mobile_breakpoint_px` is 0
    /// - `request_timeout` is zero
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.catalog_url.trim().is_empty() {
            return Err(ValidationError::required_field("catalog_url"));
        }
        if self.feed_url.trim().is_empty() {
            return Err(ValidationError::required_field("feed_url"));
        }
        if self.filter_hint_key.is_empty() {
            return Err(ValidationError::required_field("filter_hint_key"));
        }

        if self.debounce_delay.is_zero() {
            return Err(ValidationError::invalid_field(
                "debounce_delay",
                "must be greater than 0",
            ));
        }
        if self.debounce_delay > MAX_DEBOUNCE_DELAY {
            return Err(ValidationError::invalid_field(
                "debounce_delay",
                format!("must not exceed {:?}", MAX_DEBOUNCE_DELAY),
            ));
        }

        if !self.pin_threshold_px.is_finite() || self.pin_threshold_px < 0.0 {
            return Err(ValidationError::invalid_field(
                "pin_threshold_px",
                format!("must be a finite value >= 0, got {}", self.pin_threshold_px),
            ));
        }

        if self.mobile_breakpoint_px == 0 {
            return Err(ValidationError::invalid_field(
                "mobile_breakpoint_px",
                "must be greater than 0",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ValidationError::invalid_field(
                "request_timeout",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Classifies a viewport width against the configured breakpoint.
    #[inline]
    pub fn viewport_class(&self, width_px: u32) -> ViewportClass {
        ViewportClass::from_width(width_px, self.mobile_breakpoint_px)
    }
}
