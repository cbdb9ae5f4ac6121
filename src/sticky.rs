//! Sticky search bar.
//!
//! The search input pins to the top of the viewport once its anchor has
//! scrolled to within `threshold` pixels of the top edge. The flag is a
//! pure function of the last observed offset.

/// Default pin threshold in CSS pixels.
pub const DEFAULT_PIN_THRESHOLD_PX: f64 = 16.0;

/// Derives the pinned flag from the anchor's top offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickyHeader {
    threshold: f64,
    pinned: bool,
}

impl StickyHeader {
    /// Creates an unpinned header with the given threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            pinned: false,
        }
    }

    /// Records the anchor's top offset; returns true if the flag changed.
    ///
    /// A non-finite offset (anchor not laid out) unpins.
    pub fn observe(&mut self, anchor_top: f64) -> bool {
        let pinned = anchor_top.is_finite() && anchor_top <= self.threshold;
        let changed = pinned != self.pinned;
        self.pinned = pinned;
        changed
    }

    /// Whether the input is pinned.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// The pin threshold.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for StickyHeader {
    fn default() -> Self {
        Self::new(DEFAULT_PIN_THRESHOLD_PX)
    }
}
