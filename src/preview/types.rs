//! Data types for preview routing.

use serde::{Deserialize, Serialize};

/// Where the previewed resource is shown, if anywhere.
///
/// A single slot rather than two optional fields: a mobile and a desktop
/// preview can never coexist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreviewSlot {
    /// Nothing is previewed.
    #[default]
    Empty,
    /// Overlay drawer (narrow viewports).
    Mobile(String),
    /// Persistent side panel (wide viewports).
    Desktop(String),
}

impl PreviewSlot {
    /// Returns the previewed resource URL, whichever surface shows it.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Mobile(url) | Self::Desktop(url) => Some(url),
        }
    }

    /// Returns the drawer's resource URL.
    pub fn mobile(&self) -> Option<&str> {
        match self {
            Self::Mobile(url) => Some(url),
            _ => None,
        }
    }

    /// Returns the side panel's resource URL.
    pub fn desktop(&self) -> Option<&str> {
        match self {
            Self::Desktop(url) => Some(url),
            _ => None,
        }
    }

    /// Returns true if nothing is previewed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Page layout notification emitted when the side panel appears or goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutChange {
    /// The side panel became visible; the page should make room for it.
    PanelOpened,
    /// The side panel went away.
    PanelClosed,
}

impl LayoutChange {
    /// True for [`LayoutChange::PanelOpened`].
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::PanelOpened)
    }
}
