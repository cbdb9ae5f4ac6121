//! Preview routing between the mobile drawer and the desktop side panel.
//!
//! The router holds at most one previewed resource and knows which
//! surface shows it. The surface follows the viewport class: when the
//! class changes while a preview is open, the preview moves to the other
//! surface instead of being dropped or duplicated.
//!
//! Every transition returns the [`LayoutChange`] the page must apply, if
//! any. Only the side panel affects page layout; the drawer overlays it.

pub mod types;

pub use types::{LayoutChange, PreviewSlot};

use tracing::debug;

use crate::types::ViewportClass;

/// Two-surface preview state machine.
#[derive(Clone, Debug)]
pub struct PreviewRouter {
    slot: PreviewSlot,
    viewport: ViewportClass,
}

impl PreviewRouter {
    /// Creates an empty router for the given viewport class.
    pub fn new(viewport: ViewportClass) -> Self {
        Self {
            slot: PreviewSlot::Empty,
            viewport,
        }
    }

    /// Previews `url` on the surface matching the current viewport.
    ///
    /// An open preview on the other surface is migrated first (so the
    /// layout sees it close or open), then replaced by `url`. On the same
    /// surface the new URL simply replaces the old one.
    pub fn request(&mut self, url: impl Into<String>) -> Option<LayoutChange> {
        let url = url.into();
        let migrated = self.reconcile();
        let was_desktop = matches!(self.slot, PreviewSlot::Desktop(_));

        self.slot = match self.viewport {
            ViewportClass::Narrow => PreviewSlot::Mobile(url),
            ViewportClass::Wide => PreviewSlot::Desktop(url),
        };
        debug!(slot = ?self.slot, "Preview opened");

        match (migrated, self.viewport) {
            (Some(change), _) => Some(change),
            (None, ViewportClass::Wide) if !was_desktop => Some(LayoutChange::PanelOpened),
            _ => None,
        }
    }

    /// Records a viewport class change and migrates the open preview.
    pub fn viewport_changed(&mut self, viewport: ViewportClass) -> Option<LayoutChange> {
        if self.viewport == viewport {
            return None;
        }
        self.viewport = viewport;
        self.reconcile()
    }

    /// Closes the mobile drawer.
    ///
    /// The drawer overlays the page, so no layout change results.
    pub fn close_drawer(&mut self) -> Option<LayoutChange> {
        if matches!(self.slot, PreviewSlot::Mobile(_)) {
            self.slot = PreviewSlot::Empty;
            debug!("Drawer closed");
        }
        None
    }

    /// Closes the desktop side panel.
    pub fn close_panel(&mut self) -> Option<LayoutChange> {
        if matches!(self.slot, PreviewSlot::Desktop(_)) {
            self.slot = PreviewSlot::Empty;
            debug!("Side panel closed");
            return Some(LayoutChange::PanelClosed);
        }
        None
    }

    /// Closes whichever surface is open.
    pub fn close(&mut self) -> Option<LayoutChange> {
        match self.slot {
            PreviewSlot::Empty => None,
            PreviewSlot::Mobile(_) => self.close_drawer(),
            PreviewSlot::Desktop(_) => self.close_panel(),
        }
    }

    /// Moves an open preview onto the surface matching the viewport.
    fn reconcile(&mut self) -> Option<LayoutChange> {
        let slot = std::mem::take(&mut self.slot);
        let (slot, change) = match (slot, self.viewport) {
            (PreviewSlot::Desktop(url), ViewportClass::Narrow) => {
                (PreviewSlot::Mobile(url), Some(LayoutChange::PanelClosed))
            }
            (PreviewSlot::Mobile(url), ViewportClass::Wide) => {
                (PreviewSlot::Desktop(url), Some(LayoutChange::PanelOpened))
            }
            (slot, _) => (slot, None),
        };
        if let Some(change) = change {
            debug!(?change, "Preview migrated");
        }
        self.slot = slot;
        change
    }

    /// The current slot.
    #[inline]
    pub fn slot(&self) -> &PreviewSlot {
        &self.slot
    }

    /// The drawer's resource URL.
    #[inline]
    pub fn mobile(&self) -> Option<&str> {
        self.slot.mobile()
    }

    /// The side panel's resource URL.
    #[inline]
    pub fn desktop(&self) -> Option<&str> {
        self.slot.desktop()
    }

    /// The viewport class the router last saw.
    #[inline]
    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    /// True while the side panel is shown.
    #[inline]
    pub fn is_panel_open(&self) -> bool {
        self.desktop().is_some()
    }
}
