//! The map viewport: a fixed pan/zoom envelope and the current view.

use serde::Serialize;
use tilejson::Bounds;

use crate::geo;

/// Viewport state for one mounted map.
///
/// The envelope and zoom clamp are fixed at construction; the view can only
/// move inside them. The highlighted-geometry reference lives here — owned
/// state, not a free-floating module variable.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    /// Maximum pan envelope.
    pub max_bounds: Bounds,
    /// Minimum zoom level.
    pub min_zoom: u8,
    /// Maximum zoom level.
    pub max_zoom: u8,
    /// View center as (longitude, latitude).
    pub center: (f64, f64),
    /// Current zoom level.
    pub zoom: u8,
    /// Bounds the view is currently fitted to, if any.
    pub view: Option<Bounds>,
    /// The "reset view" target (the collection outline).
    pub home: Option<Bounds>,
    /// Id of the currently highlighted geometry, if any.
    pub highlight: Option<String>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            max_bounds: geo::region_bounds(),
            min_zoom: geo::MIN_ZOOM,
            max_zoom: geo::MAX_ZOOM,
            center: geo::INITIAL_CENTER,
            zoom: geo::INITIAL_ZOOM,
            view: None,
            home: None,
            highlight: None,
        }
    }
}

impl Viewport {
    /// A viewport with the fixed regional envelope and initial view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps a zoom level into the viewport's range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Sets the zoom level, clamped.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Fits the view to `bounds`, clipped to the envelope.
    ///
    /// Bounds entirely outside the envelope fall back to the envelope
    /// itself, so the view never leaves the defined region.
    pub fn fit_bounds(&mut self, bounds: Bounds) {
        let clipped = if geo::intersects(&bounds, &self.max_bounds) {
            Bounds::new(
                f64::max(bounds.left, self.max_bounds.left),
                f64::max(bounds.bottom, self.max_bounds.bottom),
                f64::min(bounds.right, self.max_bounds.right),
                f64::min(bounds.top, self.max_bounds.top),
            )
        } else {
            self.max_bounds
        };
        self.center = geo::center(&clipped);
        self.view = Some(clipped);
    }

    /// Records the collection outline and fits the view to it.
    pub fn set_home(&mut self, bounds: Bounds) {
        self.home = Some(bounds);
        self.fit_bounds(bounds);
    }

    /// Returns to the home bounds (when set) and drops the highlight.
    pub fn reset_view(&mut self) {
        self.highlight = None;
        if let Some(home) = self.home {
            self.fit_bounds(home);
        }
    }

    /// Highlights a geometry, replacing any previous highlight.
    pub fn set_highlight(&mut self, id: impl Into<String>) {
        self.highlight = Some(id.into());
    }

    /// Removes the highlight.
    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }
}
