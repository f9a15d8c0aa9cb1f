use crate::constants::{
    DEFAULT_DOCK_MIN_SIZE, DEFAULT_NEW_PANE_WIDTH, DEFAULT_SPLITTER_HEIGHT, DEFAULT_SPLITTER_WIDTH,
};
use crate::layout::DockRect;
use crate::model::{DockGeometry, Orientation};

/// Host-tunable layout parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub splitter_width: f64,
    pub splitter_height: f64,
    /// Minimum width/height seeded into new panes and groups.
    pub dock_min_size: f64,
    /// Width of the anchorable pane created when an anchorable has nowhere
    /// to dock.
    pub new_pane_width: f64,
    /// Work areas of the attached monitors. Empty disables floating window
    /// clamping. The first entry is the primary monitor.
    pub monitors: Vec<DockRect>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            splitter_width: DEFAULT_SPLITTER_WIDTH,
            splitter_height: DEFAULT_SPLITTER_HEIGHT,
            dock_min_size: DEFAULT_DOCK_MIN_SIZE,
            new_pane_width: DEFAULT_NEW_PANE_WIDTH,
            monitors: Vec::new(),
        }
    }
}

impl LayoutOptions {
    /// Splitter thickness between two siblings of a group split along
    /// `orientation`.
    pub fn splitter(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.splitter_width,
            Orientation::Vertical => self.splitter_height,
        }
    }

    pub(crate) fn new_geometry(&self) -> DockGeometry {
        DockGeometry::new(self.dock_min_size, self.dock_min_size)
    }
}
