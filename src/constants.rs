//! Shared crate-wide constants.

/// Default minimum width/height for a freshly created pane or group.
///
/// Units: layout units (pixels for desktop hosts, cells for the terminal
/// preview, which overrides this through `LayoutOptions`).
pub const DEFAULT_DOCK_MIN_SIZE: f64 = 25.0;

/// Thickness of a splitter between two visible siblings of a horizontal
/// group.
pub const DEFAULT_SPLITTER_WIDTH: f64 = 6.0;

/// Thickness of a splitter between two visible siblings of a vertical
/// group.
pub const DEFAULT_SPLITTER_HEIGHT: f64 = 6.0;

/// Extra room added to a pane's rendered size when it becomes a floating
/// window without explicit floating dimensions. Accounts for the border and
/// chrome the floating window adds around the pane.
pub const FLOATING_SIZE_MARGIN: f64 = 10.0;

/// Width of the anchorable pane synthesized when an anchorable is docked
/// and the layout has nowhere to put it.
pub const DEFAULT_NEW_PANE_WIDTH: f64 = 200.0;

/// Minimum size of a pane synthesized when an auto-hidden group is docked
/// back without a recorded previous pane.
pub const DEFAULT_AUTO_HIDE_MIN_SIZE: f64 = 100.0;

/// Size of the pop-out strip content for an auto-hidden anchorable.
pub const DEFAULT_AUTO_HIDE_SIZE: f64 = 200.0;

/// Tolerance used when comparing computed lengths.
pub const LENGTH_EPSILON: f64 = 1e-6;
