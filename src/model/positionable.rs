//! Dock sizing properties shared by panels, pane groups, and panes.

use crate::constants::LENGTH_EPSILON;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::DockRect;

use super::{DockLayout, NodeData, NodeId, Orientation, Property};

/// Length along one axis: a weighted share of leftover space or a fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLength {
    Star(f64),
    Absolute(f64),
}

impl Default for GridLength {
    fn default() -> Self {
        GridLength::Star(1.0)
    }
}

impl GridLength {
    pub fn value(self) -> f64 {
        match self {
            GridLength::Star(v) | GridLength::Absolute(v) => v,
        }
    }

    pub fn is_star(self) -> bool {
        matches!(self, GridLength::Star(_))
    }

    pub fn is_absolute(self) -> bool {
        matches!(self, GridLength::Absolute(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockGeometry {
    dock_width: GridLength,
    dock_height: GridLength,
    resizable_width: Option<f64>,
    resizable_height: Option<f64>,
    min_width: f64,
    min_height: f64,
    floating: DockRect,
    is_maximized: bool,
    actual_width: f64,
    actual_height: f64,
}

impl DockGeometry {
    pub fn new(min_width: f64, min_height: f64) -> Self {
        Self {
            dock_width: GridLength::default(),
            dock_height: GridLength::default(),
            resizable_width: None,
            resizable_height: None,
            min_width,
            min_height,
            floating: DockRect::default(),
            is_maximized: false,
            actual_width: 0.0,
            actual_height: 0.0,
        }
    }

    /// Nominal length as last set by the host.
    pub fn nominal_length(&self, axis: Orientation) -> GridLength {
        match axis {
            Orientation::Horizontal => self.dock_width,
            Orientation::Vertical => self.dock_height,
        }
    }

    fn resizable(&self, axis: Orientation) -> Option<f64> {
        match axis {
            Orientation::Horizontal => self.resizable_width,
            Orientation::Vertical => self.resizable_height,
        }
    }

    fn resizable_mut(&mut self, axis: Orientation) -> &mut Option<f64> {
        match axis {
            Orientation::Horizontal => &mut self.resizable_width,
            Orientation::Vertical => &mut self.resizable_height,
        }
    }

    /// Effective length: an absolute nominal length is reported through its
    /// resizable shadow when the shadow is smaller.
    pub fn length(&self, axis: Orientation) -> GridLength {
        match (self.nominal_length(axis), self.resizable(axis)) {
            (GridLength::Absolute(nominal), Some(shadow)) if shadow < nominal => {
                GridLength::Absolute(shadow)
            }
            (nominal, _) => nominal,
        }
    }

    /// Returns true when the stored length changed. Non-positive lengths are
    /// ignored.
    pub(crate) fn set_length(&mut self, axis: Orientation, length: GridLength) -> bool {
        if length.value() <= 0.0 || self.nominal_length(axis) == length {
            return false;
        }
        match axis {
            Orientation::Horizontal => self.dock_width = length,
            Orientation::Vertical => self.dock_height = length,
        }
        *self.resizable_mut(axis) = match length {
            GridLength::Absolute(v) => Some(v),
            GridLength::Star(_) => None,
        };
        true
    }

    /// Shrink or restore the resizable shadow of an absolute length. Values
    /// above the nominal length restore it.
    pub(crate) fn set_resizable_length(&mut self, axis: Orientation, value: f64) -> bool {
        let GridLength::Absolute(nominal) = self.nominal_length(axis) else {
            return false;
        };
        let next = if value > nominal {
            nominal
        } else if value > 0.0 {
            value
        } else {
            return false;
        };
        let slot = self.resizable_mut(axis);
        if slot.is_some_and(|current| (current - next).abs() < LENGTH_EPSILON) {
            return false;
        }
        *slot = Some(next);
        true
    }

    pub fn min_length(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.min_width,
            Orientation::Vertical => self.min_height,
        }
    }

    pub(crate) fn set_min_length(&mut self, axis: Orientation, value: f64) -> bool {
        let slot = match axis {
            Orientation::Horizontal => &mut self.min_width,
            Orientation::Vertical => &mut self.min_height,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Nominal absolute length, never reported below the minimum.
    pub fn fixed_length(&self, axis: Orientation) -> f64 {
        let nominal = self.nominal_length(axis).value();
        nominal.max(self.min_length(axis))
    }

    pub fn actual_length(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.actual_width,
            Orientation::Vertical => self.actual_height,
        }
    }

    pub(crate) fn set_actual(&mut self, width: f64, height: f64) {
        self.actual_width = width;
        self.actual_height = height;
    }

    pub fn floating(&self) -> DockRect {
        self.floating
    }

    pub(crate) fn set_floating(&mut self, bounds: DockRect) {
        self.floating = bounds;
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub(crate) fn set_maximized(&mut self, maximized: bool) {
        self.is_maximized = maximized;
    }

    /// Copy the sizing a new floating pane inherits from its source pane.
    pub(crate) fn seed_from(&mut self, source: &DockGeometry) {
        self.dock_width = source.dock_width;
        self.dock_height = source.dock_height;
        self.resizable_width = source.resizable_width;
        self.resizable_height = source.resizable_height;
        self.min_width = source.min_width;
        self.min_height = source.min_height;
        self.floating = source.floating;
        self.is_maximized = source.is_maximized;
    }
}

fn length_property(axis: Orientation) -> Property {
    match axis {
        Orientation::Horizontal => Property::DockWidth,
        Orientation::Vertical => Property::DockHeight,
    }
}

fn min_property(axis: Orientation) -> Property {
    match axis {
        Orientation::Horizontal => Property::DockMinWidth,
        Orientation::Vertical => Property::DockMinHeight,
    }
}

impl<C> DockLayout<C> {
    pub fn geometry(&self, id: NodeId) -> Option<&DockGeometry> {
        self.nodes.get(id)?.data.geometry()
    }

    fn geometry_mut(&mut self, id: NodeId) -> LayoutResult<&mut DockGeometry> {
        self.node_mut(id)?
            .data
            .geometry_mut()
            .ok_or(LayoutError::NotContainer(id))
    }

    pub fn dock_length(&self, id: NodeId, axis: Orientation) -> Option<GridLength> {
        self.geometry(id).map(|geometry| geometry.length(axis))
    }

    pub fn dock_width(&self, id: NodeId) -> Option<GridLength> {
        self.dock_length(id, Orientation::Horizontal)
    }

    pub fn dock_height(&self, id: NodeId) -> Option<GridLength> {
        self.dock_length(id, Orientation::Vertical)
    }

    /// Set the nominal dock length along `axis`. Returns false for
    /// non-positive or unchanged values.
    pub fn set_dock_length(
        &mut self,
        id: NodeId,
        axis: Orientation,
        length: GridLength,
    ) -> LayoutResult<bool> {
        if length.value() <= 0.0 || self.geometry_mut(id)?.nominal_length(axis) == length {
            return Ok(false);
        }
        let property = length_property(axis);
        self.events.property_changing(id, property);
        self.geometry_mut(id)?.set_length(axis, length);
        self.events.property_changed(id, property);
        self.events.mark_dirty();
        self.request_layout_pass();
        Ok(true)
    }

    pub fn set_dock_width(&mut self, id: NodeId, length: GridLength) -> LayoutResult<bool> {
        self.set_dock_length(id, Orientation::Horizontal, length)
    }

    pub fn set_dock_height(&mut self, id: NodeId, length: GridLength) -> LayoutResult<bool> {
        self.set_dock_length(id, Orientation::Vertical, length)
    }

    pub fn set_dock_min_length(
        &mut self,
        id: NodeId,
        axis: Orientation,
        value: f64,
    ) -> LayoutResult<()> {
        if value < 0.0 {
            return Err(LayoutError::NegativeMinSize(value));
        }
        if self.geometry_mut(id)?.set_min_length(axis, value) {
            self.events.property_changed(id, min_property(axis));
            self.events.mark_dirty();
        }
        Ok(())
    }

    pub fn set_dock_min_width(&mut self, id: NodeId, value: f64) -> LayoutResult<()> {
        self.set_dock_min_length(id, Orientation::Horizontal, value)
    }

    pub fn set_dock_min_height(&mut self, id: NodeId, value: f64) -> LayoutResult<()> {
        self.set_dock_min_length(id, Orientation::Vertical, value)
    }

    pub fn fixed_dock_length(&self, id: NodeId, axis: Orientation) -> f64 {
        self.geometry(id)
            .map(|geometry| geometry.fixed_length(axis))
            .unwrap_or(0.0)
    }

    pub fn set_resizable_absolute_length(
        &mut self,
        id: NodeId,
        axis: Orientation,
        value: f64,
    ) -> LayoutResult<bool> {
        Ok(self.geometry_mut(id)?.set_resizable_length(axis, value))
    }

    pub fn actual_length(&self, id: NodeId, axis: Orientation) -> f64 {
        self.geometry(id)
            .map(|geometry| geometry.actual_length(axis))
            .unwrap_or(0.0)
    }

    pub(crate) fn set_actual_size(&mut self, id: NodeId, width: f64, height: f64) {
        if let Some(geometry) = self.nodes.get_mut(id).and_then(|n| n.data.geometry_mut()) {
            geometry.set_actual(width, height);
        }
    }

    /// Remembered floating placement of a pane, panel, or group.
    pub fn set_floating_geometry(&mut self, id: NodeId, bounds: DockRect) -> LayoutResult<()> {
        self.geometry_mut(id)?.set_floating(bounds);
        self.events.property_changed(id, Property::FloatingBounds);
        Ok(())
    }

    pub fn set_geometry_maximized(&mut self, id: NodeId, maximized: bool) -> LayoutResult<()> {
        self.geometry_mut(id)?.set_maximized(maximized);
        self.events.property_changed(id, Property::IsMaximized);
        Ok(())
    }

    /// Smallest length `id` can take along `axis`: its own minimum or the
    /// combined minimum of its visible children, whichever is larger.
    ///
    /// Children along the split axis add up, with one splitter per gap.
    /// Across the split axis the largest child minimum wins.
    pub fn calculated_dock_min(&self, id: NodeId, axis: Orientation) -> f64 {
        let Some(geometry) = self.geometry(id) else {
            return 0.0;
        };
        let own = geometry.min_length(axis);
        let Some(orientation) = self.orientation(id) else {
            return own;
        };
        let mins: Vec<f64> = self
            .visible_positionable_children(id)
            .into_iter()
            .map(|child| self.calculated_dock_min(child, axis))
            .collect();
        if mins.is_empty() {
            return own;
        }
        let children = if orientation == axis {
            let gaps = (mins.len() - 1) as f64;
            mins.iter().sum::<f64>() + gaps * self.options.splitter(axis)
        } else {
            mins.iter().copied().fold(0.0, f64::max)
        };
        own.max(children)
    }

    pub fn calculated_dock_min_width(&self, id: NodeId) -> f64 {
        self.calculated_dock_min(id, Orientation::Horizontal)
    }

    pub fn calculated_dock_min_height(&self, id: NodeId) -> f64 {
        self.calculated_dock_min(id, Orientation::Vertical)
    }

    /// Visible children that carry dock geometry, in order.
    pub fn visible_positionable_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_visible(*child) && self.geometry(*child).is_some())
            .collect()
    }

    pub(crate) fn geometry_snapshot(&self, id: NodeId) -> Option<DockGeometry> {
        match &self.nodes.get(id)?.data {
            NodeData::Pane(_, pane) => Some(pane.geometry.clone()),
            NodeData::Panel(group) | NodeData::PaneGroup(_, group) => Some(group.geometry.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaneKind, Property};

    const H: Orientation = Orientation::Horizontal;

    #[test]
    fn setter_ignores_non_positive_and_repeated_values() {
        let mut geometry = DockGeometry::new(25.0, 25.0);
        assert!(!geometry.set_length(H, GridLength::Absolute(0.0)));
        assert!(!geometry.set_length(H, GridLength::Star(-1.0)));
        assert!(geometry.set_length(H, GridLength::Absolute(120.0)));
        assert!(!geometry.set_length(H, GridLength::Absolute(120.0)));
        assert_eq!(geometry.length(H), GridLength::Absolute(120.0));
    }

    #[test]
    fn resizable_shadow_caps_at_nominal() {
        let mut geometry = DockGeometry::new(25.0, 25.0);
        geometry.set_length(H, GridLength::Absolute(200.0));
        assert!(geometry.set_resizable_length(H, 150.0));
        assert_eq!(geometry.length(H), GridLength::Absolute(150.0));
        assert_eq!(geometry.nominal_length(H), GridLength::Absolute(200.0));
        assert!(geometry.set_resizable_length(H, 400.0));
        assert_eq!(geometry.length(H), GridLength::Absolute(200.0));
        assert!(!geometry.set_resizable_length(H, -5.0));
    }

    #[test]
    fn resizable_shadow_ignored_for_star_lengths() {
        let mut geometry = DockGeometry::new(25.0, 25.0);
        assert!(!geometry.set_resizable_length(H, 40.0));
        assert_eq!(geometry.length(H), GridLength::Star(1.0));
    }

    #[test]
    fn fixed_length_never_below_minimum() {
        let mut geometry = DockGeometry::new(80.0, 25.0);
        geometry.set_length(H, GridLength::Absolute(50.0));
        assert_eq!(geometry.fixed_length(H), 80.0);
        geometry.set_length(H, GridLength::Absolute(90.0));
        assert_eq!(geometry.fixed_length(H), 90.0);
    }

    #[test]
    fn negative_minimum_is_rejected() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        assert_eq!(
            layout.set_dock_min_width(pane, -1.0),
            Err(LayoutError::NegativeMinSize(-1.0))
        );
        layout.set_dock_min_width(pane, 40.0).unwrap();
        assert_eq!(layout.calculated_dock_min_width(pane), 40.0);
    }

    #[test]
    fn dock_width_change_notifies_and_schedules_pass() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        assert_eq!(
            layout.set_dock_width(pane, GridLength::Absolute(150.0)),
            Ok(true)
        );
        assert!(layout.is_layout_pass_pending());
        let events = layout.take_events();
        assert!(events.iter().any(|event| matches!(
            event,
            crate::model::LayoutEvent::PropertyChanged {
                property: Property::DockWidth,
                ..
            }
        )));
    }

    #[test]
    fn calculated_minimum_sums_along_axis_and_maxes_across() {
        let mut layout: DockLayout = DockLayout::empty(Default::default());
        let panel = layout.root_panel().unwrap();
        let left = layout.new_pane(PaneKind::Document);
        let right = layout.new_pane(PaneKind::Document);
        layout.push_child(panel, left).unwrap();
        layout.push_child(panel, right).unwrap();
        layout.set_dock_min_width(left, 30.0).unwrap();
        layout.set_dock_min_width(right, 50.0).unwrap();
        layout.set_dock_min_height(left, 10.0).unwrap();
        layout.set_dock_min_height(right, 70.0).unwrap();
        layout.set_dock_min_width(panel, 0.0).unwrap();
        layout.set_dock_min_height(panel, 0.0).unwrap();

        // 30 + 50 + one splitter of 6
        assert_eq!(layout.calculated_dock_min_width(panel), 86.0);
        assert_eq!(layout.calculated_dock_min_height(panel), 70.0);

        layout.set_dock_min_width(panel, 200.0).unwrap();
        assert_eq!(layout.calculated_dock_min_width(panel), 200.0);
    }
}
