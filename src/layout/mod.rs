pub mod floating;
pub mod sizing;
pub mod tiling;

pub use tiling::*;

use ratatui::prelude::Rect;
use std::collections::BTreeMap;

use crate::model::{NodeId, Orientation};

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DockRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DockRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &DockRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Gap between the two rectangles; zero when they touch or overlap.
    pub fn distance_to(&self, other: &DockRect) -> f64 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.bottom()).max(self.y - other.bottom()).max(0.0);
        dx.hypot(dy)
    }

    pub fn length(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    pub fn start(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Band of this rectangle along `axis` starting at `start` (absolute
    /// coordinate) with the given `length`.
    pub fn band(&self, axis: Orientation, start: f64, length: f64) -> DockRect {
        match axis {
            Orientation::Horizontal => DockRect::new(start, self.y, length, self.height),
            Orientation::Vertical => DockRect::new(self.x, start, self.width, length),
        }
    }

    /// Snap to terminal cells.
    pub fn to_cells(&self) -> Rect {
        let cell = |v: f64| v.round().clamp(0.0, u16::MAX as f64) as u16;
        let x = cell(self.x);
        let y = cell(self.y);
        Rect {
            x,
            y,
            width: cell(self.right()).saturating_sub(x),
            height: cell(self.bottom()).saturating_sub(y),
        }
    }
}

impl From<Rect> for DockRect {
    fn from(rect: Rect) -> Self {
        DockRect::new(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        )
    }
}

/// Arranged rectangles keyed by node.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    regions: BTreeMap<NodeId, DockRect>,
}

impl RegionMap {
    pub fn ids(&self) -> Vec<NodeId> {
        self.regions.keys().copied().collect()
    }

    pub fn set(&mut self, id: NodeId, rect: DockRect) {
        self.regions.insert(id, rect);
    }

    pub fn get(&self, id: NodeId) -> Option<DockRect> {
        self.regions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// First of `ids` whose region contains the point.
    pub fn hit_test(&self, x: f64, y: f64, ids: &[NodeId]) -> Option<NodeId> {
        ids.iter()
            .copied()
            .find(|id| self.regions.get(id).is_some_and(|rect| rect.contains(x, y)))
    }
}
