use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::constants::LENGTH_EPSILON;
use crate::error::{LayoutError, LayoutResult, clamp_size};
use crate::model::{DockLayout, GridLength, NodeId, Orientation};

use super::sizing::{ChildLength, FixedChild, distribute, fit_fixed_lengths};
use super::{DockRect, RegionMap};

/// Gap between two neighbours of a panel or pane group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitHandle {
    pub rect: DockRect,
    pub group: NodeId,
    /// Index of the leading neighbour among the group's visible children.
    pub index: usize,
    pub orientation: Orientation,
}

/// Result of one layout pass.
#[derive(Debug, Clone, Default)]
pub struct Arrangement {
    pub regions: RegionMap,
    pub handles: Vec<SplitHandle>,
    /// Visible floating windows, bottom to top.
    pub floating: Vec<NodeId>,
}

impl Arrangement {
    pub fn handle_at(&self, column: u16, row: u16) -> Option<SplitHandle> {
        self.handles
            .iter()
            .rev()
            .find(|handle| rect_contains(handle.rect.to_cells(), column, row))
            .copied()
    }
}

/// Run a layout pass over the root panel and every visible floating window,
/// recording actual sizes on the tree as it goes.
pub fn arrange<C>(layout: &mut DockLayout<C>, area: DockRect) -> Arrangement {
    layout.take_layout_pass();
    let mut arrangement = Arrangement::default();
    if let Some(panel) = layout.root_panel() {
        arrange_node(layout, panel, area, &mut arrangement);
    }
    for window in layout.floating_windows() {
        if !layout.is_visible(window) {
            continue;
        }
        let bounds = if layout.is_floating_window_maximized(window) {
            area
        } else {
            layout.floating_bounds(window).unwrap_or(area)
        };
        arrangement.regions.set(window, bounds);
        arrangement.floating.push(window);
        if let Some(child) = layout.children(window).first().copied() {
            arrange_node(layout, child, bounds, &mut arrangement);
        }
    }
    arrangement
}

fn arrange_node<C>(
    layout: &mut DockLayout<C>,
    id: NodeId,
    rect: DockRect,
    arrangement: &mut Arrangement,
) {
    arrangement.regions.set(id, rect);
    layout.set_actual_size(id, rect.width, rect.height);
    let Some(axis) = layout.orientation(id) else {
        return;
    };
    let children = layout.visible_positionable_children(id);
    if children.is_empty() {
        return;
    }
    let splitter = layout.options().splitter(axis);
    let available = rect.length(axis);

    let fixed: Vec<FixedChild> = children
        .iter()
        .map(|child| FixedChild {
            nominal: layout
                .geometry(*child)
                .map(|geometry| geometry.nominal_length(axis))
                .unwrap_or_default(),
            current: layout
                .dock_length(*child, axis)
                .map(GridLength::value)
                .unwrap_or_default(),
            min: layout.calculated_dock_min(*child, axis),
        })
        .collect();
    for (child, fitted) in children.iter().zip(fit_fixed_lengths(&fixed, available, splitter)) {
        if let Some(length) = fitted {
            if let Err(err) = layout.set_resizable_absolute_length(*child, axis, length) {
                tracing::warn!(node = ?child, %err, "failed to fit fixed length");
            }
        }
    }

    let lengths: Vec<ChildLength> = children
        .iter()
        .zip(&fixed)
        .map(|(child, fixed)| ChildLength {
            length: layout.dock_length(*child, axis).unwrap_or_default(),
            min: fixed.min,
        })
        .collect();
    let sizes = distribute(&lengths, available, splitter);

    let mut cursor = rect.start(axis);
    let last = children.len() - 1;
    for (index, (child, size)) in children.into_iter().zip(sizes).enumerate() {
        arrange_node(layout, child, rect.band(axis, cursor, size), arrangement);
        cursor += size;
        if index < last {
            arrangement.handles.push(SplitHandle {
                rect: rect.band(axis, cursor, splitter),
                group: id,
                index,
                orientation: axis,
            });
            cursor += splitter;
        }
    }
}

/// Move the splitter after visible child `index` of `group` by `delta`.
///
/// Both neighbours stay at or above their minimum sizes. Star neighbours keep
/// their combined weight; fixed neighbours take the new length directly.
pub fn resize_split<C>(
    layout: &mut DockLayout<C>,
    group: NodeId,
    index: usize,
    delta: f64,
) -> LayoutResult<bool> {
    let axis = layout
        .orientation(group)
        .ok_or(LayoutError::NotContainer(group))?;
    let children = layout.visible_positionable_children(group);
    if index + 1 >= children.len() {
        return Err(LayoutError::IndexOutOfRange {
            index,
            len: children.len(),
        });
    }
    let (lead, trail) = (children[index], children[index + 1]);
    let old_lead = layout.actual_length(lead, axis);
    let old_trail = layout.actual_length(trail, axis);
    let total = old_lead + old_trail;
    if total <= LENGTH_EPSILON {
        // Not arranged yet: there is no rendered split to move.
        return Ok(false);
    }
    let min_lead = layout.calculated_dock_min(lead, axis);
    let min_trail = layout.calculated_dock_min(trail, axis);

    let new_lead = clamp_size(old_lead + delta, min_lead, (total - min_trail).max(min_lead))?;
    if (new_lead - old_lead).abs() < LENGTH_EPSILON {
        return Ok(false);
    }
    let new_trail = (total - new_lead).max(min_trail);
    tracing::trace!(group = ?group, index, new_lead, new_trail, "splitter moved");
    resize_neighbour(layout, lead, axis, old_lead, new_lead, min_lead)?;
    resize_neighbour(layout, trail, axis, old_trail, new_trail, min_trail)?;
    Ok(true)
}

fn resize_neighbour<C>(
    layout: &mut DockLayout<C>,
    id: NodeId,
    axis: Orientation,
    old: f64,
    new: f64,
    min: f64,
) -> LayoutResult<bool> {
    let length = match layout.dock_length(id, axis) {
        Some(GridLength::Star(weight)) if old > LENGTH_EPSILON => {
            GridLength::Star(weight * new / old)
        }
        Some(GridLength::Star(weight)) => GridLength::Star(weight),
        _ => GridLength::Absolute(new.max(min)),
    };
    // Several drags can land before the next layout pass.
    let (width, height) = match axis {
        Orientation::Horizontal => (new, layout.actual_length(id, Orientation::Vertical)),
        Orientation::Vertical => (layout.actual_length(id, Orientation::Horizontal), new),
    };
    layout.set_actual_size(id, width, height);
    layout.set_dock_length(id, axis, length)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub group: NodeId,
    pub index: usize,
    pub orientation: Orientation,
    pub last_col: u16,
    pub last_row: u16,
}

/// Mouse-driven splitter dragging.
#[derive(Debug, Default)]
pub struct SplitterDrag {
    drag: Option<DragState>,
    hover: Option<(u16, u16)>,
}

impl SplitterDrag {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn hovered(&self, arrangement: &Arrangement) -> Option<SplitHandle> {
        let (column, row) = self.hover?;
        arrangement.handle_at(column, row)
    }

    /// Returns true when the event started, moved, or ended a drag.
    pub fn handle_mouse<C>(
        &mut self,
        layout: &mut DockLayout<C>,
        arrangement: &Arrangement,
        mouse: &MouseEvent,
    ) -> LayoutResult<bool> {
        self.hover = Some((mouse.column, mouse.row));
        match mouse.kind {
            MouseEventKind::Down(_) => {
                if let Some(handle) = arrangement.handle_at(mouse.column, mouse.row) {
                    self.drag = Some(DragState {
                        group: handle.group,
                        index: handle.index,
                        orientation: handle.orientation,
                        last_col: mouse.column,
                        last_row: mouse.row,
                    });
                    return Ok(true);
                }
            }
            MouseEventKind::Drag(_) => {
                if let Some(state) = self.drag.as_mut() {
                    let delta = match state.orientation {
                        Orientation::Horizontal => mouse.column as f64 - state.last_col as f64,
                        Orientation::Vertical => mouse.row as f64 - state.last_row as f64,
                    };
                    state.last_col = mouse.column;
                    state.last_row = mouse.row;
                    if !layout.contains(state.group) {
                        self.drag = None;
                        return Ok(false);
                    }
                    return resize_split(layout, state.group, state.index, delta);
                }
            }
            MouseEventKind::Up(_) => {
                if self.drag.take().is_some() {
                    return Ok(true);
                }
            }
            _ => {}
        }
        Ok(false)
    }
}

/// Draw splitter gaps, highlighting the hovered one.
pub fn render_handles(buffer: &mut Buffer, handles: &[SplitHandle], hovered: Option<&SplitHandle>) {
    for handle in handles {
        let rect = handle.rect.to_cells().intersection(buffer.area);
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let is_hovered = hovered.is_some_and(|hover| hover.rect == handle.rect);
        let style = if is_hovered {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let symbol = match handle.orientation {
            Orientation::Horizontal => "│",
            Orientation::Vertical => "─",
        };
        for y in rect.y..rect.y.saturating_add(rect.height) {
            for x in rect.x..rect.x.saturating_add(rect.width) {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(symbol);
                    cell.set_style(style);
                }
            }
        }
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
