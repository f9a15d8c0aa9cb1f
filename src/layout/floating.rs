use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use ratatui::prelude::Rect;

use crate::error::LayoutResult;
use crate::model::{DockLayout, NodeId};

use super::{Arrangement, DockRect};

pub const FLOATING_MIN_WIDTH: f64 = 6.0;
pub const FLOATING_MIN_HEIGHT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

/// Keep floating `bounds` reachable on one of `monitors`.
///
/// Bounds that already overlap a monitor, or a layout with no monitors
/// configured, are returned unchanged. Otherwise the window moves onto the
/// nearest monitor, shrinking first if it is larger than that monitor.
pub fn ensure_on_screen(bounds: DockRect, monitors: &[DockRect]) -> DockRect {
    if monitors.is_empty() || monitors.iter().any(|monitor| monitor.intersects(&bounds)) {
        return bounds;
    }
    let Some(monitor) = monitors
        .iter()
        .min_by(|a, b| a.distance_to(&bounds).total_cmp(&b.distance_to(&bounds)))
    else {
        return bounds;
    };
    let width = bounds.width.min(monitor.width);
    let height = bounds.height.min(monitor.height);
    let placed = DockRect::new(
        bounds.x.clamp(monitor.x, monitor.right() - width),
        bounds.y.clamp(monitor.y, monitor.bottom() - height),
        width,
        height,
    );
    tracing::debug!(?bounds, ?placed, "floating window moved onto monitor");
    placed
}

/// Bounds after dragging `edge` of `start` by (`dx`, `dy`). The opposite
/// edge stays put when the minimum size is hit.
pub fn apply_resize(start: DockRect, edge: ResizeEdge, dx: f64, dy: f64) -> DockRect {
    let mut rect = start;
    if edge.moves_left() {
        rect.x += dx;
        rect.width -= dx;
    } else if edge.moves_right() {
        rect.width += dx;
    }
    if edge.moves_top() {
        rect.y += dy;
        rect.height -= dy;
    } else if edge.moves_bottom() {
        rect.height += dy;
    }

    if rect.width < FLOATING_MIN_WIDTH {
        if edge.moves_left() {
            rect.x -= FLOATING_MIN_WIDTH - rect.width;
        }
        rect.width = FLOATING_MIN_WIDTH;
    }
    if rect.height < FLOATING_MIN_HEIGHT {
        if edge.moves_top() {
            rect.y -= FLOATING_MIN_HEIGHT - rect.height;
        }
        rect.height = FLOATING_MIN_HEIGHT;
    }
    rect
}

pub fn translate(start: DockRect, dx: f64, dy: f64) -> DockRect {
    DockRect::new(start.x + dx, start.y + dy, start.width, start.height)
}

/// Part of a floating window's frame a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowGrab {
    /// Title row between the two top corners.
    Move,
    Resize(ResizeEdge),
}

/// Frame part of `rect` under the cell. Corners, side columns and the bottom
/// row resize; the rest of the top row moves the window.
pub fn grab_at(rect: Rect, column: u16, row: u16) -> Option<WindowGrab> {
    if rect.width < 2 || rect.height < 2 || !rect.contains(Position::new(column, row)) {
        return None;
    }
    let left = column == rect.x;
    let right = column == rect.x.saturating_add(rect.width - 1);
    let top = row == rect.y;
    let bottom = row == rect.y.saturating_add(rect.height - 1);
    let edge = match (left, right, top, bottom) {
        (true, _, true, _) => ResizeEdge::TopLeft,
        (_, true, true, _) => ResizeEdge::TopRight,
        (true, _, _, true) => ResizeEdge::BottomLeft,
        (_, true, _, true) => ResizeEdge::BottomRight,
        (_, _, true, _) => return Some(WindowGrab::Move),
        (_, _, _, true) => ResizeEdge::Bottom,
        (true, _, _, _) => ResizeEdge::Left,
        (_, true, _, _) => ResizeEdge::Right,
        _ => return None,
    };
    Some(WindowGrab::Resize(edge))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowDragState {
    window: NodeId,
    grab: WindowGrab,
    start: DockRect,
    start_col: u16,
    start_row: u16,
}

/// Mouse-driven moving and resizing of floating windows.
#[derive(Debug, Default)]
pub struct WindowDrag {
    drag: Option<WindowDragState>,
}

impl WindowDrag {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn window(&self) -> Option<NodeId> {
        self.drag.map(|state| state.window)
    }

    /// Returns true when the event started, moved, or ended a window drag.
    /// Only the topmost window under the cursor can take a press.
    pub fn handle_mouse<C>(
        &mut self,
        layout: &mut DockLayout<C>,
        arrangement: &Arrangement,
        mouse: &MouseEvent,
    ) -> LayoutResult<bool> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let cursor = Position::new(mouse.column, mouse.row);
                for window in arrangement.floating.iter().rev() {
                    let Some(bounds) = arrangement.regions.get(*window) else {
                        continue;
                    };
                    let cells = bounds.to_cells();
                    if !cells.contains(cursor) {
                        continue;
                    }
                    let Some(grab) = grab_at(cells, mouse.column, mouse.row) else {
                        return Ok(false);
                    };
                    self.drag = Some(WindowDragState {
                        window: *window,
                        grab,
                        start: layout.floating_bounds(*window).unwrap_or(bounds),
                        start_col: mouse.column,
                        start_row: mouse.row,
                    });
                    return Ok(true);
                }
            }
            MouseEventKind::Drag(_) => {
                let Some(state) = self.drag else {
                    return Ok(false);
                };
                if !layout.contains(state.window) {
                    self.drag = None;
                    return Ok(false);
                }
                let dx = mouse.column as f64 - state.start_col as f64;
                let dy = mouse.row as f64 - state.start_row as f64;
                let moved = match state.grab {
                    WindowGrab::Move => translate(state.start, dx, dy),
                    WindowGrab::Resize(edge) => apply_resize(state.start, edge, dx, dy),
                };
                let placed = ensure_on_screen(moved, &layout.options().monitors);
                layout.set_floating_bounds(state.window, placed)?;
                layout.request_layout_pass();
                return Ok(true);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::arrange;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A document floated into a window at (10, 5) sized 30x12.
    fn floated() -> (DockLayout, NodeId) {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("notes.md");
        layout.push_child(pane, doc).unwrap();
        let window = layout.float(doc).unwrap().unwrap();
        layout
            .set_floating_bounds(window, DockRect::new(10.0, 5.0, 30.0, 12.0))
            .unwrap();
        (layout, window)
    }

    #[test]
    fn grab_classifies_frame_cells() {
        let rect = Rect::new(10, 5, 30, 12);
        assert_eq!(grab_at(rect, 20, 5), Some(WindowGrab::Move));
        assert_eq!(grab_at(rect, 10, 5), Some(WindowGrab::Resize(ResizeEdge::TopLeft)));
        assert_eq!(grab_at(rect, 39, 16), Some(WindowGrab::Resize(ResizeEdge::BottomRight)));
        assert_eq!(grab_at(rect, 10, 9), Some(WindowGrab::Resize(ResizeEdge::Left)));
        assert_eq!(grab_at(rect, 39, 9), Some(WindowGrab::Resize(ResizeEdge::Right)));
        assert_eq!(grab_at(rect, 20, 16), Some(WindowGrab::Resize(ResizeEdge::Bottom)));
        assert_eq!(grab_at(rect, 20, 9), None);
        assert_eq!(grab_at(rect, 50, 5), None);
    }

    #[test]
    fn title_drag_moves_window() {
        let (mut layout, window) = floated();
        let arrangement = arrange(&mut layout, DockRect::new(0.0, 0.0, 100.0, 40.0));
        let mut drag = WindowDrag::default();

        assert!(
            drag.handle_mouse(&mut layout, &arrangement, &mouse(MouseEventKind::Down(MouseButton::Left), 20, 5))
                .unwrap()
        );
        assert_eq!(drag.window(), Some(window));
        assert!(
            drag.handle_mouse(&mut layout, &arrangement, &mouse(MouseEventKind::Drag(MouseButton::Left), 27, 8))
                .unwrap()
        );
        assert!(layout.is_layout_pass_pending());
        assert!(
            drag.handle_mouse(&mut layout, &arrangement, &mouse(MouseEventKind::Up(MouseButton::Left), 27, 8))
                .unwrap()
        );
        assert!(!drag.is_dragging());
        assert_eq!(
            layout.floating_bounds(window),
            Some(DockRect::new(17.0, 8.0, 30.0, 12.0))
        );
        let arrangement = arrange(&mut layout, DockRect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(
            arrangement.regions.get(window),
            Some(DockRect::new(17.0, 8.0, 30.0, 12.0))
        );
    }

    #[test]
    fn corner_drag_resizes_and_body_press_is_ignored() {
        let (mut layout, window) = floated();
        let arrangement = arrange(&mut layout, DockRect::new(0.0, 0.0, 100.0, 40.0));
        let mut drag = WindowDrag::default();

        assert!(
            !drag
                .handle_mouse(&mut layout, &arrangement, &mouse(MouseEventKind::Down(MouseButton::Left), 20, 9))
                .unwrap()
        );
        assert!(!drag.is_dragging());

        let down = mouse(MouseEventKind::Down(MouseButton::Left), 39, 16);
        assert!(drag.handle_mouse(&mut layout, &arrangement, &down).unwrap());
        let pull = mouse(MouseEventKind::Drag(MouseButton::Left), 43, 18);
        assert!(drag.handle_mouse(&mut layout, &arrangement, &pull).unwrap());
        assert_eq!(
            layout.floating_bounds(window),
            Some(DockRect::new(10.0, 5.0, 34.0, 14.0))
        );
    }

    #[test]
    fn overlapping_bounds_are_left_alone() {
        let monitors = [DockRect::new(0.0, 0.0, 800.0, 600.0)];
        let bounds = DockRect::new(700.0, 500.0, 300.0, 300.0);
        assert_eq!(ensure_on_screen(bounds, &monitors), bounds);
        assert_eq!(ensure_on_screen(bounds, &[]), bounds);
    }

    #[test]
    fn off_screen_bounds_move_to_nearest_monitor() {
        let monitors = [
            DockRect::new(0.0, 0.0, 800.0, 600.0),
            DockRect::new(800.0, 0.0, 400.0, 300.0),
        ];
        let bounds = DockRect::new(1500.0, 50.0, 600.0, 100.0);
        assert_eq!(
            ensure_on_screen(bounds, &monitors),
            DockRect::new(800.0, 50.0, 400.0, 100.0)
        );
    }

    #[test]
    fn resize_from_top_left_stops_at_minimum() {
        let start = DockRect::new(10.0, 10.0, 20.0, 10.0);
        let grown = apply_resize(start, ResizeEdge::TopLeft, -5.0, -2.0);
        assert_eq!(grown, DockRect::new(5.0, 8.0, 25.0, 12.0));

        let crushed = apply_resize(start, ResizeEdge::TopLeft, 30.0, 30.0);
        assert_eq!(crushed.right(), start.right());
        assert_eq!(crushed.bottom(), start.bottom());
        assert_eq!(crushed.width, FLOATING_MIN_WIDTH);
        assert_eq!(crushed.height, FLOATING_MIN_HEIGHT);
    }

    #[test]
    fn resize_from_bottom_right_keeps_origin() {
        let start = DockRect::new(10.0, 10.0, 20.0, 10.0);
        let rect = apply_resize(start, ResizeEdge::BottomRight, 4.0, -20.0);
        assert_eq!(rect, DockRect::new(10.0, 10.0, 24.0, FLOATING_MIN_HEIGHT));
    }
}
