//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area, plus the preview's painter.
//!
//! Arranged rectangles are fractional and floating windows may sit partly off
//! screen, so every draw call goes through `UiFrame` and is clipped to the
//! buffer before it reaches a widget.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap};

use crate::keybindings::Action;
use crate::layout::{DockRect, render_handles};
use crate::model::{AnchorSide, NodeId, NodeKind};
use crate::state::PreviewState;
use crate::tracing_sub::global_log;

const HINT_ACTIONS: [Action; 8] = [
    Action::NextContent,
    Action::Float,
    Action::Dock,
    Action::Hide,
    Action::ToggleAutoHide,
    Action::Close,
    Action::NewDocument,
    Action::ToggleLog,
];

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer, for offscreen
    /// rendering.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Paint one frame of the preview. Expects `state.relayout()` to have run for
/// the current screen size.
pub fn render(frame: &mut UiFrame<'_>, state: &PreviewState) {
    let layout = state.layout();
    let arrangement = state.arrangement();

    if let Some(panel) = layout.root_panel() {
        for pane in panes_under(state, panel) {
            render_pane(frame, state, pane, false);
        }
    }
    render_handles(
        frame.buffer_mut(),
        &arrangement.handles,
        state.drag().hovered(arrangement).as_ref(),
    );
    for window in &arrangement.floating {
        if let Some(rect) = arrangement.regions.get(*window) {
            frame.render_widget(Clear, rect.to_cells());
        }
        for pane in panes_under(state, *window) {
            render_pane(frame, state, pane, true);
        }
    }

    render_strips(frame, state);
    render_log(frame, state);
    render_status(frame, state);
}

fn panes_under(state: &PreviewState, id: NodeId) -> Vec<NodeId> {
    let layout = state.layout();
    layout
        .descendants(id)
        .filter(|node| layout.kind(*node).is_some_and(NodeKind::is_pane))
        .filter(|node| layout.is_visible(*node))
        .collect()
}

fn render_pane(frame: &mut UiFrame<'_>, state: &PreviewState, pane: NodeId, floating: bool) {
    let layout = state.layout();
    let Some(rect) = state.arrangement().regions.get(pane) else {
        return;
    };
    let area = rect.to_cells();
    let selected = layout.selected_content(pane);
    let active = layout.active_content();

    let mut tabs = vec![Span::raw(" ")];
    for (index, child) in layout.children(pane).iter().enumerate() {
        let Some(content) = layout.content(*child) else {
            continue;
        };
        if index > 0 {
            tabs.push(Span::raw(" | "));
        }
        let style = if Some(*child) == selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let title = state.label(*child).unwrap_or(content.title());
        tabs.push(Span::styled(title.to_string(), style));
    }
    tabs.push(Span::raw(" "));

    let holds_active = active.is_some_and(|active| layout.parent(active) == Some(pane));
    let border_style = if holds_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::bordered()
        .border_type(if floating {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(border_style)
        .title(Line::from(tabs));

    let body = selected
        .and_then(|content| layout.content(content))
        .and_then(|state| state.content.clone())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

/// One-cell strips along the screen edges listing auto-hidden anchorables.
fn render_strips(frame: &mut UiFrame<'_>, state: &PreviewState) {
    let screen = state.screen();
    let dock = state.dock_area();
    let style = Style::default().add_modifier(Modifier::REVERSED);
    for side in [
        AnchorSide::Left,
        AnchorSide::Top,
        AnchorSide::Right,
        AnchorSide::Bottom,
    ] {
        if !state.has_strip(side) {
            continue;
        }
        let titles: Vec<String> = state
            .layout()
            .anchor_groups(side)
            .iter()
            .flat_map(|group| state.layout().children(*group).iter())
            .filter_map(|id| state.layout().content(*id))
            .map(|content| content.title().to_string())
            .collect();
        let strip = match side {
            AnchorSide::Left => DockRect::new(screen.x, dock.y, 1.0, dock.height),
            AnchorSide::Right => DockRect::new(screen.right() - 1.0, dock.y, 1.0, dock.height),
            AnchorSide::Top => DockRect::new(dock.x, screen.y, dock.width, 1.0),
            AnchorSide::Bottom => DockRect::new(dock.x, dock.bottom(), dock.width, 1.0),
        }
        .to_cells();
        let bounds = strip.intersection(frame.area());
        let buffer = frame.buffer_mut();
        match side.orientation() {
            crate::model::Orientation::Vertical => {
                safe_set_string(buffer, bounds, strip.x, strip.y, &titles.join(" | "), style);
            }
            crate::model::Orientation::Horizontal => {
                let text = titles.join(" ");
                for (offset, ch) in text.chars().enumerate() {
                    let y = strip.y.saturating_add(offset as u16);
                    safe_set_string(buffer, bounds, strip.x, y, &ch.to_string(), style);
                }
            }
        }
    }
}

fn render_log(frame: &mut UiFrame<'_>, state: &PreviewState) {
    let height = state.log_height();
    if height <= 0.0 {
        return;
    }
    let screen = state.screen();
    let rect = DockRect::new(screen.x, screen.bottom() - 1.0 - height, screen.width, height);
    let lines = global_log()
        .map(|log| log.tail(height.max(2.0) as usize - 2))
        .unwrap_or_default();
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let area = rect.to_cells();
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(Block::bordered().title(" log ")),
        area,
    );
}

fn render_status(frame: &mut UiFrame<'_>, state: &PreviewState) {
    let screen = state.screen().to_cells();
    if screen.height == 0 {
        return;
    }
    let y = screen.bottom() - 1;
    let bounds = Rect::new(screen.x, y, screen.width, 1).intersection(frame.area());
    let width = bounds.width as usize;
    let buffer = frame.buffer_mut();

    let left = truncate_to_width(state.status(), width);
    let left_width = left.chars().count();
    safe_set_string(buffer, bounds, screen.x, y, &left, Style::default());

    let hints = state.bindings().hints(&HINT_ACTIONS);
    let room = width.saturating_sub(left_width + 1);
    let hints = truncate_to_width(&hints, room);
    let hints_width = hints.chars().count();
    if hints_width > 0 {
        let x = screen.x + (width - hints_width) as u16;
        safe_set_string(
            buffer,
            bounds,
            x,
            y,
            &hints,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
