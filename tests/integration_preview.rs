use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use term_dock::drivers::OutputDriver;
use term_dock::drivers::scripted::ScriptedInputDriver;
use term_dock::layout::DockRect;
use term_dock::model::{AnchorSide, ContentStatus};
use term_dock::runner::run_preview;
use term_dock::scenario::{Scenario, terminal_options};
use term_dock::state::PreviewState;
use term_dock::ui::UiFrame;

struct OffscreenOutput {
    buffer: Buffer,
}

impl OffscreenOutput {
    fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
        }
    }

    fn row(&self, y: u16) -> String {
        (0..self.buffer.area.width)
            .map(|x| self.buffer[(x, y)].symbol())
            .collect()
    }
}

impl OutputDriver for OffscreenOutput {
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        let area = self.buffer.area;
        f(UiFrame::from_parts(area, &mut self.buffer));
        Ok(())
    }
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn ide_state() -> PreviewState {
    let layout = Scenario::Ide.build(terminal_options(1.0, 3.0)).unwrap();
    let mut state = PreviewState::new(layout);
    state.resize(120, 40);
    state
}

fn run(state: &mut PreviewState, events: Vec<Event>, output: &mut OffscreenOutput) {
    let mut input = ScriptedInputDriver::new(events);
    run_preview(state, &mut input, output, Duration::ZERO).unwrap();
    assert_eq!(input.remaining(), 0);
}

#[test]
fn dragging_the_explorer_splitter_widens_it() {
    let mut state = ide_state();
    let mut output = OffscreenOutput::new(120, 40);
    run(
        &mut state,
        vec![
            mouse(MouseEventKind::Down(MouseButton::Left), 28, 10),
            mouse(MouseEventKind::Drag(MouseButton::Left), 31, 10),
            mouse(MouseEventKind::Drag(MouseButton::Left), 33, 10),
            mouse(MouseEventKind::Up(MouseButton::Left), 33, 10),
            key('q'),
        ],
        &mut output,
    );
    assert!(!state.drag().is_dragging());

    assert!(state.relayout());
    let panel = state.layout().root_panel().unwrap();
    let explorer_pane = state.layout().children(panel)[0];
    let region = state.arrangement().regions.get(explorer_pane).unwrap();
    assert_eq!(region.width, 33.0);
    assert_eq!(state.arrangement().handle_at(33, 10).map(|h| h.index), Some(0));
}

#[test]
fn terminal_resize_rearranges_the_dock_area() {
    let mut state = ide_state();
    let mut output = OffscreenOutput::new(120, 40);
    run(&mut state, vec![Event::Resize(80, 24), key('q')], &mut output);

    state.relayout();
    let panel = state.layout().root_panel().unwrap();
    let region = state.arrangement().regions.get(panel).unwrap();
    assert_eq!((region.width, region.height), (80.0, 23.0));
}

#[test]
fn first_frame_shows_tabs_and_status_hints() {
    let mut state = ide_state();
    let mut output = OffscreenOutput::new(120, 40);
    run(&mut state, vec![key('q')], &mut output);

    assert!(output.row(0).contains("Explorer"));
    assert!(output.row(0).contains("main.rs | lib.rs | Cargo.toml"));
    assert!(output.row(39).contains("f float"));
}

#[test]
fn auto_hide_key_moves_active_tool_to_strip() {
    let mut state = ide_state();
    let mut output = OffscreenOutput::new(120, 40);
    let explorer = state
        .layout()
        .anchorables()
        .into_iter()
        .find(|id| state.layout().content(*id).unwrap().title() == "Explorer")
        .unwrap();
    run(
        &mut state,
        vec![mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), key('a'), key('q')],
        &mut output,
    );

    assert_eq!(state.layout().status(explorer), ContentStatus::AutoHidden);
    assert!(state.has_strip(AnchorSide::Left));
    assert_eq!(state.dock_area().x, 1.0);
}

#[test]
fn dragging_a_floating_title_row_moves_the_window() {
    let layout = Scenario::Floating.build(terminal_options(1.0, 3.0)).unwrap();
    let mut state = PreviewState::new(layout);
    state.resize(120, 40);
    let window = state.layout().floating_windows()[0];
    let mut output = OffscreenOutput::new(120, 40);
    run(
        &mut state,
        vec![
            mouse(MouseEventKind::Down(MouseButton::Left), 60, 5),
            mouse(MouseEventKind::Drag(MouseButton::Left), 64, 7),
            mouse(MouseEventKind::Drag(MouseButton::Left), 68, 9),
            mouse(MouseEventKind::Up(MouseButton::Left), 68, 9),
            key('q'),
        ],
        &mut output,
    );

    assert!(!state.window_drag().is_dragging());
    let active = state.layout().active_content().unwrap();
    assert_eq!(state.layout().content(active).unwrap().title(), "Properties");
    assert_eq!(
        state.layout().floating_bounds(window),
        Some(DockRect::new(58.0, 9.0, 36.0, 12.0))
    );
    assert!(state.relayout());
    assert_eq!(
        state.arrangement().regions.get(window),
        Some(DockRect::new(58.0, 9.0, 36.0, 12.0))
    );
}
