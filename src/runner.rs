use std::io;
use std::time::Duration;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::state::PreviewState;
use crate::ui;

/// Drive the preview until the user quits: every tick runs a pending layout
/// pass and redraws, every event goes through the state's key and mouse
/// handling.
pub fn run_preview<D, O>(
    state: &mut PreviewState,
    input: &mut D,
    output: &mut O,
    poll_interval: Duration,
) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    let mut needs_draw = true;

    event_loop.run(|_, event| {
        match event {
            Some(event) => {
                let flow = state.handle_event(&event);
                needs_draw = true;
                Ok(flow)
            }
            None => {
                if state.relayout() {
                    needs_draw = true;
                }
                if needs_draw {
                    output.draw(|mut frame| ui::render(&mut frame, state))?;
                    needs_draw = false;
                }
                Ok(ControlFlow::Continue)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::scripted::ScriptedInputDriver;
    use crate::model::ContentStatus;
    use crate::scenario::{Scenario, terminal_options};
    use crate::ui::UiFrame;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    struct BufferOutput {
        buffer: Buffer,
        draws: usize,
    }

    impl OutputDriver for BufferOutput {
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
            self.draws += 1;
            Ok(())
        }
    }

    fn session(keys: &str) -> (PreviewState, BufferOutput) {
        let layout = Scenario::Ide.build(terminal_options(1.0, 3.0)).unwrap();
        let mut state = PreviewState::new(layout);
        state.resize(100, 30);
        let mut input = ScriptedInputDriver::keys(keys);
        let mut output = BufferOutput {
            buffer: Buffer::empty(Rect::new(0, 0, 100, 30)),
            draws: 0,
        };
        run_preview(&mut state, &mut input, &mut output, Duration::ZERO).unwrap();
        (state, output)
    }

    #[test]
    fn draws_once_before_handling_keys() {
        let (state, output) = session("fq");
        assert_eq!(output.draws, 1);
        let main = state
            .layout()
            .documents()
            .into_iter()
            .find(|id| state.layout().content(*id).unwrap().title() == "main.rs")
            .unwrap();
        assert_eq!(state.layout().status(main), ContentStatus::Floating);
    }

    #[test]
    fn new_document_then_quit_on_empty_layout() {
        let layout = Scenario::Empty.build(terminal_options(1.0, 3.0)).unwrap();
        let mut state = PreviewState::new(layout);
        state.resize(40, 10);
        let mut input = ScriptedInputDriver::keys("nq");
        let mut output = BufferOutput {
            buffer: Buffer::empty(Rect::new(0, 0, 40, 10)),
            draws: 0,
        };
        run_preview(&mut state, &mut input, &mut output, Duration::ZERO).unwrap();
        assert_eq!(input.remaining(), 0);
        assert_eq!(state.layout().documents().len(), 1);
        assert_eq!(state.status(), "New document: document \"untitled-1\" [selected] [active]");
    }
}
