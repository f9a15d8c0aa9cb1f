use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::terminal;
use tracing::Level;

use term_dock::drivers::OutputDriver;
use term_dock::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_dock::layout::{DockRect, arrange};
use term_dock::runner::run_preview;
use term_dock::scenario::{Scenario, terminal_options};
use term_dock::state::PreviewState;
use term_dock::tracing_sub::{self, LogHandle};

const DUMP_WIDTH: f64 = 120.0;
const DUMP_HEIGHT: f64 = 40.0;

#[derive(Parser, Debug)]
#[command(
    name = "term-dock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Preview dockable pane layouts in the terminal"
)]
struct Cli {
    /// Print the layout tree and exit instead of opening the preview.
    #[arg(long)]
    dump: bool,

    /// Splitter thickness between docked panes.
    #[arg(long, value_name = "CELLS", default_value_t = 1.0)]
    splitter: f64,

    /// Smallest width or height a docked pane may be squeezed to.
    #[arg(long = "min-size", value_name = "CELLS", default_value_t = 3.0)]
    min_size: f64,

    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    /// Sample layout to load.
    #[arg(long, value_enum, default_value_t = Scenario::Ide)]
    scenario: Scenario,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if cli.splitter < 0.0 || cli.min_size < 0.0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "splitter and min-size must not be negative",
        ));
    }
    let options = terminal_options(cli.splitter, cli.min_size);

    if cli.dump {
        tracing_sub::init_with_level(cli.log_level);
        let mut layout = cli.scenario.build(options).map_err(io::Error::other)?;
        arrange(&mut layout, DockRect::new(0.0, 0.0, DUMP_WIDTH, DUMP_HEIGHT));
        print!("{}", layout.dump());
        return Ok(());
    }

    tracing_sub::set_global_log(LogHandle::default());
    tracing_sub::init_with_level(cli.log_level);
    let layout = cli.scenario.build(options).map_err(io::Error::other)?;
    let mut state = PreviewState::new(layout);
    let (width, height) = terminal::size()?;
    state.resize(width, height);
    tracing::info!(scenario = ?cli.scenario, width, height, "preview started");

    let mut input = ConsoleInputDriver::new();
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run_preview(&mut state, &mut input, &mut output, Duration::from_millis(16));
    output.exit()?;
    result
}
