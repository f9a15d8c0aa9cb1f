pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod model;
pub mod runner;
pub mod scenario;
pub mod state;
pub mod tracing_sub;
pub mod ui;
pub mod visual;
