//! Display surfaces and status output for the terminal.

pub mod event;
pub mod json;
pub mod status;
pub mod terminal;

pub use event::SurfaceEvent;
pub use json::JsonSurface;
pub use status::{
    print_error, print_info, print_rotation_header, print_rotation_summary, print_warning,
};
pub use terminal::TerminalSurface;
