//! TUI widgets: header, command palette, input, status.

mod header;
mod input;
mod palette;
mod status;

pub use header::render as render_header;
pub use input::render as render_input;
pub use palette::render as render_palette;
pub use status::render as render_status;
