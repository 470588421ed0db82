//! UI layer: layout, theme, renderer, widgets.

mod layout;
mod renderer;
mod theme;

pub mod widgets;

pub use layout::palette_rows;
pub use renderer::render;
