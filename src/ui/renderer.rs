//! Single-panel render: header, palette list, input bar, status.

use ratatui::{
    style::Style,
    text::Span,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::layout;
use crate::ui::theme::{colors, SPINNER};
use crate::ui::widgets::{render_header, render_input, render_palette, render_status};

pub fn render(f: &mut Frame, app: &App, tick: usize) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(colors::BG)), area);
    let regions = layout::compute(area);
    let spinner_char = SPINNER[tick % SPINNER.len()];
    let palette = &app.state;

    render_header(f, regions.header, app.org());
    if palette.visible {
        render_palette(f, palette, regions.palette);
    } else {
        let hint = Span::styled(
            "Press / or Ctrl+K to open the palette",
            Style::default().fg(colors::MUTED),
        );
        f.render_widget(Paragraph::new(hint), regions.palette);
    }
    render_input(f, &palette.input, palette.cursor, palette.visible, regions.input);
    render_status(f, regions.status, palette, spinner_char);
}
