//! Status bar: last message or load progress, plus shortcuts.

use ratatui::{style::Style, text::Span, widgets::Paragraph, Frame};

use crate::state::PaletteState;
use crate::ui::theme::colors;

pub fn render(
    f: &mut Frame,
    area: ratatui::prelude::Rect,
    palette: &PaletteState,
    spinner_char: char,
) {
    let left = match (&palette.status, palette.loading.any()) {
        (Some(status), _) => format!(" {status}"),
        (None, true) => format!(" {spinner_char} Loading…"),
        (None, false) => " Ready".to_string(),
    };
    let right = if palette.visible {
        " ↑↓ move  Enter run  Alt+1-9 jump  Ctrl+F star  Esc close "
    } else {
        " / or Ctrl+K open  q quit "
    };
    let width = area.width as usize;
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());
    let line = format!("{left}{}{right}", " ".repeat(pad));
    let span = Span::styled(line, Style::default().fg(colors::MUTED).bg(colors::ELEVATED));
    f.render_widget(Paragraph::new(span), area);
}
