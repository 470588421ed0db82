//! Input bar: prompt, query text and cursor.

use ratatui::{
    layout::Position,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::theme::colors;

const PROMPT: &str = " ▸ ";
const PLACEHOLDER: &str = "Search commands and pipelines, or /alias";

pub fn render(
    f: &mut Frame,
    buffer: &str,
    cursor_pos: usize,
    focused: bool,
    area: ratatui::prelude::Rect,
) {
    let text = if buffer.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(colors::MUTED))
    } else {
        Span::styled(buffer, Style::default().fg(colors::TEXT))
    };
    let line = ratatui::text::Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)),
        text,
    ]);
    let block = Block::default()
        .style(Style::default().bg(colors::ELEVATED))
        .borders(ratatui::widgets::Borders::TOP)
        .border_style(Style::default().fg(colors::BORDER))
        .border_type(ratatui::widgets::BorderType::Plain);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(line), inner);

    if focused {
        let prompt_width = PROMPT.chars().count() as u16;
        let typed = buffer.get(..cursor_pos).map(|s| s.chars().count()).unwrap_or(0) as u16;
        let x = (inner.x + prompt_width + typed).min(inner.x + inner.width.saturating_sub(1));
        f.set_cursor_position(Position { x, y: inner.y });
    }
}
