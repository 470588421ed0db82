//! Header banner: title, version, organization.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::colors;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, area: ratatui::prelude::Rect, org: Option<&str>) {
    let line = Line::from(vec![
        Span::styled(
            " bk-palette ",
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{VERSION}  "), Style::default().fg(colors::MUTED)),
        Span::styled(org.unwrap_or("no organization"), Style::default().fg(colors::TEXT_DIM)),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().bg(colors::BG)), area);
}
