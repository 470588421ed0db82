//! Command palette: sectioned list with accent bar selection.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::builds::format_duration;
use crate::state::{PaletteItem, PaletteState};
use crate::ui::theme::{colors, status_color};

/// Digit shortcuts only reach the first nine items.
const SHORTCUT_SLOTS: usize = 9;

fn item_line(item: &PaletteItem, index: usize, selected: bool) -> Line<'_> {
    let bar = Span::styled(if selected { "▎ " } else { "  " }, Style::default().fg(colors::ACCENT));
    let shortcut = if index < SHORTCUT_SLOTS {
        format!("{} ", index + 1)
    } else {
        "  ".to_string()
    };
    let title_style = if selected {
        Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::TEXT_DIM)
    };
    let detail_style = Style::default().fg(if selected { colors::TEXT_DIM } else { colors::MUTED });
    let star =
        |on: bool| Span::styled(if on { "★ " } else { "  " }, Style::default().fg(colors::STAR));

    let mut spans = vec![bar, Span::styled(shortcut, Style::default().fg(colors::MUTED))];
    match item {
        PaletteItem::Command(c) => {
            spans.push(star(c.favorite));
            spans.push(Span::styled(c.name.as_str(), title_style));
            if let Some(alias) = &c.alias {
                let alias_style = Style::default().fg(colors::ACCENT_SOFT);
                spans.push(Span::styled(format!("  /{alias}"), alias_style));
            }
            if let Some(params) = &c.params {
                let params_style = Style::default().fg(colors::ACCENT);
                spans.push(Span::styled(format!("  {params}"), params_style));
            }
            if let Some(uses) = c.uses {
                spans.push(Span::styled(format!("  ×{uses}"), detail_style));
            }
            spans.push(Span::styled(format!("  {}", c.description), detail_style));
        }
        PaletteItem::Pipeline { pipeline, favorite } => {
            spans.push(star(*favorite));
            spans.push(Span::styled(pipeline.name.as_str(), title_style));
            spans.push(Span::styled(format!("  {}", pipeline.slug), detail_style));
            if let Some(description) = &pipeline.description {
                spans.push(Span::styled(format!("  {description}"), detail_style));
            }
        }
        PaletteItem::Build { build, .. } => {
            spans.push(Span::styled(format!("#{:<6}", build.number), title_style));
            let status_style = Style::default().fg(status_color(build.status));
            spans.push(Span::styled(format!("{:<10}", build.status), status_style));
            if let Some(secs) = build.duration_secs {
                spans.push(Span::styled(format!("{:<9}", format_duration(secs)), detail_style));
            }
            if let Some(branch) = &build.branch {
                spans.push(Span::styled(format!("{branch}  "), detail_style));
            }
            if let Some(message) = &build.message {
                spans.push(Span::styled(message.as_str(), detail_style));
            }
        }
    }
    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(colors::ACCENT_GLOW))
    } else {
        line
    }
}

pub fn render(f: &mut Frame, palette: &PaletteState, area: ratatui::prelude::Rect) {
    let title = if palette.loading.any() { "  Commands · loading  " } else { "  Commands  " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER))
        .style(Style::default().bg(colors::ELEVATED));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let total = palette.total_items();
    let selected = palette.nav.state().selection(total);

    let mut lines: Vec<Line> = Vec::new();
    let mut index = 0;
    for section in palette.sections.iter().filter(|s| !s.items.is_empty()) {
        lines.push(Line::from(Span::styled(
            section.kind.title(),
            Style::default().fg(colors::ACCENT_SOFT).add_modifier(Modifier::BOLD),
        )));
        for item in &section.items {
            lines.push(item_line(item, index, selected == Some(index)));
            index += 1;
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No matches", Style::default().fg(colors::MUTED))));
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(palette.scroll)
        .take(inner.height as usize)
        .collect();
    f.render_widget(Paragraph::new(visible), inner);
}
