//! Single-column layout: header, palette list, input bar, status line.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{HEADER_HEIGHT, INPUT_HEIGHT, MARGIN_X, MIN_PALETTE_LINES, STATUS_HEIGHT};

#[derive(Clone, Debug)]
pub struct LayoutRegions {
    pub header: Rect,
    pub palette: Rect,
    pub input: Rect,
    pub status: Rect,
}

pub fn compute(area: Rect) -> LayoutRegions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(MIN_PALETTE_LINES),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);
    let palette = Rect {
        x: area.x + MARGIN_X,
        y: chunks[1].y,
        width: area.width.saturating_sub(2 * MARGIN_X),
        height: chunks[1].height,
    };
    LayoutRegions {
        header: chunks[0],
        palette,
        input: chunks[2],
        status: chunks[3],
    }
}

/// Rows available to palette items for a terminal of `height` lines, inside the palette border.
pub fn palette_rows(height: u16) -> usize {
    let fixed = HEADER_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT + 2;
    usize::from(height.saturating_sub(fixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_takes_the_remaining_height() {
        let regions = compute(Rect::new(0, 0, 80, 24));
        assert_eq!(regions.palette.height, 24 - HEADER_HEIGHT - INPUT_HEIGHT - STATUS_HEIGHT);
        assert_eq!(regions.palette.width, 78);
        assert_eq!(palette_rows(24), usize::from(regions.palette.height - 2));
        assert_eq!(palette_rows(2), 0);
    }
}
