//! Theme: dark palette with status colors for builds.

use ratatui::style::Color;

use crate::builds::BuildStatus;

pub mod colors {
    use super::*;
    /// Main canvas.
    pub const BG: Color = Color::Rgb(0x18, 0x1c, 0x22);
    /// Input bar, status, palette.
    pub const ELEVATED: Color = Color::Rgb(0x16, 0x1a, 0x1f);
    pub const BORDER: Color = Color::Rgb(0x2d, 0x34, 0x3e);
    /// Prompt, selection bar.
    pub const ACCENT: Color = Color::Rgb(0x6b, 0xbc, 0xff);
    /// Section headers.
    pub const ACCENT_SOFT: Color = Color::Rgb(0x99, 0xd4, 0xff);
    /// Selected row background.
    pub const ACCENT_GLOW: Color = Color::Rgb(0x1e, 0x2d, 0x3d);
    pub const TEXT: Color = Color::Rgb(0xf2, 0xf4, 0xf8);
    pub const TEXT_DIM: Color = Color::Rgb(0xbc, 0xc5, 0xd0);
    pub const MUTED: Color = Color::Rgb(0x94, 0x9e, 0xad);
    pub const STAR: Color = Color::Rgb(0xf5, 0xc2, 0x42);
    pub const PASSED: Color = Color::Rgb(0x5f, 0xd0, 0x8a);
    pub const ERROR: Color = Color::Rgb(0xf0, 0x6c, 0x6c);
    pub const RUNNING: Color = Color::Rgb(0xf0, 0xb4, 0x4c);
}

pub fn status_color(status: BuildStatus) -> Color {
    match status {
        BuildStatus::Passed => colors::PASSED,
        BuildStatus::Failed => colors::ERROR,
        BuildStatus::Running | BuildStatus::Scheduled => colors::RUNNING,
        BuildStatus::Canceled | BuildStatus::Unknown => colors::MUTED,
    }
}

pub const HEADER_HEIGHT: u16 = 1;
/// Border line plus the prompt line.
pub const INPUT_HEIGHT: u16 = 2;
pub const STATUS_HEIGHT: u16 = 1;
pub const MIN_PALETTE_LINES: u16 = 3;
/// Inner horizontal margin (chars each side).
pub const MARGIN_X: u16 = 1;
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
