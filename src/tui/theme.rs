use ratatui::style::{Color, Modifier, Style};

use crate::crud::Notice;
use crate::models::Priority;

// ── Color palette ──────────────────────────────────────────────────

pub const BG: Color = Color::Rgb(0x0a, 0x0a, 0x0f);
pub const NEON_CYAN: Color = Color::Rgb(0x00, 0xff, 0xf5);
pub const NEON_MAGENTA: Color = Color::Rgb(0xff, 0x00, 0xff);
pub const NEON_PINK: Color = Color::Rgb(0xff, 0x2d, 0x6f);
pub const NEON_GREEN: Color = Color::Rgb(0x39, 0xff, 0x14);
pub const NEON_ORANGE: Color = Color::Rgb(0xff, 0x6e, 0x27);
pub const TEXT_DIM: Color = Color::Rgb(0xb0, 0xb0, 0xb0);
pub const TEXT_BRIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const BORDER_DIM: Color = Color::Rgb(0x00, 0x5f, 0x5f);
pub const BORDER_BRIGHT: Color = Color::Rgb(0x00, 0xff, 0xf5);

// ── Style presets ──────────────────────────────────────────────────

pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BORDER_BRIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BORDER_DIM)
    }
}

pub fn priority_style(priority: &Priority) -> Style {
    match priority {
        Priority::Low => Style::default().fg(TEXT_DIM),
        Priority::Medium => Style::default().fg(NEON_CYAN),
        Priority::High => Style::default().fg(NEON_ORANGE).add_modifier(Modifier::BOLD),
    }
}

pub fn notice_style(notice: &Notice) -> Style {
    if notice.is_error {
        Style::default().fg(NEON_PINK).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(NEON_GREEN)
    }
}

pub fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub const REQUIRED_MARKER: &str = "*";
pub const CURSOR: &str = "▏";

// ── ASCII art header ───────────────────────────────────────────────

pub const HEADER_ART: &str = "\
▐██▌ PROJDESK ▐██▌";

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_style_returns_correct_fg() {
        assert_eq!(priority_style(&Priority::Low).fg, Some(TEXT_DIM));
        assert_eq!(priority_style(&Priority::Medium).fg, Some(NEON_CYAN));
        assert_eq!(priority_style(&Priority::High).fg, Some(NEON_ORANGE));
    }

    #[test]
    fn notice_style_follows_error_flag() {
        assert_eq!(notice_style(&Notice::error("x")).fg, Some(NEON_PINK));
        assert_eq!(notice_style(&Notice::success("x")).fg, Some(NEON_GREEN));
    }

    #[test]
    fn checkbox_symbols() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }

    #[test]
    fn panel_border_focus() {
        assert_eq!(panel_border(true).fg, Some(BORDER_BRIGHT));
        assert_eq!(panel_border(false).fg, Some(BORDER_DIM));
    }
}
