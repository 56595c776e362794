use ratatui::style::{Color, Modifier, Style};

use jobboard_core::models::ApplicationStatus;

// JobSeeker palette: teal brand, amber keys, soft green/red outcomes.
const BRAND: Color = Color::Rgb(38, 166, 154);
const KEY_AMBER: Color = Color::Rgb(230, 170, 60);
const OUTCOME_GOOD: Color = Color::Rgb(110, 190, 110);
const OUTCOME_BAD: Color = Color::Rgb(215, 85, 85);
const DIM: Color = Color::Rgb(120, 126, 134);
const TEXT: Color = Color::Rgb(225, 228, 232);
const SELECTION_BG: Color = Color::Rgb(30, 60, 64);
const BAR_BG: Color = Color::Rgb(22, 28, 34);

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    bold(BRAND)
}

pub fn selected_style() -> Style {
    fg(TEXT).bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    fg(TEXT)
}

pub fn muted_style() -> Style {
    fg(DIM)
}

/// Section headings and field labels.
pub fn highlight_style() -> Style {
    fg(KEY_AMBER)
}

pub fn success_style() -> Style {
    fg(OUTCOME_GOOD)
}

pub fn error_style() -> Style {
    fg(OUTCOME_BAD)
}

/// A navigation link in the title bar; the current view is underlined.
pub fn nav_style(current: bool) -> Style {
    if current {
        bold(BRAND).add_modifier(Modifier::UNDERLINED)
    } else {
        fg(TEXT)
    }
}

pub fn border_style(focused: bool) -> Style {
    fg(if focused { BRAND } else { DIM })
}

pub fn search_style() -> Style {
    bold(KEY_AMBER)
}

pub fn status_bar_style() -> Style {
    fg(TEXT).bg(BAR_BG)
}

pub fn help_key_style() -> Style {
    bold(KEY_AMBER)
}

pub fn help_desc_style() -> Style {
    fg(TEXT)
}

/// Color for an application status badge.
pub fn status_style(status: &ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Accepted => bold(OUTCOME_GOOD),
        ApplicationStatus::Rejected => fg(OUTCOME_BAD),
        ApplicationStatus::Viewed => fg(KEY_AMBER),
        ApplicationStatus::Applied | ApplicationStatus::Unknown => fg(TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_follows_focus() {
        assert_eq!(border_style(true).fg, Some(BRAND));
        assert_eq!(border_style(false).fg, Some(DIM));
    }

    #[test]
    fn test_status_colors_distinguish_outcomes() {
        assert_ne!(
            status_style(&ApplicationStatus::Accepted).fg,
            status_style(&ApplicationStatus::Rejected).fg
        );
        assert_eq!(status_style(&ApplicationStatus::Unknown), list_item_style());
    }
}
