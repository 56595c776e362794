//! Login and signup screens.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Notice, LOGIN_SUBMIT};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_labels, form_button_line, form_field_lines};

const LOGO: [&str; 3] = [
    "     ╦╔═╗╔╗ ╔═╗╔═╗╔═╗╦╔═╔═╗╦═╗",
    "     ║║ ║╠╩╗╚═╗║╣ ║╣ ╠╩╗║╣ ╠╦╝",
    "    ╚╝╚═╝╚═╝╚═╝╚═╝╚═╝╩ ╩╚═╝╩╚═",
];

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect()
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let error = app.session.error();
    let height = if error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(52, height, area);
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.extend(form_field_lines(&app.login_form, 8, " "));
    lines.push(Line::from(""));

    let mut labels = button_labels(&app.login_form);
    if app.session.is_loading() {
        labels[LOGIN_SUBMIT] = "Logging in...".to_string();
    }
    lines.push(form_button_line(&app.login_form, &labels, "   "));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Don't have an account? Choose Sign Up.",
        styles::muted_style(),
    )));

    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_signup(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.signup_notice.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(60, height, area);
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.extend(form_field_lines(&app.signup_form, 16, " "));
    lines.push(Line::from(""));
    lines.push(form_button_line(&app.signup_form, &button_labels(&app.signup_form), "   "));

    match app.signup_notice {
        Some(Notice::Error(ref message)) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!(" {}", message), styles::error_style())));
        }
        Some(Notice::Success(ref message)) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!(" {}", message), styles::success_style())));
        }
        None => {}
    }

    let block = Block::default()
        .title(" Sign Up ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
