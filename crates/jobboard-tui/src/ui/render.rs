use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use jobboard_core::auth::Route;

use crate::app::{App, AppState};

use super::styles;
use super::views::{self, applications, auth, job_form, jobs, profile};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::Applying => render_apply_overlay(frame, app),
        AppState::Confirming(ref action) => render_confirm_overlay(frame, action.prompt()),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("  JobSeeker", styles::title_style())];
    let mut used = 11;

    if app.session.is_authenticated() {
        let links = [
            ("[1] Jobs", matches!(app.route, Route::Jobs | Route::JobDetail(_))),
            ("[2] My Applications", app.route == Route::MyApplications),
            ("[3] My Profile", app.route == Route::Profile),
            ("[L]ogout", false),
        ];
        spans.push(Span::raw("   "));
        used += 3;
        for (i, (label, selected)) in links.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
                used += 3;
            }
            spans.push(Span::styled(*label, styles::nav_style(*selected)));
            used += label.len();
        }
    }

    let help_hint = "[?] Help";
    let padding = (area.width as usize).saturating_sub(used + help_hint.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(help_hint, styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Login => auth::render_login(frame, app, area),
        Route::Signup => auth::render_signup(frame, app, area),
        Route::Jobs => jobs::render_list(frame, app, area),
        Route::JobDetail(_) => jobs::render_detail(frame, app, area),
        Route::NewJob | Route::EditJob(_) => job_form::render(frame, app, area),
        Route::MyApplications => applications::render(frame, app, area),
        Route::Profile => profile::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.route {
        Route::Login | Route::Signup => "[Tab] next | [Enter] submit",
        Route::Jobs => "[/] search | [n]ew | [r]efresh | [q]uit",
        Route::JobDetail(_) => "[a]pply | [e]dit | [D]elete | [Esc] back",
        Route::NewJob | Route::EditJob(_) | Route::Profile => "[Tab] next | [Esc] cancel",
        Route::MyApplications => "[Enter] view | [w]ithdraw | [r]efresh",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.route.title()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  JobSeeker", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1/2/3", "Jobs / My Applications / My Profile"),
        help_line("↑/↓", "Navigate list"),
        help_line("Enter", "Open / submit"),
        help_line("Tab", "Next field or button"),
        help_line("Esc", "Go back / cancel"),
        help_line("L", "Logout"),
        Line::from(""),
        Line::from(Span::styled(" Jobs", styles::highlight_style())),
        help_line("/", "Filter by title, location, description"),
        help_line("n", "Post a new job"),
        help_line("a", "Apply to the open job"),
        help_line("e / D", "Edit / delete the open job"),
        help_line("r", "Refresh"),
        Line::from(""),
        Line::from(Span::styled(" Applications", styles::highlight_style())),
        help_line("w", "Withdraw the selected application"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_apply_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(" Cover letter is optional.", styles::muted_style())),
        Line::from(""),
    ];
    lines.extend(views::form_field_lines(&app.apply_form, 12, " "));
    lines.push(Line::from(""));
    lines.push(views::form_button_line(
        &app.apply_form,
        &views::button_labels(&app.apply_form),
        "   ",
    ));

    let block = Block::default()
        .title(" Apply ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, prompt: &str) {
    let area = centered_rect_fixed(58, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", prompt), styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to confirm, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
