//! Job listings and job details.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use jobboard_core::models::Job;
use jobboard_core::utils::{format_date, truncate_string};

use crate::app::{App, AppState, Loadable};
use crate::ui::styles;

pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search(frame, app, chunks[0]);

    let block = |title: String| {
        Block::default()
            .title(title)
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(app.state != AppState::Searching))
    };

    let message = match app.jobs {
        Loadable::NotLoaded | Loadable::Loading => Some("Loading jobs...".to_string()),
        Loadable::Failed(ref message) => Some(message.clone()),
        Loadable::Loaded(ref jobs) if jobs.is_empty() => Some("No jobs posted yet.".to_string()),
        Loadable::Loaded(_) => None,
    };
    if let Some(message) = message {
        let style = if matches!(app.jobs, Loadable::Failed(_)) {
            styles::error_style()
        } else {
            styles::muted_style()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, style)).block(block(" Job Listings ".to_string())),
            chunks[1],
        );
        return;
    }

    let jobs = app.filtered_jobs();
    let width = chunks[1].width.saturating_sub(4) as usize;
    let title_width = width.saturating_sub(40).max(10);

    let items: Vec<ListItem> = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| {
            let marker = if app.has_applied(&job.id) { "✓" } else { " " };
            let line = Line::from(vec![
                Span::styled(format!("{} ", marker), styles::success_style()),
                Span::raw(format!(
                    "{:<tw$} {:<22} {:>12}",
                    truncate_string(&job.title, title_width),
                    truncate_string(&job.location, 22),
                    job.salary_display(),
                    tw = title_width
                )),
            ]);
            let style = if i == app.job_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block(format!(" Job Listings ({}) ", jobs.len())));
    let mut state = ListState::default();
    state.select(Some(app.job_selection));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.state == AppState::Searching;
    let text = if searching {
        Line::from(vec![
            Span::styled(" / ", styles::search_style()),
            Span::raw(format!("{}▌", app.search_query)),
        ])
    } else if app.search_query.is_empty() {
        Line::from(Span::styled(
            " [/] search  [Enter] details  [n]ew job  [r]efresh",
            styles::muted_style(),
        ))
    } else {
        Line::from(vec![
            Span::styled(" Filter: ", styles::muted_style()),
            Span::styled(app.search_query.clone(), styles::search_style()),
        ])
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Job Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let lines = match app.job_detail {
        Loadable::NotLoaded | Loadable::Loading => {
            vec![Line::from(Span::styled("Loading job details...", styles::muted_style()))]
        }
        Loadable::Failed(ref message) => {
            vec![Line::from(Span::styled(message.clone(), styles::error_style()))]
        }
        Loadable::Loaded(ref job) => detail_lines(app, job),
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn detail_lines(app: &App, job: &Job) -> Vec<Line<'static>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), styles::highlight_style()),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(job.title.clone(), styles::title_style())),
        Line::from(""),
        field("Location", job.location.clone()),
        field("Salary", job.salary_display()),
        field("Posted", format_date(job.created_at.as_ref())),
    ];
    if let Some(ref poster) = job.posted_by {
        lines.push(field("By", poster.clone()));
    }
    lines.push(Line::from(""));
    lines.extend(job.description.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));

    if app.has_applied(&job.id) {
        lines.push(Line::from(Span::styled(
            "You have applied to this job.",
            styles::success_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled("[a]pply", styles::help_key_style())));
    }
    lines.push(Line::from(Span::styled(
        "[e]dit  [D]elete  [Esc] back",
        styles::muted_style(),
    )));
    lines
}
