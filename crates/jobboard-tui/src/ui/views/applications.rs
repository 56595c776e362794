use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use jobboard_core::utils::{format_date, truncate_string};

use crate::app::{App, Loadable};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = |title: String| {
        Block::default()
            .title(title)
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true))
    };

    let applications = match app.applications {
        Loadable::NotLoaded | Loadable::Loading => {
            let text = Span::styled("Loading applications...", styles::muted_style());
            frame.render_widget(Paragraph::new(text).block(block(" My Applications ".into())), area);
            return;
        }
        Loadable::Failed(ref message) => {
            let text = Span::styled(message.clone(), styles::error_style());
            frame.render_widget(Paragraph::new(text).block(block(" My Applications ".into())), area);
            return;
        }
        Loadable::Loaded(ref apps) => apps,
    };

    if applications.is_empty() {
        let text = Span::styled("You haven't applied to any jobs yet.", styles::muted_style());
        frame.render_widget(Paragraph::new(text).block(block(" My Applications ".into())), area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let title_width = width.saturating_sub(56).max(10);

    let items: Vec<ListItem> = applications
        .iter()
        .enumerate()
        .map(|(i, application)| {
            let job = &application.job;
            let line = Line::from(vec![
                Span::raw(format!(
                    "{:<tw$} {:<20} {:>10} {:<13} ",
                    truncate_string(&job.title, title_width),
                    truncate_string(&job.location, 20),
                    job.salary_display(),
                    format_date(application.applied_at.as_ref()),
                    tw = title_width
                )),
                Span::styled(application.status.to_string(), styles::status_style(&application.status)),
            ]);
            let style = if i == app.application_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" My Applications ({}) ", applications.len());
    let list = List::new(items).block(block(title));
    let mut state = ListState::default();
    state.select(Some(app.application_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
