use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Loadable};
use crate::ui::styles;

use super::{button_labels, form_button_line, form_field_lines};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" My Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let profile = match app.profile {
        Loadable::NotLoaded | Loadable::Loading => {
            let text = Span::styled("Loading profile...", styles::muted_style());
            frame.render_widget(Paragraph::new(text).block(block), area);
            return;
        }
        Loadable::Failed(ref message) => {
            let text = Span::styled(message.clone(), styles::error_style());
            frame.render_widget(Paragraph::new(text).block(block), area);
            return;
        }
        Loadable::Loaded(ref profile) => profile,
    };

    let mut lines = vec![Line::from("")];
    lines.extend(form_field_lines(&app.profile_form, 8, " "));
    lines.push(Line::from(""));
    lines.push(form_button_line(&app.profile_form, &button_labels(&app.profile_form), "  "));
    lines.push(Line::from(""));

    if !profile.location.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(" Location: ", styles::highlight_style()),
            Span::raw(profile.location.clone()),
        ]));
    }
    if let Some(birth_date) = profile.birth_date {
        lines.push(Line::from(vec![
            Span::styled(" Born:     ", styles::highlight_style()),
            Span::raw(birth_date.format("%b %d, %Y").to_string()),
        ]));
    }
    let skills = profile.skill_list();
    if !skills.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(" Skills:   ", styles::highlight_style()),
            Span::raw(skills.join(" · ")),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
