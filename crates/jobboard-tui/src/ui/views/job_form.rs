use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use jobboard_core::auth::Route;

use crate::app::App;
use crate::ui::styles;

use super::{button_labels, form_button_line, form_field_lines};

/// Create and edit share one form; only the title differs.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.route {
        Route::EditJob(_) => " Edit Job ",
        _ => " Create Job ",
    };

    let mut lines = vec![Line::from("")];
    lines.extend(form_field_lines(&app.job_form, 11, " "));
    lines.push(Line::from(""));
    lines.push(form_button_line(&app.job_form, &button_labels(&app.job_form), "  "));

    if let Some(ref error) = app.job_form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " [Tab] next field  [Enter] save  [Esc] cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
