//! Per-route content rendering.

pub mod applications;
pub mod auth;
pub mod job_form;
pub mod jobs;
pub mod profile;

use ratatui::text::{Line, Span};

use crate::form::Form;
use crate::ui::styles;

/// Width of the bracketed input box for form fields.
const FIELD_WIDTH: usize = 32;

/// Lines for every field of `form`, one per field, with a cursor on the
/// focused one. Long values show their tail.
pub fn form_field_lines(form: &Form, label_width: usize, indent: &str) -> Vec<Line<'static>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = form.focused_field() == Some(i);
            let style = if focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let value = field.display_value();
            let count = value.chars().count();
            let visible: String = value.chars().skip(count.saturating_sub(FIELD_WIDTH - 1)).collect();
            let cursor = if focused { "▌" } else { "" };
            Line::from(vec![
                Span::raw(indent.to_string()),
                Span::styled(format!("{:>width$}: [", field.label, width = label_width), styles::muted_style()),
                Span::styled(format!("{:<w$}", format!("{}{}", visible, cursor), w = FIELD_WIDTH), style),
                Span::styled("]", styles::muted_style()),
            ])
        })
        .collect()
}

/// A row of buttons, the focused one marked with arrows.
pub fn form_button_line(form: &Form, labels: &[String], indent: &str) -> Line<'static> {
    let mut spans = vec![Span::raw(indent.to_string())];
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        if form.focused_button() == Some(i) {
            spans.push(Span::raw("["));
            spans.push(Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()));
            spans.push(Span::raw("]"));
        } else {
            spans.push(Span::raw("["));
            spans.push(Span::styled(format!("   {}   ", label), styles::list_item_style()));
            spans.push(Span::raw("]"));
        }
    }
    Line::from(spans)
}

/// Button labels as configured on the form.
pub fn button_labels(form: &Form) -> Vec<String> {
    form.buttons.iter().map(|b| b.to_string()).collect()
}
