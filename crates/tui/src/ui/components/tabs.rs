use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Control, ui::theme::Theme, view::NavItem};

/// Function key bound to a navigation entry.
fn shortcut(control: Control) -> &'static str {
    match control {
        Control::NavAll => "F1",
        Control::NavCategories => "F2",
        Control::NavUpload => "F3",
        _ => "F4",
    }
}

/// Renders the navigation entries present in the view tree.
pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, nav: &[NavItem], theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, item) in nav.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("{} ", shortcut(item.control)),
            Style::default().fg(theme.dim),
        ));
        if item.active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                item.label.clone(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(
                item.label.clone(),
                Style::default().fg(theme.text_muted),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
