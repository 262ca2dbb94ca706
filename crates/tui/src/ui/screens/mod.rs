pub mod categories;
pub mod icons;
pub mod login;
pub mod upload;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::{
    ui::theme::Theme,
    view::{FieldNode, Placeholder, PlaceholderKind, SelectNode},
};

/// `Label: value` with a caret on the focused field.
pub(crate) fn field_line(field: &FieldNode, focused: bool, theme: &Theme) -> Line<'static> {
    let caret = if focused { "│" } else { "" };
    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(
            format!("{:<12}", field.label),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("{}{caret}", field.value), value_style),
    ])
}

fn select_line(select: &SelectNode, focused: bool, theme: &Theme) -> Line<'static> {
    let current = select
        .options
        .get(select.selected_index())
        .map(|option| option.label.clone())
        .unwrap_or_default();
    let mut value_style = Style::default().fg(if focused { theme.accent } else { theme.text });
    if focused {
        value_style = value_style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(
            format!("{:<12}", select.label),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("‹ {current} ›"), value_style),
    ])
}

fn placeholder_line(placeholder: &Placeholder, theme: &Theme) -> Line<'static> {
    let color = match placeholder.kind {
        PlaceholderKind::Error => theme.error,
        PlaceholderKind::Loading | PlaceholderKind::Empty => theme.dim,
        PlaceholderKind::LoginPrompt => theme.accent,
    };
    Line::from(Span::styled(placeholder.text.clone(), Style::default().fg(color)))
}

fn error_line(message: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(theme.error),
    ))
}
