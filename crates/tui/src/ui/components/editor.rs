use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::Field,
    ui::{components::centered_box, screens::field_line, theme::Theme},
    view::IconEditor,
};

/// Tag and description editor drawn over the icon list.
pub fn render(frame: &mut Frame<'_>, area: Rect, editor: &IconEditor, focus: Field, theme: &Theme) {
    let rect = centered_box(64, 9, area);
    frame.render_widget(Clear, rect);

    let mut lines = vec![
        field_line(&editor.tags, focus == Field::IconTags, theme),
        Line::from(Span::styled(
            "            comma separated",
            Style::default().fg(theme.dim),
        )),
        field_line(&editor.description, focus == Field::IconDescription, theme),
    ];
    if let Some(error) = &editor.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: save • Tab: next • Esc: cancel",
        Style::default().fg(theme.dim),
    )));

    let block = Block::default()
        .title(format!(" Edit {} ", editor.filename))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        rect,
    );
}
