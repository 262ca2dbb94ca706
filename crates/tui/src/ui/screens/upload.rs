use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    app::{Cursor, Field, UploadFocus},
    ui::theme::Theme,
    view::{Node, Section},
};

use super::{error_line, field_line, select_line};

pub fn render(frame: &mut Frame<'_>, area: Rect, section: &Section, cursor: &Cursor, theme: &Theme) {
    let mut lines = Vec::new();

    for node in &section.nodes {
        match node {
            Node::Field(field) => {
                let focused = cursor.upload_field() == Some(field.field);
                lines.push(field_line(field, focused, theme));
                if let Some(error) = &field.error {
                    lines.push(error_line(error, theme));
                }
                let help = match field.field {
                    Field::UploadFile => Some("            several files: separate paths with ;"),
                    Field::UploadTags => Some("            comma separated"),
                    _ => None,
                };
                if let Some(help) = help {
                    lines.push(Line::from(Span::styled(help, Style::default().fg(theme.dim))));
                }
            }
            Node::Select(select) => {
                lines.push(select_line(
                    select,
                    cursor.upload == UploadFocus::Category,
                    theme,
                ));
            }
            _ => {}
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: upload • Tab: next • Esc: back",
        Style::default().fg(theme.dim),
    )));

    let block = Block::default()
        .title("Upload icon")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
