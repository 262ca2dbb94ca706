use ratatui::{
    Frame,
    layout::{Alignment, Margin, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::Cursor,
    ui::{components::centered_box, theme::Theme},
    view::{Node, Section},
};

use super::field_line;

pub fn render(frame: &mut Frame<'_>, area: Rect, section: &Section, cursor: &Cursor, theme: &Theme) {
    let card_area = centered_box(44, 6, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" login ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let lines = section
        .nodes
        .iter()
        .filter_map(|node| match node {
            Node::Field(field) => Some(field_line(
                field,
                cursor.login_field() == field.field,
                theme,
            )),
            _ => None,
        })
        .collect::<Vec<_>>();
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);
    frame.render_widget(Paragraph::new(lines), inner.inner(Margin::new(1, 1)));

    // Error message below the box
    let error = section.nodes.iter().find_map(|node| match node {
        Node::InlineError(message) => Some(message.as_str()),
        _ => None,
    });
    if let Some(message) = error {
        let error_area = Rect {
            x: card_area.x,
            y: (card_area.y + card_area.height + 1).min(area.bottom().saturating_sub(1)),
            width: card_area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.error)))
                .alignment(Alignment::Center),
            error_area,
        );
    }
}
