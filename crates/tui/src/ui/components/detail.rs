use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    ui::{components::centered_rect, theme::Theme},
    view::IconDetail,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, detail: &IconDetail, server: &str, theme: &Theme) {
    let rect = centered_rect(60, 50, area);
    frame.render_widget(Clear, rect);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_muted));
    let tags = if detail.tags.is_empty() {
        "-".to_string()
    } else {
        detail.tags.join(", ")
    };

    let mut lines = vec![
        Line::from(vec![label("Id        "), Span::raw(detail.id.clone())]),
        Line::from(vec![label("Category  "), Span::raw(detail.category.clone())]),
        Line::from(vec![label("Tags      "), Span::raw(tags)]),
        Line::from(vec![
            label("File      "),
            Span::styled(
                format!("{}{}", server.trim_end_matches('/'), detail.preview),
                Style::default().fg(theme.accent),
            ),
        ]),
        Line::from(""),
    ];
    match &detail.description {
        Some(description) => lines.push(Line::from(description.clone())),
        None => lines.push(Line::from(Span::styled(
            "No description.",
            Style::default().fg(theme.dim),
        ))),
    }

    let block = Block::default()
        .title(format!(" {} ", detail.filename))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        rect,
    );
}
