use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::NoticeLevel,
    ui::{components::centered_box, theme::Theme},
    view::Dialog,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, dialog: &Dialog, theme: &Theme) {
    let (title, message, color, footer) = match dialog {
        Dialog::Confirm { prompt } => (" confirm ", prompt.as_str(), theme.accent, "y yes  •  n no"),
        Dialog::Notice(notice) => match notice.level {
            NoticeLevel::Info => (" info ", notice.message.as_str(), theme.positive, "Enter ok"),
            NoticeLevel::Error => (" error ", notice.message.as_str(), theme.error, "Enter ok"),
        },
    };

    let width = (message.chars().count() as u16 + 6).clamp(30, 70);
    let rect = centered_box(width, 7, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(footer, Style::default().fg(theme.dim))),
    ];
    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(content, rect);
}
