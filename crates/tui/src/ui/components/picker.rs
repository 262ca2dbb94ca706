use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

use crate::{
    app::Picker,
    ui::{components::centered_box, theme::Theme},
};

/// Transfer target list for one icon.
pub fn render(frame: &mut Frame<'_>, area: Rect, picker: &Picker, theme: &Theme) {
    let height = (picker.options.len() as u16 + 2).min(14);
    let rect = centered_box(40, height, area);
    frame.render_widget(Clear, rect);

    let items = picker
        .options
        .iter()
        .map(|option| ListItem::new(Line::from(option.label.clone())))
        .collect::<Vec<_>>();

    let block = Block::default()
        .title(format!(" move {} ", picker.filename))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, rect, &mut list_state);
}
