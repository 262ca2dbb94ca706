use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{Control, Cursor},
    ui::theme::Theme,
    view::{IconCard, Node, Section},
};

use super::{placeholder_line, select_line};

pub fn render(frame: &mut Frame<'_>, area: Rect, section: &Section, cursor: &Cursor, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filter = section.nodes.iter().find_map(|node| match node {
        Node::Select(select) if select.control == Control::CategoryFilter => Some(select),
        _ => None,
    });
    let header = filter
        .map(|select| select_line(select, false, theme))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Icons");
    frame.render_widget(Paragraph::new(header).block(block), layout[0]);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let placeholder = section.nodes.iter().find_map(|node| match node {
        Node::Placeholder(placeholder) => Some(placeholder),
        _ => None,
    });
    if let Some(placeholder) = placeholder {
        let content = Paragraph::new(placeholder_line(placeholder, theme))
            .alignment(Alignment::Center)
            .block(list_block);
        frame.render_widget(content, layout[1]);
        return;
    }

    let items = section
        .nodes
        .iter()
        .filter_map(|node| match node {
            Node::Icon(card) => Some(card_item(card, theme)),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(cursor.icon));

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, layout[1], &mut list_state);
}

fn card_item(card: &IconCard, theme: &Theme) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(card.filename.clone(), Style::default().fg(theme.text)),
        Span::raw("  "),
        Span::styled(card.category.clone(), Style::default().fg(theme.text_muted)),
    ];
    if !card.tags.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            card.tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
            Style::default().fg(theme.dim),
        ));
    }
    ListItem::new(Line::from(spans))
}
