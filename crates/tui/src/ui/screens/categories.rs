use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{CategoriesFocus, Cursor},
    ui::theme::Theme,
    view::{Node, PlaceholderKind, Section},
};

use super::{error_line, field_line, placeholder_line};

pub fn render(frame: &mut Frame<'_>, area: Rect, section: &Section, cursor: &Cursor, theme: &Theme) {
    let prompt = section.nodes.iter().find_map(|node| match node {
        Node::Placeholder(placeholder) if placeholder.kind == PlaceholderKind::LoginPrompt => {
            Some(placeholder)
        }
        _ => None,
    });
    if let Some(prompt) = prompt {
        let lines = vec![
            placeholder_line(prompt, theme),
            Line::from(Span::styled("Enter to log in", Style::default().fg(theme.dim))),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border))
            .title("Categories");
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let name_focused = cursor.categories == CategoriesFocus::Name;
    let mut form = Vec::new();
    for node in &section.nodes {
        if let Node::Field(field) = node {
            form.push(field_line(field, name_focused, theme));
            if let Some(error) = &field.error {
                form.push(error_line(error, theme));
            }
        }
    }
    let form_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if name_focused {
            theme.accent
        } else {
            theme.border
        }))
        .title("New category");
    frame.render_widget(Paragraph::new(form).block(form_block), layout[0]);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if name_focused {
            theme.border
        } else {
            theme.accent
        }))
        .title("Categories");

    let items = section
        .nodes
        .iter()
        .filter_map(|node| match node {
            Node::Category(row) => match &row.rename {
                Some(editor) => {
                    let mut lines = vec![field_line(editor, true, theme)];
                    if let Some(error) = &editor.error {
                        lines.push(error_line(error, theme));
                    }
                    Some(ListItem::new(lines))
                }
                None => {
                    let count = row
                        .icon_count
                        .map(|count| format!("  {count} icons"))
                        .unwrap_or_default();
                    Some(ListItem::new(Line::from(vec![
                        Span::styled(row.name.clone(), Style::default().fg(theme.text)),
                        Span::styled(count, Style::default().fg(theme.dim)),
                    ])))
                }
            },
            _ => None,
        })
        .collect::<Vec<_>>();

    if items.is_empty() {
        let empty = section
            .nodes
            .iter()
            .find_map(|node| match node {
                Node::Placeholder(placeholder) => Some(placeholder_line(placeholder, theme)),
                _ => None,
            })
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(empty).alignment(Alignment::Center).block(list_block),
            layout[1],
        );
        return;
    }

    let mut list_state = ListState::default();
    if !name_focused {
        list_state.select(Some(cursor.category));
    }

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
