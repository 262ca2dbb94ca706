pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{Cursor, View},
    view::ViewTree,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, tree: &ViewTree, cursor: &Cursor, server: &str) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Active section
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], tree, server, &theme);
    components::tabs::render_tabs(frame, layout[1], &tree.nav, &theme);

    let active = tree.sections.iter().find(|section| section.visible);
    if let Some(section) = active {
        match section.view {
            View::All => screens::icons::render(frame, layout[2], section, cursor, &theme),
            View::Categories => {
                screens::categories::render(frame, layout[2], section, cursor, &theme)
            }
            View::Upload => screens::upload::render(frame, layout[2], section, cursor, &theme),
            View::Login => screens::login::render(frame, layout[2], section, cursor, &theme),
        }
    }

    let hints = components::hints::context_hints(tree, cursor);
    components::hints::render(frame, layout[3], &hints, &theme);

    if let Some(picker) = cursor.picker.as_ref() {
        components::picker::render(frame, area, picker, &theme);
    }
    if let Some(detail) = tree.detail.as_ref() {
        components::detail::render(frame, area, detail, server, &theme);
    }
    if let Some(editor) = tree.icon_editor.as_ref() {
        components::editor::render(frame, area, editor, cursor.icon_edit_field(), &theme);
    }
    if let Some(dialog) = tree.dialog.as_ref() {
        components::dialog::render(frame, area, dialog, &theme);
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, tree: &ViewTree, server: &str, theme: &Theme) {
    let status = &tree.status;
    let refreshed = status.refreshed.as_deref().unwrap_or("-");
    let session_style = if status.session == "admin" {
        Style::default().fg(theme.positive)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        Span::styled(status.session.clone(), session_style),
        Span::raw("  "),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {server}  ")),
        Span::styled("Filter", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", status.filter)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refreshed}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
