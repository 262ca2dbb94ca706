use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{CategoriesFocus, Cursor, UploadFocus, View},
    ui::theme::Theme,
    view::{Dialog, ViewTree},
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Hints for whatever currently owns the keyboard: an overlay, else the
/// visible section.
pub fn context_hints(tree: &ViewTree, cursor: &Cursor) -> Vec<KeyHint> {
    match &tree.dialog {
        Some(Dialog::Confirm { .. }) => {
            return vec![KeyHint::new("y", "confirm"), KeyHint::new("n/Esc", "cancel")];
        }
        Some(Dialog::Notice(_)) => return vec![KeyHint::new("Enter", "dismiss")],
        None => {}
    }
    if tree.icon_editor.is_some() {
        return vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ];
    }
    if tree.detail.is_some() {
        let mut hints = vec![KeyHint::new("Esc", "close")];
        if tree.nav.len() > 2 {
            hints.push(KeyHint::new("e", "edit"));
        }
        return hints;
    }
    if cursor.picker.is_some() {
        return vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("Enter", "move"),
            KeyHint::new("Esc", "cancel"),
        ];
    }

    let admin = tree.nav.len() > 2;
    let active = tree
        .sections
        .iter()
        .find(|section| section.visible)
        .map(|section| section.view);

    let mut hints = match active {
        Some(View::All) => {
            let mut hints = vec![
                KeyHint::new("↑↓", "select"),
                KeyHint::new("←→", "category"),
                KeyHint::new("r", "refresh"),
                KeyHint::new("i", "details"),
                KeyHint::new("s", "save"),
            ];
            if admin {
                hints.push(KeyHint::new("e", "edit"));
                hints.push(KeyHint::new("t", "move"));
                hints.push(KeyHint::new("d", "delete"));
            }
            hints
        }
        Some(View::Categories) if admin && renaming(tree) => vec![
            KeyHint::new("Enter", "rename"),
            KeyHint::new("Esc", "cancel"),
        ],
        Some(View::Categories) if admin => match cursor.categories {
            CategoriesFocus::Name => vec![
                KeyHint::new("Enter", "add"),
                KeyHint::new("Tab", "list"),
            ],
            CategoriesFocus::List => vec![
                KeyHint::new("↑↓", "select"),
                KeyHint::new("e", "rename"),
                KeyHint::new("d", "delete"),
                KeyHint::new("Tab", "name"),
            ],
        },
        Some(View::Upload) => {
            let mut hints = vec![KeyHint::new("Tab", "next"), KeyHint::new("Enter", "upload")];
            if cursor.upload == UploadFocus::Category {
                hints.push(KeyHint::new("←→", "category"));
            }
            hints
        }
        Some(View::Login) => vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "log in"),
            KeyHint::new("Esc", "back"),
        ],
        Some(View::Categories) | None => Vec::new(),
    };
    hints.push(KeyHint::new("q", "quit"));
    hints
}

fn renaming(tree: &ViewTree) -> bool {
    tree.category_rows().iter().any(|row| row.rename.is_some())
}

pub fn render(frame: &mut Frame<'_>, area: Rect, hints: &[KeyHint], theme: &Theme) {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{AppState, NoticeLevel},
        view,
    };

    #[test]
    fn admin_hints_need_login() {
        let mut state = AppState::default();
        let hints = context_hints(&view::render(&state), &Cursor::default());
        assert!(!hints.contains(&KeyHint::new("d", "delete")));

        state.logged_in = true;
        let hints = context_hints(&view::render(&state), &Cursor::default());
        assert!(hints.contains(&KeyHint::new("d", "delete")));
    }

    #[test]
    fn rename_editor_owns_the_category_hints() {
        let mut state = AppState::default();
        state.logged_in = true;
        state.select_view(View::Categories);
        state.replace_categories(vec![api_types::category::Category {
            id: "1".to_string(),
            name: "Tools".to_string(),
            icon_count: None,
        }]);
        state.rename = Some(crate::app::RenameDraft {
            id: "1".to_string(),
            name: "Tools".to_string(),
            error: None,
        });
        let hints = context_hints(&view::render(&state), &Cursor::default());
        assert!(hints.contains(&KeyHint::new("Enter", "rename")));
        assert!(!hints.contains(&KeyHint::new("Enter", "add")));
    }

    #[test]
    fn dialogs_own_the_keyboard() {
        let mut state = AppState::default();
        state.notify(NoticeLevel::Error, "nope");
        let hints = context_hints(&view::render(&state), &Cursor::default());
        assert_eq!(hints, vec![KeyHint::new("Enter", "dismiss")]);
    }
}
