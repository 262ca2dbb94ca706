use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    /// Navigation entry by position: icons, categories, upload, session.
    Nav(usize),
    Cancel,
    NextField,
    Submit,
    Backspace,
    ClearField,
    Up,
    Down,
    Left,
    Right,
    Refresh,
    Delete,
    Transfer,
    Download,
    Details,
    Edit,
    Yes,
    No,
    Input(char),
    None,
}

/// Maps a key press. While `typing`, printable keys are text input and only
/// function keys and control chords keep their meaning.
pub fn map_key(key: KeyEvent, typing: bool) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('u') => AppAction::ClearField,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::F(n @ 1..=4) => AppAction::Nav(usize::from(n) - 1),
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab | KeyCode::BackTab => AppAction::NextField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::Char(ch) if typing => AppAction::Input(ch),
        KeyCode::Char(ch) => map_command(ch),
        _ => AppAction::None,
    }
}

fn map_command(ch: char) -> AppAction {
    match ch {
        'q' => AppAction::Quit,
        '1'..='4' => AppAction::Nav(ch as usize - '1' as usize),
        'j' => AppAction::Down,
        'k' => AppAction::Up,
        'r' => AppAction::Refresh,
        'd' => AppAction::Delete,
        't' => AppAction::Transfer,
        's' => AppAction::Download,
        'i' => AppAction::Details,
        'e' => AppAction::Edit,
        'y' => AppAction::Yes,
        'n' => AppAction::No,
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_navigate_outside_text_fields() {
        assert_eq!(map_key(key(KeyCode::Char('2')), false), AppAction::Nav(1));
        assert_eq!(map_key(key(KeyCode::Char('2')), true), AppAction::Input('2'));
        assert_eq!(map_key(key(KeyCode::F(4)), true), AppAction::Nav(3));
    }

    #[test]
    fn e_edits_outside_text_fields() {
        assert_eq!(map_key(key(KeyCode::Char('e')), false), AppAction::Edit);
        assert_eq!(map_key(key(KeyCode::Char('e')), true), AppAction::Input('e'));
    }

    #[test]
    fn q_is_text_while_typing() {
        assert_eq!(map_key(key(KeyCode::Char('q')), false), AppAction::Quit);
        assert_eq!(map_key(key(KeyCode::Char('q')), true), AppAction::Input('q'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, true), AppAction::Quit);
    }
}
