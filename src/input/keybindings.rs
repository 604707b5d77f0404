//! Fixed key bindings for normal editing mode

use crate::input::decoder::{ctrl, Key, BACKSPACE, ENTER};
use crate::model::cursor::Movement;

/// High-level actions that can be performed in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Character input
    InsertChar(u8),
    InsertNewline,

    // Movement
    Move(Movement),

    // Editing
    DeleteBackward,
    DeleteForward,

    // File and session
    Save,
    Quit,
    Search,

    /// Key is bound to nothing (Ctrl-L, Escape)
    None,
}

/// Map a decoded key to the action it triggers in normal mode.
pub fn resolve(key: Key) -> Action {
    match key {
        Key::ArrowUp => Action::Move(Movement::Up),
        Key::ArrowDown => Action::Move(Movement::Down),
        Key::ArrowLeft => Action::Move(Movement::Left),
        Key::ArrowRight => Action::Move(Movement::Right),
        Key::Home => Action::Move(Movement::Home),
        Key::End => Action::Move(Movement::End),
        Key::PageUp => Action::Move(Movement::PageUp),
        Key::PageDown => Action::Move(Movement::PageDown),
        Key::Delete => Action::DeleteForward,
        Key::Escape => Action::None,
        Key::Byte(ENTER) => Action::InsertNewline,
        Key::Byte(BACKSPACE) => Action::DeleteBackward,
        Key::Byte(b) if b == ctrl(b'h') => Action::DeleteBackward,
        Key::Byte(b) if b == ctrl(b'q') => Action::Quit,
        Key::Byte(b) if b == ctrl(b's') => Action::Save,
        Key::Byte(b) if b == ctrl(b'f') => Action::Search,
        Key::Byte(b) if b == ctrl(b'l') => Action::None,
        Key::Byte(b) => Action::InsertChar(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_keys() {
        assert_eq!(resolve(Key::Byte(17)), Action::Quit);
        assert_eq!(resolve(Key::Byte(19)), Action::Save);
        assert_eq!(resolve(Key::Byte(6)), Action::Search);
        assert_eq!(resolve(Key::Byte(8)), Action::DeleteBackward);
        assert_eq!(resolve(Key::Byte(127)), Action::DeleteBackward);
        assert_eq!(resolve(Key::Byte(12)), Action::None);
        assert_eq!(resolve(Key::Byte(b'\r')), Action::InsertNewline);
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(resolve(Key::PageDown), Action::Move(Movement::PageDown));
        assert_eq!(resolve(Key::Home), Action::Move(Movement::Home));
        assert_eq!(resolve(Key::Delete), Action::DeleteForward);
        assert_eq!(resolve(Key::Escape), Action::None);
    }

    #[test]
    fn test_everything_else_inserts() {
        assert_eq!(resolve(Key::Byte(b'a')), Action::InsertChar(b'a'));
        assert_eq!(resolve(Key::Byte(b'\t')), Action::InsertChar(b'\t'));
        assert_eq!(resolve(Key::Byte(0xc3)), Action::InsertChar(0xc3));
    }
}
