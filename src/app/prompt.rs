//! Single-line input prompt shown on the message line

use crate::app::search::SearchSession;
use crate::input::decoder::{ctrl, Key, BACKSPACE, ENTER};

/// What the prompt's input is for
#[derive(Debug, Clone)]
pub enum PromptKind {
    /// Incremental search; the session updates on every key
    Search(SearchSession),
    /// File name for an unnamed buffer
    SaveAs,
}

/// Outcome of feeding one key to the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEvent {
    /// Input may have changed; the prompt stays open
    Continue,
    /// Enter with non-empty input
    Confirmed,
    /// Escape
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    input: Vec<u8>,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: Vec::new(),
        }
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Edit the input with `key`.
    pub fn handle_key(&mut self, key: Key) -> PromptEvent {
        match key {
            Key::Delete | Key::Byte(BACKSPACE) => {
                self.input.pop();
            }
            Key::Byte(b) if b == ctrl(b'h') => {
                self.input.pop();
            }
            Key::Escape => return PromptEvent::Cancelled,
            Key::Byte(ENTER) => {
                if !self.input.is_empty() {
                    return PromptEvent::Confirmed;
                }
            }
            Key::Byte(b) if !b.is_ascii_control() && b < 128 => self.input.push(b),
            _ => {}
        }
        PromptEvent::Continue
    }

    /// Text for the message line.
    pub fn message(&self) -> String {
        let input = String::from_utf8_lossy(&self.input);
        match &self.kind {
            PromptKind::Search(session) => {
                if !self.input.is_empty() && !session.found() {
                    format!("Search: {input} (no match)")
                } else {
                    format!("Search: {input} (Use ESC/Arrows/Enter)")
                }
            }
            PromptKind::SaveAs => format!("Save as: {input} (ESC to cancel)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(prompt: &mut Prompt, s: &str) {
        for b in s.bytes() {
            assert_eq!(prompt.handle_key(Key::Byte(b)), PromptEvent::Continue);
        }
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut prompt = Prompt::new(PromptKind::SaveAs);
        type_str(&mut prompt, "abc");
        assert_eq!(prompt.input(), b"abc");
        prompt.handle_key(Key::Byte(BACKSPACE));
        prompt.handle_key(Key::Byte(ctrl(b'h')));
        assert_eq!(prompt.input(), b"a");
        prompt.handle_key(Key::Delete);
        prompt.handle_key(Key::Delete);
        assert!(prompt.input().is_empty());
    }

    #[test]
    fn test_control_and_high_bytes_are_ignored() {
        let mut prompt = Prompt::new(PromptKind::SaveAs);
        prompt.handle_key(Key::Byte(b'\t'));
        prompt.handle_key(Key::Byte(0xe9));
        prompt.handle_key(Key::ArrowLeft);
        assert!(prompt.input().is_empty());
    }

    #[test]
    fn test_enter_requires_input() {
        let mut prompt = Prompt::new(PromptKind::SaveAs);
        assert_eq!(prompt.handle_key(Key::Byte(ENTER)), PromptEvent::Continue);
        type_str(&mut prompt, "f");
        assert_eq!(prompt.handle_key(Key::Byte(ENTER)), PromptEvent::Confirmed);
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = Prompt::new(PromptKind::SaveAs);
        type_str(&mut prompt, "f");
        assert_eq!(prompt.handle_key(Key::Escape), PromptEvent::Cancelled);
    }

    #[test]
    fn test_messages() {
        let mut prompt = Prompt::new(PromptKind::SaveAs);
        type_str(&mut prompt, "a.c");
        assert_eq!(prompt.message(), "Save as: a.c (ESC to cancel)");

        let session = SearchSession::begin(&Default::default());
        let prompt = Prompt::new(PromptKind::Search(session));
        assert_eq!(prompt.message(), "Search:  (Use ESC/Arrows/Enter)");
    }
}
