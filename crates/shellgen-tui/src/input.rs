//! Text input used by argument-bearing options.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single-line text field with cursor support.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: String,
    /// Cursor position (byte index).
    cursor: usize,
    pub placeholder: String,
}

impl InputField {
    pub fn new(value: String, placeholder: &str) -> Self {
        let cursor = value.len();
        Self {
            value,
            cursor,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Value for display, falling back to the placeholder.
    pub fn display(&self, focused: bool) -> String {
        if self.value.is_empty() {
            return if focused {
                format!("▏{}", self.placeholder)
            } else {
                self.placeholder.clone()
            };
        }
        if !focused {
            return self.value.clone();
        }
        let (before, after) = self.value.split_at(self.cursor);
        format!("{}▏{}", before, after)
    }

    /// Apply an editing key. Returns true when the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                let changed = !self.value.is_empty();
                self.value.clear();
                self.cursor = 0;
                changed
            }
            KeyCode::Char(_) if ctrl => false,
            KeyCode::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            KeyCode::Backspace => match self.prev_boundary() {
                Some(prev) => {
                    self.value.remove(prev);
                    self.cursor = prev;
                    true
                }
                None => false,
            },
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
                false
            }
            KeyCode::Right => {
                if let Some(c) = self.value[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                false
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
    }
}
