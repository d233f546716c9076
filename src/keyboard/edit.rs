//! Text edit state machine
//!
//! Fixed-capacity buffer with a cursor. Grid presses insert, move the
//! cursor or commit; cancel deletes left of the cursor, or leaves the
//! keyboard with the original text when the cursor is at the start.

use log::debug;

use super::layout::{KeyKind, KEYMAP};

/// Grid index whose label is never lower-cased ('.')
const CASE_EXEMPT_INDEX: usize = 29;

/// Character a grid index types, None for action keys
pub fn mapped_char(z: usize) -> Option<char> {
    let base = *KEYMAP.get(z)?;
    if z > 9 && z != CASE_EXEMPT_INDEX {
        char::from_u32(base as u32 + 32)
    } else {
        Some(base)
    }
}

/// Fixed-capacity character buffer.
///
/// Holds at most `capacity - 1` characters; the slot at `len` always
/// holds the NUL terminator.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    slots: Vec<char>,
    len: usize,
    cursor: usize,
}

impl TextBuffer {
    /// Capacity is at least one slot (the terminator)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec!['\0'; capacity.max(1)],
            len: 0,
            cursor: 0,
        }
    }

    /// Seed with `initial`, truncated to fit; cursor at the end
    pub fn seeded(initial: &str, capacity: usize) -> Self {
        let mut buffer = Self::with_capacity(capacity);
        for ch in initial.chars().take(buffer.max_len()) {
            buffer.slots[buffer.len] = ch;
            buffer.len += 1;
        }
        buffer.cursor = buffer.len;
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Most characters the buffer can hold
    pub fn max_len(&self) -> usize {
        self.capacity() - 1
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.max_len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chars(&self) -> &[char] {
        &self.slots[..self.len]
    }

    pub fn text(&self) -> String {
        self.chars().iter().collect()
    }

    /// Insert at the cursor; false when full
    pub fn insert(&mut self, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.copy_within(self.cursor..self.len, self.cursor + 1);
        self.slots[self.cursor] = ch;
        self.len += 1;
        self.cursor += 1;
        self.slots[self.len] = '\0';
        true
    }

    /// Delete left of the cursor; false at the start
    pub fn delete_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.slots.copy_within(self.cursor..self.len, self.cursor - 1);
        self.len -= 1;
        self.cursor -= 1;
        self.slots[self.len] = '\0';
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len);
    }

    /// Terminator invariant holds
    pub fn is_terminated(&self) -> bool {
        self.slots[self.len] == '\0'
    }
}

/// Where an edit session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Editing,
    Committed(String),
    Cancelled(String),
}

impl EditState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EditState::Editing)
    }

    /// Final text of a finished session
    pub fn result(&self) -> Option<&str> {
        match self {
            EditState::Editing => None,
            EditState::Committed(s) | EditState::Cancelled(s) => Some(s),
        }
    }
}

pub struct Editor {
    buffer: TextBuffer,
    original: String,
    fallback: String,
    state: EditState,
}

impl Editor {
    pub fn new(initial: &str, capacity: usize, fallback: &str) -> Self {
        Self {
            buffer: TextBuffer::seeded(initial, capacity),
            original: initial.to_string(),
            fallback: fallback.to_string(),
            state: EditState::Editing,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Act on the grid key at index `z`
    pub fn press(&mut self, z: usize) -> &EditState {
        if self.state.is_terminal() {
            return &self.state;
        }
        match KeyKind::from_index(z) {
            Some(KeyKind::Char(_)) => {
                if let Some(ch) = mapped_char(z) {
                    if !self.buffer.insert(ch) {
                        debug!("Buffer full, '{}' dropped", ch);
                    }
                }
            }
            Some(KeyKind::CursorLeft) => self.buffer.cursor_left(),
            Some(KeyKind::CursorRight) => self.buffer.cursor_right(),
            Some(KeyKind::Commit) => {
                let text = if self.buffer.is_empty() {
                    self.fallback.clone()
                } else {
                    self.buffer.text()
                };
                self.state = EditState::Committed(text);
            }
            None => {}
        }
        &self.state
    }

    /// Backspace, or leave with the original text at the start of the buffer
    pub fn cancel(&mut self) -> &EditState {
        if self.state.is_terminal() {
            return &self.state;
        }
        if !self.buffer.delete_left() {
            self.state = EditState::Cancelled(self.original.clone());
        }
        &self.state
    }
}
