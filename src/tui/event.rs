//! Semantic input events produced by the decoder.
//!
//! Events are immutable value types: one per decoded byte sequence. `Key`
//! doubles as the lookup key of the binding tables, so it derives `Hash`.

/// A decoded terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Mouse(MouseEvent),
    /// Cursor position report (`ESC [ row ; col R`), zero-based.
    CursorReport { col: u16, row: u16 },
    /// Synthesized by the input loop when the resize flag is observed.
    WindowResize,
}

/// A key press, either a literal character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Meta(char),
    Enter,
    Tab,
    ShiftTab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    F(u8),
}

/// A mouse report. Buttons and coordinates are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub button: u8,
    pub col: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press,
    Release,
    Drag,
}

impl Event {
    pub fn key(key: Key) -> Self {
        Event::Key(key)
    }

    pub fn is_mouse(&self) -> bool {
        matches!(self, Event::Mouse(_))
    }

    pub fn as_key(&self) -> Option<Key> {
        match self {
            Event::Key(k) => Some(*k),
            _ => None,
        }
    }
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Event::Key(key)
    }
}
