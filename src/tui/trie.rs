//! Byte trie matching terminal escape sequences.
//!
//! Sequences (without their leading ESC) map to either a terminal key or
//! one of two variable-length mouse decoders. Nodes are tagged explicitly
//! (a branch of further bytes or a leaf action) and lookup returns a sum
//! type instead of signalling ambiguity through errors: `NeedMore` is an
//! ordinary, frequent outcome on this path.
//!
//! Construction panics on conflicting insertions (one sequence a strict
//! prefix of another with no way left to disambiguate); the table is
//! static, so a conflict is a programmer error caught by the test suite.

use std::collections::HashMap;

use super::event::{Event, Key, MouseEvent, MouseKind};

/// What a fully matched sequence resolves to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SeqAction {
    Key(Key),
    /// `[M` + 3 fixed bytes, values offset by 32 (coords by 33).
    X10Mouse,
    /// `[<` + ASCII decimal `button;col;row` + `M`/`m`.
    SgrMouse,
}

#[derive(Debug)]
enum Node {
    Branch(HashMap<u8, Node>),
    Leaf(SeqAction),
}

/// Result of matching a byte queue against the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrieLookup {
    /// A full sequence matched; `used` bytes were consumed.
    Resolved { event: Event, used: usize },
    /// The queue is a viable prefix; retry once more bytes arrive.
    NeedMore,
    /// No registered sequence starts this way.
    NoMatch,
}

pub(crate) struct DecodeTrie {
    root: HashMap<u8, Node>,
}

impl DecodeTrie {
    /// Trie over the recognized sequences: cursor keys (CSI and SS3
    /// encodings), editing keys, F1–F12, shift-tab, and the two mouse
    /// report prefixes.
    pub(crate) fn standard() -> Self {
        let mut trie = DecodeTrie {
            root: HashMap::new(),
        };

        let keys: &[(&[u8], Key)] = &[
            (b"[A", Key::Up),
            (b"[B", Key::Down),
            (b"[C", Key::Right),
            (b"[D", Key::Left),
            (b"[H", Key::Home),
            (b"[F", Key::End),
            (b"OA", Key::Up),
            (b"OB", Key::Down),
            (b"OC", Key::Right),
            (b"OD", Key::Left),
            (b"OH", Key::Home),
            (b"OF", Key::End),
            (b"[1~", Key::Home),
            (b"[2~", Key::Insert),
            (b"[3~", Key::Delete),
            (b"[4~", Key::End),
            (b"[5~", Key::PageUp),
            (b"[6~", Key::PageDown),
            (b"[7~", Key::Home),
            (b"[8~", Key::End),
            (b"[Z", Key::ShiftTab),
            (b"OP", Key::F(1)),
            (b"OQ", Key::F(2)),
            (b"OR", Key::F(3)),
            (b"OS", Key::F(4)),
            (b"[11~", Key::F(1)),
            (b"[12~", Key::F(2)),
            (b"[13~", Key::F(3)),
            (b"[14~", Key::F(4)),
            (b"[15~", Key::F(5)),
            (b"[17~", Key::F(6)),
            (b"[18~", Key::F(7)),
            (b"[19~", Key::F(8)),
            (b"[20~", Key::F(9)),
            (b"[21~", Key::F(10)),
            (b"[23~", Key::F(11)),
            (b"[24~", Key::F(12)),
        ];
        for (seq, key) in keys {
            trie.insert(seq, SeqAction::Key(*key));
        }

        trie.insert(b"[M", SeqAction::X10Mouse);
        trie.insert(b"[<", SeqAction::SgrMouse);

        trie
    }

    fn insert(&mut self, seq: &[u8], action: SeqAction) {
        assert!(!seq.is_empty(), "empty decode sequence");

        let mut map = &mut self.root;
        for (i, &byte) in seq.iter().enumerate() {
            let last = i == seq.len() - 1;
            if last {
                match map.insert(byte, Node::Leaf(action)) {
                    None => {}
                    Some(_) => panic!("decode trie conflict at byte {byte:#04x}"),
                }
                return;
            }
            let entry = map
                .entry(byte)
                .or_insert_with(|| Node::Branch(HashMap::new()));
            map = match entry {
                Node::Branch(next) => next,
                Node::Leaf(_) => panic!("decode trie conflict at byte {byte:#04x}"),
            };
        }
    }

    /// Match `codes` (the bytes following an ESC) against the trie.
    ///
    /// Always prefers the longest exact match; when the queue could still
    /// extend into a longer known sequence and `more_available` is set, the
    /// decision is deferred with `NeedMore` instead of guessed.
    pub(crate) fn lookup(&self, codes: &[u8], more_available: bool) -> TrieLookup {
        let mut map = &self.root;
        for (i, &byte) in codes.iter().enumerate() {
            match map.get(&byte) {
                None => return TrieLookup::NoMatch,
                Some(Node::Leaf(action)) => {
                    return resolve_action(*action, &codes[i + 1..], i + 1, more_available)
                }
                Some(Node::Branch(next)) => map = next,
            }
        }
        if more_available {
            TrieLookup::NeedMore
        } else {
            TrieLookup::NoMatch
        }
    }
}

fn resolve_action(
    action: SeqAction,
    rest: &[u8],
    prefix_len: usize,
    more_available: bool,
) -> TrieLookup {
    match action {
        SeqAction::Key(key) => TrieLookup::Resolved {
            event: Event::Key(key),
            used: prefix_len,
        },
        SeqAction::X10Mouse => decode_x10(rest, prefix_len, more_available),
        SeqAction::SgrMouse => decode_sgr(rest, prefix_len, more_available),
    }
}

/// xterm drag flag on the button byte.
const MOUSE_DRAG_FLAG: u8 = 32;

/// X10 report: exactly 3 bytes after the prefix. Button/modifier byte is
/// offset by 32, coordinates by 33 (1-based on the wire, zero-based here).
fn decode_x10(rest: &[u8], prefix_len: usize, more_available: bool) -> TrieLookup {
    if rest.len() < 3 {
        return if more_available {
            TrieLookup::NeedMore
        } else {
            TrieLookup::NoMatch
        };
    }

    let b = rest[0].wrapping_sub(32);
    let col = rest[1].wrapping_sub(33) as u16;
    let row = rest[2].wrapping_sub(33) as u16;

    let (kind, button) = if b & 0b11 == 0b11 {
        // X10 reports all releases as button 3.
        (MouseKind::Release, 0)
    } else if b & MOUSE_DRAG_FLAG != 0 {
        (MouseKind::Drag, mouse_button(b))
    } else {
        (MouseKind::Press, mouse_button(b))
    };

    TrieLookup::Resolved {
        event: Event::Mouse(MouseEvent {
            kind,
            button,
            col,
            row,
        }),
        used: prefix_len + 3,
    }
}

/// SGR 1006 report: decimal `button;col;row` terminated by `M` (press or
/// drag) or `m` (release). Without the terminator the report is still in
/// flight.
fn decode_sgr(rest: &[u8], prefix_len: usize, more_available: bool) -> TrieLookup {
    let Some(pos) = rest.iter().position(|&c| c == b'M' || c == b'm') else {
        return if more_available {
            TrieLookup::NeedMore
        } else {
            TrieLookup::NoMatch
        };
    };

    let fields: Vec<Option<u16>> = rest[..pos]
        .split(|&c| c == b';')
        .map(|f| std::str::from_utf8(f).ok().and_then(|s| s.parse().ok()))
        .collect();
    let [Some(b), Some(x), Some(y)] = fields.as_slice().try_into().unwrap_or([None; 3]) else {
        return TrieLookup::NoMatch;
    };

    let kind = if rest[pos] == b'm' {
        MouseKind::Release
    } else if b & MOUSE_DRAG_FLAG as u16 != 0 {
        MouseKind::Drag
    } else {
        MouseKind::Press
    };

    TrieLookup::Resolved {
        event: Event::Mouse(MouseEvent {
            kind,
            button: mouse_button(b as u8),
            col: x.saturating_sub(1),
            row: y.saturating_sub(1),
        }),
        used: prefix_len + pos + 1,
    }
}

/// Zero-based button index: 0/1/2 for left/middle/right, 3/4 for the
/// scroll wheel (flag 64).
fn mouse_button(b: u8) -> u8 {
    ((b & 64) >> 6) * 3 + (b & 0b11)
}

/// Cursor position report fallback: `[ row ; col R`, applied after a trie
/// miss because its prefix overlaps the numbered key family.
pub(crate) fn parse_cursor_report(codes: &[u8], more_available: bool) -> TrieLookup {
    if codes.first() != Some(&b'[') {
        return TrieLookup::NoMatch;
    }

    let mut i = 1;
    let Some((row, next)) = scan_decimal(codes, i, b';') else {
        return exhausted(codes, i, more_available);
    };
    i = next;
    let Some((col, next)) = scan_decimal(codes, i, b'R') else {
        return exhausted(codes, i, more_available);
    };

    TrieLookup::Resolved {
        event: Event::CursorReport {
            col: col.saturating_sub(1),
            row: row.saturating_sub(1),
        },
        used: next,
    }
}

/// Scan an ASCII decimal at `codes[from..]` ending at `terminator`.
/// Returns the value and the index just past the terminator, or None when
/// the input is exhausted or malformed (the caller distinguishes the two).
fn scan_decimal(codes: &[u8], from: usize, terminator: u8) -> Option<(u16, usize)> {
    let mut value: u32 = 0;
    let mut digits = 0;
    for (i, &c) in codes.iter().enumerate().skip(from) {
        if c == terminator && digits > 0 {
            return Some((value.min(u16::MAX as u32) as u16, i + 1));
        }
        if !c.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (c - b'0') as u32;
        digits += 1;
    }
    None
}

fn exhausted(codes: &[u8], from: usize, more_available: bool) -> TrieLookup {
    // Still all digits so far: a longer report may be on its way.
    let viable = codes[from..].iter().all(|c| c.is_ascii_digit() || *c == b';');
    if viable && more_available {
        TrieLookup::NeedMore
    } else {
        TrieLookup::NoMatch
    }
}
