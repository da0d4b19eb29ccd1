//! Byte-queue decoder: raw input bytes to semantic events.
//!
//! A pure, non-blocking state machine over an in-memory queue. Single bytes
//! resolve immediately (printables, control keys, UTF-8 lead bytes); ESC
//! starts a trie match with the longest-match rule. Ambiguity is reported
//! as [`DecodeOutcome::NeedMore`] so the input loop can wait for the rest
//! of the sequence, never resolved by guessing and never an error.

use super::event::{Event, Key};
use super::trie::{parse_cursor_report, DecodeTrie, TrieLookup};

/// One step of decoding from the front of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A full event; `consumed` bytes leave the queue.
    Event { event: Event, consumed: usize },
    /// The queue holds a viable prefix of a longer sequence.
    NeedMore,
    /// Unrecognized bytes with no event to show for them.
    Skip { consumed: usize },
    /// The queue is empty.
    Empty,
}

pub struct Decoder {
    trie: DecodeTrie,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            trie: DecodeTrie::standard(),
        }
    }

    /// Decode as many events as the queue allows.
    ///
    /// Returns the events in input order, the number of bytes consumed,
    /// and whether the remainder is an incomplete sequence that should be
    /// retried once more bytes arrive (as opposed to an empty remainder).
    pub fn drain(&self, codes: &[u8], more_available: bool) -> (Vec<Event>, usize, bool) {
        let mut events = Vec::new();
        let mut pos = 0;
        loop {
            match self.decode_next(&codes[pos..], more_available) {
                DecodeOutcome::Event { event, consumed } => {
                    events.push(event);
                    pos += consumed;
                }
                DecodeOutcome::Skip { consumed } => pos += consumed,
                DecodeOutcome::NeedMore => return (events, pos, true),
                DecodeOutcome::Empty => return (events, pos, false),
            }
        }
    }

    /// Decode a single event from the front of the queue.
    pub fn decode_next(&self, codes: &[u8], more_available: bool) -> DecodeOutcome {
        let Some(&first) = codes.first() else {
            return DecodeOutcome::Empty;
        };

        if first == 0x1B {
            return self.decode_escape(codes, more_available);
        }
        decode_single(codes, more_available)
    }

    /// ESC-led input: trie first, then the cursor-report fallback, then
    /// meta/bare-escape resolution.
    fn decode_escape(&self, codes: &[u8], more_available: bool) -> DecodeOutcome {
        let rest = &codes[1..];

        match self.trie.lookup(rest, more_available) {
            TrieLookup::Resolved { event, used } => {
                return DecodeOutcome::Event {
                    event,
                    consumed: used + 1,
                }
            }
            TrieLookup::NeedMore => return DecodeOutcome::NeedMore,
            TrieLookup::NoMatch => {}
        }

        match parse_cursor_report(rest, more_available) {
            TrieLookup::Resolved { event, used } => {
                return DecodeOutcome::Event {
                    event,
                    consumed: used + 1,
                }
            }
            TrieLookup::NeedMore => return DecodeOutcome::NeedMore,
            TrieLookup::NoMatch => {}
        }

        if rest.is_empty() {
            // A lone ESC: either the start of a sequence still in flight
            // or a genuine escape press; the input loop's grace timeout
            // decides by flipping `more_available`.
            return if more_available {
                DecodeOutcome::NeedMore
            } else {
                DecodeOutcome::Event {
                    event: Event::Key(Key::Escape),
                    consumed: 1,
                }
            };
        }

        // ESC + exactly one resolvable printable is a meta chord; anything
        // else resolves the ESC alone and the remainder is reprocessed as
        // a fresh sequence.
        match decode_single(rest, more_available) {
            DecodeOutcome::Event {
                event: Event::Key(Key::Char(ch)),
                consumed,
            } => DecodeOutcome::Event {
                event: Event::Key(Key::Meta(ch)),
                consumed: consumed + 1,
            },
            DecodeOutcome::NeedMore => DecodeOutcome::NeedMore,
            _ => DecodeOutcome::Event {
                event: Event::Key(Key::Escape),
                consumed: 1,
            },
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a non-ESC byte at the front of the queue.
fn decode_single(codes: &[u8], more_available: bool) -> DecodeOutcome {
    let first = codes[0];
    let event = |key| DecodeOutcome::Event {
        event: Event::Key(key),
        consumed: 1,
    };

    match first {
        0x08 | 0x7F => event(Key::Backspace),
        0x09 => event(Key::Tab),
        0x0A | 0x0D => event(Key::Enter),
        // Ctrl+letter, minus the bytes already claimed above.
        0x01..=0x1A => event(Key::Ctrl((b'a' + first - 1) as char)),
        // Ctrl + \ ] ^ _
        0x1C..=0x1F => event(Key::Ctrl((b'A' + first - 1) as char)),
        0x20..=0x7E => event(Key::Char(first as char)),
        0x80..=0xFF => decode_utf8(codes, more_available),
        _ => DecodeOutcome::Skip { consumed: 1 },
    }
}

/// Multi-byte UTF-8 character. Truncated sequences defer; malformed bytes
/// are skipped one at a time so the queue always makes progress.
fn decode_utf8(codes: &[u8], more_available: bool) -> DecodeOutcome {
    let first = codes[0];
    let need = if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else if first & 0xF8 == 0xF0 {
        4
    } else {
        return DecodeOutcome::Skip { consumed: 1 };
    };

    if codes.len() < need {
        return if more_available {
            DecodeOutcome::NeedMore
        } else {
            DecodeOutcome::Skip { consumed: 1 }
        };
    }

    match std::str::from_utf8(&codes[..need]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => DecodeOutcome::Event {
                event: Event::Key(Key::Char(ch)),
                consumed: need,
            },
            None => DecodeOutcome::Skip { consumed: 1 },
        },
        Err(_) => DecodeOutcome::Skip { consumed: 1 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::event::{MouseEvent, MouseKind};

    fn decode_all(bytes: &[u8]) -> Vec<Event> {
        let decoder = Decoder::new();
        let (events, consumed, need_more) = decoder.drain(bytes, false);
        assert_eq!(consumed, bytes.len(), "leftover bytes");
        assert!(!need_more);
        events
    }

    fn decode_one(bytes: &[u8]) -> Event {
        let events = decode_all(bytes);
        assert_eq!(events.len(), 1, "expected exactly one event");
        events.into_iter().next().unwrap()
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(
            decode_all(b"ab"),
            vec![Event::Key(Key::Char('a')), Event::Key(Key::Char('b'))]
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(decode_one(b"\n"), Event::Key(Key::Enter));
        assert_eq!(decode_one(b"\r"), Event::Key(Key::Enter));
        assert_eq!(decode_one(b"\t"), Event::Key(Key::Tab));
        assert_eq!(decode_one(&[0x7F]), Event::Key(Key::Backspace));
        assert_eq!(decode_one(&[0x08]), Event::Key(Key::Backspace));
    }

    #[test]
    fn test_ctrl_letters() {
        assert_eq!(decode_one(&[0x01]), Event::Key(Key::Ctrl('a')));
        assert_eq!(decode_one(&[0x1A]), Event::Key(Key::Ctrl('z')));
        assert_eq!(decode_one(&[0x03]), Event::Key(Key::Ctrl('c')));
    }

    #[test]
    fn test_ctrl_punctuation() {
        assert_eq!(decode_one(&[0x1C]), Event::Key(Key::Ctrl('\\')));
        assert_eq!(decode_one(&[0x1D]), Event::Key(Key::Ctrl(']')));
        assert_eq!(decode_one(&[0x1E]), Event::Key(Key::Ctrl('^')));
        assert_eq!(decode_one(&[0x1F]), Event::Key(Key::Ctrl('_')));
    }

    #[test]
    fn test_recognized_sequence_table() {
        // Every entry from the recognized-sequence table round-trips with
        // no leftover bytes.
        let table: &[(&[u8], Key)] = &[
            (b"\x1b[A", Key::Up),
            (b"\x1b[B", Key::Down),
            (b"\x1b[D", Key::Left),
            (b"\x1b[C", Key::Right),
            (b"\x1bOA", Key::Up),
            (b"\x1bOB", Key::Down),
            (b"\x1bOD", Key::Left),
            (b"\x1bOC", Key::Right),
            (b"\x1b[2~", Key::Insert),
            (b"\x1b[3~", Key::Delete),
            (b"\x1b[4~", Key::End),
            (b"\x1b[5~", Key::PageUp),
            (b"\x1b[6~", Key::PageDown),
            (b"\x1b[Z", Key::ShiftTab),
            (b"\x1bOP", Key::F(1)),
            (b"\x1bOQ", Key::F(2)),
            (b"\x1bOR", Key::F(3)),
            (b"\x1bOS", Key::F(4)),
            (b"\x1b[15~", Key::F(5)),
            (b"\x1b[17~", Key::F(6)),
            (b"\x1b[18~", Key::F(7)),
            (b"\x1b[19~", Key::F(8)),
            (b"\x1b[20~", Key::F(9)),
            (b"\x1b[21~", Key::F(10)),
            (b"\x1b[23~", Key::F(11)),
            (b"\x1b[24~", Key::F(12)),
        ];
        for (bytes, key) in table {
            assert_eq!(decode_one(bytes), Event::Key(*key), "sequence {bytes:?}");
        }
    }

    #[test]
    fn test_bare_escape_without_more_input() {
        assert_eq!(decode_one(b"\x1b"), Event::Key(Key::Escape));
    }

    #[test]
    fn test_bare_escape_defers_with_more_input() {
        let decoder = Decoder::new();
        assert_eq!(decoder.decode_next(b"\x1b", true), DecodeOutcome::NeedMore);
    }

    #[test]
    fn test_meta_key() {
        assert_eq!(decode_one(b"\x1bx"), Event::Key(Key::Meta('x')));
    }

    #[test]
    fn test_escape_then_sequence_reprocessed() {
        // ESC ESC [ A: the first ESC resolves alone, the rest is a fresh
        // sequence.
        assert_eq!(
            decode_all(b"\x1b\x1b[A"),
            vec![Event::Key(Key::Escape), Event::Key(Key::Up)]
        );
    }

    #[test]
    fn test_sgr_mouse_press_release() {
        assert_eq!(
            decode_one(b"\x1b[<0;1;1M"),
            Event::Mouse(MouseEvent {
                kind: MouseKind::Press,
                button: 0,
                col: 0,
                row: 0,
            })
        );
        assert_eq!(
            decode_one(b"\x1b[<0;1;1m"),
            Event::Mouse(MouseEvent {
                kind: MouseKind::Release,
                button: 0,
                col: 0,
                row: 0,
            })
        );
    }

    #[test]
    fn test_x10_mouse_lower_bound() {
        let mut bytes = b"\x1b[M".to_vec();
        bytes.extend([32, 33, 33]);
        assert_eq!(
            decode_one(&bytes),
            Event::Mouse(MouseEvent {
                kind: MouseKind::Press,
                button: 0,
                col: 0,
                row: 0,
            })
        );
    }

    #[test]
    fn test_cursor_position_report() {
        assert_eq!(
            decode_one(b"\x1b[12;40R"),
            Event::CursorReport { col: 39, row: 11 }
        );
    }

    #[test]
    fn test_utf8_char() {
        assert_eq!(decode_one("é".as_bytes()), Event::Key(Key::Char('é')));
        assert_eq!(decode_one("中".as_bytes()), Event::Key(Key::Char('中')));
    }

    #[test]
    fn test_truncated_utf8_defers_then_skips() {
        let decoder = Decoder::new();
        let bytes = &"é".as_bytes()[..1];
        assert_eq!(decoder.decode_next(bytes, true), DecodeOutcome::NeedMore);
        assert_eq!(
            decoder.decode_next(bytes, false),
            DecodeOutcome::Skip { consumed: 1 }
        );
    }

    #[test]
    fn test_drain_stops_on_incomplete_tail() {
        let decoder = Decoder::new();
        let (events, consumed, need_more) = decoder.drain(b"a\x1b[", true);
        assert_eq!(events, vec![Event::Key(Key::Char('a'))]);
        assert_eq!(consumed, 1);
        assert!(need_more);
    }

    #[test]
    fn test_queue_order_preserved() {
        let events = decode_all(b"a\x1b[Ab");
        assert_eq!(
            events,
            vec![
                Event::Key(Key::Char('a')),
                Event::Key(Key::Up),
                Event::Key(Key::Char('b')),
            ]
        );
    }
}
