//! Shared scrolling state for the list panels.
//!
//! [`Viewport`] keeps the cursor row inside the visible display range:
//! after every cursor move or data refresh the range is adjusted so
//! `top <= cursor < top + height` always holds.

use crate::tui::event::{Event, Key};
use crate::tui::screen::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    height: usize,
    cursor: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Viewport {
            top: 0,
            height: height.max(1),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.scroll_to_cursor();
    }

    /// Move the cursor by `delta`, clamped to `0..len`, and auto-scroll
    /// to keep it visible.
    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.top = 0;
            return;
        }
        let max = len - 1;
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, max as isize) as usize;
        self.scroll_to_cursor();
    }

    /// Re-clamp after the underlying data changed size.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.top = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.top {
            self.top = self.cursor;
        }
        if self.cursor >= self.top + self.height {
            self.top = self.cursor + 1 - self.height;
        }
    }

    /// Visible index range `[start, end)` over `len` items.
    pub fn range(&self, len: usize) -> (usize, usize) {
        let start = self.top.min(len);
        let end = (self.top + self.height).min(len);
        (start, end)
    }
}

/// Cursor-movement keys shared by all list panels. Returns the cursor
/// delta, with page moves scaled to the viewport height.
pub fn movement_delta(event: &Event, page: usize) -> Option<isize> {
    let key = event.as_key()?;
    match key {
        Key::Char('j') | Key::Down => Some(1),
        Key::Char('k') | Key::Up => Some(-1),
        Key::Char('J') => Some(5),
        Key::Char('K') => Some(-5),
        Key::PageDown => Some(page as isize),
        Key::PageUp => Some(-(page as isize)),
        _ => None,
    }
}

/// Rows available to list content below the one-line panel header.
pub fn list_height(size: Size) -> usize {
    (size.1 as usize).saturating_sub(1).max(1)
}

/// Truncate a display line to the panel width, by characters.
pub fn truncate_line(line: &str, width: u16) -> String {
    line.chars().take(width as usize).collect()
}

/// Decorate the visible slice of `lines` with the cursor glyph.
pub fn decorate_lines(
    lines: &[String],
    viewport: &Viewport,
    cursor_glyph: &str,
    width: u16,
) -> Vec<String> {
    let (start, end) = viewport.range(lines.len());
    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if start + i == viewport.cursor() {
                cursor_glyph
            } else {
                " "
            };
            truncate_line(&format!("{prefix} {line}"), width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_inside_display_range() {
        let mut vp = Viewport::new(5);
        let len = 20;
        // Walk down past the window, then back up; the invariant must
        // hold after every single move.
        for _ in 0..30 {
            vp.move_cursor(1, len);
            assert!(vp.top() <= vp.cursor());
            assert!(vp.cursor() < vp.top() + vp.height());
        }
        assert_eq!(vp.cursor(), len - 1);
        for _ in 0..30 {
            vp.move_cursor(-1, len);
            assert!(vp.top() <= vp.cursor());
            assert!(vp.cursor() < vp.top() + vp.height());
        }
        assert_eq!(vp.cursor(), 0);
        assert_eq!(vp.top(), 0);
    }

    #[test]
    fn test_page_jumps_scroll_the_window() {
        let mut vp = Viewport::new(4);
        vp.move_cursor(10, 50);
        assert_eq!(vp.cursor(), 10);
        assert_eq!(vp.range(50), (7, 11));
    }

    #[test]
    fn test_clamp_after_shrinking_data() {
        let mut vp = Viewport::new(5);
        vp.move_cursor(15, 20);
        vp.clamp(3);
        assert_eq!(vp.cursor(), 2);
        assert!(vp.top() <= vp.cursor());
    }

    #[test]
    fn test_empty_list_resets() {
        let mut vp = Viewport::new(5);
        vp.move_cursor(3, 10);
        vp.clamp(0);
        assert_eq!(vp.cursor(), 0);
        assert_eq!(vp.range(0), (0, 0));
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(movement_delta(&Event::Key(Key::Char('j')), 8), Some(1));
        assert_eq!(movement_delta(&Event::Key(Key::Up), 8), Some(-1));
        assert_eq!(movement_delta(&Event::Key(Key::PageDown), 8), Some(8));
        assert_eq!(movement_delta(&Event::Key(Key::Char('x')), 8), None);
    }

    #[test]
    fn test_decorate_marks_cursor_row() {
        let lines: Vec<String> = (0..3).map(|i| format!("item{i}")).collect();
        let vp = Viewport::new(3);
        let rendered = decorate_lines(&lines, &vp, "→", 80);
        assert_eq!(rendered[0], "→ item0");
        assert_eq!(rendered[1], "  item1");
    }

    #[test]
    fn test_truncate_respects_width() {
        assert_eq!(truncate_line("abcdef", 4), "abcd");
        assert_eq!(truncate_line("ab", 4), "ab");
    }
}
