//! Terminal drawing primitives and screen lifecycle.
//!
//! [`term`] holds the raw control sequences; [`Screen`] owns the output
//! stream, the alternate-screen lifecycle and the small drawing surface
//! components render through (absolute addressing + line clearing).
//!
//! Entering the alternate screen and hiding the cursor on start, and the
//! reverse on any exit, is a hard contract. `Screen` restores in `Drop`
//! so a panic or early return cannot leave the user's shell corrupted.

use std::io::{self, Write};

/// Terminal control sequences.
pub mod term {
    pub const HIDE_CURSOR: &str = "\x1b[?25l";
    pub const SHOW_CURSOR: &str = "\x1b[?25h";
    pub const ALT_SCREEN: &str = "\x1b[?1049h";
    pub const NORMAL_SCREEN: &str = "\x1b[?1049l";
    /// Clear the whole screen and home the cursor.
    pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1f";
    /// Clear from the cursor to the end of the line.
    pub const CLEAR_LINE: &str = "\x1b[K";

    /// Absolute cursor addressing, 1-based line and column.
    pub fn cursor_to(line: u16, col: u16) -> String {
        format!("\x1b[{line};{col}f")
    }
}

/// Component position and size, in terminal cells.
pub type Size = (u16, u16);

pub struct Screen {
    out: Box<dyn Write + Send>,
    size: Size,
    alt_screen: bool,
    entered: bool,
}

impl Screen {
    pub fn new(size: Size) -> Self {
        Self::with_writer(Box::new(io::stdout()), size)
    }

    /// Screen over an arbitrary writer; tests capture output with a
    /// `Vec<u8>` sink.
    pub fn with_writer(out: Box<dyn Write + Send>, size: Size) -> Self {
        Screen {
            out,
            size,
            alt_screen: true,
            entered: false,
        }
    }

    /// Disable the alternate screen (used by the plain CLI paths and by
    /// tests).
    pub fn no_alt_screen(mut self) -> Self {
        self.alt_screen = false;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Switch to the alternate screen and hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.alt_screen {
            self.out.write_all(term::ALT_SCREEN.as_bytes())?;
        }
        self.out.write_all(term::HIDE_CURSOR.as_bytes())?;
        self.out.write_all(term::CLEAR_SCREEN.as_bytes())?;
        self.out.flush()?;
        self.entered = true;
        Ok(())
    }

    /// Return to the normal screen and show the cursor.
    pub fn leave(&mut self) {
        if !self.entered {
            return;
        }
        self.entered = false;
        let _ = self.out.write_all(term::SHOW_CURSOR.as_bytes());
        if self.alt_screen {
            let _ = self.out.write_all(term::NORMAL_SCREEN.as_bytes());
        }
        let _ = self.out.flush();
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.out.write_all(term::CLEAR_SCREEN.as_bytes())
    }

    /// Draw `lines` starting at 1-based cell (x, y), clearing the tail of
    /// each touched row. Drawing is clipped to `height` rows.
    pub fn draw_lines(&mut self, lines: &[String], x: u16, y: u16, height: u16) -> io::Result<()> {
        for (i, line) in lines.iter().take(height as usize).enumerate() {
            let row = y + i as u16;
            self.out.write_all(term::cursor_to(row, x).as_bytes())?;
            self.out.write_all(term::CLEAR_LINE.as_bytes())?;
            self.out.write_all(line.as_bytes())?;
        }
        // Clear any rows the previous frame used below the content.
        for i in lines.len()..height as usize {
            let row = y + i as u16;
            self.out.write_all(term::cursor_to(row, x).as_bytes())?;
            self.out.write_all(term::CLEAR_LINE.as_bytes())?;
        }
        self.out.flush()
    }

    /// Print a transient full-screen message (help text, confirmations).
    pub fn draw_message(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(term::CLEAR_SCREEN.as_bytes())?;
        for (i, line) in text.lines().enumerate() {
            self.out
                .write_all(term::cursor_to(i as u16 + 1, 1).as_bytes())?;
            self.out.write_all(line.as_bytes())?;
        }
        self.out.flush()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.leave();
    }
}
