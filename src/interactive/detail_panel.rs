//! Scrollable text detail panel.
//!
//! Shows whatever the other panels hand it through a `Show` message
//! (a file diff, a commit patch). Escape or backspace returns to the
//! panel that opened it.

use colored::*;

use super::panel::{list_height, movement_delta, truncate_line, Viewport};
use crate::core::error::Result;
use crate::tui::component::{Component, ComponentRegistry, EventOutcome, Message};
use crate::tui::event::{Event, Key};
use crate::tui::screen::{Screen, Size};

pub struct DetailPanel {
    name: String,
    activated: bool,
    size: Size,
    viewport: Viewport,
    title: String,
    lines: Vec<String>,
    /// Component to return to on escape.
    back: Option<String>,
}

impl DetailPanel {
    pub fn new(registry: &mut ComponentRegistry, size: Size) -> Result<Self> {
        Ok(DetailPanel {
            name: registry.claim("detail")?,
            activated: false,
            size,
            viewport: Viewport::new(list_height(size)),
            title: String::new(),
            lines: Vec::new(),
            back: None,
        })
    }

    fn header(&self) -> String {
        let hints = "esc:back j/k:scroll q:quit";
        truncate_line(
            &format!("{} {}", self.title.bold(), hints.bright_black()),
            self.size.0,
        )
    }
}

impl Component for DetailPanel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_activated(&self) -> bool {
        self.activated
    }

    fn set_activated(&mut self, on: bool) {
        self.activated = on;
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.viewport.set_height(list_height(size));
    }

    fn render(&mut self, screen: &mut Screen) -> Result<()> {
        let mut rows = vec![self.header()];
        let (start, end) = self.viewport.range(self.lines.len());
        rows.extend(
            self.lines[start..end]
                .iter()
                .map(|line| truncate_line(line, self.size.0)),
        );
        screen.draw_lines(&rows, 1, 1, self.size.1)?;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, screen: &mut Screen) -> Result<EventOutcome> {
        if let Some(delta) = movement_delta(event, self.viewport.height()) {
            self.viewport.move_cursor(delta, self.lines.len());
            self.render(screen)?;
            return Ok(EventOutcome::Consumed);
        }

        match event.as_key() {
            Some(Key::Escape) | Some(Key::Backspace) => match &self.back {
                Some(back) => Ok(EventOutcome::Emit(Message::Goto {
                    target: back.clone(),
                })),
                None => Ok(EventOutcome::Ignored),
            },
            _ => Ok(EventOutcome::Ignored),
        }
    }

    fn update(&mut self, msg: &Message, _screen: &mut Screen) -> Result<()> {
        if let Message::Show {
            back, title, lines, ..
        } = msg
        {
            self.back = Some(back.clone());
            self.title = title.clone();
            self.lines = lines.clone();
            self.viewport = Viewport::new(list_height(self.size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct NullSink;
    impl io::Write for NullSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_screen() -> Screen {
        Screen::with_writer(Box::new(NullSink), (80, 24)).no_alt_screen()
    }

    #[test]
    fn test_escape_goes_back_to_sender() {
        let mut registry = ComponentRegistry::new();
        let mut panel = DetailPanel::new(&mut registry, (80, 24)).unwrap();
        let mut screen = test_screen();

        panel
            .update(
                &Message::Show {
                    target: "detail".to_string(),
                    back: "status".to_string(),
                    title: "a.txt".to_string(),
                    lines: vec!["+line".to_string()],
                },
                &mut screen,
            )
            .unwrap();

        let outcome = panel
            .handle_event(&Event::Key(Key::Escape), &mut screen)
            .unwrap();
        assert_eq!(
            outcome,
            EventOutcome::Emit(Message::Goto {
                target: "status".to_string()
            })
        );
    }

    #[test]
    fn test_escape_without_content_is_ignored() {
        let mut registry = ComponentRegistry::new();
        let mut panel = DetailPanel::new(&mut registry, (80, 24)).unwrap();
        let mut screen = test_screen();
        let outcome = panel
            .handle_event(&Event::Key(Key::Escape), &mut screen)
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
    }
}
