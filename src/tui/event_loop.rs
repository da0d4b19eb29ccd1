//! Top-level event loop driving the component tree.
//!
//! Single-threaded and poll-driven: the only blocking point is the input
//! handle's readiness wait. Resize events re-measure the terminal and
//! cascade through the tree before any other pending event is processed.
//! Loop-level key bindings (the global quit key) are consulted before the
//! root component sees an event.
//!
//! Teardown (leave the alternate screen, show the cursor, restore cooked
//! mode) runs on every exit path: normal quit, EOF, Ctrl-C via the quit
//! flag, and errors, all funnel through the same wrapper.

use std::collections::HashMap;
use std::time::Duration;

use super::component::{Component, Container, EventOutcome};
use super::event::{Event, Key, MouseEvent};
use super::input::InputHandle;
use super::screen::Screen;
use super::terminal::RawTerminal;
use crate::core::error::{GlanceError, Result};

/// Loop-level reactions to bound keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Quit,
}

pub type MouseHandler = Box<dyn FnMut(&MouseEvent)>;

pub struct EventLoop {
    terminal: RawTerminal,
    input: InputHandle,
    screen: Screen,
    bindings: HashMap<Key, LoopAction>,
    mouse_handler: Option<MouseHandler>,
    real_time: bool,
    min_size: (u16, u16),
}

impl EventLoop {
    pub fn new(terminal: RawTerminal, screen: Screen) -> Self {
        let input = InputHandle::from_terminal(&terminal);
        EventLoop {
            terminal,
            input,
            screen,
            bindings: HashMap::new(),
            mouse_handler: None,
            real_time: false,
            min_size: (0, 0),
        }
    }

    /// Bind a key to a loop-level action, bypassing the component tree.
    pub fn bind(mut self, key: Key, action: LoopAction) -> Self {
        self.bindings.insert(key, action);
        self
    }

    pub fn with_mouse_handler(mut self, handler: MouseHandler) -> Self {
        self.mouse_handler = Some(handler);
        self
    }

    /// Redraw on every poll timeout instead of only on input.
    pub fn real_time(mut self, on: bool) -> Self {
        self.real_time = on;
        self
    }

    /// Smallest usable terminal; going below it exits with
    /// [`GlanceError::TerminalTooSmall`].
    pub fn min_size(mut self, cols: u16, rows: u16) -> Self {
        self.min_size = (cols, rows);
        self
    }

    pub fn set_input_timeouts(&mut self, max_wait: Option<Duration>, complete_wait: Duration) {
        self.input.set_input_timeouts(max_wait, complete_wait);
    }

    pub fn terminal_mut(&mut self) -> &mut RawTerminal {
        &mut self.terminal
    }

    /// Run until quit. Terminal state is restored before this returns,
    /// whatever the exit path.
    pub fn run(&mut self, root: &mut Container) -> Result<()> {
        self.terminal.start()?;
        let result = match self.screen.enter() {
            Ok(()) => self.run_inner(root),
            Err(e) => Err(e.into()),
        };
        self.screen.leave();
        self.terminal.stop();
        result
    }

    fn run_inner(&mut self, root: &mut Container) -> Result<()> {
        self.relayout(root)?;
        let quit_flag = self.terminal.quit_flag();

        loop {
            if quit_flag.load(std::sync::atomic::Ordering::SeqCst) || self.input.is_eof() {
                return Ok(());
            }

            let events = self.input.get_input()?;
            if events.is_empty() {
                if self.real_time {
                    root.render(&mut self.screen)?;
                }
                continue;
            }

            for event in events {
                match event {
                    Event::WindowResize => self.relayout(root)?,
                    Event::Key(key) if self.bindings.contains_key(&key) => {
                        match self.bindings[&key] {
                            LoopAction::Quit => return Ok(()),
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Some(handler) = &mut self.mouse_handler {
                            handler(&mouse);
                        }
                    }
                    other => match root.handle_event(&other, &mut self.screen)? {
                        EventOutcome::Exit => return Ok(()),
                        EventOutcome::Emit(msg) => {
                            // The root has no parent to emit to.
                            return Err(GlanceError::unknown_action(msg.action_name()));
                        }
                        EventOutcome::Consumed | EventOutcome::Ignored => {}
                    },
                }
            }
        }
    }

    /// Re-measure the terminal and cascade the new size through the tree.
    fn relayout(&mut self, root: &mut Container) -> Result<()> {
        let (cols, rows) = self.terminal.size();
        let (min_cols, min_rows) = self.min_size;
        if cols < min_cols || rows < min_rows {
            return Err(GlanceError::terminal_too_small(
                cols, rows, min_cols, min_rows,
            ));
        }
        self.screen.set_size((cols, rows));
        root.resize((cols, rows));
        self.screen.clear()?;
        root.render(&mut self.screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::component::{ComponentRegistry, Message};
    use crate::tui::screen::Size;
    use std::io;
    use std::os::unix::io::RawFd;

    struct NullSink;
    impl io::Write for NullSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ExitOnEnter {
        name: String,
        activated: bool,
        resizes: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl Component for ExitOnEnter {
        fn name(&self) -> &str {
            &self.name
        }
        fn is_activated(&self) -> bool {
            self.activated
        }
        fn set_activated(&mut self, on: bool) {
            self.activated = on;
        }
        fn resize(&mut self, _size: Size) {
            self.resizes.set(self.resizes.get() + 1);
        }
        fn render(&mut self, _screen: &mut Screen) -> Result<()> {
            Ok(())
        }
        fn handle_event(&mut self, event: &Event, _screen: &mut Screen) -> Result<EventOutcome> {
            match event {
                Event::Key(Key::Enter) => Ok(EventOutcome::Exit),
                _ => Ok(EventOutcome::Ignored),
            }
        }
        fn update(&mut self, _msg: &Message, _screen: &mut Screen) -> Result<()> {
            Ok(())
        }
    }

    fn pipe_pair() -> (RawFd, RawFd) {
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        (fds[0], fds[1])
    }

    fn feed(fd: RawFd, bytes: &[u8]) {
        let n = unsafe { libc::write(fd, bytes.as_ptr() as *const libc::c_void, bytes.len()) };
        assert_eq!(n, bytes.len() as isize);
    }

    fn test_loop(read_fd: RawFd) -> EventLoop {
        let terminal = RawTerminal::new(read_fd).unwrap();
        let screen = Screen::with_writer(Box::new(NullSink), (80, 24)).no_alt_screen();
        let mut event_loop = EventLoop::new(terminal, screen);
        event_loop.set_input_timeouts(
            Some(Duration::from_millis(20)),
            Duration::from_millis(10),
        );
        event_loop
    }

    fn test_root(registry: &mut ComponentRegistry) -> (Container, std::rc::Rc<std::cell::Cell<u32>>) {
        let resizes = std::rc::Rc::new(std::cell::Cell::new(0));
        let leaf = Box::new(ExitOnEnter {
            name: registry.claim("leaf").unwrap(),
            activated: false,
            resizes: std::rc::Rc::clone(&resizes),
        });
        let children: Vec<Box<dyn Component>> = vec![leaf];
        let container = Container::new(registry, "root", children, "leaf", None).unwrap();
        (container, resizes)
    }

    #[test]
    fn test_bound_quit_key_exits() {
        let (rd, wr) = pipe_pair();
        let mut registry = ComponentRegistry::new();
        let (mut root, _) = test_root(&mut registry);
        let mut event_loop = test_loop(rd).bind(Key::Char('q'), LoopAction::Quit);

        feed(wr, b"q");
        event_loop.run(&mut root).unwrap();
        unsafe { libc::close(wr) };
    }

    #[test]
    fn test_component_exit_outcome_stops_loop() {
        let (rd, wr) = pipe_pair();
        let mut registry = ComponentRegistry::new();
        let (mut root, _) = test_root(&mut registry);
        let mut event_loop = test_loop(rd);

        feed(wr, b"\n");
        event_loop.run(&mut root).unwrap();
        unsafe { libc::close(wr) };
    }

    #[test]
    fn test_eof_stops_loop() {
        let (rd, wr) = pipe_pair();
        let mut registry = ComponentRegistry::new();
        let (mut root, _) = test_root(&mut registry);
        let mut event_loop = test_loop(rd);

        unsafe { libc::close(wr) };
        event_loop.run(&mut root).unwrap();
    }

    #[test]
    fn test_terminal_too_small_fails_cleanly() {
        let (rd, wr) = pipe_pair();
        let mut registry = ComponentRegistry::new();
        let (mut root, _) = test_root(&mut registry);
        // Off-tty size reports 80x24; require more.
        let mut event_loop = test_loop(rd).min_size(200, 50);

        let err = event_loop.run(&mut root).unwrap_err();
        assert!(matches!(err, GlanceError::TerminalTooSmall { .. }));
        unsafe { libc::close(wr) };
    }

    #[test]
    fn test_resize_event_cascades_to_components() {
        let (rd, wr) = pipe_pair();
        let mut registry = ComponentRegistry::new();
        let (mut root, resizes) = test_root(&mut registry);
        let mut event_loop = test_loop(rd);

        // One initial layout pass, then quit via component Exit.
        feed(wr, b"\n");
        event_loop.run(&mut root).unwrap();
        assert_eq!(resizes.get(), 1);
        unsafe { libc::close(wr) };
    }
}
