//! Interactive full-screen repository browser.
//!
//! Builds the component tree (status, branches and commits panels plus a
//! shared detail panel, stacked in one container) and runs the event
//! loop over it. `1`/`2`/`3` switch panels, `q` and Ctrl-C quit.

mod branch_panel;
mod commit_panel;
mod detail_panel;
mod panel;
mod status_panel;

pub use branch_panel::BranchPanel;
pub use commit_panel::CommitPanel;
pub use detail_panel::DetailPanel;
pub use status_panel::StatusPanel;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::tui::component::{Component, ComponentRegistry, Container, SwitchHandle};
use crate::tui::event::{Event, Key};
use crate::tui::event_loop::{EventLoop, LoopAction};
use crate::tui::screen::Screen;
use crate::tui::terminal::RawTerminal;

/// Smallest terminal the browser is usable in.
const MIN_COLS: u16 = 60;
const MIN_ROWS: u16 = 8;

/// Which panel starts activated.
pub const START_PANEL: &str = "status";

/// Run the interactive browser until the user quits.
pub fn browse(config: &Config) -> Result<()> {
    let repo = GitRepo::open(std::env::current_dir()?)?;

    let terminal = RawTerminal::stdin()?;
    let size = terminal.size();
    let screen = Screen::new(size);

    let mut registry = ComponentRegistry::new();
    let glyph = config.cursor_glyph();

    let children: Vec<Box<dyn Component>> = vec![
        Box::new(StatusPanel::new(&mut registry, repo.clone(), glyph, size)?),
        Box::new(BranchPanel::new(&mut registry, repo.clone(), glyph, size)?),
        Box::new(CommitPanel::new(
            &mut registry,
            repo,
            glyph,
            config.commit_page_size,
            size,
        )?),
        Box::new(DetailPanel::new(&mut registry, size)?),
    ];

    let switch: SwitchHandle = Box::new(|event| match event {
        Event::Key(Key::Char('1')) => Some("status".to_string()),
        Event::Key(Key::Char('2')) => Some("branches".to_string()),
        Event::Key(Key::Char('3')) => Some("commits".to_string()),
        _ => None,
    });

    let mut root = Container::new(&mut registry, "main", children, START_PANEL, Some(switch))?;

    let mut event_loop = EventLoop::new(terminal, screen)
        .bind(Key::Char('q'), LoopAction::Quit)
        .bind(Key::Ctrl('c'), LoopAction::Quit)
        .min_size(MIN_COLS, MIN_ROWS);
    event_loop
        .terminal_mut()
        .set_mouse_tracking(config.mouse_tracking);

    let result = event_loop.run(&mut root);
    registry.clear();
    result
}
