//! Local branch panel: Enter checks out the branch under the cursor.

use colored::*;

use super::panel::{decorate_lines, list_height, movement_delta, truncate_line, Viewport};
use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::model::BranchEntry;
use crate::tui::component::{Component, ComponentRegistry, EventOutcome, Message};
use crate::tui::event::{Event, Key};
use crate::tui::screen::{Screen, Size};

pub struct BranchPanel {
    name: String,
    activated: bool,
    size: Size,
    viewport: Viewport,
    cursor_glyph: String,
    repo: GitRepo,
    branches: Vec<BranchEntry>,
    lines: Vec<String>,
    needs_fresh: bool,
    transient: bool,
}

impl BranchPanel {
    pub fn new(
        registry: &mut ComponentRegistry,
        repo: GitRepo,
        cursor_glyph: &str,
        size: Size,
    ) -> Result<Self> {
        Ok(BranchPanel {
            name: registry.claim("branches")?,
            activated: false,
            size,
            viewport: Viewport::new(list_height(size)),
            cursor_glyph: cursor_glyph.to_string(),
            repo,
            branches: Vec::new(),
            lines: Vec::new(),
            needs_fresh: true,
            transient: false,
        })
    }

    fn fresh(&mut self) -> Result<()> {
        self.branches = self.repo.load_branches()?;
        self.lines = self
            .branches
            .iter()
            .map(|b| {
                if b.is_current {
                    format!("* {}", b.name).green().to_string()
                } else {
                    format!("  {}", b.name)
                }
            })
            .collect();
        self.viewport.clamp(self.branches.len());
        self.needs_fresh = false;
        Ok(())
    }

    fn checkout(&mut self, screen: &mut Screen) -> Result<()> {
        let Some(branch) = self.branches.get(self.viewport.cursor()) else {
            return Ok(());
        };
        if branch.is_current {
            return Ok(());
        }
        if let Err(e) = self.repo.checkout_branch(&branch.name) {
            screen.draw_message(&format!("Checkout failed: {e}"))?;
            self.transient = true;
            return Ok(());
        }
        self.fresh()?;
        self.render(screen)
    }

    fn header(&self) -> String {
        let summary = format!("Branches · {}", self.branches.len());
        let hints = "⏎:checkout 1/2/3:panel q:quit";
        truncate_line(
            &format!("{} {}", summary.bold(), hints.bright_black()),
            self.size.0,
        )
    }
}

impl Component for BranchPanel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_activated(&self) -> bool {
        self.activated
    }

    fn set_activated(&mut self, on: bool) {
        self.activated = on;
        if on {
            self.needs_fresh = true;
        }
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.viewport.set_height(list_height(size));
        self.needs_fresh = true;
    }

    fn render(&mut self, screen: &mut Screen) -> Result<()> {
        if self.needs_fresh {
            self.fresh()?;
        }
        let mut rows = vec![self.header()];
        rows.extend(decorate_lines(
            &self.lines,
            &self.viewport,
            &self.cursor_glyph,
            self.size.0,
        ));
        screen.draw_lines(&rows, 1, 1, self.size.1)?;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, screen: &mut Screen) -> Result<EventOutcome> {
        if self.transient {
            self.transient = false;
            self.render(screen)?;
            return Ok(EventOutcome::Consumed);
        }

        if let Some(delta) = movement_delta(event, self.viewport.height()) {
            self.viewport.move_cursor(delta, self.branches.len());
            self.render(screen)?;
            return Ok(EventOutcome::Consumed);
        }

        match event.as_key() {
            Some(Key::Enter) => {
                self.checkout(screen)?;
                Ok(EventOutcome::Consumed)
            }
            Some(Key::Char('r')) => {
                self.fresh()?;
                self.render(screen)?;
                Ok(EventOutcome::Consumed)
            }
            _ => Ok(EventOutcome::Ignored),
        }
    }

    fn update(&mut self, msg: &Message, _screen: &mut Screen) -> Result<()> {
        if matches!(msg, Message::Refresh) {
            self.needs_fresh = true;
        }
        Ok(())
    }
}
