//! Working-tree status panel.
//!
//! Lists changed files with their porcelain codes; `a`/space toggles a
//! file between staged and unstaged, `d` discards after a y/n prompt,
//! `e` opens the file in `$EDITOR`, and Enter shows the file's diff in
//! the detail panel.

use colored::*;

use super::panel::{decorate_lines, list_height, movement_delta, truncate_line, Viewport};
use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::model::FileEntry;
use crate::tui::component::{Component, ComponentRegistry, EventOutcome, Message};
use crate::tui::event::{Event, Key};
use crate::tui::screen::{Screen, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusAction {
    ToggleStage,
    Discard,
    Edit,
    ShowDiff,
    Refresh,
}

/// Static key bindings, consulted before any other handling.
const BINDINGS: &[(Key, StatusAction)] = &[
    (Key::Char('a'), StatusAction::ToggleStage),
    (Key::Char(' '), StatusAction::ToggleStage),
    (Key::Char('d'), StatusAction::Discard),
    (Key::Char('e'), StatusAction::Edit),
    (Key::Enter, StatusAction::ShowDiff),
    (Key::Char('r'), StatusAction::Refresh),
];

fn bound_action(key: Key) -> Option<StatusAction> {
    BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, action)| *action)
}

pub struct StatusPanel {
    name: String,
    activated: bool,
    size: Size,
    viewport: Viewport,
    cursor_glyph: String,
    repo: GitRepo,
    files: Vec<FileEntry>,
    lines: Vec<String>,
    needs_fresh: bool,
    /// Index awaiting y/n confirmation for a discard.
    pending_discard: Option<usize>,
    /// A transient message is on screen; the next key dismisses it.
    transient: bool,
}

impl StatusPanel {
    pub fn new(
        registry: &mut ComponentRegistry,
        repo: GitRepo,
        cursor_glyph: &str,
        size: Size,
    ) -> Result<Self> {
        Ok(StatusPanel {
            name: registry.claim("status")?,
            activated: false,
            size,
            viewport: Viewport::new(list_height(size)),
            cursor_glyph: cursor_glyph.to_string(),
            repo,
            files: Vec::new(),
            lines: Vec::new(),
            needs_fresh: true,
            pending_discard: None,
            transient: false,
        })
    }

    /// Re-fetch the file list from git.
    fn fresh(&mut self) -> Result<()> {
        self.files = self.repo.load_status()?;
        self.lines = self.files.iter().map(format_status_line).collect();
        self.viewport.clamp(self.files.len());
        self.needs_fresh = false;
        Ok(())
    }

    fn current_file(&self) -> Option<&FileEntry> {
        self.files.get(self.viewport.cursor())
    }

    fn toggle_stage(&mut self, screen: &mut Screen) -> Result<()> {
        if let Some(file) = self.current_file() {
            if file.stageable() {
                if file.has_unstaged_change {
                    self.repo.stage_file(file)?;
                } else if file.has_staged_change {
                    self.repo.unstage_file(file)?;
                }
            }
        }
        self.fresh()?;
        self.render(screen)
    }

    fn confirm_discard(&mut self, screen: &mut Screen) -> Result<()> {
        let Some(file) = self.current_file() else {
            return Ok(());
        };
        let path = file.path.clone();
        self.pending_discard = Some(self.viewport.cursor());
        screen.draw_message(&format!("Discard all changes to '{path}'? (y/n)"))?;
        Ok(())
    }

    fn discard(&mut self, index: usize, screen: &mut Screen) -> Result<()> {
        if let Some(file) = self.files.get(index) {
            if let Err(e) = self.repo.discard_file(file) {
                screen.draw_message(&format!("Discard failed: {e}"))?;
                self.transient = true;
                return Ok(());
            }
        }
        self.fresh()?;
        self.render(screen)
    }

    fn edit(&mut self, screen: &mut Screen) -> Result<()> {
        let Some(file) = self.current_file() else {
            return Ok(());
        };
        let Some(editor) = std::env::var_os("EDITOR") else {
            screen.draw_message("No $EDITOR configured")?;
            self.transient = true;
            return Ok(());
        };

        // Hand the screen to the editor and take it back afterwards.
        let path = self.repo.workdir().join(&file.path);
        screen.leave();
        let status = std::process::Command::new(editor).arg(&path).status();
        screen.enter()?;
        if let Err(e) = status {
            log::warn!("editor failed: {e}");
        }

        self.fresh()?;
        self.render(screen)
    }

    fn show_diff(&mut self, screen: &mut Screen) -> Result<EventOutcome> {
        let Some(file) = self.current_file() else {
            return Ok(EventOutcome::Consumed);
        };
        let cached = file.has_staged_change && !file.has_unstaged_change;
        let diff = self.repo.file_diff(file, cached)?;
        if diff.trim().is_empty() {
            screen.draw_message("No diff to show")?;
            self.transient = true;
            return Ok(EventOutcome::Consumed);
        }
        Ok(EventOutcome::Emit(Message::Show {
            target: "detail".to_string(),
            back: self.name.clone(),
            title: file.path.clone(),
            lines: diff.lines().map(str::to_string).collect(),
        }))
    }

    fn header(&self) -> String {
        let summary = format!("Status · {} changed", self.files.len());
        let hints = "a:stage d:discard e:edit ⏎:diff 1/2/3:panel q:quit";
        truncate_line(
            &format!("{} {}", summary.bold(), hints.bright_black()),
            self.size.0,
        )
    }
}

impl Component for StatusPanel {
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
        if self.files.is_empty() {
            rows.push("Working tree clean".bright_black().to_string());
        } else {
            rows.extend(decorate_lines(
                &self.lines,
                &self.viewport,
                &self.cursor_glyph,
                self.size.0,
            ));
        }
        screen.draw_lines(&rows, 1, 1, self.size.1)?;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, screen: &mut Screen) -> Result<EventOutcome> {
        if let Some(index) = self.pending_discard.take() {
            if event.as_key() == Some(Key::Char('y')) {
                self.discard(index, screen)?;
            } else {
                self.render(screen)?;
            }
            return Ok(EventOutcome::Consumed);
        }

        if self.transient {
            self.transient = false;
            self.render(screen)?;
            return Ok(EventOutcome::Consumed);
        }

        // Exact binding-table matches win; movement is the fallback.
        let Some(action) = event.as_key().and_then(bound_action) else {
            if let Some(delta) = movement_delta(event, self.viewport.height()) {
                self.viewport.move_cursor(delta, self.files.len());
                self.render(screen)?;
                return Ok(EventOutcome::Consumed);
            }
            return Ok(EventOutcome::Ignored);
        };

        match action {
            StatusAction::ToggleStage => {
                self.toggle_stage(screen)?;
                Ok(EventOutcome::Consumed)
            }
            StatusAction::Discard => {
                self.confirm_discard(screen)?;
                Ok(EventOutcome::Consumed)
            }
            StatusAction::Edit => {
                self.edit(screen)?;
                Ok(EventOutcome::Consumed)
            }
            StatusAction::ShowDiff => self.show_diff(screen),
            StatusAction::Refresh => {
                self.fresh()?;
                self.render(screen)?;
                Ok(EventOutcome::Consumed)
            }
        }
    }

    fn update(&mut self, msg: &Message, _screen: &mut Screen) -> Result<()> {
        if matches!(msg, Message::Refresh) {
            self.needs_fresh = true;
        }
        Ok(())
    }
}

/// Two-character porcelain code with staged half green and unstaged half
/// red, then the path.
fn format_status_line(file: &FileEntry) -> String {
    let staged = &file.short_status[..1];
    let unstaged = &file.short_status[1..2];
    let staged = if file.has_staged_change {
        staged.green().to_string()
    } else {
        staged.red().to_string()
    };
    let unstaged = if unstaged == " " {
        unstaged.to_string()
    } else {
        unstaged.red().to_string()
    };
    format!("{staged}{unstaged} {}", file.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_are_exact_match() {
        assert_eq!(bound_action(Key::Char('a')), Some(StatusAction::ToggleStage));
        assert_eq!(bound_action(Key::Enter), Some(StatusAction::ShowDiff));
        assert_eq!(bound_action(Key::Char('A')), None);
        assert_eq!(bound_action(Key::Char('z')), None);
    }

    #[test]
    fn test_format_status_line_contains_path() {
        let file = FileEntry {
            path: "src/lib.rs".to_string(),
            short_status: " M".to_string(),
            has_staged_change: false,
            has_unstaged_change: true,
            tracked: true,
            deleted: false,
            added: false,
            has_merged_conflicts: false,
        };
        let line = format_status_line(&file);
        assert!(line.contains("src/lib.rs"));
    }
}
