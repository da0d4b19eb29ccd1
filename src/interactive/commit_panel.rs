//! Commit log panel: pushed commits render differently from unpushed
//! ones, Enter shows the full patch in the detail panel.

use chrono::DateTime;
use colored::*;

use super::panel::{decorate_lines, list_height, movement_delta, truncate_line, Viewport};
use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::model::CommitEntry;
use crate::tui::component::{Component, ComponentRegistry, EventOutcome, Message};
use crate::tui::event::{Event, Key};
use crate::tui::screen::{Screen, Size};

pub struct CommitPanel {
    name: String,
    activated: bool,
    size: Size,
    viewport: Viewport,
    cursor_glyph: String,
    repo: GitRepo,
    limit: usize,
    commits: Vec<CommitEntry>,
    lines: Vec<String>,
    needs_fresh: bool,
}

impl CommitPanel {
    pub fn new(
        registry: &mut ComponentRegistry,
        repo: GitRepo,
        cursor_glyph: &str,
        limit: usize,
        size: Size,
    ) -> Result<Self> {
        Ok(CommitPanel {
            name: registry.claim("commits")?,
            activated: false,
            size,
            viewport: Viewport::new(list_height(size)),
            cursor_glyph: cursor_glyph.to_string(),
            repo,
            limit,
            commits: Vec::new(),
            lines: Vec::new(),
            needs_fresh: true,
        })
    }

    fn fresh(&mut self) -> Result<()> {
        self.commits = self.repo.load_commits(Some(self.limit))?;
        self.lines = self.commits.iter().map(format_commit_line).collect();
        self.viewport.clamp(self.commits.len());
        self.needs_fresh = false;
        Ok(())
    }

    fn show_patch(&mut self) -> Result<EventOutcome> {
        let Some(commit) = self.commits.get(self.viewport.cursor()) else {
            return Ok(EventOutcome::Consumed);
        };
        let patch = self.repo.commit_patch(&commit.sha)?;
        Ok(EventOutcome::Emit(Message::Show {
            target: "detail".to_string(),
            back: self.name.clone(),
            title: format!("{} {}", commit.short_sha(), commit.message),
            lines: patch.lines().map(str::to_string).collect(),
        }))
    }

    fn header(&self) -> String {
        let summary = format!("Commits · {}", self.commits.len());
        let hints = "⏎:patch 1/2/3:panel q:quit";
        truncate_line(
            &format!("{} {}", summary.bold(), hints.bright_black()),
            self.size.0,
        )
    }
}

impl Component for CommitPanel {
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
        if self.commits.is_empty() {
            rows.push("No commits yet".bright_black().to_string());
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
        if let Some(delta) = movement_delta(event, self.viewport.height()) {
            self.viewport.move_cursor(delta, self.commits.len());
            self.render(screen)?;
            return Ok(EventOutcome::Consumed);
        }

        match event.as_key() {
            Some(Key::Enter) => self.show_patch(),
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

fn format_commit_line(commit: &CommitEntry) -> String {
    let date = DateTime::from_timestamp(commit.unix_timestamp, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "????-??-??".to_string());
    let sha = if commit.pushed {
        commit.short_sha().yellow().to_string()
    } else {
        commit.short_sha().red().to_string()
    };
    let tag = if commit.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", commit.tags.join(", "))
    };
    format!(
        "{sha} {} {}{tag} {}",
        date.bright_black(),
        commit.author.cyan(),
        commit.message
    )
}
