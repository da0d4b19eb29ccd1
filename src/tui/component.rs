//! Component tree: leaf panels, the switching container, and the name
//! registry.
//!
//! Components form a parent-owned tree. Two message channels connect it:
//! child→parent by returning [`EventOutcome::Emit`] from `handle_event`
//! (the owning [`Container`] `accept`s it, and an emit escaping the root
//! is a configuration error), and parent→children by `update` fan-out.
//!
//! Invariants:
//! - every component claims a unique name from the run's
//!   [`ComponentRegistry`] at construction; duplicates fail fast;
//! - a container has exactly one activated child at any time; switching
//!   activates the new child and deactivates the previous one atomically
//!   from the tree's point of view;
//! - a container renders only its activated child.

use std::collections::HashMap;
use std::collections::HashSet;

use super::event::Event;
use super::screen::{Screen, Size};
use crate::core::error::{GlanceError, Result};

/// Messages flowing through the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Switch the active child to `target`.
    Goto { target: String },
    /// Switch to `target` and hand it content to display; `back` names
    /// the component to return to.
    Show {
        target: String,
        back: String,
        title: String,
        lines: Vec<String>,
    },
    /// Underlying repository data changed; re-fetch on next render.
    Refresh,
}

impl Message {
    pub fn action_name(&self) -> &'static str {
        match self {
            Message::Goto { .. } => "goto",
            Message::Show { .. } => "show",
            Message::Refresh => "refresh",
        }
    }
}

/// What a component did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not interested; the caller may route it elsewhere.
    Ignored,
    Consumed,
    /// Send a message up to the owning container.
    Emit(Message),
    /// Request the event loop to exit.
    Exit,
}

/// A node in the UI tree.
pub trait Component {
    fn name(&self) -> &str;

    fn is_activated(&self) -> bool;
    fn set_activated(&mut self, on: bool);

    /// Store the new size and recompute cached layout/content.
    fn resize(&mut self, size: Size);

    /// Redraw onto the screen.
    fn render(&mut self, screen: &mut Screen) -> Result<()>;

    /// React to an input event.
    fn handle_event(&mut self, event: &Event, screen: &mut Screen) -> Result<EventOutcome>;

    /// React to a message from the parent. Default: ignore.
    fn update(&mut self, _msg: &Message, _screen: &mut Screen) -> Result<()> {
        Ok(())
    }
}

/// Unique-name registry for one interactive run.
///
/// An explicit object rather than process-global state, so each run (and
/// each test) starts from a clean slate.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    names: HashSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a component name. A duplicate is a fatal configuration
    /// error and leaves the registry unchanged.
    pub fn claim(&mut self, name: &str) -> Result<String> {
        if !self.names.insert(name.to_string()) {
            return Err(GlanceError::duplicate_component(name));
        }
        Ok(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// Decides whether a key switches the active child.
pub type SwitchHandle = Box<dyn Fn(&Event) -> Option<String>>;

/// Stacks children and shows exactly one of them.
pub struct Container {
    name: String,
    activated: bool,
    size: Size,
    children: HashMap<String, Box<dyn Component>>,
    active: String,
    switch_handle: Option<SwitchHandle>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("activated", &self.activated)
            .field("size", &self.size)
            .field("active", &self.active)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Container {
    pub fn new(
        registry: &mut ComponentRegistry,
        name: &str,
        children: Vec<Box<dyn Component>>,
        start_name: &str,
        switch_handle: Option<SwitchHandle>,
    ) -> Result<Self> {
        let name = registry.claim(name)?;

        let mut map = HashMap::new();
        for child in children {
            map.insert(child.name().to_string(), child);
        }
        let start = map
            .get_mut(start_name)
            .ok_or_else(|| GlanceError::UnknownComponent {
                name: start_name.to_string(),
            })?;
        start.set_activated(true);

        Ok(Container {
            name,
            activated: true,
            size: (0, 0),
            children: map,
            active: start_name.to_string(),
            switch_handle,
        })
    }

    pub fn active_child(&self) -> &str {
        &self.active
    }

    /// Activate the named child and deactivate the previous one. An
    /// unknown name changes nothing.
    pub fn switch_child(&mut self, name: &str, screen: &mut Screen) -> Result<()> {
        if !self.children.contains_key(name) {
            return Ok(());
        }
        for child in self.children.values_mut() {
            if child.is_activated() {
                child.set_activated(false);
            }
        }
        let child = self.children.get_mut(name).expect("checked above");
        child.set_activated(true);
        self.active = name.to_string();
        child.render(screen)
    }

    /// Process a message emitted by the active child.
    fn accept(&mut self, msg: Message, screen: &mut Screen) -> Result<EventOutcome> {
        match &msg {
            Message::Goto { target } | Message::Show { target, .. } => {
                let target = target.clone();
                self.switch_child(&target, screen)?;
                if let Some(child) = self.children.get_mut(&target) {
                    child.update(&msg, screen)?;
                    child.render(screen)?;
                }
                Ok(EventOutcome::Consumed)
            }
            _ => Err(GlanceError::unknown_action(msg.action_name())),
        }
    }
}

impl Component for Container {
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
        for child in self.children.values_mut() {
            child.resize(size);
        }
    }

    /// Only the activated child renders.
    fn render(&mut self, screen: &mut Screen) -> Result<()> {
        if let Some(child) = self.children.get_mut(&self.active) {
            child.render(screen)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, screen: &mut Screen) -> Result<EventOutcome> {
        let outcome = match self.children.get_mut(&self.active) {
            Some(child) => child.handle_event(event, screen)?,
            None => EventOutcome::Ignored,
        };

        let outcome = match outcome {
            EventOutcome::Emit(msg) => self.accept(msg, screen)?,
            other => other,
        };
        if matches!(outcome, EventOutcome::Exit) {
            return Ok(outcome);
        }

        let target = self.switch_handle.as_ref().and_then(|handle| handle(event));
        if let Some(target) = target {
            self.switch_child(&target, screen)?;
        }

        Ok(outcome)
    }

    /// `notify`: distribute a message to every child.
    fn update(&mut self, msg: &Message, screen: &mut Screen) -> Result<()> {
        for child in self.children.values_mut() {
            child.update(msg, screen)?;
        }
        Ok(())
    }
}
