//! Hand-built terminal UI runtime.
//!
//! Layered bottom-up: [`event`] defines the value types; [`trie`] and
//! [`decoder`] turn raw bytes into events; [`terminal`] owns raw mode and
//! signal delivery; [`input`] is the polling loop over both; [`screen`]
//! provides the drawing primitives; [`component`] the UI tree; and
//! [`event_loop`] ties everything together.

pub mod component;
pub mod decoder;
pub mod event;
pub mod event_loop;
pub mod input;
pub mod screen;
pub mod terminal;
mod trie;

pub use component::{Component, ComponentRegistry, Container, EventOutcome, Message, SwitchHandle};
pub use decoder::{DecodeOutcome, Decoder};
pub use event::{Event, Key, MouseEvent, MouseKind};
pub use event_loop::{EventLoop, LoopAction};
pub use input::InputHandle;
pub use screen::{Screen, Size};
pub use terminal::RawTerminal;
