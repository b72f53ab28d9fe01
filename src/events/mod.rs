//! Events Module
//!
//! Publish/subscribe fan-out for notifications between components that do not
//! know each other.
//!
//! ## Structure
//! ```text
//! EventKind ──► { SubscriberId ──► Callback }
//! ```
//! The registry is an ordinary value. Components that publish or subscribe are
//! handed an `Arc<EventRegistry>`; there is no process-wide instance.

mod registry;

pub use registry::{Callback, EventRegistry, SubscriberId};

use crate::log::FlushSummary;

/// Kinds of events that can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// A history log wrote its pending entries
    Flushed,

    /// Application settings changed
    SettingsChanged,

    /// A consumer should refill its inputs from history
    TriggerAutoFill,
}

/// An event and its payload
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Flushed(FlushSummary),
    SettingsChanged(String),
    TriggerAutoFill(String),
}

impl Event {
    /// The kind subscribers register for
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Flushed(_) => EventKind::Flushed,
            Event::SettingsChanged(_) => EventKind::SettingsChanged,
            Event::TriggerAutoFill(_) => EventKind::TriggerAutoFill,
        }
    }
}
