//! Broadcast events emitted after a successful store mutation.

use super::entity::Message;

/// Which mutation produced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastEventKind {
    Created,
    Edited,
    Deleted,
}

/// Immutable snapshot of a mutation, delivered to every live connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastEvent {
    pub kind: BroadcastEventKind,
    pub message: Message,
}

impl BroadcastEvent {
    pub fn created(message: Message) -> Self {
        Self {
            kind: BroadcastEventKind::Created,
            message,
        }
    }

    pub fn edited(message: Message) -> Self {
        Self {
            kind: BroadcastEventKind::Edited,
            message,
        }
    }

    pub fn deleted(message: Message) -> Self {
        Self {
            kind: BroadcastEventKind::Deleted,
            message,
        }
    }
}
