//! Shared, append-only message log for one orchestration session.
//!
//! The forum totally orders every message via a monotonically increasing
//! sequence number assigned under the same lock as the append, so concurrent
//! posters can never race on ordering or observe a partially written entry.
//! Messages are immutable once appended; there is no delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

/// One transcript entry. Content is expected to be redacted by the caller
/// before posting; the forum stores it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumMessage {
    pub role: Role,
    pub author: String,
    pub content: String,
    pub round: u32,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ForumState {
    messages: Vec<ForumMessage>,
    next_sequence: u64,
}

/// In-memory forum for orchestration transcripts.
#[derive(Debug, Default)]
pub struct Forum {
    state: Mutex<ForumState>,
}

impl Forum {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning the next sequence number atomically with
    /// respect to concurrent posters. Returns the stored message.
    pub fn post(
        &self,
        role: Role,
        author: impl Into<String>,
        content: impl Into<String>,
        round: u32,
    ) -> ForumMessage {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        debug_assert!(
            state.messages.last().is_none_or(|last| round >= last.round),
            "round must be non-decreasing across the sequence"
        );

        let message = ForumMessage {
            role,
            author: author.into(),
            content: content.into(),
            round,
            sequence: state.next_sequence,
            timestamp: Utc::now(),
        };
        state.next_sequence += 1;
        state.messages.push(message.clone());
        message
    }

    /// All messages in sequence order.
    #[must_use]
    pub fn all(&self) -> Vec<ForumMessage> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .clone()
    }

    /// Messages matching `predicate`, in sequence order.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&ForumMessage) -> bool) -> Vec<ForumMessage> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .iter()
            .filter(|m| predicate(m))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
