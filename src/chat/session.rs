//! The in-memory conversation log for one tutoring session.

use serde::{Deserialize, Serialize};

use crate::dashscope::Role;

/// One role-attributed message in the conversation log. Immutable once
/// appended; the log is only ever bulk-cleared.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// `file://` path of the image attached to this turn, if any. Only
    /// the current turn's image is ever sent to the model; it is kept
    /// here so the transcript can re-render it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Turn {
    pub fn user(content: &str, image: Option<&str>) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
            image: image.map(str::to_string),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
            image: None,
        }
    }
}

/// Ordered, append-only log of turns. Owned by the process for the
/// lifetime of the UI session; lost on restart by design.
#[derive(Default)]
pub struct Session(Vec<Turn>);

impl Session {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn append(&mut self, turn: Turn) {
        self.0.push(turn)
    }

    /// Wipe the conversation. Immediate and total.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    /// The most recent `n` turns, or the whole history when it is
    /// shorter. Always a suffix; older turns silently drop out of
    /// context once the window fills.
    pub fn window(&self, n: usize) -> &[Turn] {
        &self.0[self.0.len().saturating_sub(n)..]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
