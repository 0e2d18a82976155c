//! Message entity - the single resource served by this service

use chrono::{DateTime, Utc};

use crate::value_objects::{MessageId, MessageStatus};

/// A text message with a soft-delete lifecycle
///
/// The identifier is assigned by the store on insert and never changes
/// afterwards. Rows are never removed; deletion only flips the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier, `None` until persisted
    pub id: Option<MessageId>,
    /// Message body
    pub text: String,
    /// Lifecycle status
    pub status: MessageStatus,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last mutated
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new, not yet persisted message
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            text: text.into(),
            status: MessageStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reset the store-managed fields so the message can be inserted
    ///
    /// Whatever id and status the caller supplied are discarded.
    #[must_use]
    pub fn into_new(mut self) -> Self {
        let now = Utc::now();
        self.id = None;
        self.status = MessageStatus::Created;
        self.created_at = now;
        self.updated_at = now;
        self
    }

    /// Replace the text unless `text` is empty
    ///
    /// Returns whether the message changed.
    pub fn apply_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        text.clone_into(&mut self.text);
        self.touch();
        true
    }

    /// Soft-delete the message
    pub fn mark_deleted(&mut self) {
        self.status = MessageStatus::Deleted;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
