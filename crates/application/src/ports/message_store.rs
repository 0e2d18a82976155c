//! Message persistence port
//!
//! The only thing the service needs from a store is to tell "no matching
//! row" apart from every other failure.

use async_trait::async_trait;
use domain::{Message, MessageId};
#[cfg(test)]
use mockall::automock;

use crate::error::StoreError;

/// Port for message persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message and return it with its store-assigned id
    async fn save(&self, message: &Message) -> Result<Message, StoreError>;

    /// Overwrite an existing message, matched by id
    ///
    /// Returns `StoreError::NotFound` when no row has the message's id.
    async fn update(&self, message: &Message) -> Result<Message, StoreError>;

    /// Fetch a message by id
    ///
    /// Returns `StoreError::NotFound` when no row matches.
    async fn get(&self, id: MessageId) -> Result<Message, StoreError>;
}
