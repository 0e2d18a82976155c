//! Message Service - CRUD over the message resource
//!
//! Every operation logs `ActionLog.<Op>.start` / `.end` through the request's
//! span and classifies store failures before returning them.

use std::sync::Arc;

use chrono::Utc;
use domain::{Message, MessageId};
use tracing::{error, info};

use crate::{
    error::{MessageError, StoreError},
    ports::MessageStore,
    request_context::RequestContext,
};

/// Service for managing messages
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService").finish_non_exhaustive()
    }
}

impl MessageService {
    /// Create a new message service backed by the given store
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Persist a new message
    ///
    /// Any id or status supplied by the caller is discarded; the stored
    /// message is CREATED with a store-assigned id.
    pub async fn save_message(
        &self,
        ctx: &RequestContext,
        message: Message,
    ) -> Result<Message, MessageError> {
        info!(parent: ctx.span(), "ActionLog.SaveMessage.start");

        let saved = self
            .store
            .save(&message.into_new())
            .await
            .map_err(|e| failed(ctx, "SaveMessage", None, e))?;

        info!(parent: ctx.span(), id = ?saved.id, "ActionLog.SaveMessage.end");
        Ok(saved)
    }

    /// Fetch a message by id
    pub async fn get_message(
        &self,
        ctx: &RequestContext,
        id: MessageId,
    ) -> Result<Message, MessageError> {
        info!(parent: ctx.span(), %id, "ActionLog.GetMessage.start");

        let message = self
            .store
            .get(id)
            .await
            .map_err(|e| failed(ctx, "GetMessage", Some(id), e))?;

        info!(parent: ctx.span(), %id, "ActionLog.GetMessage.end");
        Ok(message)
    }

    /// Replace a message's text
    ///
    /// An empty `text` leaves the text untouched; the message is still
    /// written back.
    pub async fn update_message(
        &self,
        ctx: &RequestContext,
        id: MessageId,
        text: &str,
    ) -> Result<Message, MessageError> {
        info!(parent: ctx.span(), %id, "ActionLog.UpdateMessage.start");

        let mut message = self
            .store
            .get(id)
            .await
            .map_err(|e| failed(ctx, "UpdateMessage", Some(id), e))?;

        message.apply_text(text);

        let updated = self
            .store
            .update(&message)
            .await
            .map_err(|e| failed(ctx, "UpdateMessage", Some(id), e))?;

        info!(parent: ctx.span(), %id, "ActionLog.UpdateMessage.end");
        Ok(updated)
    }

    /// Soft-delete a message
    pub async fn delete_message(
        &self,
        ctx: &RequestContext,
        id: MessageId,
    ) -> Result<(), MessageError> {
        info!(parent: ctx.span(), %id, "ActionLog.DeleteMessage.start");

        let mut message = self
            .store
            .get(id)
            .await
            .map_err(|e| failed(ctx, "DeleteMessage", Some(id), e))?;

        message.mark_deleted();

        self.store
            .update(&message)
            .await
            .map_err(|e| failed(ctx, "DeleteMessage", Some(id), e))?;

        info!(parent: ctx.span(), %id, "ActionLog.DeleteMessage.end");
        Ok(())
    }
}

/// Classify a store failure and log it through the request's span
fn failed(
    ctx: &RequestContext,
    operation: &str,
    id: Option<MessageId>,
    err: StoreError,
) -> MessageError {
    let err = MessageError::classify(err);
    let elapsed_ms = (Utc::now() - ctx.received_at()).num_milliseconds();
    error!(
        parent: ctx.span(),
        id = id.as_ref().map(MessageId::as_i64),
        code = err.code(),
        error = %err.store_error(),
        elapsed_ms,
        "ActionLog.{operation}.error"
    );
    err
}
