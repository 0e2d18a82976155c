//! Message resource handlers

use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, header, request::Parts},
    response::IntoResponse,
};
use domain::{Message, MessageId, MessageStatus};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::{Ctx, JsonBody},
    state::AppState,
};

/// Incoming message body
///
/// Every field is optional. `id` and `status` are accepted for symmetry
/// with the response but never applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagePayload {
    pub id: Option<i64>,
    pub text: Option<String>,
    pub status: Option<String>,
}

impl MessagePayload {
    fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Message as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Option<MessageId>,
    pub text: String,
    pub status: MessageStatus,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            text: message.text,
            status: message.status,
        }
    }
}

fn parse_id(raw: &str) -> Result<MessageId, ApiError> {
    MessageId::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// The `{id}` path segment parsed as a `MessageId`
///
/// Runs ahead of any body extractor, so a malformed id is reported before a
/// malformed body.
#[derive(Debug, Clone, Copy)]
pub struct MessageIdPath(pub MessageId);

impl<S> FromRequestParts<S> for MessageIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        parse_id(&raw).map(Self)
    }
}

/// `POST /message`
pub async fn create_message(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    JsonBody(payload): JsonBody<MessagePayload>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let saved = state
        .message_service
        .save_message(&ctx, Message::new(payload.text()))
        .await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// `GET /message/{id}`
pub async fn get_message(
    State(state): State<AppState>,
    MessageIdPath(id): MessageIdPath,
    Ctx(ctx): Ctx,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.message_service.get_message(&ctx, id).await?;

    Ok(Json(message.into()))
}

/// `PUT /message/{id}`
pub async fn update_message(
    State(state): State<AppState>,
    MessageIdPath(id): MessageIdPath,
    Ctx(ctx): Ctx,
    JsonBody(payload): JsonBody<MessagePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let updated = state
        .message_service
        .update_message(&ctx, id, payload.text())
        .await?;

    Ok(Json(updated.into()))
}

/// `DELETE /message/{id}`
///
/// Answers 200 with an empty body.
pub async fn delete_message(
    State(state): State<AppState>,
    MessageIdPath(id): MessageIdPath,
    Ctx(ctx): Ctx,
) -> Result<impl IntoResponse, ApiError> {
    state.message_service.delete_message(&ctx, id).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_to_empty_text() {
        let payload: MessagePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn payload_accepts_null_text() {
        let payload: MessagePayload = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn payload_accepts_ignored_fields() {
        let payload: MessagePayload =
            serde_json::from_str(r#"{"id": 9, "text": "X", "status": "DELETED"}"#).unwrap();
        assert_eq!(payload.text(), "X");
        assert_eq!(payload.id, Some(9));
    }

    #[test]
    fn response_wire_form() {
        let response = MessageResponse {
            id: Some(MessageId::new(1)),
            text: "X".to_string(),
            status: MessageStatus::Created,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "text": "X", "status": "CREATED"})
        );
    }

    #[tokio::test]
    async fn id_extractor_parses_path_segment() {
        use axum::{Router, body::Body, http::Request, routing::get};
        use tower::ServiceExt;

        async fn echo(MessageIdPath(id): MessageIdPath) -> String {
            id.to_string()
        }

        let app = Router::new().route("/message/{id}", get(echo));
        let ok = app
            .clone()
            .oneshot(Request::get("/message/17").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let bad = app
            .oneshot(Request::get("/message/x1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        let err = parse_id("abc").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "invalid digit found in string");
    }
}
