//! Request body parsing
//!
//! Provides a `JsonBody` extractor that decodes the raw body as JSON whatever
//! the request's `Content-Type`, answering malformed input with 400 and the
//! decoder's message.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// A JSON extractor that ignores the `Content-Type` header
///
/// # Example
///
/// ```ignore
/// async fn handler(JsonBody(req): JsonBody<MyRequest>) {
///     // req was decoded from the raw body
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}
