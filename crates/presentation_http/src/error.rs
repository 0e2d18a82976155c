//! API error handling
//!
//! Every failure is answered with a plain-text body: the raw parse error for
//! malformed input, or the classifier's error code for service failures.
//! Store details never leave the process; the service logs them.

use application::MessageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path parameter or request body
    #[error("{0}")]
    BadRequest(String),

    /// Classified service failure
    #[error(transparent)]
    Message(#[from] MessageError),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Message(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use application::StoreError;
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn bad_request_message_is_raw() {
        let err = ApiError::BadRequest("invalid digit found in string".to_string());
        assert_eq!(err.to_string(), "invalid digit found in string");
    }

    #[test]
    fn message_error_displays_code() {
        let err = ApiError::from(MessageError::classify(StoreError::NotFound));
        assert_eq!(err.to_string(), "error.message-service.message-not-found");
    }

    #[tokio::test]
    async fn into_response_bad_request() {
        let response = ApiError::BadRequest("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, "expected value");
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let err: ApiError = MessageError::classify(StoreError::NotFound).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            "error.message-service.message-not-found"
        );
    }

    #[tokio::test]
    async fn into_response_unexpected_hides_details() {
        let store = StoreError::backend(std::io::Error::other("sqlite:/var/data.db locked"));
        let response = ApiError::from(MessageError::classify(store)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body, "error.message-service.unexpected-error");
        assert!(!body.contains("sqlite"));
    }

    #[tokio::test]
    async fn into_response_is_plain_text() {
        let response = ApiError::BadRequest("x".to_string()).into_response();
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
