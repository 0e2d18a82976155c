//! Request context middleware
//!
//! Builds a `RequestContext` for each incoming request: the correlation id
//! from the `requestid` header (or a fresh UUID v4), the log fields, and a
//! snapshot of the propagated headers. The context is stored in the request
//! extensions and the rest of the stack runs inside its span.

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use application::{
    PropagationHeaders, REQUEST_ID_HEADER, RequestContext, RequestMetadata, USER_AGENT_HEADER,
    USER_IP_HEADER,
};
use axum::{
    body::Body,
    extract::{FromRequestParts, OriginalUri, Request},
    http::{Extensions, HeaderMap, Uri, request::Parts, uri::PathAndQuery},
    response::Response,
};
use tower::{Layer, Service};
use tracing::Instrument;

/// Layer that attaches a `RequestContext` to every request
#[derive(Debug, Clone, Default)]
pub struct RequestContextLayer;

impl RequestContextLayer {
    /// Create a new request context layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestContextLayer {
    type Service = RequestContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestContextService { inner }
    }
}

/// Service that builds the request context before calling the inner service
#[derive(Debug, Clone)]
pub struct RequestContextService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestContextService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let uri = original_uri(request.extensions(), request.uri());
        let ctx = context_from_parts(uri, request.headers());
        let span = ctx.span().clone();

        request.extensions_mut().insert(ctx);

        let mut inner = self.inner.clone();

        Box::pin(async move { inner.call(request).await }.instrument(span))
    }
}

/// Build a request context from the request line and headers
///
/// Missing or non-UTF-8 headers count as empty.
pub fn context_from_parts(uri: &Uri, headers: &HeaderMap) -> RequestContext {
    let operation = uri
        .path_and_query()
        .map_or_else(|| uri.path(), PathAndQuery::as_str);

    let metadata = RequestMetadata {
        request_id: header_str(headers, REQUEST_ID_HEADER),
        operation,
        user_agent: header_str(headers, USER_AGENT_HEADER),
        user_ip: header_str(headers, USER_IP_HEADER),
    };

    let snapshot = PropagationHeaders::capture(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    });

    RequestContext::new(&metadata, snapshot)
}

/// The URI as received, before any nested router stripped its prefix
fn original_uri<'a>(extensions: &'a Extensions, uri: &'a Uri) -> &'a Uri {
    extensions.get::<OriginalUri>().map_or(uri, |original| &original.0)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Extractor for the request context
///
/// Uses the context stored by `RequestContextLayer`; when the layer is not
/// installed the context is built from the request on the spot.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| {
                context_from_parts(
                    original_uri(&parts.extensions, &parts.uri),
                    &parts.headers,
                )
            });
        Ok(Self(ctx))
    }
}
