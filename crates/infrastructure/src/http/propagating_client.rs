//! HTTP client that forwards the inbound request's propagation headers
//!
//! Outgoing calls made on behalf of a request carry the correlation and
//! B3/OpenTracing headers captured by the request context middleware.
//!
//! # Examples
//!
//! ```ignore
//! use infrastructure::http::PropagatingHttpClient;
//!
//! let client = PropagatingHttpClient::new()?;
//! let response = client
//!     .get("https://api.example.com/data")
//!     .with_context(&ctx)
//!     .send()
//!     .await?;
//! ```

use std::time::Duration;

use application::RequestContext;
use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{HeaderName, HeaderValue},
};
use tracing::{debug, instrument};

/// Configuration for the propagating HTTP client
#[derive(Debug, Clone)]
pub struct PropagatingClientConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent used when the context carries none
    pub user_agent: String,
}

impl Default for PropagatingClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: format!("message-service/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PropagatingClientConfig {
    /// Create a new configuration with custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client that copies propagation headers onto outgoing requests
#[derive(Debug, Clone)]
pub struct PropagatingHttpClient {
    inner: Client,
    config: PropagatingClientConfig,
}

impl PropagatingHttpClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(PropagatingClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: PropagatingClientConfig) -> Result<Self, reqwest::Error> {
        let inner = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { inner, config })
    }

    #[must_use]
    pub const fn config(&self) -> &PropagatingClientConfig {
        &self.config
    }

    /// Start a GET request
    pub fn get(&self, url: impl AsRef<str>) -> PropagatingRequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&self, url: impl AsRef<str>) -> PropagatingRequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start a PUT request
    pub fn put(&self, url: impl AsRef<str>) -> PropagatingRequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Start a DELETE request
    pub fn delete(&self, url: impl AsRef<str>) -> PropagatingRequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Start a request with a specific method
    pub fn request(&self, method: Method, url: impl AsRef<str>) -> PropagatingRequestBuilder {
        PropagatingRequestBuilder::new(self.inner.request(method, url.as_ref()))
    }
}

/// A request builder that carries a request's propagation headers
pub struct PropagatingRequestBuilder {
    inner: RequestBuilder,
    request_id: Option<String>,
    propagated: Vec<(&'static str, String)>,
}

impl std::fmt::Debug for PropagatingRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagatingRequestBuilder")
            .field("request_id", &self.request_id)
            .field("propagated", &self.propagated.len())
            .finish_non_exhaustive()
    }
}

impl PropagatingRequestBuilder {
    #[allow(clippy::missing_const_for_fn)]
    fn new(inner: RequestBuilder) -> Self {
        Self {
            inner,
            request_id: None,
            propagated: Vec::new(),
        }
    }

    /// Forward the non-empty propagation headers of `ctx`
    #[must_use]
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.request_id = Some(ctx.request_id().to_owned());
        self.propagated = ctx
            .headers()
            .present()
            .map(|(name, value)| (name, value.to_owned()))
            .collect();
        self
    }

    /// Add a header to the request
    #[must_use]
    pub fn header(
        mut self,
        name: impl TryInto<HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.inner = self.inner.header(name, value);
        }
        self
    }

    /// Set the request body as JSON
    #[must_use]
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.inner = self.inner.json(json);
        self
    }

    /// Set the request body as raw bytes
    #[must_use]
    pub fn body(mut self, body: impl Into<reqwest::Body>) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Send the request
    #[instrument(skip(self), fields(request_id = ?self.request_id))]
    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let mut builder = self.inner;

        for (name, value) in &self.propagated {
            builder = builder.header(*name, value.as_str());
        }
        if !self.propagated.is_empty() {
            debug!(
                headers = self.propagated.len(),
                "Sending request with propagated headers"
            );
        }

        builder.send().await
    }
}

/// Extension trait for adding propagation headers to plain reqwest builders
pub trait RequestBuilderExt {
    /// Copy the non-empty propagation headers of `ctx`
    #[must_use]
    fn with_context(self, ctx: &RequestContext) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn with_context(self, ctx: &RequestContext) -> Self {
        ctx.headers()
            .present()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }
}
