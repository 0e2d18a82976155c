//! HTTP utilities and clients with header propagation
//!
//! Outgoing requests made while serving an inbound request forward the
//! correlation and tracing headers captured in its `RequestContext`.

mod propagating_client;

pub use propagating_client::{
    PropagatingClientConfig, PropagatingHttpClient, PropagatingRequestBuilder, RequestBuilderExt,
};
