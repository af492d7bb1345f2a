//! Provider client error types.

/// Errors from the routing provider clients.
///
/// Transit and bike-path failures propagate to the candidate builder that
/// issued them, which aborts that one candidate attempt. Pedestrian-path
/// failures never surface here: the pedestrian client absorbs them into an
/// empty coordinate list.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, with the raw body for diagnosis.
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Payload did not match the documented response shape.
    #[error("malformed provider payload: {message}")]
    Malformed { message: String },

    /// The provider answered successfully but with no usable routes.
    #[error("provider returned no routes")]
    EmptyResponse,

    /// The request was rejected locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}
