//! Error type for the CustomGPT API layer

use std::time::Duration;

/// Failures produced while sending a request or decoding its response
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but its body is not the shape we expected
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server kept answering 429 after every allowed retry
    #[error("rate limited after {retries} retries (retry after {}s)", retry_after.as_secs())]
    RateLimited { retries: u32, retry_after: Duration },

    /// Non-success HTTP status, with the message the API returned if any
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request could not be assembled (bad header value, unreadable upload, ...)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Malformed responses are never worth re-sending
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
