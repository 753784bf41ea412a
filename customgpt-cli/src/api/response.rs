//! Raw API responses and the `{ "status", "data" }` envelope

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ApiResult};

/// Response as received from the transport: status, headers and the undecoded body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Case-insensitive header map
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Standard CustomGPT response envelope. Both fields are optional so that a
/// partial body decodes and the caller decides what is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Laravel-style paginator used by every list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Look up a header as text; non-UTF-8 values are treated as absent
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body as arbitrary JSON
    pub fn json(&self) -> ApiResult<Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::malformed(format!("body is not JSON: {}", e)))
    }

    /// Decode the envelope without looking at the status code
    pub fn envelope<T: DeserializeOwned>(&self) -> ApiResult<Envelope<T>> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::malformed(format!("unexpected response body: {}", e)))
    }

    /// Decode the `data` payload of a successful response.
    ///
    /// Error statuses become [`ApiError::Status`] carrying the server's message;
    /// a success without `data` is a [`ApiError::MalformedResponse`].
    pub fn data<T: DeserializeOwned>(&self) -> ApiResult<T> {
        if !self.is_success() {
            return Err(ApiError::Status {
                status: self.status_code(),
                message: self.error_message(),
            });
        }
        self.envelope::<T>()?
            .data
            .ok_or_else(|| ApiError::malformed("response has no data payload"))
    }

    /// Best-effort extraction of the error message from an error body
    pub fn error_message(&self) -> String {
        let from_json = self.json().ok().and_then(|value| {
            value
                .pointer("/data/message")
                .or_else(|| value.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        match from_json {
            Some(message) => message,
            None => {
                let text = self.text();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    self.status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }
}
