//! Rate-limit headers of a 429 response

use std::time::Duration;

use reqwest::header::HeaderMap;

pub const RETRY_AFTER: &str = "retry-after";
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// What the server told us about the rate limit.
///
/// Only `retry_after` drives behaviour; `remaining` and `reset` are kept as the
/// raw header text for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub retry_after: Duration,
    pub remaining: Option<String>,
    pub reset: Option<String>,
}

impl RateLimitInfo {
    /// Read the rate-limit headers, falling back to `default_retry_after`
    /// when Retry-After is absent or not a whole number of seconds
    pub fn from_headers(headers: &HeaderMap, default_retry_after: Duration) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
        };

        let retry_after = text(RETRY_AFTER)
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default_retry_after);

        Self {
            retry_after,
            remaining: text(RATE_LIMIT_REMAINING),
            reset: text(RATE_LIMIT_RESET),
        }
    }

    pub fn remaining_display(&self) -> &str {
        self.remaining.as_deref().unwrap_or("unknown")
    }

    pub fn reset_display(&self) -> &str {
        self.reset.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const DEFAULT: Duration = Duration::from_secs(30);

    #[test]
    fn test_reads_all_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("12"));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
        headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1700000000"));

        let info = RateLimitInfo::from_headers(&headers, DEFAULT);
        assert_eq!(info.retry_after, Duration::from_secs(12));
        assert_eq!(info.remaining_display(), "0");
        assert_eq!(info.reset_display(), "1700000000");
    }

    #[test]
    fn test_missing_retry_after_uses_default() {
        let info = RateLimitInfo::from_headers(&HeaderMap::new(), DEFAULT);
        assert_eq!(info.retry_after, DEFAULT);
        assert_eq!(info.remaining_display(), "unknown");
    }

    #[test]
    fn test_malformed_retry_after_uses_default() {
        let mut headers = HeaderMap::new();
        // HTTP-date form is valid HTTP but not an integer
        headers.insert(
            "Retry-After",
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(RateLimitInfo::from_headers(&headers, DEFAULT).retry_after, DEFAULT);

        headers.insert("Retry-After", HeaderValue::from_static("-5"));
        assert_eq!(RateLimitInfo::from_headers(&headers, DEFAULT).retry_after, DEFAULT);
    }
}
