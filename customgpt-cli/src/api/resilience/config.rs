//! Retry and request-logging settings for the executor
//!
//! Built from the resolved CLI [`Config`] through a small builder; the
//! defaults mirror the API's documented rate-limit behaviour.

use std::time::Duration;

use crate::config::Config;

/// Settings the [`Executor`](super::Executor) runs with
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub monitoring: MonitoringConfig,
}

/// How a 429 answer is handled
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Waits spent on one operation before it fails as rate limited
    pub max_retries: u32,
    /// Wait used when Retry-After is absent or not a whole number of seconds
    pub default_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_retry_after: Duration::from_secs(30),
        }
    }
}

/// Per-response diagnostics
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Emit status and headers of each response at debug level
    pub request_logging: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            request_logging: true,
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::default()
    }

    /// Retry budget and fallback wait from the CLI configuration. Response
    /// diagnostics are only collected when debug output can show them.
    pub fn from_config(config: &Config) -> Self {
        let verbose = matches!(
            config.log_level.trim().to_ascii_lowercase().as_str(),
            "debug" | "trace"
        );
        Self::builder()
            .max_retries(config.max_retries)
            .default_retry_after(Duration::from_secs(config.default_retry_after_secs))
            .request_logging(verbose)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    pub fn default_retry_after(mut self, wait: Duration) -> Self {
        self.config.retry.default_retry_after = wait;
        self
    }

    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.config.monitoring.request_logging = enabled;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}
