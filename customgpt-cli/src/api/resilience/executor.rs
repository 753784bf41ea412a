//! Rate-limit aware execution of single operations
//!
//! The executor sends one [`Operation`] through a [`Transport`]. A 429 answer is
//! retried after exactly the server's Retry-After wait, at most `max_retries`
//! times; every other response is handed back untouched.

use std::sync::Arc;

use log::{debug, error, warn};

use super::config::ResilienceConfig;
use super::rate_limit::RateLimitInfo;
use super::sleeper::{Sleeper, TokioSleeper};
use crate::api::client::Transport;
use crate::api::error::{ApiError, ApiResult};
use crate::api::operations::Operation;
use crate::api::response::ApiResponse;

#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    config: ResilienceConfig,
}

impl Executor {
    /// Create an executor that waits on the tokio timer
    pub fn new(transport: Arc<dyn Transport>, config: ResilienceConfig) -> Self {
        Self::with_sleeper(transport, Arc::new(TokioSleeper), config)
    }

    pub fn with_sleeper(
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
        config: ResilienceConfig,
    ) -> Self {
        Self {
            transport,
            sleeper,
            config,
        }
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.config
    }

    /// Execute with the configured retry budget; failures collapse to `None`
    pub async fn execute(&self, operation: &Operation) -> Option<ApiResponse> {
        self.execute_with_retries(operation, self.config.retry.max_retries)
            .await
    }

    /// Execute with an explicit retry budget; failures are logged and collapse to `None`
    pub async fn execute_with_retries(
        &self,
        operation: &Operation,
        max_retries: u32,
    ) -> Option<ApiResponse> {
        match self.try_execute_with_retries(operation, max_retries).await {
            Ok(response) => Some(response),
            Err(err) if err.is_malformed() => {
                warn!("{} returned an unusable response: {}", operation.name(), err);
                None
            }
            Err(err) => {
                error!(
                    "{} failed{}: {:#}",
                    operation.name(),
                    operation
                        .project_id()
                        .map(|id| format!(" for project {}", id))
                        .unwrap_or_default(),
                    anyhow::Error::from(err)
                );
                None
            }
        }
    }

    /// Execute with the configured retry budget
    pub async fn try_execute(&self, operation: &Operation) -> ApiResult<ApiResponse> {
        self.try_execute_with_retries(operation, self.config.retry.max_retries)
            .await
    }

    /// Send the operation, retrying rate-limited attempts.
    ///
    /// Returns [`ApiError::RateLimited`] once `max_retries` waits have been spent;
    /// a 429 response is never returned as `Ok`.
    pub async fn try_execute_with_retries(
        &self,
        operation: &Operation,
        max_retries: u32,
    ) -> ApiResult<ApiResponse> {
        let request = operation.request();
        let mut retries = 0;

        loop {
            let response = self.transport.send(&request).await?;

            if self.config.monitoring.request_logging {
                debug!(
                    "{} {} -> {} (headers: {:?})",
                    request.method,
                    request.path,
                    response.status_code(),
                    response.headers
                );
            }

            if !response.is_rate_limited() {
                return Ok(response);
            }

            let limit =
                RateLimitInfo::from_headers(&response.headers, self.config.retry.default_retry_after);
            warn!(
                "Rate limited on {}. Remaining requests: {}, reset time: {}, retry after: {}s",
                operation.name(),
                limit.remaining_display(),
                limit.reset_display(),
                limit.retry_after.as_secs()
            );

            if retries >= max_retries {
                return Err(ApiError::RateLimited {
                    retries,
                    retry_after: limit.retry_after,
                });
            }

            warn!(
                "Waiting {} seconds before retry {}/{}",
                limit.retry_after.as_secs(),
                retries + 1,
                max_retries
            );
            self.sleeper.sleep(limit.retry_after).await;
            retries += 1;
        }
    }
}
