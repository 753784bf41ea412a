//! Resilience features for API calls
//!
//! Provides the rate-limit aware executor, the retry configuration it reads
//! and the parsing of rate-limit headers.

pub mod config;
pub mod executor;
pub mod rate_limit;
pub mod sleeper;

pub use config::ResilienceConfig;
pub use executor::Executor;
