//! CustomGPT REST API Module
//!
//! Client, operation catalogue, response decoding and the rate-limit aware
//! executor every command goes through.

pub mod client;
pub mod error;
pub mod models;
pub mod operations;
pub mod resilience;
pub mod response;
pub mod sse;

pub use client::{Credentials, CustomGptClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use models::{Deletion, Project, ProjectStats};
pub use operations::{
    ApiRequest, Operation, PageMetadataUpdate, PluginPayload, ProjectSource, ReportInterval,
    ReportKind, SettingsUpdate,
};
pub use resilience::{Executor, ResilienceConfig};
pub use response::{ApiResponse, Paginated};
