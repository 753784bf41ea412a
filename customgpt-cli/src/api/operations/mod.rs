//! CustomGPT Operations Module
//!
//! Every endpoint the CLI talks to is an [`Operation`]; the executor turns it
//! into an [`ApiRequest`] once and re-sends that request verbatim on retry.

pub mod operation;
pub mod request;

pub use operation::{
    Operation, PageMetadataUpdate, PluginPayload, ProjectSource, ReportInterval, ReportKind,
    SettingsUpdate,
};
pub use request::{ApiRequest, FormPart, RequestBody};
