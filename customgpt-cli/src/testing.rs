//! Test doubles shared by the unit test suites

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::api::client::Transport;
use crate::api::error::ApiResult;
use crate::api::operations::ApiRequest;
use crate::api::resilience::sleeper::Sleeper;
use crate::api::response::ApiResponse;

type Responder = dyn Fn(&ApiRequest, usize) -> ApiResult<ApiResponse> + Send + Sync;

/// Transport answering from a closure `(request, call_index) -> result`,
/// recording every request it receives
pub struct MockTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest, usize) -> ApiResult<ApiResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of requests sent to exactly this path
    pub fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(request, call)
    }
}

/// Sleeper that records the requested waits and returns immediately
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn json_response(status: u16, body: Value) -> ApiResponse {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    ApiResponse::new(
        StatusCode::from_u16(status).unwrap(),
        headers,
        serde_json::to_vec(&body).unwrap(),
    )
}

pub fn rate_limited(retry_after: Option<&str>) -> ApiResponse {
    let mut response = json_response(429, serde_json::json!({ "status": "error" }));
    if let Some(value) = retry_after {
        response
            .headers
            .insert("retry-after", HeaderValue::from_str(value).unwrap());
    }
    response
}
