//! HTTP client for the CustomGPT REST API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};

use super::error::{ApiError, ApiResult};
use super::operations::{ApiRequest, FormPart, RequestBody};
use super::response::ApiResponse;

pub const DEFAULT_BASE_URL: &str = "https://app.customgpt.ai/api/v1/";

/// Something that can deliver an [`ApiRequest`] and hand back the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

/// Bearer token for the API
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// reqwest-backed transport that attaches the bearer token to every request
#[derive(Debug, Clone)]
pub struct CustomGptClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl CustomGptClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("customgpt-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and a relative endpoint path with exactly one slash
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for CustomGptClient {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(self.credentials.api_key())
            .header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

/// Forms are consumed on send, so one is built per attempt from the stored parts
fn build_form(parts: &[FormPart]) -> ApiResult<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str("application/octet-stream")
                    .map_err(|e| ApiError::invalid_request(e.to_string()))?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> CustomGptClient {
        CustomGptClient::new(
            server.url("/api/v1/"),
            Credentials::new("secret-token"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_joining() {
        let client = CustomGptClient::new(
            "https://example.test/api/v1/",
            Credentials::new("k"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.url_for("projects/1/stats"),
            "https://example.test/api/v1/projects/1/stats"
        );
        assert_eq!(client.url_for("/user"), "https://example.test/api/v1/user");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let debug = format!("{:?}", Credentials::new("super-secret"));
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/projects")
                    .query_param("page", "2")
                    .header("authorization", "Bearer secret-token");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "status": "success", "data": { "data": [], "total": 0 } }));
            })
            .await;

        let response = client(&server)
            .send(&ApiRequest::get("projects").query("page", 2))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json().unwrap()["data"]["total"], 0);
    }

    #[tokio::test]
    async fn test_sends_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/projects/3/conversations")
                    .json_body(json!({ "name": "Test Conversation" }));
                then.status(201)
                    .json_body(json!({ "data": { "session_id": "abc", "name": "Test Conversation" } }));
            })
            .await;

        let request = ApiRequest::post("projects/3/conversations")
            .json(json!({ "name": "Test Conversation" }));
        let response = client(&server).send(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code(), 201);
    }

    #[tokio::test]
    async fn test_rate_limit_headers_are_preserved() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/projects/9");
                then.status(429)
                    .header("Retry-After", "15")
                    .header("X-RateLimit-Remaining", "0");
            })
            .await;

        let response = client(&server)
            .send(&ApiRequest::delete("projects/9"))
            .await
            .unwrap();

        assert!(response.is_rate_limited());
        assert_eq!(response.header("retry-after"), Some("15"));
        assert_eq!(response.header("x-ratelimit-remaining"), Some("0"));
    }

    #[tokio::test]
    async fn test_multipart_body_contains_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/projects/4/settings")
                    .body_includes("example_questions[0]")
                    .body_includes("Test1");
                then.status(200).json_body(json!({ "data": { "updated": true } }));
            })
            .await;

        let request = ApiRequest::post("projects/4/settings")
            .multipart(vec![FormPart::text("example_questions[0]", "Test1")]);
        client(&server).send(&request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = CustomGptClient::new(
            "http://127.0.0.1:9/",
            Credentials::new("k"),
            Duration::from_millis(500),
        )
        .unwrap();

        let err = client.send(&ApiRequest::get("user")).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
