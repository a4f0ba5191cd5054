//! HTTP client helpers for tests.

use labelcheck::constants::LABEL_STATUS_HEADER;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status code, `X-Label-Status` header and JSON body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub label_status: Option<String>,
    pub body: Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn into_test_response(resp: reqwest::Response) -> Result<TestResponse, TestClientError> {
        let status = resp.status().as_u16();
        let label_status = resp
            .headers()
            .get(LABEL_STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = resp.json().await?;
        Ok(TestResponse {
            status,
            label_status,
            body,
        })
    }

    pub async fn verify(&self, request: &Value) -> Result<TestResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/v1/verify"))
            .json(request)
            .send()
            .await?;
        Self::into_test_response(resp).await
    }

    pub async fn verify_batch(&self, items: Vec<Value>) -> Result<TestResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/v1/verify/batch"))
            .json(&serde_json::json!({ "items": items }))
            .send()
            .await?;
        Self::into_test_response(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<(u16, ReadyResponse), TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub provider_mode: String,
    pub configured: bool,
    pub models: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}
