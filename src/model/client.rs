use std::time::Duration;

use async_openai::types::chat::{
    CreateChatCompletionRequest, CreateChatCompletionResponse, FinishReason,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::constants::PROVIDER_MODE_REAL;

use super::error::ModelError;
use super::{ModelRequest, VisionModel};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiVisionModel {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiVisionModel {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionModel {
    #[instrument(skip(self, request), fields(schema = %request.schema.name))]
    async fn complete(&self, model: &str, request: &ModelRequest) -> Result<String, ModelError> {
        let body = build_request(model, request)?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &text));
        }

        let text = response.text().await?;
        let parsed: CreateChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ModelError::InvalidResponse(format!("unreadable completion: {}", e)))?;
        debug!(model = %parsed.model, "Completion received");
        extract_content(parsed)
    }

    fn provider_mode(&self) -> &'static str {
        PROVIDER_MODE_REAL
    }
}

/// Builds the typed chat completion request for `request`.
pub fn build_request(
    model: &str,
    request: &ModelRequest,
) -> Result<CreateChatCompletionRequest, ModelError> {
    let user_content = match &request.image {
        Some(image) => json!([
            { "type": "text", "text": request.user },
            { "type": "image_url", "image_url": { "url": image.as_str(), "detail": "high" } }
        ]),
        None => Value::String(request.user.clone()),
    };

    let value = json!({
        "model": model,
        "temperature": 0.0,
        "messages": [
            { "role": "system", "content": request.system },
            { "role": "user", "content": user_content }
        ],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": request.schema.name,
                "schema": request.schema.schema,
                "strict": true
            }
        }
    });

    serde_json::from_value(value).map_err(|e| ModelError::Request(e.to_string()))
}

fn error_fields(body: &str) -> (Option<String>, String) {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let error = &parsed["error"];
    let code = error["code"]
        .as_str()
        .or_else(|| error["type"].as_str())
        .map(str::to_string);
    let message = error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(512).collect());
    (code, message)
}

/// Maps a non-success HTTP response onto the retry taxonomy.
pub fn classify_http_failure(status: u16, body: &str) -> ModelError {
    let (code, message) = error_fields(body);

    if status == 429 {
        return ModelError::RateLimited(message);
    }

    let lowered = message.to_ascii_lowercase();
    let policy_code = matches!(
        code.as_deref(),
        Some("content_policy_violation") | Some("content_filter")
    );
    if status == 400 && (policy_code || lowered.contains("content policy") || lowered.contains("safety system")) {
        return ModelError::ContentPolicy(message);
    }

    ModelError::Upstream { status, message }
}

/// Pulls the structured JSON text out of the first choice.
pub fn extract_content(response: CreateChatCompletionResponse) -> Result<String, ModelError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::InvalidResponse("completion has no choices".to_string()))?;

    if matches!(choice.finish_reason, Some(FinishReason::ContentFilter)) {
        return Err(ModelError::ContentPolicy(
            "completion stopped by content filter".to_string(),
        ));
    }
    if let Some(refusal) = choice.message.refusal {
        return Err(ModelError::ContentPolicy(refusal));
    }

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(ModelError::InvalidResponse(
            "completion has no content".to_string(),
        )),
    }
}
