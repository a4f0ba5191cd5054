use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use labelcheck::constants::{LABEL_STATUS_HEADER, LABEL_STATUS_UNVERIFIED};
use labelcheck::{VerificationOutcome, VerifyRequest};

use crate::gateway::error::{ErrorResponse, GatewayError};
use crate::gateway::state::HandlerState;

fn parse_verify_request(value: serde_json::Value) -> Result<VerifyRequest, GatewayError> {
    if value.get("image").is_none_or(|image| image.is_null()) {
        return Err(GatewayError::InvalidRequest("image is required".to_string()));
    }
    serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid image: {}", e)))
}

fn json_body(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<serde_json::Value, GatewayError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))
}

fn status_header(outcome: &VerificationOutcome) -> HeaderValue {
    HeaderValue::from_static(outcome.status_label().unwrap_or(LABEL_STATUS_UNVERIFIED))
}

#[instrument(skip(state, request))]
pub async fn verify_handler(
    State(state): State<HandlerState>,
    request: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let request = parse_verify_request(json_body(request)?)?;
    let verifier = state.verifier()?;

    let outcome = verifier.verify(request).await?;

    let mut headers = HeaderMap::new();
    headers.insert(LABEL_STATUS_HEADER, status_header(&outcome));

    info!(
        request_id = %outcome.request_id,
        status = outcome.status_label().unwrap_or(LABEL_STATUS_UNVERIFIED),
        "Verification complete"
    );

    Ok((StatusCode::OK, headers, Json(outcome)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Verified(Box<VerificationOutcome>),
    Failed(ErrorResponse),
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
}

#[instrument(skip(state, request))]
pub async fn verify_batch_handler(
    State(state): State<HandlerState>,
    request: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let batch: BatchRequest = serde_json::from_value(json_body(request)?)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid batch: {}", e)))?;
    let verifier = state.verifier()?;

    let mut results: Vec<Option<BatchItem>> = Vec::with_capacity(batch.items.len());
    let mut valid = Vec::new();
    let mut positions = Vec::new();

    for (position, item) in batch.items.into_iter().enumerate() {
        match parse_verify_request(item) {
            Ok(request) => {
                valid.push(request);
                positions.push(position);
                results.push(None);
            }
            Err(e) => results.push(Some(BatchItem::Failed(e.to_body()))),
        }
    }

    debug!(
        total = results.len(),
        valid = valid.len(),
        concurrency = state.batch_concurrency,
        "Processing batch"
    );

    let verified = verifier.verify_batch(valid, state.batch_concurrency).await;
    for (position, result) in positions.into_iter().zip(verified) {
        results[position] = Some(match result {
            Ok(outcome) => BatchItem::Verified(Box::new(outcome)),
            Err(e) => BatchItem::Failed(GatewayError::from(e).to_body()),
        });
    }

    let results = results.into_iter().flatten().collect();
    Ok((StatusCode::OK, Json(BatchResponse { results })).into_response())
}
