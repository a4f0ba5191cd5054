//! Router-level tests for the gateway handlers.

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use labelcheck::constants::{LABEL_STATUS_HEADER, STANDARD_WARNING_UPPER};
use labelcheck::image::DataUrlPreparer;
use labelcheck::model::{MockVisionModel, ModelError};
use labelcheck::retry::RecordingSleeper;
use labelcheck::{Config, LabelVerifier, RetryPolicy, VerifierSettings};

use crate::gateway::create_router_with_state;
use crate::gateway::state::HandlerState;

fn mock_config() -> Config {
    Config {
        mock_provider: true,
        ..Default::default()
    }
}

fn canned_router() -> Router {
    create_router_with_state(HandlerState::from_config(&mock_config()))
}

fn rate_limited_router() -> Router {
    let verifier = LabelVerifier::with_sleeper(
        Arc::new(MockVisionModel::always(Err(ModelError::RateLimited(
            "429".into(),
        )))),
        Arc::new(DataUrlPreparer),
        VerifierSettings {
            models: vec!["primary".to_string()],
            retry: RetryPolicy::immediate(1),
        },
        Arc::new(RecordingSleeper::new()),
    );
    create_router_with_state(HandlerState::new(Arc::new(verifier), &mock_config()))
}

fn expected_json() -> serde_json::Value {
    serde_json::json!({
        "brandName": "Old Tom Distillery",
        "classType": "Kentucky Straight Bourbon Whiskey",
        "alcoholContent": "45%",
        "netContents": "750 mL",
        "bottlerProducer": "Bottled by Old Tom Distillery, Bardstown, KY",
        "governmentWarning": STANDARD_WARNING_UPPER,
        "productType": "whiskey"
    })
}

fn image_json() -> serde_json::Value {
    serde_json::json!({ "url": "https://labels.test/front.png" })
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn label_status(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(LABEL_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = get(&canned_router(), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_provider_mode() {
    let response = get(&canned_router(), "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["provider_mode"], "mock");
    assert_eq!(body["configured"], true);
    assert_eq!(body["models"], serde_json::json!(["gpt-4o", "gpt-4o-mini"]));
}

#[tokio::test]
async fn test_ready_is_unavailable_without_credentials() {
    let router = create_router_with_state(HandlerState::from_config(&Config::default()));
    let response = get(&router, "/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["configured"], false);
}

#[tokio::test]
async fn test_verify_matching_label_passes() {
    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "image": image_json(), "expected": expected_json() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(label_status(&response), "PASS");

    let body = body_json(response).await;
    assert!(body["requestId"].is_string());
    assert!(body["verifiedAt"].is_string());
    assert_eq!(body["evaluation"]["passed"], true);
    assert_eq!(body["report"]["overall"], "pass");
    assert_eq!(body["attempts"].as_array().unwrap().len(), 2);
    assert_eq!(body["label"]["brandName"]["text"], "Old Tom Distillery");
}

#[tokio::test]
async fn test_verify_mismatch_fails() {
    let mut expected = expected_json();
    expected["brandName"] = serde_json::json!("Buffalo Creek");

    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "image": image_json(), "expected": expected }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(label_status(&response), "FAIL");
}

#[tokio::test]
async fn test_verify_without_expected_is_unverified() {
    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "image": image_json() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(label_status(&response), "UNVERIFIED");
    let body = body_json(response).await;
    assert!(body["evaluation"].is_null());
    assert!(body["report"].is_null());
}

#[tokio::test]
async fn test_malformed_expected_degrades_to_unverified() {
    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "image": image_json(), "expected": "not a label" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(label_status(&response), "UNVERIFIED");
}

#[tokio::test]
async fn test_missing_image_is_bad_request() {
    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "expected": expected_json() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(label_status(&response), "ERROR");
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("image is required"));
}

async fn post_raw(router: &Router, uri: &str, content_type: Option<&str>, body: &str) -> axum::response::Response {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_unparsable_body_gets_structured_error() {
    let router = canned_router();
    let cases = [
        ("/v1/verify", Some("application/json"), "{not json"),
        ("/v1/verify", None, r#"{"image":{"url":"https://labels.test/a.png"}}"#),
        ("/v1/verify/batch", Some("text/plain"), "items"),
    ];

    for (uri, content_type, body) in cases {
        let response = post_raw(&router, uri, content_type, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {:?}", uri, content_type);
        assert_eq!(label_status(&response), "ERROR");

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
    }
}

#[tokio::test]
async fn test_unsupported_upload_is_bad_request() {
    let response = post_json(
        &canned_router(),
        "/v1/verify",
        serde_json::json!({ "image": { "data": "AQID", "mimeType": "application/pdf" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unconfigured_provider_is_server_error() {
    let router = create_router_with_state(HandlerState::from_config(&Config::default()));
    let response = post_json(
        &router,
        "/v1/verify",
        serde_json::json!({ "image": image_json() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("LABELCHECK_API_KEY"));
}

#[tokio::test]
async fn test_rate_limit_exhaustion_is_too_many_requests() {
    let response = post_json(
        &rate_limited_router(),
        "/v1/verify",
        serde_json::json!({ "image": image_json(), "expected": expected_json() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await["status"], 429);
}

#[tokio::test]
async fn test_batch_reports_each_item() {
    let response = post_json(
        &canned_router(),
        "/v1/verify/batch",
        serde_json::json!({
            "items": [
                { "image": image_json(), "expected": expected_json() },
                { "expected": expected_json() },
                { "image": { "url": "ftp://labels.test/front.png" } },
                { "image": image_json() }
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["evaluation"]["passed"], true);
    assert_eq!(results[1]["status"], 400);
    assert_eq!(results[2]["status"], 400);
    assert!(results[3]["requestId"].is_string());
}

#[tokio::test]
async fn test_batch_requires_items() {
    let response = post_json(
        &canned_router(),
        "/v1/verify/batch",
        serde_json::json!({ "requests": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
