use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;
use crate::model::{MockVisionModel, ModelError};
use crate::retry::RecordingSleeper;

fn label_json() -> String {
    json!({
        "brandName": { "text": "Old Tom Distillery" },
        "classType": { "text": "Kentucky Straight Bourbon Whiskey" },
        "alcoholContent": { "text": "40% ALC/VOL" },
        "netContents": { "text": "750 mL" },
        "bottlerProducer": { "text": "Bottled by Old Tom Distillery" },
        "countryOfOrigin": null,
        "governmentWarning": { "text": "GOVERNMENT WARNING: ...", "isBold": true, "isAllCaps": true },
        "additivesDisclosed": null
    })
    .to_string()
}

fn orchestrator(model: Arc<MockVisionModel>, sleeper: Arc<RecordingSleeper>) -> ExtractionOrchestrator {
    ExtractionOrchestrator::new(
        model,
        vec!["primary".to_string(), "fallback".to_string()],
        RetryPolicy::immediate(2),
        sleeper,
    )
}

fn image() -> ImageReference {
    ImageReference::new("https://labels.test/front.png")
}

#[tokio::test]
async fn test_two_successful_attempts_yield_two_candidates() {
    let model = Arc::new(MockVisionModel::always(Ok(label_json())));
    let output = orchestrator(model.clone(), Arc::new(RecordingSleeper::new()))
        .extract(&image())
        .await
        .unwrap();

    assert_eq!(output.candidates.len(), 2);
    let mut indices: Vec<usize> = output.candidates.iter().map(|c| c.index).collect();
    indices.sort();
    assert_eq!(indices, vec![0, 1]);
    assert!(output.candidates.iter().all(|c| c.evaluation.is_none()));
    assert!(
        output
            .attempts
            .iter()
            .all(|a| a.outcome == AttemptOutcome::Extracted && a.model.as_deref() == Some("primary"))
    );
    assert_eq!(model.call_count(), 2);
    assert!(model.calls().iter().all(|c| c.has_image));
}

#[tokio::test]
async fn test_unparsable_attempt_is_soft_no_data() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let model = Arc::new(MockVisionModel::from_fn(move |_, _| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok("this is not json".to_string())
        } else {
            Ok(label_json())
        }
    }));

    let output = orchestrator(model, Arc::new(RecordingSleeper::new()))
        .extract(&image())
        .await
        .unwrap();

    assert_eq!(output.candidates.len(), 1);
    let outcomes: Vec<AttemptOutcome> = output.attempts.iter().map(|a| a.outcome).collect();
    assert!(outcomes.contains(&AttemptOutcome::NoData));
    assert!(outcomes.contains(&AttemptOutcome::Extracted));
}

#[tokio::test]
async fn test_partial_upstream_failure_still_succeeds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let model = Arc::new(MockVisionModel::from_fn(move |_, _| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ModelError::Upstream {
                status: 500,
                message: "boom".into(),
            })
        } else {
            Ok(label_json())
        }
    }));

    let output = orchestrator(model, Arc::new(RecordingSleeper::new()))
        .extract(&image())
        .await
        .unwrap();

    assert_eq!(output.candidates.len(), 1);
    assert!(
        output
            .attempts
            .iter()
            .any(|a| a.outcome == AttemptOutcome::Failed && a.error.is_some())
    );
}

#[tokio::test]
async fn test_rate_limit_exhaustion_is_fatal_capacity_error() {
    let model = Arc::new(MockVisionModel::always(Err(ModelError::RateLimited(
        "429".into(),
    ))));
    let sleeper = Arc::new(RecordingSleeper::new());

    let err = orchestrator(model.clone(), sleeper.clone())
        .extract(&image())
        .await
        .unwrap_err();

    assert_eq!(err, ExtractionError::CapacityExhausted { rounds: 2 });
    assert_eq!(err.status_code(), 429);
    // two attempts, two models, one initial pass plus two retry rounds
    assert_eq!(model.call_count(), 2 * 2 * 3);
    assert_eq!(sleeper.sleeps().len(), 4);
}

#[tokio::test]
async fn test_all_upstream_failures_surface_as_upstream() {
    let model = Arc::new(MockVisionModel::always(Err(ModelError::Upstream {
        status: 503,
        message: "unavailable".into(),
    })));
    let err = orchestrator(model, Arc::new(RecordingSleeper::new()))
        .extract(&image())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::Upstream(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_persistent_content_policy_is_no_label_data() {
    let model = Arc::new(MockVisionModel::always(Err(ModelError::ContentPolicy(
        "flagged".into(),
    ))));
    let output = orchestrator(model.clone(), Arc::new(RecordingSleeper::new()))
        .extract(&image())
        .await;

    assert_eq!(output.unwrap_err(), ExtractionError::NoLabelData);
    // one retry per attempt, on the same model
    assert_eq!(model.call_count(), 4);
    assert!(model.calls().iter().all(|c| c.model == "primary"));
}

#[test]
fn test_parse_extraction() {
    let label = parse_extraction(&label_json()).unwrap();
    assert_eq!(label.null_count(), 2);

    assert!(parse_extraction("[]").is_none());
    assert!(parse_extraction("{\"brandName\": 5}").is_none());
    assert!(parse_extraction("{}").is_none());
    assert!(parse_extraction(r#"{"brandName": {"text": "   "}}"#).is_none());
}
