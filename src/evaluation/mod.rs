//! Model-backed per-field scoring of extraction candidates.


use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::label::{
    AccuracyDecision, ExpectedLabel, ExtractedLabel, ExtractionCandidate, FieldAccuracy, FieldKey,
};
use crate::model::{ModelRequest, VisionModel};
use crate::policy::FieldScope;
use crate::retry::{RetryPolicy, Sleeper, call_with_fallback};

pub struct AiEvaluator {
    model: Arc<dyn VisionModel>,
    models: Vec<String>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl AiEvaluator {
    pub fn new(
        model: Arc<dyn VisionModel>,
        models: Vec<String>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            model,
            models,
            policy,
            sleeper,
        }
    }

    /// Scores one candidate. Any failure, including an unreadable score, yields `None`.
    pub async fn evaluate(
        &self,
        expected: &ExpectedLabel,
        extracted: &ExtractedLabel,
        scope: &FieldScope,
    ) -> Option<AccuracyDecision> {
        let (expected_view, extracted_view) = projections(expected, extracted, scope);
        let request = ModelRequest::scoring(&expected_view, &extracted_view);
        let model = self.model.as_ref();
        let request = &request;

        let outcome = match call_with_fallback(
            &self.models,
            &self.policy,
            self.sleeper.as_ref(),
            |name| async move { model.complete(&name, request).await },
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Scoring call failed");
                return None;
            }
        };

        let accuracy = serde_json::from_str::<Value>(&outcome.value)
            .map_err(|e| e.to_string())
            .and_then(|value| FieldAccuracy::from_value(&value));

        match accuracy {
            Ok(accuracy) => {
                let decision = finalize(accuracy, scope);
                debug!(
                    model = %outcome.model,
                    passed = decision.passed(),
                    "Candidate scored"
                );
                Some(decision)
            }
            Err(e) => {
                warn!(model = %outcome.model, error = %e, "Unreadable scoring response");
                None
            }
        }
    }

    /// Scores every candidate concurrently, assigning each its own evaluation once.
    pub async fn evaluate_all(
        &self,
        expected: &ExpectedLabel,
        scope: &FieldScope,
        candidates: &mut [ExtractionCandidate],
    ) {
        let decisions = join_all(
            candidates
                .iter()
                .map(|c| self.evaluate(expected, &c.extracted, scope)),
        )
        .await;

        for (candidate, decision) in candidates.iter_mut().zip(decisions) {
            candidate.evaluation = decision;
        }
    }
}

fn text_value(text: Option<&str>) -> Value {
    text.map_or(Value::Null, |t| Value::String(t.to_string()))
}

/// Reduced expected and extracted views sent for scoring.
///
/// Both views carry all eight keys; out-of-scope optional fields are null in both.
pub fn projections(
    expected: &ExpectedLabel,
    extracted: &ExtractedLabel,
    scope: &FieldScope,
) -> (Value, Value) {
    let mut expected_view = Map::new();
    let mut extracted_view = Map::new();

    for key in FieldKey::ALL {
        let (wanted, found) = if !scope.is_in_scope(key) {
            (Value::Null, Value::Null)
        } else if key == FieldKey::AdditivesDisclosed {
            (
                json!(expected.additives_detected),
                extracted
                    .additives_disclosed
                    .map_or(Value::Null, |flags| json!(flags)),
            )
        } else {
            (text_value(expected.text(key)), text_value(extracted.text(key)))
        };
        expected_view.insert(key.as_str().to_string(), wanted);
        extracted_view.insert(key.as_str().to_string(), found);
    }

    (Value::Object(expected_view), Value::Object(extracted_view))
}

/// Pins out-of-scope fields to accurate and computes the verdict.
pub fn finalize(mut accuracy: FieldAccuracy, scope: &FieldScope) -> AccuracyDecision {
    for key in scope.forced_pass() {
        accuracy.set(key, true);
    }
    AccuracyDecision::new(accuracy)
}
