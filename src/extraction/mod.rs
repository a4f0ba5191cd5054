//! Runs the parallel extraction attempts for one label image.

pub mod error;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::EXTRACTION_ATTEMPTS;
use crate::image::ImageReference;
use crate::label::{ExtractedLabel, ExtractionCandidate};
use crate::model::{ModelRequest, VisionModel};
use crate::retry::{FallbackError, RetryPolicy, Sleeper, call_with_fallback};

pub use error::ExtractionError;

/// How one extraction attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Extracted,
    /// The response was empty or did not match the label shape.
    NoData,
    /// Refused on content-policy grounds, including the single retry.
    ContentPolicy,
    CapacityExhausted,
    Failed,
}

/// Per-attempt telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub attempt: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub elapsed_ms: u64,
    pub rate_limit_rounds: u32,
    pub content_policy_retried: bool,
    pub outcome: AttemptOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Candidates from the attempts that produced data, plus telemetry for every attempt.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub candidates: Vec<ExtractionCandidate>,
    pub attempts: Vec<AttemptReport>,
}

pub struct ExtractionOrchestrator {
    model: Arc<dyn VisionModel>,
    models: Vec<String>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ExtractionOrchestrator {
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

    /// Runs [`EXTRACTION_ATTEMPTS`] attempts concurrently.
    ///
    /// Succeeds when at least one attempt produced a parseable label. With no candidates at all,
    /// capacity exhaustion takes precedence over upstream failures, which take precedence over
    /// "no label data".
    pub async fn extract(&self, image: &ImageReference) -> Result<ExtractionOutput, ExtractionError> {
        let fingerprint = image.fingerprint();
        let results = join_all((0..EXTRACTION_ATTEMPTS).map(|i| self.run_attempt(i, image))).await;

        let mut candidates = Vec::new();
        let mut attempts = Vec::with_capacity(results.len());
        let mut exhausted_rounds = None;
        let mut upstream = None;

        for (label, report, failure) in results {
            if let Some(label) = label {
                candidates.push(ExtractionCandidate::new(report.attempt, label));
            }
            match failure {
                Some(FallbackError::CapacityExhausted { rounds }) => {
                    exhausted_rounds = Some(rounds.max(exhausted_rounds.unwrap_or(0)));
                }
                Some(err) if upstream.is_none() => upstream = Some(err.to_string()),
                _ => {}
            }
            attempts.push(report);
        }

        info!(
            image = %fingerprint,
            candidates = candidates.len(),
            attempts = attempts.len(),
            "Extraction finished"
        );

        if candidates.is_empty() {
            if let Some(rounds) = exhausted_rounds {
                return Err(ExtractionError::CapacityExhausted { rounds });
            }
            if let Some(message) = upstream {
                return Err(ExtractionError::Upstream(message));
            }
            return Err(ExtractionError::NoLabelData);
        }

        Ok(ExtractionOutput {
            candidates,
            attempts,
        })
    }

    async fn run_attempt(
        &self,
        attempt: usize,
        image: &ImageReference,
    ) -> (Option<ExtractedLabel>, AttemptReport, Option<FallbackError>) {
        let started = Instant::now();
        let request = ModelRequest::extraction(image.clone());
        let model = self.model.as_ref();
        let request = &request;

        let result = call_with_fallback(
            &self.models,
            &self.policy,
            self.sleeper.as_ref(),
            |name| async move { model.complete(&name, request).await },
        )
        .await;

        let mut report = AttemptReport {
            attempt,
            model: None,
            elapsed_ms: started.elapsed().as_millis() as u64,
            rate_limit_rounds: 0,
            content_policy_retried: false,
            outcome: AttemptOutcome::NoData,
            error: None,
        };

        match result {
            Ok(outcome) => {
                report.model = Some(outcome.model);
                report.rate_limit_rounds = outcome.rate_limit_rounds;
                report.content_policy_retried = outcome.content_policy_retried;

                let label = parse_extraction(&outcome.value);
                report.outcome = if label.is_some() {
                    AttemptOutcome::Extracted
                } else {
                    AttemptOutcome::NoData
                };
                debug!(
                    attempt,
                    model = report.model.as_deref().unwrap_or_default(),
                    elapsed_ms = report.elapsed_ms,
                    outcome = ?report.outcome,
                    "Extraction attempt finished"
                );
                (label, report, None)
            }
            Err(err) if err.is_content_policy() => {
                report.content_policy_retried = true;
                report.outcome = AttemptOutcome::ContentPolicy;
                report.error = Some(err.to_string());
                warn!(attempt, error = %err, "Extraction refused on content policy grounds");
                (None, report, None)
            }
            Err(err) => {
                report.outcome = if err.is_capacity_exhausted() {
                    AttemptOutcome::CapacityExhausted
                } else {
                    AttemptOutcome::Failed
                };
                if let FallbackError::CapacityExhausted { rounds } = err {
                    report.rate_limit_rounds = rounds;
                }
                report.error = Some(err.to_string());
                warn!(attempt, error = %err, "Extraction attempt failed");
                (None, report, Some(err))
            }
        }
    }
}

/// Parses a structured extraction response.
///
/// Returns `None` for anything that does not conform to the label shape, and for a label on
/// which nothing at all was read.
pub fn parse_extraction(raw: &str) -> Option<ExtractedLabel> {
    let label = match serde_json::from_str::<ExtractedLabel>(raw) {
        Ok(label) => label.normalized(),
        Err(e) => {
            debug!(error = %e, "Extraction response did not match the label shape");
            return None;
        }
    };
    if label.null_count() == crate::constants::FIELD_COUNT {
        return None;
    }
    Some(label)
}
