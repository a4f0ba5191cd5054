//! End-to-end verification of one label image, or a batch of them.

pub mod error;


use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::evaluation::AiEvaluator;
use crate::extraction::{AttemptReport, ExtractionOrchestrator};
use crate::image::{DataUrlPreparer, ImageInput, ImagePreparer};
use crate::label::{AccuracyDecision, ExpectedLabel, ExtractedLabel, ExtractionCandidate};
use crate::merge::{FieldSelection, merge_candidates, select_most_complete};
use crate::model::{OpenAiVisionModel, VisionModel};
use crate::policy::FieldScope;
use crate::report::VerificationReport;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};

pub use error::VerifyError;

/// One label to verify.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifyRequest {
    pub image: ImageInput,
    /// Reference record; a malformed value is treated as absent.
    #[serde(default, deserialize_with = "lenient_expected")]
    pub expected: Option<ExpectedLabel>,
}

impl VerifyRequest {
    pub fn new(image: ImageInput, expected: Option<ExpectedLabel>) -> Self {
        Self { image, expected }
    }
}

fn lenient_expected<'de, D>(deserializer: D) -> Result<Option<ExpectedLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value::<ExpectedLabel>(v) {
        Ok(expected) => Some(expected),
        Err(e) => {
            warn!(error = %e, "Malformed expected label; continuing without it");
            None
        }
    }))
}

/// Result of verifying one label.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub request_id: Uuid,
    /// Merged label, or the most complete candidate when there was nothing to verify against.
    pub label: ExtractedLabel,
    pub evaluation: Option<AccuracyDecision>,
    pub report: Option<VerificationReport>,
    pub attempts: Vec<AttemptReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<FieldSelection>,
    #[serde(skip)]
    pub candidates: Vec<ExtractionCandidate>,
    pub verified_at: DateTime<Utc>,
}

impl VerificationOutcome {
    /// `PASS`, `WARN` or `FAIL` from the report, `None` when unverified.
    pub fn status_label(&self) -> Option<&'static str> {
        self.report.as_ref().map(|r| r.overall().as_header_value())
    }
}

/// Model selection and retry settings for a verifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierSettings {
    pub models: Vec<String>,
    pub retry: RetryPolicy,
}

impl VerifierSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            models: config.models.clone(),
            retry: config.retry.clone(),
        }
    }
}

/// Runs extraction, scoring, merging and reporting for label images.
pub struct LabelVerifier {
    model: Arc<dyn VisionModel>,
    preparer: Arc<dyn ImagePreparer>,
    extractor: ExtractionOrchestrator,
    evaluator: AiEvaluator,
}

impl LabelVerifier {
    pub fn new(
        model: Arc<dyn VisionModel>,
        preparer: Arc<dyn ImagePreparer>,
        settings: VerifierSettings,
    ) -> Self {
        Self::with_sleeper(model, preparer, settings, Arc::new(TokioSleeper))
    }

    /// Like [`LabelVerifier::new`] with an explicit backoff clock.
    pub fn with_sleeper(
        model: Arc<dyn VisionModel>,
        preparer: Arc<dyn ImagePreparer>,
        settings: VerifierSettings,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let extractor = ExtractionOrchestrator::new(
            model.clone(),
            settings.models.clone(),
            settings.retry.clone(),
            sleeper.clone(),
        );
        let evaluator = AiEvaluator::new(model.clone(), settings.models, settings.retry, sleeper);
        Self {
            model,
            preparer,
            extractor,
            evaluator,
        }
    }

    /// Verifier backed by the OpenAI-compatible client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, VerifyError> {
        let api_key = config.require_api_key()?;
        let model = OpenAiVisionModel::new(
            config.api_base_url.clone(),
            api_key,
            config.request_timeout,
        )?;

        Ok(Self::new(
            Arc::new(model),
            Arc::new(DataUrlPreparer),
            VerifierSettings::from_config(config),
        ))
    }

    pub fn provider_mode(&self) -> &'static str {
        self.model.provider_mode()
    }

    #[instrument(skip(self, request), fields(request_id = tracing::field::Empty))]
    pub async fn verify(&self, request: VerifyRequest) -> Result<VerificationOutcome, VerifyError> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let image = self.preparer.prepare(&request.image).await?;
        let expected = request.expected.filter(|expected| {
            let ok = expected.is_well_formed();
            if !ok {
                warn!(
                    missing = ?expected.missing_required(),
                    "Expected label lacks required fields; verifying without it"
                );
            }
            ok
        });

        let output = self.extractor.extract(&image).await?;
        let mut candidates = output.candidates;

        let (label, evaluation, report, selections) = match &expected {
            Some(expected) => {
                let scope = FieldScope::for_expected(expected);
                self.evaluator
                    .evaluate_all(expected, &scope, &mut candidates)
                    .await;

                match merge_candidates(&candidates, expected, &scope) {
                    Some(merged) => {
                        let report = VerificationReport::build(&merged.label, expected);
                        (
                            merged.label,
                            Some(merged.decision),
                            Some(report),
                            merged.selections,
                        )
                    }
                    None => (ExtractedLabel::default(), None, None, Vec::new()),
                }
            }
            None => {
                let label = select_most_complete(&candidates)
                    .map(|c| c.extracted.clone())
                    .unwrap_or_default();
                (label, None, None, Vec::new())
            }
        };

        info!(
            image = %image.fingerprint(),
            candidates = candidates.len(),
            passed = evaluation.as_ref().map(|e| e.passed()),
            overall = report.as_ref().map(|r| r.overall().as_header_value()),
            "Label verified"
        );

        Ok(VerificationOutcome {
            request_id,
            label,
            evaluation,
            report,
            attempts: output.attempts,
            selections,
            candidates,
            verified_at: Utc::now(),
        })
    }

    /// Verifies `requests` in sequential chunks of at most `concurrency` concurrent requests.
    ///
    /// Results are returned in request order.
    pub async fn verify_batch(
        &self,
        requests: Vec<VerifyRequest>,
        concurrency: usize,
    ) -> Vec<Result<VerificationOutcome, VerifyError>> {
        let concurrency = concurrency.max(1);
        let mut results = Vec::with_capacity(requests.len());
        let mut pending = requests.into_iter().peekable();

        while pending.peek().is_some() {
            let chunk: Vec<VerifyRequest> = pending.by_ref().take(concurrency).collect();
            results.extend(join_all(chunk.into_iter().map(|r| self.verify(r))).await);
        }

        info!(
            total = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "Batch verified"
        );
        results
    }
}
