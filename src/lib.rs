//! Labelcheck library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`ExtractedLabel`], [`ExpectedLabel`], [`FieldKey`] - Label records
//! - [`FieldAccuracy`], [`AccuracyDecision`] - Per-field 0/1 scores and the verdict
//! - [`ExtractionCandidate`] - One extraction attempt, optionally scored
//!
//! ## Pipeline
//! - [`ExtractionOrchestrator`] - Parallel extraction attempts with model fallback
//! - [`FieldScope`] - Which optional fields apply to a label
//! - [`AiEvaluator`] - Model-backed scoring of candidates
//! - [`merge_candidates`] - Per-field consensus merge
//! - [`compare_label`], [`VerificationReport`] - Deterministic comparison and reporting
//! - [`LabelVerifier`] - All of the above for one request or a batch
//!
//! ## Model Access
//! - [`VisionModel`], [`OpenAiVisionModel`] - Model seam and HTTP client
//! - [`RetryPolicy`], [`call_with_fallback`] - Rate-limit backoff
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod comparator;
pub mod config;
pub mod constants;
pub mod evaluation;
pub mod extraction;
pub mod image;
pub mod label;
pub mod merge;
pub mod model;
pub mod policy;
pub mod report;
pub mod retry;
pub mod similarity;
pub mod verifier;

pub use comparator::{VerificationResult, VerificationStatus, compare_label};
pub use config::{Config, ConfigError};
pub use evaluation::AiEvaluator;
pub use extraction::{
    AttemptOutcome, AttemptReport, ExtractionError, ExtractionOrchestrator, ExtractionOutput,
};
pub use image::{DataUrlPreparer, ImageError, ImageInput, ImagePreparer, ImageReference};
pub use label::{
    AccuracyDecision, AdditiveFlags, AdditiveKind, ExpectedLabel, ExtractedLabel,
    ExtractionCandidate, FieldAccuracy, FieldKey, LabelField, ProductType, WarningField,
};
pub use merge::{FieldSelection, MergeOutcome, merge_candidates, select_most_complete};
#[cfg(any(test, feature = "mock"))]
pub use model::MockVisionModel;
pub use model::{ModelError, ModelRequest, OpenAiVisionModel, VisionModel};
pub use policy::FieldScope;
pub use report::VerificationReport;
#[cfg(any(test, feature = "mock"))]
pub use retry::RecordingSleeper;
pub use retry::{FallbackError, RetryPolicy, Sleeper, TokioSleeper, call_with_fallback};
pub use verifier::{
    LabelVerifier, VerificationOutcome, VerifierSettings, VerifyError, VerifyRequest,
};
