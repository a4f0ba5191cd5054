//! Label data model shared by every stage of the pipeline.
//!
//! Field names serialize in camelCase so the same structs double as the model's structured
//! output schema and the gateway's JSON payloads.

pub mod accuracy;
pub mod candidate;
pub mod types;

#[cfg(test)]
mod tests;

pub use accuracy::{AccuracyDecision, FieldAccuracy};
pub use candidate::ExtractionCandidate;
pub use types::{
    AdditiveFlags, AdditiveKind, ExpectedLabel, ExtractedLabel, FieldKey, LabelField,
    ProductType, WarningField,
};
