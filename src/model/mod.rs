//! Vision-language model seam.
//!
//! [`VisionModel`] is the only way the engine talks to a model. [`OpenAiVisionModel`] speaks the
//! OpenAI-compatible chat completions protocol; [`MockVisionModel`] serves canned responses for
//! tests and the mock provider mode.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;
pub mod schema;


use async_trait::async_trait;

use crate::image::ImageReference;

pub use client::{OpenAiVisionModel, build_request, classify_http_failure, extract_content};
pub use error::ModelError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockVisionModel};
pub use schema::{
    EXTRACTION_SCHEMA_NAME, ResponseSchema, SCORING_SCHEMA_NAME, extraction_schema,
    scoring_schema,
};

/// One structured-output request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub user: String,
    pub image: Option<ImageReference>,
    pub schema: ResponseSchema,
}

impl ModelRequest {
    /// Extraction request for one label image.
    pub fn extraction(image: ImageReference) -> Self {
        Self {
            system: prompt::EXTRACTION_SYSTEM.to_string(),
            user: prompt::EXTRACTION_USER.to_string(),
            image: Some(image),
            schema: extraction_schema(),
        }
    }

    /// Scoring request comparing two field projections.
    pub fn scoring(expected: &serde_json::Value, extracted: &serde_json::Value) -> Self {
        Self {
            system: prompt::EVALUATION_SYSTEM.to_string(),
            user: prompt::evaluation_user(expected, extracted),
            image: None,
            schema: scoring_schema(),
        }
    }
}

#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Runs `request` on `model` and returns the raw JSON text of the structured response.
    async fn complete(&self, model: &str, request: &ModelRequest) -> Result<String, ModelError>;

    /// "mock" or "real", for readiness reporting.
    fn provider_mode(&self) -> &'static str;
}
