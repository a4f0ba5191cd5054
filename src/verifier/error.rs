use thiserror::Error;

use crate::config::ConfigError;
use crate::extraction::ExtractionError;
use crate::image::ImageError;
use crate::model::ModelError;

/// Failure of a whole verification request.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid image: {0}")]
    Image(#[from] ImageError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("model client could not be created: {0}")]
    Client(#[from] ModelError),
}

impl VerifyError {
    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            VerifyError::Image(err) if err.is_client_error() => 400,
            VerifyError::Image(_) => 502,
            VerifyError::Extraction(err) => err.status_code(),
            VerifyError::Configuration(_) | VerifyError::Client(_) => 500,
        }
    }
}
