use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("model capacity exhausted after {rounds} backoff rounds")]
    CapacityExhausted { rounds: u32 },

    #[error("no extraction attempt produced label data")]
    NoLabelData,

    #[error("extraction failed upstream: {0}")]
    Upstream(String),
}

impl ExtractionError {
    pub fn status_code(&self) -> u16 {
        match self {
            ExtractionError::CapacityExhausted { .. } => 429,
            ExtractionError::NoLabelData | ExtractionError::Upstream(_) => 502,
        }
    }
}
