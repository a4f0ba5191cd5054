use thiserror::Error;

/// Failure of a single vision-model call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("content policy rejection: {0}")]
    ContentPolicy(String),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to build request: {0}")]
    Request(String),

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ModelError::RateLimited(_))
    }

    pub fn is_content_policy(&self) -> bool {
        matches!(self, ModelError::ContentPolicy(_))
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 429 => ModelError::RateLimited(err.to_string()),
            Some(status) => ModelError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ModelError::Transport(err.to_string()),
        }
    }
}
