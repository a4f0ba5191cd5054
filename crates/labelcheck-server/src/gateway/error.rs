use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use labelcheck::VerifyError;
use labelcheck::constants::{LABEL_STATUS_ERROR, LABEL_STATUS_HEADER};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Verification(#[from] VerifyError),

    #[error("model provider not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Verification(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            GatewayError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            error: self.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            LABEL_STATUS_HEADER,
            HeaderValue::from_static(LABEL_STATUS_ERROR),
        );

        (status, headers, Json(self.to_body())).into_response()
    }
}
