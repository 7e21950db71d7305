use crate::models::ErrorBody;
use crate::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::Level;

/// Failure kinds surfaced by the HTTP routes.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed body or missing required field.
    InvalidRequest(String),
    /// Prompt composition failed for any reason.
    ComposeFailed(String),
    /// Image generation failed upstream.
    UpstreamFailed(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ComposeFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client mistakes are warnings; failures on our side or upstream are errors.
    pub fn log_level(&self) -> Level {
        match self {
            ApiError::InvalidRequest(_) => Level::WARN,
            ApiError::ComposeFailed(_) | ApiError::UpstreamFailed(_) => Level::ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidRequest(msg)
            | ApiError::ComposeFailed(msg)
            | ApiError::UpstreamFailed(msg) => msg,
        }
    }

    pub fn compose(err: Error) -> Self {
        ApiError::ComposeFailed(err.to_string())
    }

    pub fn generate(err: Error) -> Self {
        match err {
            Error::MissingInput(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::UpstreamFailed(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.log_level() == Level::WARN {
            tracing::warn!("Rejected request ({}): {}", status, self.message());
        } else {
            tracing::error!("Request failed ({}): {}", status, self.message());
        }

        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
