use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::dto::ApiResponse;
use crate::domain::chat::request_validator::ChatValidationError;
use crate::domain::chat::service::relay_error::RelayError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] ChatValidationError),

    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(#[from] RelayError),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Client-facing message; diagnostics stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidSchema(_) => "Invalid schema",
            AppError::BodyParsingError(_) => "Invalid JSON body",
            AppError::UpstreamError(_) => "Upstream request failed",
            AppError::PayloadTooLarge(_) => "Request body too large",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidSchema(_) => StatusCode::BAD_REQUEST,
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        let body = Json(ApiResponse::<()>::err(self.public_message()));

        (status, body).into_response()
    }
}
