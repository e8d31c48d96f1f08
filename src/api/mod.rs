//! API route definitions
//!
//! REST endpoints consumed by the poster UI. Failures are rendered as
//! `{"message": ..., "success": false}` with a status matching the error kind.

pub mod health;
pub mod resolve;
pub mod tmdb;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::ResolveError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub success: bool,
}

/// Handler error wrapping the pipeline's error type
#[derive(Debug)]
pub struct ApiError(pub ResolveError);

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ResolveError::InvalidInput(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ResolveError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ResolveError::UpstreamFormat { .. } | ResolveError::Request { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ResolveError::UpstreamHttp { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
            ResolveError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the user
    pub fn message(&self) -> String {
        match &self.0 {
            ResolveError::Configuration(message)
            | ResolveError::NotFound(message)
            | ResolveError::InvalidInput(message) => message.clone(),
            ResolveError::UpstreamFormat { message, .. } => message.clone(),
            ResolveError::UpstreamHttp { message, .. } => format!("TMDB API error: {}", message),
            ResolveError::Request { .. } => {
                "Failed to fetch movie data. Please try again.".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_user_facing() {
            tracing::debug!(error = %self.0, "Request failed");
        } else {
            tracing::error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                message: self.message(),
                success: false,
            }),
        )
            .into_response()
    }
}
