//! Mapping of request failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use webproj_common::{CoordinateParseError, TransformError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Coordinate(#[from] CoordinateParseError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Transform(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Coordinate(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transform(e) => e.kind(),
            ApiError::Coordinate(_) => "invalid_coordinate",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "Request rejected");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
