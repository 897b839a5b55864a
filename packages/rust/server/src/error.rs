//! Error responses in `{"detail": "..."}` form.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use kitguide_shared::KitGuideError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    detail: String,
}

impl ApiError {
    /// Map a core error, using `not_found_detail` for unknown kits.
    pub fn from_core(err: KitGuideError, not_found_detail: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound(not_found_detail.to_string());
        }
        error!(error = %err, "request failed");
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let payload = ErrorPayload {
            detail: self.to_string(),
        };
        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from_core(KitGuideError::kit_not_found("X"), "Unknown identifier");
        assert_eq!(err.to_string(), "Unknown identifier");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_errors_are_opaque() {
        let err = ApiError::from_core(KitGuideError::parse("bad"), "Unknown identifier");
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
