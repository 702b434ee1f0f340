use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

/// Request errors surfaced to the browser. Backend failures never end up here:
/// they degrade to empty tables or re-rendered sections instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown form '{0}'")]
    UnknownForm(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("habit type must be 'daily' or 'weekly', got '{0}'")]
    InvalidKind(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownForm(_) | AppError::UnknownAction(_) => StatusCode::NOT_FOUND,
            AppError::InvalidKind(_) => StatusCode::BAD_REQUEST,
        };
        warn!(%status, error = %self, "request rejected");

        (status, self.to_string()).into_response()
    }
}
