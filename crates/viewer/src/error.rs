use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use board_core::error::BoardError;
use serde_json::json;

use crate::controller::ControllerError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Closed => AppError::Internal(err.to_string()),
            SessionError::Controller(ControllerError::UnknownMove(_)) => {
                AppError::NotFound(err.to_string())
            }
            SessionError::Controller(e) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Board(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
