use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::session::service::SessionService;
use crate::stats::StatsError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(session_service: Arc<SessionService>) -> Self {
        Self { session_service }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Session {0} is finished")]
    SessionFinished(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SessionFinished(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::BAD_GATEWAY,
            AppError::Stats(StatsError::Validation(_))
            | AppError::Stats(StatsError::MalformedRecord { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Stats(StatsError::UnknownStatType(_))
            | AppError::Stats(StatsError::CapabilityUnavailable { .. }) => StatusCode::BAD_REQUEST,
            AppError::Stats(StatsError::DuplicateStatType(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
