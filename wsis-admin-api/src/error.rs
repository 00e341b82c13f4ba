use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;
use wsis_domain::RemoteOperationError;

use crate::dto::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Remote(e) => {
                warn!(cause = %e.cause(), "{}", e.message());
                (StatusCode::BAD_GATEWAY, e.message().to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
