use crate::{error::AppError, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Skip auth for health check
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let Some(expected_api_key) = state.config.api.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(api_key) if api_key == expected_api_key => Ok(next.run(request).await),
        _ => Err(AppError::Unauthorized),
    }
}
