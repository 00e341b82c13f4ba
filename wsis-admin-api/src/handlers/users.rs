use crate::{
    dto::{ApiResponse, AuthenticateRequest, AuthenticationDto, CreateUserRequest, ExistsDto},
    error::{AppError, AppResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use wsis_domain::RoleListUpdate;

pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let users = state.admin.list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    if request.username.trim().is_empty() {
        return Err(AppError::BadRequest("username must not be empty".to_string()));
    }

    state
        .admin
        .add_user(&request.username, &request.password, &request.full_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            (),
            format!("User '{}' created", request.username),
        )),
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.admin.delete_user(&username).await?;
    Ok(Json(ApiResponse::success_with_message(
        (),
        format!("User '{username}' deleted"),
    )))
}

pub async fn user_exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<ExistsDto>>> {
    let exists = state.admin.username_exists(&username).await?;
    Ok(Json(ApiResponse::success(ExistsDto { exists })))
}

pub async fn authenticate(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<AuthenticateRequest>,
) -> AppResult<Json<ApiResponse<AuthenticationDto>>> {
    let authenticated = state.admin.authenticate(&username, &request.password).await?;
    Ok(Json(ApiResponse::success(AuthenticationDto { authenticated })))
}

pub async fn get_user_roles(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let roles = state.admin.get_user_roles(&username).await?;
    Ok(Json(ApiResponse::success(roles)))
}

pub async fn update_user_roles(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(update): Json<RoleListUpdate>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.admin.update_user_roles(&username, &update).await?;
    Ok(Json(ApiResponse::success_with_message(
        (),
        format!("Roles of '{username}' updated"),
    )))
}
