use crate::{
    dto::{ApiResponse, CreateRoleRequest, ExistsDto},
    error::{AppError, AppResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_roles(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let roles = state.admin.get_all_roles().await?;
    Ok(Json(ApiResponse::success(roles)))
}

pub async fn create_role(
    State(state): State<AppState>,
    Json(request): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("role name must not be empty".to_string()));
    }

    state.admin.add_role(&request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            (),
            format!("Role '{}' created", request.name),
        )),
    ))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.admin.delete_role(&role).await?;
    Ok(Json(ApiResponse::success_with_message(
        (),
        format!("Role '{role}' deleted"),
    )))
}

pub async fn role_exists(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<ApiResponse<ExistsDto>>> {
    let exists = state.admin.is_existing_role(&role).await?;
    Ok(Json(ApiResponse::success(ExistsDto { exists })))
}

pub async fn users_of_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let users = state.admin.get_user_list_of_role(&role).await?;
    Ok(Json(ApiResponse::success(users)))
}
