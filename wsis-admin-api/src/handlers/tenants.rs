use crate::{
    dto::{ApiResponse, TenantIdDto},
    error::AppResult,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use wsis_domain::NewTenant;

pub async fn get_tenant_id(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TenantIdDto>>> {
    let tenant_id = state.admin.get_tenant_id().await?;
    Ok(Json(ApiResponse::success(TenantIdDto { tenant_id })))
}

/// The identity server cannot confirm tenant creation, so this always
/// answers 202 and leaves verification to the caller
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(tenant): Json<NewTenant>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    state.admin.create_tenant(&tenant).await;
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::success_with_message(
            (),
            format!("Tenant '{}' submitted", tenant.tenant_domain),
        )),
    )
}
