pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{ApiConfig, Config};
pub use error::AppError;
pub use state::AppState;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// All routes, behind the API key check
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // User endpoints
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/users/:username", delete(handlers::users::delete_user))
        .route(
            "/api/users/:username/exists",
            get(handlers::users::user_exists),
        )
        .route(
            "/api/users/:username/authenticate",
            post(handlers::users::authenticate),
        )
        .route(
            "/api/users/:username/roles",
            get(handlers::users::get_user_roles).put(handlers::users::update_user_roles),
        )
        // Role endpoints
        .route(
            "/api/roles",
            get(handlers::roles::list_roles).post(handlers::roles::create_role),
        )
        .route("/api/roles/:role", delete(handlers::roles::delete_role))
        .route("/api/roles/:role/exists", get(handlers::roles::role_exists))
        .route("/api/roles/:role/users", get(handlers::roles::users_of_role))
        // Tenant endpoints
        .route("/api/tenant", get(handlers::tenants::get_tenant_id))
        .route("/api/tenants", post(handlers::tenants::create_tenant))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::auth::auth_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
