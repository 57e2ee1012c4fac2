use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use grantdeck_core::{ANTI_FORGERY_HEADER, AppError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::health::health_handler;
use crate::handlers::user_permissions::{
    batch_permissions_handler, change_permission_handler, list_subjects_handler,
    subject_permissions_handler,
};
use crate::middleware::require_anti_forgery_token;
use crate::state::AppState;

pub fn build_router(state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route("/api/users", get(list_subjects_handler))
        .route(
            "/api/user_permissions/{subject_id}",
            get(subject_permissions_handler),
        )
        .route(
            "/api/user_permissions/{subject_id}/batch",
            post(batch_permissions_handler),
        )
        .route(
            "/api/user_permissions/{subject_id}/{action}",
            post(change_permission_handler),
        )
        .layer(from_fn_with_state(state.clone(), require_anti_forgery_token));

    Ok(Router::new()
        .route("/health", get(health_handler))
        .merge(api_routes)
        .layer(build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url).map_err(|error| {
        AppError::Validation(format!("invalid AUTHORITY_FRONTEND_URL '{frontend_url}': {error}"))
    })?;
    let anti_forgery_header =
        HeaderName::from_bytes(ANTI_FORGERY_HEADER.as_bytes()).map_err(|error| {
            AppError::Internal(format!("invalid anti-forgery header name: {error}"))
        })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, anti_forgery_header]))
}
