//! Grantdeck reference permission authority.

#![forbid(unsafe_code)]

mod authority_config;
mod authority_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use grantdeck_application::PermissionAdminService;
use grantdeck_core::AppError;
use grantdeck_infrastructure::InMemorySubjectPermissionRepository;
use tracing::info;

use crate::authority_config::{AuthorityConfig, init_tracing};
use crate::authority_router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AuthorityConfig::load()?;

    let repository = Arc::new(InMemorySubjectPermissionRepository::seeded()?);
    let state = AppState {
        permission_admin_service: PermissionAdminService::new(repository),
        csrf_token: config.csrf_token.clone(),
    };
    let app = build_router(state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "grantdeck authority listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("authority server failed: {error}")))
}
