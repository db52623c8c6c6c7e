//! Tablero API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use tablero_application::{AccessService, ProxyService};
use tablero_core::AppError;
use tablero_infrastructure::ReqwestUpstreamGateway;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let gateway = ReqwestUpstreamGateway::with_timeout(
        config.upstream_base_url.clone(),
        config.upstream_timeout,
    )?;

    let app_state = AppState {
        access_service: AccessService::default(),
        proxy_service: ProxyService::new(Arc::new(gateway)),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        upstream = %config.upstream_base_url,
        "tablero-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
