//! aaprov API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use aaprov_core::AppError;
use aaprov_infrastructure::{EnvCredentialProvider, ProvisioningSettings};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let settings = ProvisioningSettings::from_env()?;
    let run_service = settings.build_run_service(Arc::new(EnvCredentialProvider::from_env()))?;
    let app_state = AppState::new(
        run_service,
        settings.run_request(),
        config.function_key.as_str(),
    );

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, tenants = settings.tenants.len(), "aaprov-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
