use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::dto::TriggerResponse;
use crate::state::AppState;


/// Route of the provisioning trigger.
pub const TRIGGER_PATH: &str = "/api/http_trigger_automation_account";

/// Runs the whole pipeline and answers with the enriched results.
///
/// Per-target failures are part of the payload, so the status is always 200.
pub async fn trigger_automation_account_handler(
    State(state): State<AppState>,
) -> Json<TriggerResponse> {
    let _guard = state.run_guard.lock().await;
    info!(
        tenants = state.run_request.tenants.len(),
        "provisioning trigger received"
    );

    let run = state.run_service.run(&state.run_request).await;
    Json(TriggerResponse::from(run))
}
