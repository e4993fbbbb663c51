use std::sync::Arc;

use aaprov_application::{ProvisioningRunRequest, ProvisioningRunService};
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub run_service: ProvisioningRunService,
    pub run_request: Arc<ProvisioningRunRequest>,
    pub function_key: Arc<str>,
    /// Serialises triggers so two runs never write the same workbook.
    pub run_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        run_service: ProvisioningRunService,
        run_request: ProvisioningRunRequest,
        function_key: &str,
    ) -> Self {
        Self {
            run_service,
            run_request: Arc::new(run_request),
            function_key: Arc::from(function_key),
            run_guard: Arc::new(Mutex::new(())),
        }
    }
}
