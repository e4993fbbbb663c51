use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers::trigger::TRIGGER_PATH;
use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let trigger_routes = Router::new()
        .route(
            TRIGGER_PATH,
            get(handlers::trigger::trigger_automation_account_handler)
                .post(handlers::trigger::trigger_automation_account_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_function_key,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(trigger_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
