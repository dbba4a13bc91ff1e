use axum::{routing::{get, post}, Router};
use crate::controllers::estimate_controller::{
    // Sessions & events
    create_session, get_session, delete_session, post_event,
    // Regional dataset
    list_regions, get_region,
    // System
    get_system_config, health,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>`, `State<Config>` and/or
/// `State<PredictionClient>` via `FromRef<SharedState>`, so a single
/// `.with_state(shared)` covers all three.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/sessions",             post(create_session))
        .route("/sessions/{id}",        get(get_session).delete(delete_session))
        .route("/sessions/{id}/events", post(post_event))
        .route("/regions",              get(list_regions))
        .route("/regions/{name}",       get(get_region))
        .route("/system/config",        get(get_system_config))
        .route("/health",               get(health))
        .with_state(shared)
}
