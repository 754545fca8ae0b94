//! Axum router wiring (HTTP -> WS upgrade, ICE credentials).

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route("/v1/ice", get(ice_servers))
        .with_state(state)
}

/// ICE credential fetch, called once per client session.
/// Collaborator failure degrades to an empty list; never an error here.
async fn ice_servers(State(app): State<AppState>) -> Json<serde_json::Value> {
    let servers = match app.ice().fetch_ice_servers().await {
        Ok(servers) => servers,
        Err(e) => {
            tracing::warn!(error = %e, "ice credential fetch failed; returning no servers");
            Vec::new()
        }
    };
    Json(json!({ "iceServers": servers }))
}
