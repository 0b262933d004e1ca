//! HTTP surface: conversation WebSocket, action listing, health.

use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::actions::ActionRegistry;
use crate::channels::ws::{WsState, conversation_routes};
use crate::rooms::RoomRegistry;

/// Build the full application router.
pub fn app(registry: Arc<ActionRegistry>, rooms: RoomRegistry) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health))
        .route("/api/actions", get(list_actions))
        .with_state(Arc::clone(&registry));

    conversation_routes(WsState { registry, rooms })
        .merge(api)
        .layer(cors)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "intake-assist"
    }))
}

// ── Actions ─────────────────────────────────────────────────────────────

async fn list_actions(State(registry): State<Arc<ActionRegistry>>) -> impl IntoResponse {
    Json(registry.descriptors())
}
