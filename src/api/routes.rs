use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Exchange profiles
        .route("/exchanges", get(list_exchanges))
        .route("/exchanges/:key", get(get_exchange))

        // Calculation
        .route("/calculate", post(calculate))

        // History
        .route("/history", get(list_history).delete(clear_history))
        .route("/history/export", get(export_history))
        .route("/history/:id", delete(delete_history_entry))

        // WebSocket route
        .route("/ws", get(super::websocket::ws_handler))

        .with_state(state)
}
