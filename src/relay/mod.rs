use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod handlers;
pub mod requests;
pub mod stream;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/runChat", post(handlers::run_chat))
        .route("/api/ragChat", post(handlers::rag_chat))
        .route("/api/qdrant/getCollection", post(handlers::list_collections))
        .route("/api/qdrant/health", get(handlers::index_health))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
