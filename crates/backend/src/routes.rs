use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Derived views
        .route("/api/booth-occupancy", get(handlers::a003_booth::occupancy))
        // Generic collections: list + remote search
        .route("/api/:entity", get(handlers::collections::list))
        .route("/api/:entity/search", post(handlers::collections::search))
        .with_state(state)
}
