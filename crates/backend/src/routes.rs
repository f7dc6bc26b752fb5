use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Saved table views
        .route(
            "/api/saved-views",
            get(handlers::saved_views::list).post(handlers::saved_views::save),
        )
        .route("/api/saved-views/:id", delete(handlers::saved_views::delete))
        // Lead conversion
        .route("/api/leads/:id/convert", post(handlers::a005_lead::convert))
        // Demo data
        .route("/api/dev/seed", post(handlers::dev_seed::insert_seed_data))
        // Generic CRM collections
        .route(
            "/api/:collection",
            get(handlers::collections::list).post(handlers::collections::create),
        )
        .route("/api/:collection/export", get(handlers::collections::export))
        .route(
            "/api/:collection/:id",
            get(handlers::collections::get_by_id)
                .patch(handlers::collections::patch)
                .delete(handlers::collections::delete),
        )
        .route("/api/:collection/:id/restore", post(handlers::collections::restore))
        .route("/api/:collection/:id/audit", get(handlers::collections::audit))
}
