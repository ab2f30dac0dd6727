use axum::Router;
use tower_http::trace::TraceLayer;

use crate::Ctx;

pub mod api;

/// Build the application router
pub fn router(ctx: Ctx) -> Router {
    Router::new()
        .nest("/api", api::mount())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
