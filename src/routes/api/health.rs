use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::{ApiResponse, ApiResult, Ctx, cleaner::MediaServer, config::NotifierKind};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cleaner_enabled: bool,
    pub server: MediaServer,
    pub notifier: NotifierKind,
}

/// GET /api/health
async fn health(State(ctx): State<Ctx>) -> ApiResult<HealthResponse> {
    let cleaner = ctx.cleaner.config();

    Ok(ApiResponse {
        code: 200,
        message: "OK".to_string(),
        data: Some(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            cleaner_enabled: cleaner.enabled,
            server: cleaner.server,
            notifier: ctx.config.notifier.kind,
        }),
    })
}

/// Mount health routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/health", get(health))
}
