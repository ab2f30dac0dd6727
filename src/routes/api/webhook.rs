use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Serialize;

use crate::{
    ApiResponse, ApiResult, Ctx,
    cleaner::{Admission, PassRequest, WebhookEvent},
};

/// Result of submitting a media-server event
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub admitted: bool,
    pub reason: &'static str,
    /// The pass started for this event, if any
    pub pass: Option<PassRequest>,
}

/// Receive a media-server webhook.
/// POST /api/webhook
///
/// Returns as soon as the event has been filtered; the cleanup pass runs in
/// the background.
async fn receive(
    State(ctx): State<Ctx>,
    payload: Result<Json<WebhookEvent>, JsonRejection>,
) -> ApiResult<WebhookResponse> {
    let Json(event) = payload?;
    let admission = ctx.cleaner.handle_event(&event);
    let admitted = admission.is_accepted();
    let reason = admission.reason();

    let pass = match admission {
        Admission::Accepted(request) => Some(request),
        _ => None,
    };

    Ok(ApiResponse {
        code: 202,
        message: if admitted {
            "Event accepted".to_string()
        } else {
            format!("Event ignored: {reason}")
        },
        data: Some(WebhookResponse {
            admitted,
            reason,
            pass,
        }),
    })
}

/// Mount webhook routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/webhook", post(receive))
}
