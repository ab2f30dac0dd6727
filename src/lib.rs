pub mod cleaner;
pub mod config;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod routes;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::{cleaner::CleanerService, config::AppConfig, error::AppError};

/// Shared state handed to every route
#[derive(Clone)]
pub struct Ctx {
    pub config: Arc<AppConfig>,
    pub cleaner: Arc<CleanerService>,
}

/// JSON envelope returned by every API route
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;
