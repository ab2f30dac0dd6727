mod client;
mod dedup;
mod event;
mod message;
mod reconcile;
mod service;
mod store;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use client::{CasClient, RetryPolicy, clean_search_title, normalize_host};
pub use dedup::{DEFAULT_CAPACITY, EventDeduplicator};
pub use event::{DELETE_EVENT, MediaServer, WebhookEvent, allowed_events, media_type_label};
pub use message::{
    CLEAN_TITLE, PROCESSING_TITLE, ProgressMarker, build_clean_notification_text,
    build_clean_notification_text_at, build_processing_notification_text,
    build_processing_notification_text_at,
};
pub use reconcile::{format_status_counts, reconcile};
pub use service::{Admission, CleanerService, PassRequest};
pub use store::TaskStore;
pub use types::{
    ProcessingTask, ReconciliationOutcome, RemoteTask, TaskQueryResult, TaskStatus, VideoType,
};

/// Cleaner result type
pub type Result<T> = std::result::Result<T, CasError>;

/// Errors raised while talking to a CAS instance
#[derive(Debug, thiserror::Error)]
pub enum CasError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
