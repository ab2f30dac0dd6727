use crate::{
    cleaner::{
        DELETE_EVENT, Result,
        client::clean_search_title,
        dedup::EventDeduplicator,
        event::{WebhookEvent, allowed_events, media_type_label},
        message::{
            CLEAN_TITLE, PROCESSING_TITLE, build_clean_notification_text,
            build_processing_notification_text,
        },
        reconcile::{format_status_counts, reconcile},
        store::TaskStore,
        types::ReconciliationOutcome,
    },
    config::CleanerConfig,
    notifier::Notifier,
};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Title and context of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassRequest {
    /// Title used to search CAS
    pub title: String,
    pub year: Option<i32>,
    /// Media type as reported by the media server
    pub media_type: Option<String>,
}

/// Decision taken for an inbound webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Disabled,
    Duplicate,
    WrongChannel,
    DeleteEvent,
    EventNotAllowed,
    MissingTitle,
    Accepted(PassRequest),
}

impl Admission {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Disabled => "cleaner disabled",
            Self::Duplicate => "event already processed",
            Self::WrongChannel => "event from another media server",
            Self::DeleteEvent => "delete events are ignored",
            Self::EventNotAllowed => "event type not handled",
            Self::MissingTitle => "media title is empty",
            Self::Accepted(_) => "accepted",
        }
    }
}

/// Turns media-server events into CAS cleanup passes
pub struct CleanerService {
    config: CleanerConfig,
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    dedup: Arc<EventDeduplicator>,
}

impl CleanerService {
    pub fn new(
        config: CleanerConfig,
        store: Arc<dyn TaskStore>,
        notifier: Arc<dyn Notifier>,
        dedup: Arc<EventDeduplicator>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
            dedup,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Decide whether an event should trigger a pass.
    ///
    /// The event key is recorded before the channel and type filters run, so a
    /// rejected event is not re-evaluated when redelivered.
    pub fn admit(&self, event: &WebhookEvent) -> Admission {
        if !self.config.enabled {
            return Admission::Disabled;
        }

        debug!("Received event: {:?}", event);

        let key = event.dedup_key();
        if !self.dedup.admit(&key) {
            debug!("Event already processed, skipping: {}", key);
            return Admission::Duplicate;
        }

        let server = self.config.server;
        let channel = event.channel.as_deref().unwrap_or_default();
        if channel != server.as_str() {
            debug!("Event channel {} does not match {}, skipping", channel, server);
            return Admission::WrongChannel;
        }

        let event_type = event.event.as_deref().unwrap_or_default();
        if event_type == DELETE_EVENT {
            debug!("Ignoring delete event");
            return Admission::DeleteEvent;
        }

        let allowed = allowed_events(server);
        if !allowed.contains(&event_type) {
            debug!("Event type {} not in {:?}, skipping", event_type, allowed);
            return Admission::EventNotAllowed;
        }

        let Some(title) = event.search_title() else {
            warn!("New media item has an empty title, skipping");
            return Admission::MissingTitle;
        };

        // An empty search keyword matches every task
        if clean_search_title(&title).is_empty() {
            warn!("Title '{}' has no searchable text, skipping", title);
            return Admission::MissingTitle;
        }

        info!(
            "New media added: {} ({})",
            title,
            media_type_label(event.media_type.as_deref())
        );

        Admission::Accepted(PassRequest {
            title,
            year: event.year,
            media_type: event.media_type.clone(),
        })
    }

    /// Admit an event and, when accepted, start its pass in the background
    pub fn handle_event(self: &Arc<Self>, event: &WebhookEvent) -> Admission {
        let admission = self.admit(event);
        if let Admission::Accepted(request) = &admission {
            self.spawn_pass(request.clone());
        }
        admission
    }

    /// Run a pass on a detached task. Errors and panics are logged, never propagated.
    pub fn spawn_pass(self: &Arc<Self>, request: PassRequest) -> JoinHandle<()> {
        if self.config.delay_seconds > 0 {
            info!(
                "Processing '{}' in {} seconds",
                request.title, self.config.delay_seconds
            );
        } else {
            info!("Processing '{}' now", request.title);
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let pass = AssertUnwindSafe(service.run_pass(&request)).catch_unwind();
            match pass.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => error!("Processing '{}' failed: {}", request.title, e),
                Err(panic) => {
                    let message = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!("Processing '{}' panicked: {}", request.title, message);
                }
            }
        })
    }

    /// Fetch, reconcile and notify for one title.
    ///
    /// Returns `Ok(None)` when no task matches the title.
    pub async fn run_pass(&self, request: &PassRequest) -> Result<Option<ReconciliationOutcome>> {
        let title = &request.title;
        info!("Processing started: {}", title);

        if self.config.delay_seconds > 0 {
            info!(
                "Waiting {} seconds before processing {}",
                self.config.delay_seconds, title
            );
            tokio::time::sleep(Duration::from_secs(self.config.delay_seconds)).await;
        }

        let result = self.store.fetch_tasks_by_title(title).await.map_err(|e| {
            error!("Failed to query CAS tasks for '{}': {}", title, e);
            e
        })?;

        if result.is_empty() {
            info!("No CAS tasks match '{}'", title);
            return Ok(None);
        }

        info!(
            "Found {} CAS tasks for '{}': {}",
            result.len(),
            title,
            format_status_counts(&result)
        );

        let outcome = reconcile(self.store.as_ref(), &result).await;

        info!(
            "Finished '{}': {} deleted, {} skipped, {} failed",
            title, outcome.deleted_count, outcome.skipped_count, outcome.failed_count
        );
        if outcome.failed_count > 0 {
            warn!(
                "{} completed tasks for '{}' could not be deleted",
                outcome.failed_count, title
            );
        }

        self.dispatch_notifications(request, &outcome).await;

        Ok(Some(outcome))
    }

    /// Send the watch-progress and cleanup notifications the outcome calls for
    pub async fn dispatch_notifications(
        &self,
        request: &PassRequest,
        outcome: &ReconciliationOutcome,
    ) {
        if !self.config.notify {
            debug!("Notifications disabled");
            return;
        }

        if !outcome.processing_tasks.is_empty() {
            let body = build_processing_notification_text(&outcome.processing_tasks);
            self.send(PROCESSING_TITLE, &body).await;
        }

        if outcome.deleted_count > 0 {
            let body = build_clean_notification_text(
                &request.title,
                request.year,
                &media_type_label(request.media_type.as_deref()),
                outcome.deleted_count,
            );
            self.send(CLEAN_TITLE, &body).await;
        } else {
            debug!("No tasks deleted, skipping cleanup notification");
        }
    }

    async fn send(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.send(title, body).await {
            error!(
                "Failed to send '{}' via {}: {}",
                title,
                self.notifier.id(),
                e
            );
        }
    }
}
