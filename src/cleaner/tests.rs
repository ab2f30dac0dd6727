//! Cleaner integration tests

#[cfg(test)]
pub(crate) mod fakes {
    use crate::cleaner::{Result, TaskQueryResult, TaskStore, types::RemoteTask};
    use crate::notifier::{Notifier, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory task store recording every call
    #[derive(Default)]
    pub struct FakeStore {
        pub tasks: Vec<RemoteTask>,
        pub failing_deletes: HashSet<String>,
        pub fetch_calls: AtomicUsize,
        pub delete_calls: Mutex<Vec<String>>,
    }

    impl FakeStore {
        pub fn with_tasks(tasks: Vec<RemoteTask>) -> Self {
            Self {
                tasks,
                ..Default::default()
            }
        }

        pub fn failing(mut self, id: &str) -> Self {
            self.failing_deletes.insert(id.to_string());
            self
        }

        pub fn fetches(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }

        pub fn deletes(&self) -> Vec<String> {
            self.delete_calls.lock().clone()
        }
    }

    #[async_trait]
    impl TaskStore for FakeStore {
        async fn fetch_tasks_by_title(&self, _title: &str) -> Result<TaskQueryResult> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tasks.iter().cloned().collect())
        }

        async fn delete_task(&self, id: &str) -> bool {
            self.delete_calls.lock().push(id.to_string());
            !self.failing_deletes.contains(id)
        }
    }

    /// Notifier keeping every message in memory
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn titles(&self) -> Vec<String> {
            self.sent.lock().iter().map(|(t, _)| t.clone()).collect()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn id(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, title: &str, body: &str) -> std::result::Result<(), NotifyError> {
            self.sent.lock().push((title.to_string(), body.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod reconcile_tests {
    use super::fakes::FakeStore;
    use crate::cleaner::{
        ProcessingTask, RemoteTask, TaskQueryResult, TaskStatus, VideoType, reconcile,
    };

    fn tasks() -> Vec<RemoteTask> {
        vec![
            RemoteTask::new("1", TaskStatus::Completed).with_name("Show S01"),
            RemoteTask::new("2", TaskStatus::Processing)
                .with_name("Show S02")
                .with_episodes(3, 10)
                .with_video_type(VideoType::Tv),
        ]
    }

    #[tokio::test]
    async fn test_completed_deleted_processing_reported() {
        let store = FakeStore::with_tasks(tasks());
        let result: TaskQueryResult = tasks().into_iter().collect();

        let outcome = reconcile(&store, &result).await;

        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.failed_count, 0);
        assert_eq!(
            outcome.processing_tasks,
            vec![ProcessingTask {
                id: "2".to_string(),
                name: "Show S02".to_string(),
                current: 3,
                total: 10,
            }]
        );
        assert_eq!(outcome.processing_tasks[0].remaining(), 7);
        assert_eq!(store.deletes(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delete_counted_separately() {
        let all = vec![
            RemoteTask::new("a", TaskStatus::Completed),
            RemoteTask::new("b", TaskStatus::Completed),
            RemoteTask::new("c", TaskStatus::Failed),
        ];
        let store = FakeStore::with_tasks(all.clone()).failing("b");
        let result: TaskQueryResult = all.into_iter().collect();

        let outcome = reconcile(&store, &result).await;

        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.total(), result.len());
        assert_ne!(outcome.deleted_count + outcome.skipped_count, result.len());
    }

    #[tokio::test]
    async fn test_only_processing_tv_tasks_reported() {
        let all = vec![
            RemoteTask::new("movie", TaskStatus::Processing).with_video_type(VideoType::Movie),
            RemoteTask::new("unknown", TaskStatus::Processing),
            RemoteTask::new("pending", TaskStatus::Pending).with_video_type(VideoType::Tv),
            RemoteTask::new("tv-1", TaskStatus::Processing).with_video_type(VideoType::Tv),
            RemoteTask::new("tv-2", TaskStatus::Processing).with_video_type(VideoType::Tv),
        ];
        let store = FakeStore::with_tasks(all.clone());
        let result: TaskQueryResult = all.into_iter().collect();

        let outcome = reconcile(&store, &result).await;

        let ids: Vec<&str> = outcome
            .processing_tasks
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tv-1", "tv-2"]);
        assert_eq!(outcome.skipped_count, 5);
        assert!(store.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_deleted_once() {
        let all = vec![
            RemoteTask::new("1", TaskStatus::Completed),
            RemoteTask::new("1", TaskStatus::Completed),
        ];
        let store = FakeStore::with_tasks(all.clone());
        let result: TaskQueryResult = all.into_iter().collect();

        let outcome = reconcile(&store, &result).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result.count(TaskStatus::Completed), 1);
        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(store.deletes().len(), 1);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(TaskStatus::parse("COMPLETED"), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse("shareLinkError"), TaskStatus::ShareLinkError);
        assert_eq!(TaskStatus::parse("paused"), TaskStatus::Unknown);
        assert_eq!(VideoType::parse("TV"), VideoType::Tv);
        assert_eq!(VideoType::parse(""), VideoType::Unknown);
    }
}

#[cfg(test)]
mod service_tests {
    use super::fakes::{FakeStore, RecordingNotifier};
    use crate::cleaner::{
        Admission, CLEAN_TITLE, CleanerService, EventDeduplicator, MediaServer, PROCESSING_TITLE,
        PassRequest, RemoteTask, TaskStatus, VideoType, WebhookEvent,
    };
    use crate::config::CleanerConfig;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> CleanerConfig {
        CleanerConfig {
            enabled: true,
            notify: true,
            server: MediaServer::Emby,
            host: "http://cas.local/".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        }
    }

    fn service(
        config: CleanerConfig,
        store: Arc<FakeStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> Arc<CleanerService> {
        Arc::new(CleanerService::new(
            config,
            store,
            notifier,
            Arc::new(EventDeduplicator::new()),
        ))
    }

    fn new_item_event() -> WebhookEvent {
        WebhookEvent {
            item_id: Some("42".to_string()),
            event: Some("library.new".to_string()),
            channel: Some("emby".to_string()),
            media_type: Some("Episode".to_string()),
            item_name: Some("Ozymandias".to_string()),
            year: Some(2013),
            json_object: Some(json!({"Item": {"SeriesName": "Breaking Bad"}})),
        }
    }

    fn mixed_tasks() -> Vec<RemoteTask> {
        vec![
            RemoteTask::new("1", TaskStatus::Completed),
            RemoteTask::new("2", TaskStatus::Processing)
                .with_name("Breaking Bad S05")
                .with_episodes(14, 16)
                .with_video_type(VideoType::Tv),
        ]
    }

    #[test]
    fn test_admit_accepts_new_item() {
        let service = service(config(), Arc::default(), Arc::default());

        let admission = service.admit(&new_item_event());

        assert_eq!(
            admission,
            Admission::Accepted(PassRequest {
                title: "Breaking Bad".to_string(),
                year: Some(2013),
                media_type: Some("Episode".to_string()),
            })
        );
    }

    #[test]
    fn test_admit_rejects_when_disabled() {
        let config = CleanerConfig {
            enabled: false,
            ..config()
        };
        let service = service(config, Arc::default(), Arc::default());

        assert_eq!(service.admit(&new_item_event()), Admission::Disabled);
    }

    #[test]
    fn test_admit_filters() {
        let service = service(config(), Arc::default(), Arc::default());

        let mut other_server = new_item_event();
        other_server.channel = Some("plex".to_string());
        assert_eq!(service.admit(&other_server), Admission::WrongChannel);

        let mut delete = new_item_event();
        delete.item_id = Some("43".to_string());
        delete.event = Some("deep.delete".to_string());
        assert_eq!(service.admit(&delete), Admission::DeleteEvent);

        let mut playback = new_item_event();
        playback.item_id = Some("44".to_string());
        playback.event = Some("playback.start".to_string());
        assert_eq!(service.admit(&playback), Admission::EventNotAllowed);

        let untitled = WebhookEvent {
            item_id: Some("45".to_string()),
            event: Some("library.new".to_string()),
            channel: Some("emby".to_string()),
            media_type: Some("Movie".to_string()),
            ..Default::default()
        };
        assert_eq!(service.admit(&untitled), Admission::MissingTitle);
    }

    #[tokio::test]
    async fn test_title_without_searchable_text_rejected() {
        let store = Arc::new(FakeStore::with_tasks(vec![RemoteTask::new(
            "1",
            TaskStatus::Completed,
        )]));
        let service = service(config(), Arc::clone(&store), Arc::default());

        for (id, name) in [("46", "(2020)"), ("47", "  （2020） ")] {
            let event = WebhookEvent {
                item_id: Some(id.to_string()),
                event: Some("library.new".to_string()),
                channel: Some("emby".to_string()),
                media_type: Some("Movie".to_string()),
                item_name: Some(name.to_string()),
                ..Default::default()
            };
            assert_eq!(service.handle_event(&event), Admission::MissingTitle);
        }

        tokio::task::yield_now().await;
        assert_eq!(store.fetches(), 0);
        assert!(store.deletes().is_empty());
    }

    #[test]
    fn test_rejected_event_still_recorded() {
        let service = service(config(), Arc::default(), Arc::default());

        let mut other_server = new_item_event();
        other_server.channel = Some("plex".to_string());

        assert_eq!(service.admit(&other_server), Admission::WrongChannel);
        assert_eq!(service.admit(&other_server), Admission::Duplicate);
    }

    #[tokio::test]
    async fn test_duplicate_event_runs_one_pass() {
        let store = Arc::new(FakeStore::with_tasks(mixed_tasks()));
        let service = service(config(), Arc::clone(&store), Arc::default());
        let event = new_item_event();

        let Admission::Accepted(request) = service.admit(&event) else {
            panic!("first delivery should be accepted");
        };
        service.spawn_pass(request).await.unwrap();

        assert_eq!(service.admit(&event), Admission::Duplicate);
        assert_eq!(store.fetches(), 1);
        assert_eq!(store.deletes(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_pass_sends_both_notifications() {
        let store = Arc::new(FakeStore::with_tasks(mixed_tasks()));
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(config(), store, Arc::clone(&notifier));
        let request = PassRequest {
            title: "Breaking Bad".to_string(),
            year: Some(2008),
            media_type: Some("tv".to_string()),
        };

        let outcome = service.run_pass(&request).await.unwrap().unwrap();

        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(notifier.titles(), vec![PROCESSING_TITLE, CLEAN_TITLE]);

        let sent = notifier.sent.lock();
        assert!(sent[0].1.contains("Breaking Bad S05: ep 14/16 (remaining 2)"));
        assert!(sent[1].1.contains("Breaking Bad (2008) [TV series]"));
        assert!(sent[1].1.contains("1 tasks"));
    }

    #[tokio::test]
    async fn test_notifications_gated() {
        let notifier = Arc::new(RecordingNotifier::default());
        let quiet = CleanerConfig {
            notify: false,
            ..config()
        };
        let store = Arc::new(FakeStore::with_tasks(mixed_tasks()));
        let request = PassRequest {
            title: "Breaking Bad".to_string(),
            year: None,
            media_type: None,
        };

        service(quiet, store, Arc::clone(&notifier))
            .run_pass(&request)
            .await
            .unwrap();
        assert!(notifier.titles().is_empty());

        // Only a failed delete and a movie in progress: nothing worth sending
        let store = Arc::new(
            FakeStore::with_tasks(vec![
                RemoteTask::new("1", TaskStatus::Completed),
                RemoteTask::new("2", TaskStatus::Processing).with_video_type(VideoType::Movie),
            ])
            .failing("1"),
        );
        let outcome = service(config(), store, Arc::clone(&notifier))
            .run_pass(&request)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.failed_count, 1);
        assert!(outcome.processing_tasks.is_empty());
        assert!(notifier.titles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_waits_for_configured_delay() {
        let store = Arc::new(FakeStore::with_tasks(mixed_tasks()));
        let delayed = CleanerConfig {
            delay_seconds: 5,
            ..config()
        };
        let service = service(delayed, Arc::clone(&store), Arc::default());

        let handle = service.spawn_pass(PassRequest {
            title: "Breaking Bad".to_string(),
            year: None,
            media_type: None,
        });

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(store.fetches(), 0);

        handle.await.unwrap();
        assert_eq!(store.fetches(), 1);
        assert_eq!(store.deletes(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_pass_without_matches_is_noop() {
        let store = Arc::new(FakeStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(config(), Arc::clone(&store), Arc::clone(&notifier));
        let request = PassRequest {
            title: "Nothing".to_string(),
            year: None,
            media_type: None,
        };

        assert!(service.run_pass(&request).await.unwrap().is_none());
        assert_eq!(store.fetches(), 1);
        assert!(notifier.titles().is_empty());
    }
}

#[cfg(test)]
mod boundary_tests {
    use crate::cleaner::{
        CleanerService, EventDeduplicator, PassRequest, Result, TaskQueryResult, TaskStore,
    };
    use crate::config::CleanerConfig;
    use crate::notifier::LogNotifier;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct PanickingStore;

    #[async_trait]
    impl TaskStore for PanickingStore {
        async fn fetch_tasks_by_title(&self, _title: &str) -> Result<TaskQueryResult> {
            panic!("store exploded");
        }

        async fn delete_task(&self, _id: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_spawned_pass_contains_panics() {
        let service = Arc::new(CleanerService::new(
            CleanerConfig {
                enabled: true,
                ..Default::default()
            },
            Arc::new(PanickingStore),
            Arc::new(LogNotifier),
            Arc::new(EventDeduplicator::new()),
        ));

        let handle = service.spawn_pass(PassRequest {
            title: "Boom".to_string(),
            year: None,
            media_type: None,
        });

        assert!(handle.await.is_ok());
    }
}

#[cfg(test)]
mod client_tests {
    use crate::cleaner::{
        CasClient, CasError, RetryPolicy, TaskStatus, TaskStore, VideoType, clean_search_title,
    };
    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::{delete, get},
    };
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct MockCas {
        /// Response body per page number
        pages: Arc<HashMap<String, Value>>,
        requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
        api_keys: Arc<Mutex<Vec<String>>>,
    }

    async fn list_tasks(
        State(mock): State<MockCas>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            mock.api_keys.lock().push(key.to_string());
        }
        let page = params.get("page").cloned().unwrap_or_default();
        mock.requests.lock().push(params);

        match mock.pages.get(&page) {
            Some(body) => (StatusCode::OK, Json(body.clone())),
            None => (StatusCode::OK, Json(json!({"tasks": []}))),
        }
    }

    async fn delete_task(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        match id.as_str() {
            "ok" | "odd/id ?" => (StatusCode::OK, Json(json!({"success": true}))),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "message": "task not found"})),
            ),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }

    async fn mock_cas(pages: HashMap<String, Value>) -> (CasClient, MockCas) {
        let mock = MockCas {
            pages: Arc::new(pages),
            ..Default::default()
        };
        let router = Router::new()
            .route("/api/tasks", get(list_tasks))
            .route("/api/tasks/{id}", delete(delete_task))
            .with_state(mock.clone());
        let host = serve(router).await;

        let client = CasClient::new(&host, "secret")
            .unwrap()
            .with_page_delay(Duration::ZERO);
        (client, mock)
    }

    #[test]
    fn test_clean_search_title() {
        assert_eq!(clean_search_title("Breaking Bad (2008)"), "BreakingBad");
        assert_eq!(clean_search_title("三体（2023）"), "三体");
        assert_eq!(clean_search_title(" The  Office "), "TheOffice");
    }

    #[test]
    fn test_client_normalizes_host() {
        let client = CasClient::new("cas.local:3000", "key").unwrap();
        assert_eq!(client.host(), "http://cas.local:3000/");
        assert_eq!(client.url("api/tasks"), "http://cas.local:3000/api/tasks");
        assert!(matches!(CasClient::new("  ", "key"), Err(CasError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_paginates_wrapped_responses() {
        let pages = HashMap::from([
            (
                "1".to_string(),
                json!({
                    "success": true,
                    "data": {
                        "tasks": [
                            {"id": 1, "status": "completed", "resourceName": "Dark S01", "videoType": "tv"},
                            {"status": "completed"},
                        ],
                        "pagination": {"totalPages": 2}
                    }
                }),
            ),
            (
                "2".to_string(),
                json!({
                    "success": true,
                    "data": {
                        "tasks": [
                            {"id": "2", "status": "Processing", "resourceName": "Dark S03",
                             "currentEpisodes": 6, "totalEpisodes": 8, "videoType": "tv"},
                        ],
                        "pagination": {"totalPages": 2}
                    }
                }),
            ),
        ]);
        let (client, mock) = mock_cas(pages).await;

        let result = client.fetch_tasks_by_title("Dark (2017)").await.unwrap();

        assert_eq!(result.ids, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(result.status_of("1"), TaskStatus::Completed);
        assert_eq!(result.count(TaskStatus::Processing), 1);
        let second = &result.details_by_id["2"];
        assert_eq!(second.resource_name, "Dark S03");
        assert_eq!((second.current_episodes, second.total_episodes), (6, 8));
        assert_eq!(second.video_type, VideoType::Tv);

        let requests = mock.requests.lock();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["search"], "Dark");
        assert_eq!(requests[0]["type"], "normal");
        assert_eq!(requests[0]["pageSize"], "100");
        assert_eq!(requests[1]["page"], "2");
        assert!(mock.api_keys.lock().iter().all(|k| k == "secret"));
    }

    #[tokio::test]
    async fn test_fetch_accepts_flat_response_and_stops_on_empty_page() {
        let pages = HashMap::from([(
            "1".to_string(),
            json!({
                "tasks": [{"id": "9", "status": "failed"}],
                "pagination": {"totalPages": 5}
            }),
        )]);
        let (client, mock) = mock_cas(pages).await;

        let result = client.fetch_tasks_by_title("Solo").await.unwrap();

        assert_eq!(result.ids, vec!["9".to_string()]);
        let task = &result.details_by_id["9"];
        assert_eq!(task.resource_name, "Unknown");
        assert_eq!(task.video_type, VideoType::Unknown);
        // Page 2 comes back empty, which ends paging early
        assert_eq!(mock.requests.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_task_status() {
        let (client, _mock) = mock_cas(HashMap::new()).await;

        assert!(client.delete_task("ok").await);
        assert!(client.delete_task("odd/id ?").await);
        assert!(!client.delete_task("missing").await);
        assert!(!client.delete_task("").await);
    }

    #[tokio::test]
    async fn test_error_status_and_malformed_body() {
        let router = Router::new()
            .route(
                "/api/tasks",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    if params.get("search").map(String::as_str) == Some("broken") {
                        (StatusCode::OK, "not json".to_string())
                    } else {
                        (StatusCode::UNAUTHORIZED, "bad key".to_string())
                    }
                }),
            );
        let host = serve(router).await;
        let client = CasClient::new(&host, "wrong").unwrap();

        assert!(matches!(
            client.fetch_tasks_by_title("anything").await,
            Err(CasError::Api { status: 401, .. })
        ));
        assert!(matches!(
            client.fetch_tasks_by_title("broken").await,
            Err(CasError::Parse(_))
        ));
        assert!(matches!(
            client.test_connection().await,
            Err(CasError::Api { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_gives_up_after_retries() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = CasClient::new(&format!("127.0.0.1:{port}"), "key")
            .unwrap()
            .with_retry(RetryPolicy {
                max_attempts: 3,
                backoff: Duration::from_millis(10),
            });

        assert!(matches!(
            client.fetch_tasks_by_title("x").await,
            Err(CasError::Network(_))
        ));
        assert!(!client.delete_task("1").await);
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_transport_failure_retried_max_attempts() {
        // Accept every connection and close it before answering
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let client = CasClient::new(&format!("127.0.0.1:{port}"), "key")
            .unwrap()
            .with_retry(RetryPolicy {
                max_attempts: 3,
                backoff: Duration::from_millis(10),
            });

        assert!(matches!(
            client.fetch_tasks_by_title("x").await,
            Err(CasError::Network(_))
        ));
        assert_eq!(accepted.load(Ordering::SeqCst), 3);

        assert!(!client.delete_task("1").await);
        assert_eq!(accepted.load(Ordering::SeqCst), 6);
    }
}
