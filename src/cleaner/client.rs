use crate::cleaner::{
    CasError, Result,
    store::TaskStore,
    types::{RemoteTask, TaskQueryResult, TaskStatus, VideoType},
};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const API_KEY_HEADER: &str = "x-api-key";
const PAGE_SIZE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Parenthesised groups (ASCII or full-width) and whitespace
static SEARCH_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)|（.*?）|\s").expect("valid search noise regex"));

/// Strip parenthesised groups and whitespace so CAS fuzzy search matches resource names
#[must_use]
pub fn clean_search_title(title: &str) -> String {
    SEARCH_NOISE.replace_all(title, "").into_owned()
}

/// Ensure the host has a scheme and ends with a slash
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.is_empty() {
        return String::new();
    }

    let mut normalized = if host.starts_with("http") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Retry policy for transport failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

/// One page of the task list endpoint
#[derive(Debug, Default, Deserialize)]
struct TaskPage {
    #[serde(default)]
    tasks: Vec<RawTask>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    #[serde(default = "default_total_pages")]
    total_pages: u32,
}

const fn default_total_pages() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    resource_name: Option<String>,
    #[serde(default)]
    current_episodes: Option<i64>,
    #[serde(default)]
    total_episodes: Option<i64>,
    #[serde(default)]
    video_type: Option<String>,
}

impl RawTask {
    fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn into_task(self) -> Option<RemoteTask> {
        let id = self.id()?;
        let status = self
            .status
            .as_deref()
            .map_or(TaskStatus::Unknown, TaskStatus::parse);
        let video_type = self
            .video_type
            .as_deref()
            .map_or(VideoType::Unknown, VideoType::parse);

        Some(
            RemoteTask::new(id, status)
                .with_name(self.resource_name.unwrap_or_else(|| "Unknown".to_string()))
                .with_episodes(
                    self.current_episodes.unwrap_or(0),
                    self.total_episodes.unwrap_or(0),
                )
                .with_video_type(video_type),
        )
    }
}

/// HTTP client for the Cloud Auto Save task API
#[derive(Clone)]
pub struct CasClient {
    client: Client,
    host: String,
    api_key: String,
    retry: RetryPolicy,
    page_delay: Duration,
}

impl CasClient {
    /// Create a new client. `host` is normalized to `http(s)://host:port/`.
    pub fn new(host: &str, api_key: impl Into<String>) -> Result<Self> {
        let host = normalize_host(host);
        if host.is_empty() {
            return Err(CasError::Config("CAS host is empty".to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("cas-task-cleaner/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            host,
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            page_delay: PAGE_DELAY,
        })
    }

    /// Builder pattern: set retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builder pattern: set delay between task pages
    #[must_use]
    pub const fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Normalized base URL
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build full URL from endpoint
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.host, endpoint)
    }

    /// URL of a single task, with `id` escaped as one path segment
    fn task_url(&self, id: &str) -> Result<String> {
        let mut url = Url::parse(&self.url("api/tasks"))
            .map_err(|e| CasError::Config(format!("Invalid CAS host {}: {e}", self.host)))?;
        url.path_segments_mut()
            .map_err(|()| CasError::Config(format!("CAS host {} cannot be a base", self.host)))?
            .push(id);
        Ok(url.into())
    }

    /// Check that the CAS instance is reachable and accepts the API key
    pub async fn test_connection(&self) -> Result<()> {
        info!("Testing CAS connection at {}", self.host);
        let url = self.url("api/tasks");
        let response = self
            .send_with_retry("GET", &url, || {
                self.client
                    .get(&url)
                    .header(API_KEY_HEADER, &self.api_key)
                    .query(&[("page", 1), ("pageSize", 1)])
            })
            .await?;

        if response.status() == StatusCode::OK {
            info!("CAS connection succeeded");
            return Ok(());
        }

        let status = response.status().as_u16();
        let message = truncate(&response.text().await.unwrap_or_default(), 500);
        error!("CAS connection failed with status {}: {}", status, message);
        Err(CasError::Api { status, message })
    }

    /// Send a request, retrying transport failures with a fixed backoff
    async fn send_with_retry<F>(&self, method: &str, url: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match build().send().await {
                Ok(response) => {
                    debug!(
                        "Request succeeded: {} {} (attempt {}/{})",
                        method, url, attempt, max_attempts
                    );
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        "Request failed: {} {} (attempt {}/{}): {}",
                        method, url, attempt, max_attempts, e
                    );

                    if attempt >= max_attempts {
                        error!("All request attempts failed: {} {}", method, url);
                        return Err(CasError::Network(e));
                    }

                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Fetch one page of tasks matching `search`
    async fn get_tasks_page(&self, search: &str, page: u32) -> Result<TaskPage> {
        let url = self.url("api/tasks");
        let page_str = page.to_string();
        let page_size = PAGE_SIZE.to_string();
        let params = [
            ("status", "all"),
            ("search", search),
            ("type", "normal"),
            ("group", "all"),
            ("accountId", "all"),
            ("page", page_str.as_str()),
            ("pageSize", page_size.as_str()),
        ];

        let response = self
            .send_with_retry("GET", &url, || {
                self.client
                    .get(&url)
                    .header(API_KEY_HEADER, &self.api_key)
                    .query(&params)
            })
            .await?;

        Self::handle_response(response).await
    }

    /// Accept both `{success, data: {...}}` and bare `{tasks, pagination}` bodies
    async fn handle_response<T: DeserializeOwned + Default>(response: Response) -> Result<T> {
        let status = response.status();

        if status != StatusCode::OK {
            let message = truncate(&response.text().await.unwrap_or_default(), 500);
            error!("CAS task request failed with status {}: {}", status, message);
            return Err(CasError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse CAS response: {} ({})", e, truncate(&text, 500));
            CasError::Parse(format!("JSON parse error: {e}"))
        })?;

        let wrapped = body
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        let payload = match body {
            serde_json::Value::Object(mut map) if wrapped && map.contains_key("data") => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };

        if payload.is_null() {
            return Ok(T::default());
        }

        serde_json::from_value(payload)
            .map_err(|e| CasError::Parse(format!("Unexpected task list shape: {e}")))
    }
}

#[async_trait]
impl TaskStore for CasClient {
    async fn fetch_tasks_by_title(&self, title: &str) -> Result<TaskQueryResult> {
        let search = clean_search_title(title);
        info!("Searching CAS tasks with keyword '{}'", search);

        let mut result = TaskQueryResult::new();
        let mut page = 1;
        let mut total_pages = 1;

        while page <= total_pages {
            if page > 1 {
                tokio::time::sleep(self.page_delay).await;
            }

            debug!("Requesting task page {}/{}", page, total_pages);
            let body: TaskPage = self.get_tasks_page(&search, page).await?;

            total_pages = body.pagination.map_or(1, |p| p.total_pages);

            if body.tasks.is_empty() {
                debug!("Task page {} is empty", page);
                break;
            }

            for raw in body.tasks {
                let Some(task) = raw.into_task() else {
                    warn!("Task entry without id, skipping");
                    continue;
                };

                debug!(
                    "Found task: id={}, name={}, type={}, status={}, progress={}/{}",
                    task.id,
                    task.resource_name,
                    task.video_type,
                    task.status.label(),
                    task.current_episodes,
                    task.total_episodes
                );

                let id = task.id.clone();
                if !result.push(task) {
                    debug!("Task {} already seen on an earlier page", id);
                }
            }

            page += 1;
        }

        Ok(result)
    }

    async fn delete_task(&self, id: &str) -> bool {
        if id.is_empty() {
            error!("Cannot delete task: missing id");
            return false;
        }

        let url = match self.task_url(id) {
            Ok(url) => url,
            Err(e) => {
                error!("Cannot delete task {}: {}", id, e);
                return false;
            }
        };
        debug!("Deleting task {}", id);

        let response = match self
            .send_with_retry("DELETE", &url, || {
                self.client.delete(&url).header(API_KEY_HEADER, &self.api_key)
            })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to delete task {}: {}", id, e);
                return false;
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            debug!("Deleted task {}", id);
            return true;
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| truncate(&text, 200));

        error!(
            "Failed to delete task {} (status {}): {}",
            id,
            status.as_u16(),
            detail
        );
        false
    }
}
