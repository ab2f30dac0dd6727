use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status of a CAS transfer task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Completed,
    Processing,
    Failed,
    Pending,
    ShareLinkError,
    #[default]
    Unknown,
}

impl TaskStatus {
    /// Every status, in display order
    pub const ALL: [Self; 6] = [
        Self::Completed,
        Self::Processing,
        Self::Failed,
        Self::Pending,
        Self::ShareLinkError,
        Self::Unknown,
    ];

    /// Parse a status string as reported by CAS. Unrecognised values map to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "completed" => Self::Completed,
            "processing" => Self::Processing,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            "sharelinkerror" => Self::ShareLinkError,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Processing => "Processing",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
            Self::ShareLinkError => "Share link error",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Processing => write!(f, "processing"),
            Self::Failed => write!(f, "failed"),
            Self::Pending => write!(f, "pending"),
            Self::ShareLinkError => write!(f, "shareLinkError"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Kind of video a task is saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Movie,
    Tv,
    #[default]
    Unknown,
}

impl VideoType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "movie" => Self::Movie,
            "tv" => Self::Tv,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Tv => write!(f, "tv"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Snapshot of a single remote task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    /// Opaque CAS task id
    pub id: String,
    pub status: TaskStatus,
    /// Name of the shared resource being saved
    pub resource_name: String,
    /// Episodes saved so far
    pub current_episodes: i64,
    /// Episodes expected in total
    pub total_episodes: i64,
    pub video_type: VideoType,
}

impl RemoteTask {
    /// Create a task with the given id and status
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            status,
            resource_name: String::new(),
            current_episodes: 0,
            total_episodes: 0,
            video_type: VideoType::Unknown,
        }
    }

    /// Builder pattern: set resource name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = name.into();
        self
    }

    /// Builder pattern: set episode progress
    pub fn with_episodes(mut self, current: i64, total: i64) -> Self {
        self.current_episodes = current;
        self.total_episodes = total;
        self
    }

    /// Builder pattern: set video type
    pub fn with_video_type(mut self, video_type: VideoType) -> Self {
        self.video_type = video_type;
        self
    }
}

/// Aggregate of every task matching one title search
#[derive(Debug, Clone, Default)]
pub struct TaskQueryResult {
    /// Task ids in fetch order
    pub ids: Vec<String>,
    pub status_by_id: HashMap<String, TaskStatus>,
    pub details_by_id: HashMap<String, RemoteTask>,
    pub counts_by_status: HashMap<TaskStatus, usize>,
}

impl TaskQueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched task. Returns `false` when the id was already recorded.
    pub fn push(&mut self, task: RemoteTask) -> bool {
        if self.details_by_id.contains_key(&task.id) {
            return false;
        }

        self.ids.push(task.id.clone());
        self.status_by_id.insert(task.id.clone(), task.status);
        *self.counts_by_status.entry(task.status).or_insert(0) += 1;
        self.details_by_id.insert(task.id.clone(), task);
        true
    }

    /// Number of distinct tasks recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Status of a task, `Unknown` for ids that were never recorded
    #[must_use]
    pub fn status_of(&self, id: &str) -> TaskStatus {
        self.status_by_id.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }
}

impl FromIterator<RemoteTask> for TaskQueryResult {
    fn from_iter<I: IntoIterator<Item = RemoteTask>>(iter: I) -> Self {
        let mut result = Self::new();
        for task in iter {
            result.push(task);
        }
        result
    }
}

/// A TV task still following its series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingTask {
    pub id: String,
    pub name: String,
    pub current: i64,
    pub total: i64,
}

impl ProcessingTask {
    /// Episodes left to save. Negative when upstream counts are inconsistent.
    #[must_use]
    pub const fn remaining(&self) -> i64 {
        self.total - self.current
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationOutcome {
    pub deleted_count: usize,
    pub skipped_count: usize,
    /// Completed tasks whose deletion was attempted and failed
    pub failed_count: usize,
    pub processing_tasks: Vec<ProcessingTask>,
}

impl ReconciliationOutcome {
    /// Total number of tasks the pass looked at
    #[must_use]
    pub const fn total(&self) -> usize {
        self.deleted_count + self.skipped_count + self.failed_count
    }
}
