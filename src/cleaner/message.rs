//! Notification text for cleanup and watch-progress messages

use crate::cleaner::types::ProcessingTask;
use chrono::{DateTime, Local, TimeZone};

/// Title of the watch-progress notification
pub const PROCESSING_TITLE: &str = "⏳ CAS watch progress";
/// Title of the cleanup notification
pub const CLEAN_TITLE: &str = "🔔 CAS task cleanup";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity marker chosen from the number of episodes left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMarker {
    /// Nothing left to save
    Complete,
    /// 1 to 5 episodes left
    Urgent,
    /// 6 to 10 episodes left
    Soon,
    /// Anything else
    Default,
}

impl ProgressMarker {
    #[must_use]
    pub const fn for_remaining(remaining: i64) -> Self {
        match remaining {
            0 => Self::Complete,
            1..=5 => Self::Urgent,
            6..=10 => Self::Soon,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Complete => "🎉",
            Self::Urgent => "🔥",
            Self::Soon => "🚀",
            Self::Default => "📺",
        }
    }
}

fn timestamp_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("🕒 {}", now.format(TIMESTAMP_FORMAT))
}

/// Build the watch-progress body, one line per task plus a timestamp
#[must_use]
pub fn build_processing_notification_text(tasks: &[ProcessingTask]) -> String {
    build_processing_notification_text_at(tasks, &Local::now())
}

/// Same as [`build_processing_notification_text`] with an explicit timestamp
#[must_use]
pub fn build_processing_notification_text_at<Tz: TimeZone>(
    tasks: &[ProcessingTask],
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines: Vec<String> = tasks
        .iter()
        .map(|task| {
            let remaining = task.remaining();
            format!(
                "{} {}: ep {}/{} (remaining {})",
                ProgressMarker::for_remaining(remaining).symbol(),
                task.name,
                task.current,
                task.total,
                remaining
            )
        })
        .collect();

    lines.push(timestamp_line(now));
    lines.join("\n")
}

/// Build the cleanup body for a title
#[must_use]
pub fn build_clean_notification_text(
    title: &str,
    year: Option<i32>,
    media_type_label: &str,
    deleted_count: usize,
) -> String {
    build_clean_notification_text_at(title, year, media_type_label, deleted_count, &Local::now())
}

/// Same as [`build_clean_notification_text`] with an explicit timestamp
#[must_use]
pub fn build_clean_notification_text_at<Tz: TimeZone>(
    title: &str,
    year: Option<i32>,
    media_type_label: &str,
    deleted_count: usize,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let media = match year {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    };

    [
        format!("🎬 Media: {media} [{media_type_label}]"),
        format!("🧹 Cleaned: {deleted_count} tasks"),
        timestamp_line(now),
    ]
    .join("\n")
}
