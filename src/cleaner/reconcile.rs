use crate::cleaner::{
    store::TaskStore,
    types::{ProcessingTask, ReconciliationOutcome, TaskQueryResult, TaskStatus, VideoType},
};
use tracing::{debug, error, info};

/// Delete completed tasks and collect TV tasks still following their series.
///
/// Tasks are visited in fetch order and each completed task gets exactly one
/// delete attempt; retrying is left to the store.
pub async fn reconcile<S>(store: &S, result: &TaskQueryResult) -> ReconciliationOutcome
where
    S: TaskStore + ?Sized,
{
    let mut outcome = ReconciliationOutcome::default();

    for id in &result.ids {
        let status = result.status_of(id);
        let detail = result.details_by_id.get(id);

        if status == TaskStatus::Completed {
            debug!("Deleting completed task {}", id);
            if store.delete_task(id).await {
                outcome.deleted_count += 1;
                info!("Deleted task {}", id);
            } else {
                outcome.failed_count += 1;
                error!("Failed to delete task {}", id);
            }
            continue;
        }

        info!("Skipping task {} with status {}", id, status.label());
        outcome.skipped_count += 1;

        if status != TaskStatus::Processing {
            continue;
        }

        match detail {
            Some(task) if task.video_type == VideoType::Tv => {
                outcome.processing_tasks.push(ProcessingTask {
                    id: id.clone(),
                    name: task.resource_name.clone(),
                    current: task.current_episodes,
                    total: task.total_episodes,
                });
            }
            _ => debug!("Not reporting non-TV processing task {}", id),
        }
    }

    outcome
}

/// Render non-zero status counts, e.g. `Completed: 2, Processing: 1`
#[must_use]
pub fn format_status_counts(result: &TaskQueryResult) -> String {
    TaskStatus::ALL
        .iter()
        .filter_map(|&status| {
            let count = result.count(status);
            (count > 0).then(|| format!("{}: {}", status.label(), count))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
