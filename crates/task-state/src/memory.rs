//! In-process task store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::record::{upsert, TaskRecord, TaskState, TaskUpdate};
use crate::store::{page_bounds, TaskStore};

/// Task store kept in process memory.
///
/// One mutex guards the whole mapping. Listing follows insertion order.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<IndexMap<String, TaskRecord>>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        let existing = tasks.get(task_id).cloned();
        let previous = existing.as_ref().map(|r| r.state);
        let record = upsert(existing, task_id, update, Utc::now());

        log_transition(task_id, previous, &record);
        tasks.insert(task_id.to_string(), record);
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        Ok(self.tasks.lock().await.get(task_id).cloned())
    }

    async fn get_all_tasks(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<(Vec<TaskRecord>, usize)> {
        let tasks = self.tasks.lock().await;
        let total = tasks.len();
        let range = page_bounds(page, page_size, total)?;
        let records = tasks.values().skip(range.start).take(range.len()).cloned().collect();
        Ok((records, total))
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        if self.tasks.lock().await.shift_remove(task_id).is_some() {
            info!(task_id = %task_id, "Deleted task");
        }
        Ok(())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|_, record| record.created_at >= cutoff);
        let removed = before - tasks.len();
        if removed > 0 {
            info!(removed, cutoff = %cutoff, "Purged expired tasks");
        }
        Ok(removed)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

pub(crate) fn log_transition(task_id: &str, previous: Option<TaskState>, record: &TaskRecord) {
    if record.state == TaskState::Failed {
        error!(
            task_id = %task_id,
            error = record.error.as_deref().unwrap_or(""),
            "Task failed"
        );
    } else if previous != Some(record.state) {
        info!(
            task_id = %task_id,
            state = %record.state,
            progress = record.progress,
            "Task state changed"
        );
    } else {
        debug!(task_id = %task_id, progress = record.progress, "Task updated");
    }
}
