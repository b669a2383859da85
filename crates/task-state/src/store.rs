//! The task store contract.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Result, StoreError};
use crate::record::{TaskRecord, TaskUpdate};

/// Shared status store for generation tasks.
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create or merge a task record.
    ///
    /// Unknown ids create the record first, so `created_at` equals
    /// `updated_at` after the first write.
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<()>;

    /// Get a task by id. Unknown ids are `Ok(None)`.
    async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>>;

    /// Get one page of tasks plus the total number of tasks.
    ///
    /// `page` is 1-indexed. Pages past the end are empty.
    async fn get_all_tasks(&self, page: usize, page_size: usize)
        -> Result<(Vec<TaskRecord>, usize)>;

    /// Remove a task. Absent ids are a no-op.
    async fn delete_task(&self, task_id: &str) -> Result<()>;

    /// Remove every task created before `cutoff`, returning how many went.
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Remove tasks older than `retention`.
    async fn sweep_expired(&self, retention: Duration) -> Result<usize> {
        let retention = chrono::Duration::from_std(retention)
            .map_err(|e| StoreError::Internal(format!("retention out of range: {}", e)))?;
        let cutoff = Utc::now()
            .checked_sub_signed(retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.purge_created_before(cutoff).await
    }

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Resolve a 1-indexed page into a slice range over `total` items.
pub(crate) fn page_bounds(
    page: usize,
    page_size: usize,
    total: usize,
) -> Result<std::ops::Range<usize>> {
    if page == 0 || page_size == 0 {
        return Err(StoreError::InvalidPage { page, page_size });
    }

    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 10, 25).unwrap(), 0..10);
        assert_eq!(page_bounds(3, 10, 25).unwrap(), 20..25);
        assert_eq!(page_bounds(4, 10, 25).unwrap(), 25..25);
        assert_eq!(page_bounds(1, 10, 0).unwrap(), 0..0);
        assert_eq!(page_bounds(usize::MAX, usize::MAX, 5).unwrap(), 5..5);
    }

    #[test]
    fn test_page_bounds_rejects_zero() {
        assert!(matches!(
            page_bounds(0, 10, 5),
            Err(StoreError::InvalidPage { page: 0, page_size: 10 })
        ));
        assert!(matches!(
            page_bounds(1, 0, 5),
            Err(StoreError::InvalidPage { page: 1, page_size: 0 })
        ));
    }
}
