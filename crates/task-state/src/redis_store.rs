//! Redis-backed task store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::memory::log_transition;
use crate::record::{upsert, TaskRecord, TaskUpdate};
use crate::store::{page_bounds, TaskStore};

const SCAN_COUNT: usize = 100;
const MAX_TRANSACTION_ATTEMPTS: u32 = 32;

/// Task store persisted in Redis.
///
/// Each task lives under `{prefix}:task:{id}` as one JSON document written
/// with a single `SET`, so readers see either the old or the new record.
/// Updates are an optimistic `WATCH`/`MULTI`/`EXEC` read-modify-write,
/// retried when another writer touches the same key in between, so
/// concurrent updates to one id merge like they do in memory.
///
/// Listing order follows `SCAN`, which is not insertion order.
pub struct RedisTaskStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisTaskStore {
    /// Create a store from a connection URL. No connection is made yet.
    pub fn new(connection_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(connection_url)?;
        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    /// Key prefix in use.
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn task_key(&self, task_id: &str) -> String {
        format!("{}:task:{}", self.key_prefix, task_id)
    }

    fn key_pattern(&self) -> String {
        format!("{}:task:*", self.key_prefix)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn load(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        key: &str,
    ) -> Result<Option<TaskRecord>> {
        let payload: Option<String> = conn.get(key).await?;
        payload.as_deref().map(decode_record).transpose()
    }

    /// Enumerate task keys with `SCAN`, deduplicated in first-seen order.
    async fn scan_keys(&self, conn: &mut redis::aio::MultiplexedConnection) -> Result<Vec<String>> {
        let pattern = self.key_pattern();
        let mut keys = IndexSet::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys.into_iter().collect())
    }
}

/// Encode a record as the stored JSON document.
pub fn encode_record(record: &TaskRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Decode a stored JSON document.
pub fn decode_record(payload: &str) -> Result<TaskRecord> {
    Ok(serde_json::from_str(payload)?)
}

#[async_trait]
impl TaskStore for RedisTaskStore {
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<()> {
        // WATCH is per connection; this one is not shared with other calls
        let mut conn = self.connection().await?;
        let key = self.task_key(task_id);

        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let _: () = redis::cmd("WATCH").arg(&key).query_async(&mut conn).await?;
            let existing = self.load(&mut conn, &key).await?;
            let previous = existing.as_ref().map(|r| r.state);
            let record = upsert(existing, task_id, update.clone(), Utc::now());
            let payload = encode_record(&record)?;

            // EXEC replies nil when the key changed after WATCH
            let committed: Option<()> = redis::pipe()
                .atomic()
                .set(&key, payload)
                .ignore()
                .query_async(&mut conn)
                .await?;
            if committed.is_some() {
                log_transition(task_id, previous, &record);
                return Ok(());
            }
            debug!(task_id = %task_id, attempt, "Task changed during update, retrying");
        }

        Err(StoreError::Internal(format!(
            "task '{}' kept changing during update after {} attempts",
            task_id, MAX_TRANSACTION_ATTEMPTS
        )))
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        let mut conn = self.connection().await?;
        self.load(&mut conn, &self.task_key(task_id)).await
    }

    async fn get_all_tasks(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<(Vec<TaskRecord>, usize)> {
        // Check arguments before touching the network
        page_bounds(page, page_size, 0)?;

        let mut conn = self.connection().await?;
        let keys = self.scan_keys(&mut conn).await?;
        let total = keys.len();
        let range = page_bounds(page, page_size, total)?;

        let mut records = Vec::with_capacity(range.len());
        for key in &keys[range] {
            // Deleted between SCAN and GET
            if let Some(record) = self.load(&mut conn, key).await? {
                records.push(record);
            }
        }
        Ok((records, total))
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let deleted: u64 = conn.del(self.task_key(task_id)).await?;
        if deleted > 0 {
            info!(task_id = %task_id, "Deleted task");
        }
        Ok(())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.connection().await?;
        let keys = self.scan_keys(&mut conn).await?;
        let mut removed = 0;

        for key in keys {
            let record = match self.load(&mut conn, &key).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(StoreError::Serialization(e)) => {
                    warn!(key = %key, error = %e, "Skipping undecodable task record");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if record.created_at < cutoff {
                let deleted: u64 = conn.del(&key).await?;
                removed += deleted as usize;
            }
        }

        if removed > 0 {
            info!(removed, cutoff = %cutoff, "Purged expired tasks");
        }
        Ok(removed)
    }

    fn name(&self) -> &str {
        "redis"
    }
}
