//! Task status tracking for generation jobs.
//!
//! A [`TaskStore`] holds one [`TaskRecord`] per task id. Two backends are
//! provided: [`MemoryTaskStore`] for a single process and [`RedisTaskStore`]
//! for state shared across processes. Pick one with [`StoreConfig`] and
//! [`open_store`].
//!
//! # Example
//!
//! ```rust
//! use task_state::{open_store, StoreConfig, TaskState, TaskUpdate};
//!
//! # async fn example() -> Result<(), task_state::StoreError> {
//! let store = open_store(&StoreConfig::memory())?;
//!
//! store
//!     .update_task("job-1", TaskUpdate::new(TaskState::Processing).progress(50))
//!     .await?;
//!
//! let record = store.get_task("job-1").await?.expect("just written");
//! assert_eq!(record.progress, 50);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod memory;
mod record;
mod redis_store;
mod store;

pub use config::{open_store, StoreBackend, StoreConfig, DEFAULT_KEY_PREFIX, DEFAULT_RETENTION};
pub use error::{Result, StoreError};
pub use memory::MemoryTaskStore;
pub use record::{clamp_progress, FieldValue, TaskRecord, TaskState, TaskUpdate, MAX_PROGRESS};
pub use redis_store::{decode_record, encode_record, RedisTaskStore};
pub use store::TaskStore;

// Re-export async_trait for implementors
pub use async_trait::async_trait;
