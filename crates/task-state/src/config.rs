//! Store selection and configuration.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, StoreError};
use crate::memory::MemoryTaskStore;
use crate::redis_store::RedisTaskStore;
use crate::store::TaskStore;

/// Default Redis key prefix.
pub const DEFAULT_KEY_PREFIX: &str = "task_state";

/// Default age after which tasks are swept.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Which backend holds task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory; lost on restart.
    Memory,
    /// Redis at `url`, keys under `key_prefix`.
    Redis { url: String, key_prefix: String },
}

/// Task store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Tasks created longer ago than this are removed by a sweep.
    pub retention: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            retention: DEFAULT_RETENTION,
        }
    }
}

impl StoreConfig {
    /// In-memory store with default retention.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Redis store with default retention.
    pub fn redis(url: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Redis {
                url: url.into(),
                key_prefix: key_prefix.into(),
            },
            retention: DEFAULT_RETENTION,
        }
    }

    /// Override the retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TASK_STORE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Full connection URL
    /// - `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB`, `REDIS_PASSWORD` - used to
    ///   build the URL when `REDIS_URL` is unset (default: localhost:6379/0)
    /// - `REDIS_KEY_PREFIX` - Key prefix (default: task_state)
    /// - `TASK_RETENTION_HOURS` - Sweep age in hours (default: 24)
    pub fn from_env() -> Result<Self> {
        let retention = match env::var("TASK_RETENTION_HOURS") {
            Ok(value) => {
                let hours: u64 = value.trim().parse().map_err(|_| {
                    StoreError::Configuration(format!(
                        "TASK_RETENTION_HOURS must be a whole number of hours, got {:?}",
                        value
                    ))
                })?;
                Duration::from_secs(hours.saturating_mul(60 * 60))
            }
            Err(_) => DEFAULT_RETENTION,
        };

        let backend = env::var("TASK_STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_lowercase();

        let backend = match backend.as_str() {
            "" | "memory" => StoreBackend::Memory,
            "redis" => StoreBackend::Redis {
                url: env::var("REDIS_URL").unwrap_or_else(|_| redis_url_from_parts()),
                key_prefix: env::var("REDIS_KEY_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
            },
            other => {
                return Err(StoreError::Configuration(format!(
                    "unknown TASK_STORE_BACKEND {:?} (expected memory or redis)",
                    other
                )))
            }
        };

        Ok(Self { backend, retention })
    }
}

fn redis_url_from_parts() -> String {
    let host = env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
    let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

    match env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()) {
        Some(password) => format!("redis://:{}@{}:{}/{}", password, host, port, db),
        None => format!("redis://{}:{}/{}", host, port, db),
    }
}

/// Open the configured store.
///
/// Open once at startup and share the handle.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn TaskStore>> {
    let store: Arc<dyn TaskStore> = match &config.backend {
        StoreBackend::Memory => Arc::new(MemoryTaskStore::new()),
        StoreBackend::Redis { url, key_prefix } => {
            Arc::new(RedisTaskStore::new(url, key_prefix.clone())?)
        }
    };
    info!(backend = store.name(), "Opened task store");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.retention, Duration::from_secs(86_400));
    }

    #[test]
    fn test_open_store() {
        let memory = open_store(&StoreConfig::memory()).unwrap();
        assert_eq!(memory.name(), "memory");

        // Opening does not connect
        let redis = open_store(&StoreConfig::redis("redis://127.0.0.1:6379/0", "t")).unwrap();
        assert_eq!(redis.name(), "redis");
    }

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_store_vars() {
            for var in [
                "TASK_STORE_BACKEND",
                "TASK_RETENTION_HOURS",
                "REDIS_URL",
                "REDIS_HOST",
                "REDIS_PORT",
                "REDIS_DB",
                "REDIS_PASSWORD",
                "REDIS_KEY_PREFIX",
            ] {
                std::env::remove_var(var);
            }
        }

        // Scenario 1: nothing set
        clear_all_store_vars();
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config, StoreConfig::default());

        // Scenario 2: redis from parts
        clear_all_store_vars();
        std::env::set_var("TASK_STORE_BACKEND", "Redis");
        std::env::set_var("REDIS_HOST", "cache");
        std::env::set_var("REDIS_PASSWORD", "secret");
        std::env::set_var("TASK_RETENTION_HOURS", "2");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Redis {
                url: "redis://:secret@cache:6379/0".to_string(),
                key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            }
        );
        assert_eq!(config.retention, Duration::from_secs(7200));

        // Scenario 3: explicit URL wins
        clear_all_store_vars();
        std::env::set_var("TASK_STORE_BACKEND", "redis");
        std::env::set_var("REDIS_URL", "redis://example:6380/2");
        std::env::set_var("REDIS_HOST", "ignored");
        std::env::set_var("REDIS_KEY_PREFIX", "reel");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Redis {
                url: "redis://example:6380/2".to_string(),
                key_prefix: "reel".to_string(),
            }
        );

        // Scenario 4: unknown backend
        clear_all_store_vars();
        std::env::set_var("TASK_STORE_BACKEND", "sqlite");
        assert!(matches!(
            StoreConfig::from_env(),
            Err(StoreError::Configuration(msg)) if msg.contains("sqlite")
        ));

        // Scenario 5: bad retention
        clear_all_store_vars();
        std::env::set_var("TASK_RETENTION_HOURS", "soon");
        assert!(matches!(
            StoreConfig::from_env(),
            Err(StoreError::Configuration(msg)) if msg.contains("TASK_RETENTION_HOURS")
        ));

        clear_all_store_vars();
    }
}
