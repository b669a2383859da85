//! Task record model and the merge rules shared by every backend.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for task progress.
pub const MAX_PROGRESS: u8 = 100;

/// Lifecycle state of a generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskState {
    /// Compact integer code used by older status consumers.
    pub fn code(&self) -> i8 {
        match self {
            TaskState::Failed => -1,
            TaskState::Pending => 0,
            TaskState::Completed => 1,
            TaskState::Processing => 4,
        }
    }

    /// Reverse of [`TaskState::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(TaskState::Failed),
            0 => Some(TaskState::Pending),
            1 => Some(TaskState::Completed),
            4 => Some(TaskState::Processing),
            _ => None,
        }
    }

    /// Get the state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Processing => "processing",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
        }
    }

    /// Whether no further updates are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied extra field value.
///
/// The variant tag is stored alongside the value so that every backend
/// reads back exactly the type that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Clamp any integer progress into `0..=100`.
pub fn clamp_progress(progress: i64) -> u8 {
    // Lossless: the value is clamped into u8 range first
    progress.clamp(0, i64::from(MAX_PROGRESS)) as u8
}

/// The stored status of one generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub state: TaskState,
    pub progress: u8,
    /// Only present while `state` is [`TaskState::Failed`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl TaskRecord {
    /// Create a fresh record with default state and zero progress.
    pub fn new(task_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            task_id: task_id.into(),
            state: TaskState::Pending,
            progress: 0,
            error: None,
            created_at: now,
            updated_at: now,
            fields: BTreeMap::new(),
        }
    }

    /// Get an extra field.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Merge an update into this record.
    ///
    /// `created_at` is never touched; `updated_at` only moves forward.
    pub fn apply(&mut self, update: TaskUpdate, now: DateTime<Utc>) {
        self.state = update.state;
        self.progress = clamp_progress(update.progress);
        self.error = match self.state {
            TaskState::Failed => update.error.or_else(|| self.error.take()),
            _ => None,
        };
        self.fields.extend(update.fields);
        self.updated_at = self.updated_at.max(now);
    }
}

/// Merge `update` into `existing`, creating the record when it is absent.
pub fn upsert(
    existing: Option<TaskRecord>,
    task_id: &str,
    update: TaskUpdate,
    now: DateTime<Utc>,
) -> TaskRecord {
    let mut record = existing.unwrap_or_else(|| TaskRecord::new(task_id, now));
    record.apply(update, now);
    record
}

/// A single write to a task record.
///
/// Defaults to `Processing` with zero progress and no extra fields.
///
/// # Example
///
/// ```rust
/// use task_state::{TaskState, TaskUpdate};
///
/// let update = TaskUpdate::new(TaskState::Processing)
///     .progress(40)
///     .field("script", "Hello world")
///     .field("terms", vec!["cats", "dogs"]);
/// assert_eq!(update.fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub state: TaskState,
    /// Raw progress; clamped to `0..=100` when applied.
    pub progress: i64,
    pub error: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Default for TaskUpdate {
    fn default() -> Self {
        Self::new(TaskState::Processing)
    }
}

impl TaskUpdate {
    /// Create an update that sets `state`.
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            progress: 0,
            error: None,
            fields: BTreeMap::new(),
        }
    }

    /// Mark the task completed at full progress.
    pub fn completed() -> Self {
        Self::new(TaskState::Completed).progress(i64::from(MAX_PROGRESS))
    }

    /// Mark the task failed with an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::new(TaskState::Failed).error(error)
    }

    /// Set the progress.
    pub fn progress(mut self, progress: i64) -> Self {
        self.progress = progress;
        self
    }

    /// Set the error message.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Add an extra field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(0), 0);
        assert_eq!(clamp_progress(42), 42);
        assert_eq!(clamp_progress(100), 100);
        assert_eq!(clamp_progress(250), 100);
        assert_eq!(clamp_progress(i64::MAX), 100);
        assert_eq!(clamp_progress(i64::MIN), 0);
    }

    #[test]
    fn test_state_codes_round_trip() {
        for state in [
            TaskState::Pending,
            TaskState::Processing,
            TaskState::Completed,
            TaskState::Failed,
        ] {
            assert_eq!(TaskState::from_code(state.code().into()), Some(state));
        }
        assert_eq!(TaskState::from_code(7), None);
    }

    #[test]
    fn test_upsert_creates_with_equal_timestamps() {
        let now = Utc::now();
        let record = upsert(None, "task-1", TaskUpdate::default().progress(10), now);

        assert_eq!(record.task_id, "task-1");
        assert_eq!(record.state, TaskState::Processing);
        assert_eq!(record.progress, 10);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_apply_keeps_created_at_and_never_rewinds() {
        let start = Utc::now();
        let mut record = TaskRecord::new("task-1", start);

        record.apply(TaskUpdate::default(), start + Duration::seconds(5));
        assert_eq!(record.created_at, start);
        assert_eq!(record.updated_at, start + Duration::seconds(5));

        // A clock step backwards must not move updated_at back
        record.apply(TaskUpdate::default(), start + Duration::seconds(1));
        assert_eq!(record.updated_at, start + Duration::seconds(5));
    }

    #[test]
    fn test_error_only_kept_while_failed() {
        let now = Utc::now();
        let mut record = TaskRecord::new("task-1", now);

        record.apply(TaskUpdate::failed("provider down"), now);
        assert_eq!(record.error.as_deref(), Some("provider down"));

        // Another failed write without a message keeps the old one
        record.apply(TaskUpdate::new(TaskState::Failed), now);
        assert_eq!(record.error.as_deref(), Some("provider down"));

        record.apply(TaskUpdate::new(TaskState::Processing).error("ignored"), now);
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_fields_merge() {
        let now = Utc::now();
        let mut record = TaskRecord::new("task-1", now);

        record.apply(TaskUpdate::default().field("script", "a").field("count", 2), now);
        record.apply(TaskUpdate::default().field("count", 3), now);

        assert_eq!(record.field("script"), Some(&FieldValue::from("a")));
        assert_eq!(record.field("count").and_then(FieldValue::as_i64), Some(3));
    }

    #[test]
    fn test_record_json_keeps_field_types() {
        let now = Utc::now();
        let record = upsert(
            None,
            "task-1",
            TaskUpdate::completed()
                .field("video", "out/final.mp4")
                .field("duration", 42)
                .field("terms", vec!["cats", "dogs"])
                .field("numeric_text", "123"),
            now,
        );

        let json = serde_json::to_string(&record).unwrap();
        let decoded: TaskRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.field("numeric_text").and_then(FieldValue::as_str), Some("123"));
        assert_eq!(decoded.field("duration").and_then(FieldValue::as_i64), Some(42));
        assert_eq!(
            decoded.field("terms").and_then(FieldValue::as_list),
            Some(&["cats".to_string(), "dogs".to_string()][..])
        );
    }

    #[test]
    fn test_field_value_tagged_encoding() {
        let json = serde_json::to_value(FieldValue::Integer(7)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "value": 7}));
    }
}
