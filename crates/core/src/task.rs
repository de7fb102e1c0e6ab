//! Server-side task records and the acknowledgments that reference them.
//!
//! Every mutation accepted by the server is recorded as a [`Task`] and answered
//! immediately with a [`TaskInfo`]. The task then moves through its status
//! lifecycle on the server; clients only observe it by fetching it again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
///
/// Progression is monotonic: `enqueued -> processing -> succeeded | failed`,
/// or `enqueued | processing -> canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
  Enqueued,
  Processing,
  Succeeded,
  Failed,
  Canceled,
}

impl TaskStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      TaskStatus::Enqueued => "enqueued",
      TaskStatus::Processing => "processing",
      TaskStatus::Succeeded => "succeeded",
      TaskStatus::Failed => "failed",
      TaskStatus::Canceled => "canceled",
    }
  }

  /// No transition leaves a terminal status.
  pub fn is_terminal(&self) -> bool {
    matches!(self, TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled)
  }

  /// Whether the server may legally move a task from `self` to `next`.
  pub fn can_transition_to(&self, next: TaskStatus) -> bool {
    match (self, next) {
      (TaskStatus::Enqueued, TaskStatus::Processing | TaskStatus::Canceled) => true,
      (TaskStatus::Processing, TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled) => true,
      _ => false,
    }
  }
}

impl fmt::Display for TaskStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for TaskStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "enqueued" => Ok(TaskStatus::Enqueued),
      "processing" => Ok(TaskStatus::Processing),
      "succeeded" => Ok(TaskStatus::Succeeded),
      "failed" => Ok(TaskStatus::Failed),
      "canceled" => Ok(TaskStatus::Canceled),
      other => Err(format!("unknown task status: {other}")),
    }
  }
}

/// Kind of operation a task performs.
///
/// Unknown kinds reported by newer servers decode into [`TaskType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
  IndexCreation,
  IndexUpdate,
  IndexDeletion,
  IndexSwap,
  DocumentAdditionOrUpdate,
  DocumentDeletion,
  DocumentEdition,
  SettingsUpdate,
  DumpCreation,
  TaskCancelation,
  TaskDeletion,
  SnapshotCreation,
  Other(String),
}

impl TaskType {
  pub fn as_str(&self) -> &str {
    match self {
      TaskType::IndexCreation => "indexCreation",
      TaskType::IndexUpdate => "indexUpdate",
      TaskType::IndexDeletion => "indexDeletion",
      TaskType::IndexSwap => "indexSwap",
      TaskType::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
      TaskType::DocumentDeletion => "documentDeletion",
      TaskType::DocumentEdition => "documentEdition",
      TaskType::SettingsUpdate => "settingsUpdate",
      TaskType::DumpCreation => "dumpCreation",
      TaskType::TaskCancelation => "taskCancelation",
      TaskType::TaskDeletion => "taskDeletion",
      TaskType::SnapshotCreation => "snapshotCreation",
      TaskType::Other(s) => s,
    }
  }
}

impl From<String> for TaskType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "indexCreation" => TaskType::IndexCreation,
      "indexUpdate" => TaskType::IndexUpdate,
      "indexDeletion" => TaskType::IndexDeletion,
      "indexSwap" => TaskType::IndexSwap,
      "documentAdditionOrUpdate" => TaskType::DocumentAdditionOrUpdate,
      "documentDeletion" => TaskType::DocumentDeletion,
      "documentEdition" => TaskType::DocumentEdition,
      "settingsUpdate" => TaskType::SettingsUpdate,
      "dumpCreation" => TaskType::DumpCreation,
      "taskCancelation" => TaskType::TaskCancelation,
      "taskDeletion" => TaskType::TaskDeletion,
      "snapshotCreation" => TaskType::SnapshotCreation,
      _ => TaskType::Other(s),
    }
  }
}

impl From<TaskType> for String {
  fn from(t: TaskType) -> Self {
    match t {
      TaskType::Other(s) => s,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for TaskType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Structured error reported by the server, either in a failed task or in
/// the body of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
  pub message: String,
  pub code: String,
  #[serde(rename = "type")]
  pub error_type: String,
  #[serde(default)]
  pub link: String,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.message, self.code)
  }
}

/// Per-kind details attached to a task. Only the fields relevant to the
/// task's kind are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDetails {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub received_documents: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub indexed_documents: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub edited_documents: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub provided_ids: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deleted_documents: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub original_filter: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary_key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matched_tasks: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub canceled_tasks: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deleted_tasks: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dump_uid: Option<String>,
}

/// Server-side record of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub uid: u64,
  #[serde(default)]
  pub index_uid: Option<String>,
  pub status: TaskStatus,
  #[serde(rename = "type")]
  pub task_type: TaskType,
  #[serde(default)]
  pub canceled_by: Option<u64>,
  #[serde(default)]
  pub details: Option<TaskDetails>,
  #[serde(default)]
  pub error: Option<ApiError>,
  #[serde(default)]
  pub duration: Option<String>,
  pub enqueued_at: DateTime<Utc>,
  #[serde(default)]
  pub started_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub finished_at: Option<DateTime<Utc>>,
}

impl Task {
  pub fn is_terminal(&self) -> bool {
    self.status.is_terminal()
  }

  pub fn is_success(&self) -> bool {
    self.status == TaskStatus::Succeeded
  }

  pub fn is_failure(&self) -> bool {
    self.status == TaskStatus::Failed
  }
}

/// Acknowledgment returned synchronously by every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
  pub task_uid: u64,
  #[serde(default)]
  pub index_uid: Option<String>,
  pub status: TaskStatus,
  #[serde(rename = "type")]
  pub task_type: TaskType,
  pub enqueued_at: DateTime<Utc>,
}

/// Filter for task listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasksQuery {
  pub uids: Vec<u64>,
  pub limit: u64,
  pub from: u64,
  pub statuses: Vec<TaskStatus>,
  pub types: Vec<TaskType>,
  pub index_uids: Vec<String>,
  pub canceled_by: Vec<u64>,
  pub reverse: bool,
  pub before_enqueued_at: Option<DateTime<Utc>>,
  pub after_enqueued_at: Option<DateTime<Utc>>,
  pub before_started_at: Option<DateTime<Utc>>,
  pub after_started_at: Option<DateTime<Utc>>,
  pub before_finished_at: Option<DateTime<Utc>>,
  pub after_finished_at: Option<DateTime<Utc>>,
}

impl TasksQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limit(mut self, limit: u64) -> Self {
    self.limit = limit;
    self
  }

  pub fn with_from(mut self, from: u64) -> Self {
    self.from = from;
    self
  }

  pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
    self.statuses = statuses.into_iter().collect();
    self
  }

  pub fn with_types(mut self, types: impl IntoIterator<Item = TaskType>) -> Self {
    self.types = types.into_iter().collect();
    self
  }

  pub fn with_index_uids<S: Into<String>>(mut self, uids: impl IntoIterator<Item = S>) -> Self {
    self.index_uids = uids.into_iter().map(Into::into).collect();
    self
  }

  /// Render as query parameters. Zero, false and empty values are omitted,
  /// sets are comma-joined.
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    if !self.uids.is_empty() {
      pairs.push(("uids", join(self.uids.iter())));
    }
    if self.limit != 0 {
      pairs.push(("limit", self.limit.to_string()));
    }
    if self.from != 0 {
      pairs.push(("from", self.from.to_string()));
    }
    if !self.statuses.is_empty() {
      pairs.push(("statuses", join(self.statuses.iter())));
    }
    if !self.types.is_empty() {
      pairs.push(("types", join(self.types.iter())));
    }
    if !self.index_uids.is_empty() {
      pairs.push(("indexUids", self.index_uids.join(",")));
    }
    if !self.canceled_by.is_empty() {
      pairs.push(("canceledBy", join(self.canceled_by.iter())));
    }
    if self.reverse {
      pairs.push(("reverse", "true".to_string()));
    }

    let dates = [
      ("beforeEnqueuedAt", &self.before_enqueued_at),
      ("afterEnqueuedAt", &self.after_enqueued_at),
      ("beforeStartedAt", &self.before_started_at),
      ("afterStartedAt", &self.after_started_at),
      ("beforeFinishedAt", &self.before_finished_at),
      ("afterFinishedAt", &self.after_finished_at),
    ];
    for (key, value) in dates {
      if let Some(at) = value {
        pairs.push((key, at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)));
      }
    }

    pairs
  }
}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
  items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

/// One page of task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
  pub results: Vec<Task>,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub from: Option<u64>,
  #[serde(default)]
  pub next: Option<u64>,
  #[serde(default)]
  pub total: u64,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_terminal_statuses() {
    assert!(!TaskStatus::Enqueued.is_terminal());
    assert!(!TaskStatus::Processing.is_terminal());
    assert!(TaskStatus::Succeeded.is_terminal());
    assert!(TaskStatus::Failed.is_terminal());
    assert!(TaskStatus::Canceled.is_terminal());
  }

  #[test]
  fn test_no_transition_out_of_terminal() {
    let all = [
      TaskStatus::Enqueued,
      TaskStatus::Processing,
      TaskStatus::Succeeded,
      TaskStatus::Failed,
      TaskStatus::Canceled,
    ];
    for from in all.iter().filter(|s| s.is_terminal()) {
      for to in all {
        assert!(!from.can_transition_to(to), "{from} -> {to} should be illegal");
      }
    }
    assert!(TaskStatus::Enqueued.can_transition_to(TaskStatus::Processing));
    assert!(TaskStatus::Enqueued.can_transition_to(TaskStatus::Canceled));
    assert!(!TaskStatus::Enqueued.can_transition_to(TaskStatus::Succeeded));
    assert!(TaskStatus::Processing.can_transition_to(TaskStatus::Failed));
  }

  #[test]
  fn test_decode_failed_task() {
    let json = r#"{
      "uid": 12,
      "indexUid": "movies",
      "status": "failed",
      "type": "documentAdditionOrUpdate",
      "canceledBy": null,
      "details": { "receivedDocuments": 3, "indexedDocuments": 0 },
      "error": {
        "message": "Document doesn't have a `id` attribute",
        "code": "missing_document_id",
        "type": "invalid_request",
        "link": "https://docs.meilisearch.com/errors#missing_document_id"
      },
      "duration": "PT0.001S",
      "enqueuedAt": "2024-03-01T10:00:00.000000Z",
      "startedAt": "2024-03-01T10:00:00.100000Z",
      "finishedAt": "2024-03-01T10:00:00.200000Z"
    }"#;

    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(task.uid, 12);
    assert_eq!(task.index_uid.as_deref(), Some("movies"));
    assert!(task.is_failure());
    assert!(task.is_terminal());
    assert_eq!(task.task_type, TaskType::DocumentAdditionOrUpdate);
    assert_eq!(task.error.as_ref().map(|e| e.code.as_str()), Some("missing_document_id"));
    assert_eq!(task.details.unwrap().received_documents, Some(3));
  }

  #[test]
  fn test_decode_task_info() {
    let json = r#"{"taskUid":7,"indexUid":"movies","status":"enqueued","type":"indexDeletion","enqueuedAt":"2024-03-01T10:00:00Z"}"#;
    let info: TaskInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.task_uid, 7);
    assert_eq!(info.status, TaskStatus::Enqueued);
    assert_eq!(info.task_type, TaskType::IndexDeletion);
  }

  #[test]
  fn test_unknown_task_type_is_preserved() {
    let t: TaskType = serde_json::from_str("\"upgradeDatabase\"").unwrap();
    assert_eq!(t, TaskType::Other("upgradeDatabase".to_string()));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"upgradeDatabase\"");
  }

  #[test]
  fn test_query_pairs_omit_unset_fields() {
    assert!(TasksQuery::new().to_query_pairs().is_empty());

    let query = TasksQuery::new()
      .with_limit(5)
      .with_statuses([TaskStatus::Enqueued, TaskStatus::Processing])
      .with_types([TaskType::SettingsUpdate])
      .with_index_uids(["movies", "books"]);

    assert_eq!(
      query.to_query_pairs(),
      vec![
        ("limit", "5".to_string()),
        ("statuses", "enqueued,processing".to_string()),
        ("types", "settingsUpdate".to_string()),
        ("indexUids", "movies,books".to_string()),
      ]
    );
  }

  #[test]
  fn test_query_pairs_dates() {
    let at = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
    let query = TasksQuery {
      after_enqueued_at: Some(at),
      reverse: true,
      ..Default::default()
    };
    assert_eq!(
      query.to_query_pairs(),
      vec![
        ("reverse", "true".to_string()),
        ("afterEnqueuedAt", "2024-03-01T10:00:00Z".to_string()),
      ]
    );
  }
}
