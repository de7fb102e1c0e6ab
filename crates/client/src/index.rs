//! Index handle: a local reference to one index bound to a shared executor.
//!
//! Every mutation follows the same shape: encode the body, issue one call that
//! accepts only `202 Accepted`, return the [`TaskInfo`] acknowledgment and only
//! then update local state. A failed call leaves the handle unchanged.
//!
//! Document, search and settings operations live in sibling modules as
//! further `impl Index` blocks.

use std::{fmt, sync::Arc, time::Duration};

use meili_core::{IndexResult, StatsIndex, Task, TaskInfo, TaskResult, TasksQuery, UpdateIndexRequest};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
  error::Result,
  executor::{Request, RequestExecutor, call},
  tasks::{self, DEFAULT_POLL_INTERVAL},
};

#[derive(Clone)]
pub struct Index {
  uid: String,
  primary_key: Option<String>,
  pub(crate) executor: Arc<dyn RequestExecutor>,
  pub(crate) cancel: CancellationToken,
  pub(crate) poll_interval: Duration,
}

impl fmt::Debug for Index {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Index")
      .field("uid", &self.uid)
      .field("primary_key", &self.primary_key)
      .field("poll_interval", &self.poll_interval)
      .finish_non_exhaustive()
  }
}

impl Index {
  pub fn new(uid: impl Into<String>, executor: Arc<dyn RequestExecutor>) -> Self {
    Self {
      uid: uid.into(),
      primary_key: None,
      executor,
      cancel: CancellationToken::new(),
      poll_interval: DEFAULT_POLL_INTERVAL,
    }
  }

  /// Bind the handle to a cancellation token. Every call made through this
  /// handle stops with [`Error::Cancelled`](crate::Error::Cancelled) once it fires.
  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  pub fn with_poll_interval(mut self, interval: Duration) -> Self {
    self.poll_interval = tasks::effective_interval(interval);
    self
  }

  pub(crate) fn with_primary_key(mut self, primary_key: Option<String>) -> Self {
    self.primary_key = primary_key;
    self
  }

  pub fn uid(&self) -> &str {
    &self.uid
  }

  /// Last primary key this handle observed.
  ///
  /// This is a local cache, not the server's truth: it is written by
  /// [`update_index`](Self::update_index), [`fetch_info`](Self::fetch_info)
  /// and [`fetch_primary_key`](Self::fetch_primary_key), cleared by
  /// [`delete`](Self::delete), and never refreshed on its own. Another client
  /// changing the index is not reflected here. An acknowledged update also
  /// sets the cache before the server has processed the task, which may
  /// still fail.
  pub fn primary_key(&self) -> Option<&str> {
    self.primary_key.as_deref()
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.cancel
  }

  pub fn poll_interval(&self) -> Duration {
    self.poll_interval
  }

  pub(crate) fn executor(&self) -> &dyn RequestExecutor {
    self.executor.as_ref()
  }

  pub(crate) fn endpoint(&self, suffix: &str) -> String {
    format!("/indexes/{}{}", self.uid, suffix)
  }

  /// Fetch index metadata. The cache is refreshed only when the server
  /// reports a primary key.
  pub async fn fetch_info(&mut self) -> Result<IndexResult> {
    let info: IndexResult = call(self.executor(), Request::get(self.endpoint(""), "FetchInfo"), &self.cancel).await?;
    if let Some(primary_key) = &info.primary_key {
      self.primary_key = Some(primary_key.clone());
    }
    Ok(info)
  }

  /// Fetch the server's primary key and overwrite the cache with it, even
  /// when the server has none.
  pub async fn fetch_primary_key(&mut self) -> Result<Option<String>> {
    let info: IndexResult =
      call(self.executor(), Request::get(self.endpoint(""), "FetchPrimaryKey"), &self.cancel).await?;
    self.primary_key = info.primary_key.clone();
    Ok(info.primary_key)
  }

  /// Change the index primary key. The cache is set once the server
  /// acknowledges the request.
  pub async fn update_index(&mut self, primary_key: &str) -> Result<TaskInfo> {
    let request = Request::patch(self.endpoint(""), "UpdateIndex")
      .accept_task()
      .json(&UpdateIndexRequest {
        primary_key: primary_key.to_string(),
      })?;
    let task: TaskInfo = call(self.executor(), request, &self.cancel).await?;

    debug!(index = %self.uid, primary_key, task_uid = task.task_uid, "Primary key update enqueued");
    self.primary_key = Some(primary_key.to_string());
    Ok(task)
  }

  /// Delete the index this handle refers to and clear the cache.
  pub async fn delete(&mut self) -> Result<TaskInfo> {
    let request = Request::delete(self.endpoint(""), "Delete").accept_task();
    let task: TaskInfo = call(self.executor(), request, &self.cancel).await?;

    debug!(index = %self.uid, task_uid = task.task_uid, "Index deletion enqueued");
    self.primary_key = None;
    Ok(task)
  }

  pub async fn get_stats(&self) -> Result<StatsIndex> {
    call(self.executor(), Request::get(self.endpoint("/stats"), "GetStats"), &self.cancel).await
  }

  pub async fn get_task(&self, task_uid: u64) -> Result<Task> {
    tasks::get_task(self.executor(), task_uid, &self.cancel).await
  }

  /// List tasks, always restricted to this index in addition to any index
  /// filter already present. The caller's query is not modified.
  pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TaskResult> {
    tasks::get_tasks(self.executor(), &scope_to_index(query, &self.uid), &self.cancel).await
  }

  /// Poll a task until it is terminal. A zero interval uses the default.
  pub async fn wait_for_task(&self, task_uid: u64, interval: Duration) -> Result<Task> {
    tasks::wait_for_task(self.executor(), task_uid, interval, &self.cancel).await
  }

  /// Poll a task at this handle's [`poll_interval`](Self::poll_interval).
  pub async fn wait_for_task_default(&self, task_uid: u64) -> Result<Task> {
    self.wait_for_task(task_uid, self.poll_interval).await
  }

  pub async fn wait_for_task_with_timeout(&self, task_uid: u64, interval: Duration, timeout: Duration) -> Result<Task> {
    tasks::wait_for_task_with_timeout(self.executor(), task_uid, interval, timeout, &self.cancel).await
  }
}

pub(crate) fn scope_to_index(query: &TasksQuery, uid: &str) -> TasksQuery {
  let mut scoped = query.clone();
  if !scoped.index_uids.iter().any(|u| u == uid) {
    scoped.index_uids.push(uid.to_string());
  }
  scoped
}
