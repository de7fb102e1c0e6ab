use std::{fmt, sync::Arc, time::Duration};

use meili_core::{
  ClientConfig, CreateIndexRequest, Health, IndexResult, IndexesQuery, IndexesResults, Task, TaskInfo, TaskResult,
  TasksQuery, Version,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
  error::Result,
  executor::{Request, RequestExecutor, call},
  http::HttpExecutor,
  index::Index,
  tasks,
};

/// Entry point: owns the executor and the root cancellation token, and hands
/// out [`Index`] handles that share both.
#[derive(Clone)]
pub struct Client {
  executor: Arc<dyn RequestExecutor>,
  cancel: CancellationToken,
  poll_interval: Duration,
  batch_size: usize,
}

impl fmt::Debug for Client {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Client")
      .field("poll_interval", &self.poll_interval)
      .field("batch_size", &self.batch_size)
      .finish_non_exhaustive()
  }
}

impl Client {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let executor = HttpExecutor::new(config)?;
    Ok(
      Self::with_executor(Arc::new(executor))
        .with_poll_interval(config.poll_interval())
        .with_batch_size(config.batch_size),
    )
  }

  /// Build a client on top of any executor.
  pub fn with_executor(executor: Arc<dyn RequestExecutor>) -> Self {
    Self {
      executor,
      cancel: CancellationToken::new(),
      poll_interval: tasks::DEFAULT_POLL_INTERVAL,
      batch_size: ClientConfig::default().batch_size,
    }
  }

  /// Replace the root token. Handles created afterwards use a child of it.
  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  pub fn with_poll_interval(mut self, interval: Duration) -> Self {
    self.poll_interval = tasks::effective_interval(interval);
    self
  }

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.cancel
  }

  pub fn poll_interval(&self) -> Duration {
    self.poll_interval
  }

  /// Default chunk size for batched ingestion, from configuration.
  pub fn batch_size(&self) -> usize {
    self.batch_size
  }

  /// A handle for `uid` with an empty primary-key cache. No request is made.
  pub fn index(&self, uid: impl Into<String>) -> Index {
    Index::new(uid, Arc::clone(&self.executor))
      .with_cancellation(self.cancel.child_token())
      .with_poll_interval(self.poll_interval)
  }

  pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<TaskInfo> {
    let request = Request::post("/indexes", "CreateIndex")
      .accept_task()
      .json(&CreateIndexRequest { uid, primary_key })?;
    let task: TaskInfo = call(self.executor.as_ref(), request, &self.cancel).await?;
    debug!(index = uid, task_uid = task.task_uid, "Index creation enqueued");
    Ok(task)
  }

  /// Fetch an index and return a handle with its primary key cached.
  pub async fn get_index(&self, uid: &str) -> Result<Index> {
    let info = self.get_raw_index(uid).await?;
    Ok(self.index(info.uid).with_primary_key(info.primary_key))
  }

  pub async fn get_raw_index(&self, uid: &str) -> Result<IndexResult> {
    call(self.executor.as_ref(), Request::get(format!("/indexes/{uid}"), "GetIndex"), &self.cancel).await
  }

  pub async fn list_indexes(&self, query: &IndexesQuery) -> Result<IndexesResults> {
    let request = Request::get("/indexes", "ListIndexes").query(query.to_query_pairs());
    call(self.executor.as_ref(), request, &self.cancel).await
  }

  pub async fn delete_index(&self, uid: &str) -> Result<TaskInfo> {
    let request = Request::delete(format!("/indexes/{uid}"), "DeleteIndex").accept_task();
    call(self.executor.as_ref(), request, &self.cancel).await
  }

  pub async fn get_task(&self, task_uid: u64) -> Result<Task> {
    tasks::get_task(self.executor.as_ref(), task_uid, &self.cancel).await
  }

  /// List tasks across all indexes.
  pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TaskResult> {
    tasks::get_tasks(self.executor.as_ref(), query, &self.cancel).await
  }

  pub async fn wait_for_task(&self, task_uid: u64, interval: Duration) -> Result<Task> {
    tasks::wait_for_task(self.executor.as_ref(), task_uid, interval, &self.cancel).await
  }

  pub async fn wait_for_task_with_timeout(&self, task_uid: u64, interval: Duration, timeout: Duration) -> Result<Task> {
    tasks::wait_for_task_with_timeout(self.executor.as_ref(), task_uid, interval, timeout, &self.cancel).await
  }

  pub async fn health(&self) -> Result<Health> {
    call(self.executor.as_ref(), Request::get("/health", "Health"), &self.cancel).await
  }

  pub async fn version(&self) -> Result<Version> {
    call(self.executor.as_ref(), Request::get("/version", "Version"), &self.cancel).await
  }
}
