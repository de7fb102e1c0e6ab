//! Task accessor and poller.
//!
//! # Polling model
//!
//! [`wait_for_task`] polls at a fixed interval until the task reaches a
//! terminal status. There is no backoff and no iteration bound: the loop
//! ends only when the server finishes the task or the caller's cancellation
//! token fires. Callers that need a deadline use [`wait_for_task_with_timeout`]
//! or cancel the token themselves.
//!
//! A task that ends in `failed` or `canceled` is returned as `Ok`; only
//! transport, lookup and cancellation problems are errors.

use std::time::Duration;

use meili_core::{Task, TaskResult, TasksQuery};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
  error::{Error, Result},
  executor::{Request, RequestExecutor, call},
};

/// Interval used when the caller passes a zero interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Replace a zero interval with [`DEFAULT_POLL_INTERVAL`].
pub fn effective_interval(interval: Duration) -> Duration {
  if interval.is_zero() { DEFAULT_POLL_INTERVAL } else { interval }
}

/// Fetch the current state of one task.
pub async fn get_task(executor: &dyn RequestExecutor, task_uid: u64, cancel: &CancellationToken) -> Result<Task> {
  call(executor, Request::get(format!("/tasks/{task_uid}"), "GetTask"), cancel).await
}

/// List tasks matching `query`. Filtering happens server side.
pub async fn get_tasks(
  executor: &dyn RequestExecutor,
  query: &TasksQuery,
  cancel: &CancellationToken,
) -> Result<TaskResult> {
  let request = Request::get("/tasks", "GetTasks").query(query.to_query_pairs());
  call(executor, request, cancel).await
}

/// Poll a task until it reaches a terminal status.
///
/// The token is checked before every fetch and raced against every sleep;
/// once it fires no further request is issued.
pub async fn wait_for_task(
  executor: &dyn RequestExecutor,
  task_uid: u64,
  interval: Duration,
  cancel: &CancellationToken,
) -> Result<Task> {
  let interval = effective_interval(interval);
  let mut attempts: u64 = 0;

  loop {
    if cancel.is_cancelled() {
      debug!(task_uid, attempts, "Task wait cancelled");
      return Err(Error::Cancelled);
    }

    let task = get_task(executor, task_uid, cancel).await?;
    attempts += 1;

    if task.is_terminal() {
      debug!(task_uid, status = %task.status, attempts, "Task reached terminal status");
      return Ok(task);
    }

    trace!(
      task_uid,
      status = %task.status,
      attempts,
      interval_ms = interval.as_millis(),
      "Task not finished, waiting"
    );

    tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        debug!(task_uid, attempts, "Task wait cancelled during sleep");
        return Err(Error::Cancelled);
      }
      _ = sleep(interval) => {}
    }
  }
}

/// [`wait_for_task`] bounded by a deadline. Expiry surfaces as
/// [`Error::Cancelled`], the same as a caller cancellation.
pub async fn wait_for_task_with_timeout(
  executor: &dyn RequestExecutor,
  task_uid: u64,
  interval: Duration,
  timeout: Duration,
  cancel: &CancellationToken,
) -> Result<Task> {
  match tokio::time::timeout(timeout, wait_for_task(executor, task_uid, interval, cancel)).await {
    Ok(result) => result,
    Err(_) => {
      debug!(task_uid, timeout_ms = timeout.as_millis(), "Task wait deadline expired");
      Err(Error::Cancelled)
    }
  }
}
