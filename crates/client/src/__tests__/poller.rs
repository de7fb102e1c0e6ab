//! Task poller scenarios run against a paused clock.

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use meili_core::TaskStatus;
  use pretty_assertions::assert_eq;
  use tokio::time::Instant;
  use tokio_util::sync::CancellationToken;

  use crate::{
    __tests__::helpers::{RecordingExecutor, task},
    error::Error,
    index::Index,
    tasks::{DEFAULT_POLL_INTERVAL, wait_for_task, wait_for_task_with_timeout},
  };

  fn progression(statuses: &'static [&'static str]) -> std::sync::Arc<RecordingExecutor> {
    RecordingExecutor::new(move |_, n| Ok(task(7, statuses[n.min(statuses.len() - 1)])))
  }

  #[tokio::test(start_paused = true)]
  async fn test_polls_until_succeeded() {
    let executor = progression(&["enqueued", "processing", "succeeded"]);
    let cancel = CancellationToken::new();

    let task = wait_for_task(executor.as_ref(), 7, Duration::from_millis(100), &cancel)
      .await
      .unwrap();

    assert_eq!(task.status, TaskStatus::Succeeded);
    assert_eq!(executor.count(), 3);
    assert!(executor.requests().iter().all(|r| r.endpoint == "/tasks/7"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_failed_task_is_returned_not_raised() {
    let executor = progression(&["processing", "failed"]);
    let cancel = CancellationToken::new();

    let task = wait_for_task(executor.as_ref(), 7, Duration::from_millis(10), &cancel)
      .await
      .unwrap();

    assert!(task.is_failure());
    assert_eq!(
      task.error.map(|e| e.code),
      Some("index_primary_key_no_candidate_found".to_string())
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_canceled_status_is_terminal() {
    let executor = progression(&["canceled"]);
    let task = wait_for_task(executor.as_ref(), 7, Duration::ZERO, &CancellationToken::new())
      .await
      .unwrap();
    assert_eq!(task.status, TaskStatus::Canceled);
    assert_eq!(executor.count(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_zero_interval_waits_default() {
    let executor = progression(&["enqueued", "succeeded"]);
    let start = Instant::now();

    wait_for_task(executor.as_ref(), 7, Duration::ZERO, &CancellationToken::new())
      .await
      .unwrap();

    assert!(start.elapsed() >= DEFAULT_POLL_INTERVAL);
    assert_eq!(executor.count(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_index_waits_at_its_own_interval() {
    let executor = progression(&["enqueued", "processing", "succeeded"]);
    let index = Index::new("movies", executor.clone()).with_poll_interval(Duration::from_millis(300));
    let start = Instant::now();

    let task = index.wait_for_task_default(7).await.unwrap();

    assert_eq!(task.status, TaskStatus::Succeeded);
    assert_eq!(executor.count(), 3);
    assert!(start.elapsed() >= Duration::from_millis(600));
    assert!(start.elapsed() < Duration::from_millis(900));
  }

  #[tokio::test(start_paused = true)]
  async fn test_cancel_stops_polling() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let executor = RecordingExecutor::new(move |_, n| {
      if n == 2 {
        trigger.cancel();
      }
      Ok(task(7, "processing"))
    });

    let result = wait_for_task(executor.as_ref(), 7, Duration::from_secs(1), &cancel).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(executor.count(), 3, "no request after cancellation");
  }

  #[tokio::test(start_paused = true)]
  async fn test_already_cancelled_makes_no_request() {
    let executor = progression(&["succeeded"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = wait_for_task(executor.as_ref(), 7, Duration::ZERO, &cancel).await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(executor.count(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_timeout_surfaces_as_cancelled() {
    let executor = progression(&["processing"]);

    let result = wait_for_task_with_timeout(
      executor.as_ref(),
      7,
      Duration::from_millis(100),
      Duration::from_millis(450),
      &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(executor.count(), 5);
  }

  #[tokio::test(start_paused = true)]
  async fn test_lookup_error_propagates() {
    let executor = RecordingExecutor::new(|_, _| {
      let body = r#"{"message":"Task `7` not found.","code":"task_not_found","type":"invalid_request","link":""}"#;
      Err(Error::from_status("GetTask", 404, body.to_string()))
    });

    let result = wait_for_task(executor.as_ref(), 7, Duration::ZERO, &CancellationToken::new()).await;

    assert!(result.unwrap_err().is_not_found());
    assert_eq!(executor.count(), 1);
  }
}
