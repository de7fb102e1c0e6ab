#[cfg(test)]
mod tests {
  use std::time::Duration;

  use meili_core::TaskStatus;
  use reqwest::Method;
  use serde_json::json;

  use crate::{
    __tests__::helpers::{RecordingExecutor, task, task_info},
    blocking::Client,
  };

  #[test]
  fn test_blocking_ingest_then_wait() {
    let executor = RecordingExecutor::new(|request, n| {
      if request.method == Method::GET {
        Ok(task(1, if n < 3 { "processing" } else { "succeeded" }))
      } else {
        Ok(task_info(n as u64))
      }
    });
    let client = Client::with_executor(executor.clone()).unwrap();
    let index = client.index("movies");

    let docs: Vec<_> = (0..3).map(|i| json!({ "id": i })).collect();
    let tasks = index.add_documents_in_batches(&docs, 2, None).unwrap();
    assert_eq!(tasks.len(), 2);

    let done = index.wait_for_task(tasks[1].task_uid, Duration::from_millis(1)).unwrap();
    assert_eq!(done.status, TaskStatus::Succeeded);
    assert_eq!(executor.count(), 4);
  }

  #[test]
  fn test_blocking_handle_keeps_cache() {
    let executor = RecordingExecutor::acknowledging();
    let client = Client::with_executor(executor.clone()).unwrap();
    let mut index = client.index("movies");

    index.update_index("id").unwrap();
    assert_eq!(index.primary_key(), Some("id"));

    let ranking = index.run(|inner| inner.reset_ranking_rules()).unwrap();
    assert_eq!(ranking.task_uid, 1);
    assert_eq!(executor.requests()[1].endpoint, "/indexes/movies/settings/ranking-rules");
  }
}
