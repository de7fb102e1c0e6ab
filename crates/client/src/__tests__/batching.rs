//! Batched ingestion scenarios: chunk counts, ordering, partial failure and
//! cancellation between chunks.

#[cfg(test)]
mod tests {
  use meili_core::{ContentType, CsvDocumentsQuery, TaskStatus};
  use pretty_assertions::assert_eq;
  use reqwest::Method;
  use serde_json::{Value, json};
  use tokio_util::sync::CancellationToken;

  use crate::{
    __tests__::helpers::{RecordingExecutor, body_json, body_text, query_value, task_info},
    error::Error,
    index::Index,
  };

  fn movies(n: usize) -> Vec<Value> {
    (0..n).map(|i| json!({ "id": i, "title": format!("Movie {i}") })).collect()
  }

  #[tokio::test]
  async fn test_250_documents_in_batches_of_100() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());
    let docs = movies(250);

    let tasks = index.add_documents_in_batches(&docs, 100, Some("id")).await.unwrap();

    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Enqueued));
    assert_eq!(tasks.iter().map(|t| t.task_uid).collect::<Vec<_>>(), vec![0, 1, 2]);

    let requests = executor.requests();
    let sizes: Vec<usize> = requests.iter().map(|r| body_json(r).as_array().unwrap().len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let rebuilt: Vec<Value> = requests
      .iter()
      .flat_map(|r| body_json(r).as_array().unwrap().clone())
      .collect();
    assert_eq!(rebuilt, docs);

    for request in &requests {
      assert_eq!(request.method, Method::POST);
      assert_eq!(request.endpoint, "/indexes/movies/documents");
      assert_eq!(request.function, "AddDocumentsInBatches");
      assert_eq!(query_value(request, "primaryKey"), Some("id"));
    }
  }

  #[tokio::test]
  async fn test_submission_count_is_ceiling() {
    for (n, batch, expected) in [(1, 1, 1), (10, 3, 4), (9, 3, 3), (5, 100, 1), (0, 10, 0)] {
      let executor = RecordingExecutor::acknowledging();
      let index = Index::new("movies", executor.clone());
      let tasks = index.add_documents_in_batches(&movies(n), batch, None).await.unwrap();
      assert_eq!(tasks.len(), expected, "n={n} batch={batch}");
      assert_eq!(executor.count(), expected);
    }
  }

  #[tokio::test]
  async fn test_failure_on_second_chunk_stops_submission() {
    let executor = RecordingExecutor::new(|_, n| {
      if n == 1 {
        let body = r#"{"message":"bad","code":"bad_request","type":"invalid_request","link":""}"#;
        Err(Error::from_status("AddDocumentsInBatches", 400, body.to_string()))
      } else {
        Ok(task_info(n as u64))
      }
    });
    let index = Index::new("movies", executor.clone());

    let result = index.add_documents_in_batches(&movies(50), 10, None).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(executor.count(), 2, "no chunk after the failing one is attempted");
  }

  #[tokio::test]
  async fn test_zero_batch_size_makes_no_request() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());

    let json = index.add_documents_in_batches(&movies(3), 0, None).await;
    let csv = index
      .add_documents_csv_in_batches(b"id\n1\n", 0, &CsvDocumentsQuery::default())
      .await;
    let ndjson = index.add_documents_ndjson_in_batches(b"{\"id\":1}\n", 0, None).await;

    assert!(matches!(json, Err(Error::InvalidBatchSize(0))));
    assert!(matches!(csv, Err(Error::InvalidBatchSize(0))));
    assert!(matches!(ndjson, Err(Error::InvalidBatchSize(0))));
    assert_eq!(executor.count(), 0);
  }

  #[tokio::test]
  async fn test_non_ascii_csv_delimiter_makes_no_request() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());
    let csv = "id§title\n1§Carol, the movie\n";
    let query = CsvDocumentsQuery::default().with_delimiter('§');

    let batched = index.add_documents_csv_in_batches(csv.as_bytes(), 10, &query).await;
    let single = index.add_documents_csv(csv, &query).await;

    assert!(matches!(batched, Err(Error::InvalidDelimiter('§'))));
    assert!(matches!(single, Err(Error::InvalidDelimiter('§'))));
    assert_eq!(executor.count(), 0);
  }

  #[tokio::test]
  async fn test_update_in_batches_uses_put() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());

    index.update_documents_in_batches(&movies(4), 2, None).await.unwrap();

    let requests = executor.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method == Method::PUT));
    assert!(requests.iter().all(|r| r.function == "UpdateDocumentsInBatches"));
  }

  #[tokio::test]
  async fn test_csv_batches_repeat_header_and_pass_delimiter() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());
    let csv = "id;title\n1;Carol\n2;\"Wonder;Woman\"\n3;Life of Pi\n";
    let query = CsvDocumentsQuery::default().with_primary_key("id").with_delimiter(';');

    let tasks = index
      .add_documents_csv_from_reader_in_batches(csv.as_bytes(), 2, &query)
      .await
      .unwrap();

    assert_eq!(tasks.len(), 2);
    let requests = executor.requests();
    assert_eq!(body_text(&requests[0]), "id;title\n1;Carol\n2;\"Wonder;Woman\"\n");
    assert_eq!(body_text(&requests[1]), "id;title\n3;Life of Pi\n");
    for request in &requests {
      assert_eq!(request.body.as_ref().unwrap().content_type, ContentType::Csv);
      assert_eq!(query_value(request, "primaryKey"), Some("id"));
      assert_eq!(query_value(request, "csvDelimiter"), Some(";"));
    }
  }

  #[tokio::test]
  async fn test_ndjson_batches_count_records_not_lines() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());
    let ndjson = "{\"id\":1}\n\n{\"id\":2}\n{\"id\":3}\n\n";

    let tasks = index
      .add_documents_ndjson_from_reader_in_batches(ndjson.as_bytes(), 2, Some("id"))
      .await
      .unwrap();

    assert_eq!(tasks.len(), 2);
    let requests = executor.requests();
    assert_eq!(body_text(&requests[0]), "{\"id\":1}\n{\"id\":2}\n");
    assert_eq!(body_text(&requests[1]), "{\"id\":3}\n");
    assert!(requests.iter().all(|r| r.function == "AddDocumentsNdjsonInBatches"));
  }

  #[tokio::test]
  async fn test_cancelled_before_start_sends_nothing() {
    let executor = RecordingExecutor::acknowledging();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let index = Index::new("movies", executor.clone()).with_cancellation(cancel);

    let result = index.add_documents_in_batches(&movies(10), 5, None).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(executor.count(), 0);
  }

  #[tokio::test]
  async fn test_cancel_between_chunks_stops_submission() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let executor = RecordingExecutor::new(move |_, n| {
      trigger.cancel();
      Ok(task_info(n as u64))
    });
    let index = Index::new("movies", executor.clone()).with_cancellation(cancel);

    let result = index.add_documents_in_batches(&movies(10), 2, None).await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(executor.count(), 1);
  }
}
