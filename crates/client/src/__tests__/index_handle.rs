//! Index handle scenarios: primary-key cache maintenance and task scoping.

#[cfg(test)]
mod tests {
  use meili_core::{SearchRequest, Settings, TasksQuery};
  use pretty_assertions::assert_eq;
  use reqwest::Method;
  use serde_json::json;

  use crate::{
    __tests__::helpers::{RecordingExecutor, body_json, index_result, query_value, task_info},
    client::Client,
    error::Error,
    index::Index,
  };

  fn empty_tasks() -> Vec<u8> {
    br#"{"results":[],"limit":20,"from":null,"next":null,"total":0}"#.to_vec()
  }

  fn rejection(status: u16) -> Error {
    let body = r#"{"message":"Index `movies` not found.","code":"index_not_found","type":"invalid_request","link":""}"#;
    Error::from_status("UpdateIndex", status, body.to_string())
  }

  #[tokio::test]
  async fn test_update_index_sets_cache_and_delete_clears_it() {
    let executor = RecordingExecutor::acknowledging();
    let mut index = Index::new("movies", executor.clone());
    assert_eq!(index.primary_key(), None);

    let task = index.update_index("movie_id").await.unwrap();
    assert_eq!(task.task_uid, 0);
    assert_eq!(index.primary_key(), Some("movie_id"));

    index.delete().await.unwrap();
    assert_eq!(index.primary_key(), None);

    let requests = executor.requests();
    assert_eq!(requests[0].method, Method::PATCH);
    assert_eq!(requests[0].endpoint, "/indexes/movies");
    assert_eq!(body_json(&requests[0]), json!({ "primaryKey": "movie_id" }));
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].endpoint, "/indexes/movies");
  }

  #[tokio::test]
  async fn test_failed_mutation_leaves_cache_untouched() {
    let executor = RecordingExecutor::new(|_, n| if n == 0 { Ok(task_info(0)) } else { Err(rejection(404)) });
    let mut index = Index::new("movies", executor.clone());

    index.update_index("id").await.unwrap();
    let update = index.update_index("other").await;
    assert!(update.unwrap_err().is_not_found());
    assert_eq!(index.primary_key(), Some("id"));

    let delete = index.delete().await;
    assert!(delete.is_err());
    assert_eq!(index.primary_key(), Some("id"));
  }

  #[tokio::test]
  async fn test_fetch_info_only_sets_reported_key() {
    let executor = RecordingExecutor::new(|_, n| match n {
      0 => Ok(index_result("movies", Some("id"))),
      _ => Ok(index_result("movies", None)),
    });
    let mut index = Index::new("movies", executor.clone());

    let info = index.fetch_info().await.unwrap();
    assert_eq!(info.primary_key.as_deref(), Some("id"));
    assert_eq!(index.primary_key(), Some("id"));

    index.fetch_info().await.unwrap();
    assert_eq!(index.primary_key(), Some("id"), "a missing key does not clear the cache");
  }

  #[tokio::test]
  async fn test_fetch_primary_key_clears_stale_value() {
    let executor = RecordingExecutor::new(|request, n| match (request.method.clone(), n) {
      (Method::PATCH, _) => Ok(task_info(0)),
      _ => Ok(index_result("movies", None)),
    });
    let mut index = Index::new("movies", executor.clone());
    index.update_index("stale").await.unwrap();
    assert_eq!(index.primary_key(), Some("stale"));

    let primary_key = index.fetch_primary_key().await.unwrap();

    assert_eq!(primary_key, None);
    assert_eq!(index.primary_key(), None);
  }

  #[tokio::test]
  async fn test_get_tasks_is_scoped_to_index() {
    let executor = RecordingExecutor::new(|_, _| Ok(empty_tasks()));
    let index = Index::new("movies", executor.clone());

    index.get_tasks(&TasksQuery::new()).await.unwrap();
    let caller_query = TasksQuery::new().with_index_uids(["books"]).with_limit(5);
    index.get_tasks(&caller_query).await.unwrap();

    let requests = executor.requests();
    assert_eq!(requests[0].endpoint, "/tasks");
    assert_eq!(query_value(&requests[0], "indexUids"), Some("movies"));
    assert_eq!(query_value(&requests[1], "indexUids"), Some("books,movies"));
    assert_eq!(query_value(&requests[1], "limit"), Some("5"));
    assert_eq!(caller_query.index_uids, vec!["books".to_string()]);
  }

  #[tokio::test]
  async fn test_client_get_index_populates_cache() {
    let executor = RecordingExecutor::new(|_, _| Ok(index_result("movies", Some("id"))));
    let client = Client::with_executor(executor.clone());

    let index = client.get_index("movies").await.unwrap();

    assert_eq!(index.uid(), "movies");
    assert_eq!(index.primary_key(), Some("id"));
    assert_eq!(executor.requests()[0].endpoint, "/indexes/movies");
  }

  #[tokio::test]
  async fn test_client_index_handle_follows_client_cancellation() {
    let executor = RecordingExecutor::acknowledging();
    let client = Client::with_executor(executor.clone());
    let index = client.index("movies");

    client.cancellation_token().cancel();
    let result = index.add_documents(&[json!({ "id": 1 })], None).await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(executor.count(), 0);
  }

  #[tokio::test]
  async fn test_create_index_body() {
    let executor = RecordingExecutor::acknowledging();
    let client = Client::with_executor(executor.clone());

    client.create_index("movies", Some("id")).await.unwrap();
    client.create_index("books", None).await.unwrap();

    let requests = executor.requests();
    assert_eq!(requests[0].endpoint, "/indexes");
    assert_eq!(body_json(&requests[0]), json!({ "uid": "movies", "primaryKey": "id" }));
    assert_eq!(body_json(&requests[1]), json!({ "uid": "books" }));
  }

  #[tokio::test]
  async fn test_get_documents_with_filter_uses_fetch_route() {
    let executor = RecordingExecutor::new(|_, _| Ok(br#"{"results":[],"limit":20,"offset":0,"total":0}"#.to_vec()));
    let index = Index::new("movies", executor.clone());

    let plain = meili_core::DocumentsQuery {
      limit: 3,
      ..Default::default()
    };
    index.get_documents::<meili_core::Document>(&plain).await.unwrap();
    let filtered = meili_core::DocumentsQuery {
      filter: Some(json!("genre = horror")),
      ..Default::default()
    };
    index.get_documents::<meili_core::Document>(&filtered).await.unwrap();

    let requests = executor.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].endpoint, "/indexes/movies/documents");
    assert_eq!(query_value(&requests[0], "limit"), Some("3"));
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(requests[1].endpoint, "/indexes/movies/documents/fetch");
    assert_eq!(body_json(&requests[1]), json!({ "filter": "genre = horror" }));
  }

  #[tokio::test]
  async fn test_search_sends_query_and_options() {
    let executor = RecordingExecutor::new(|_, _| {
      let body = r#"{"hits":[{"id":1}],"query":"carol","processingTimeMs":0,"limit":2,"offset":0,"estimatedTotalHits":1}"#;
      Ok(body.as_bytes().to_vec())
    });
    let index = Index::new("movies", executor.clone());
    let request = SearchRequest {
      limit: Some(2),
      ..Default::default()
    };

    let response = index.search::<serde_json::Value>("carol", &request).await.unwrap();

    assert_eq!(response.hits, vec![json!({ "id": 1 })]);
    let sent = &executor.requests()[0];
    assert_eq!(sent.endpoint, "/indexes/movies/search");
    assert_eq!(body_json(sent), json!({ "q": "carol", "limit": 2 }));
  }

  #[tokio::test]
  async fn test_settings_routes_and_methods() {
    let executor = RecordingExecutor::acknowledging();
    let index = Index::new("movies", executor.clone());

    index.update_filterable_attributes(&["genre".to_string()]).await.unwrap();
    index.update_pagination(&meili_core::Pagination { max_total_hits: 50 }).await.unwrap();
    index.reset_stop_words().await.unwrap();
    index
      .update_settings(&Settings {
        search_cutoff_ms: Some(150),
        ..Default::default()
      })
      .await
      .unwrap();

    let requests = executor.requests();
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].endpoint, "/indexes/movies/settings/filterable-attributes");
    assert_eq!(requests[0].function, "UpdateFilterableAttributes");
    assert_eq!(requests[1].method, Method::PATCH);
    assert_eq!(requests[1].endpoint, "/indexes/movies/settings/pagination");
    assert_eq!(requests[2].method, Method::DELETE);
    assert_eq!(requests[2].endpoint, "/indexes/movies/settings/stop-words");
    assert_eq!(requests[3].method, Method::PATCH);
    assert_eq!(body_json(&requests[3]), json!({ "searchCutoffMs": 150 }));
  }
}
