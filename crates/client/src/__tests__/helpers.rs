//! Scripted executor for scenario tests.
//!
//! `RecordingExecutor` records every request it receives and answers with a
//! caller-supplied closure given the request and its zero-based call number.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::{
  error::{Error, Result},
  executor::{Request, RequestExecutor},
};

type Responder = Box<dyn Fn(&Request, usize) -> Result<Vec<u8>> + Send + Sync>;

pub struct RecordingExecutor {
  requests: Mutex<Vec<Request>>,
  responder: Responder,
}

impl RecordingExecutor {
  pub fn new(responder: impl Fn(&Request, usize) -> Result<Vec<u8>> + Send + Sync + 'static) -> Arc<Self> {
    Arc::new(Self {
      requests: Mutex::new(Vec::new()),
      responder: Box::new(responder),
    })
  }

  /// Acknowledge every call with an enqueued task whose uid is the call number.
  pub fn acknowledging() -> Arc<Self> {
    Self::new(|_, n| Ok(task_info(n as u64)))
  }

  pub fn requests(&self) -> Vec<Request> {
    self.requests.lock().unwrap().clone()
  }

  pub fn count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }
}

#[async_trait]
impl RequestExecutor for RecordingExecutor {
  async fn execute(&self, request: Request, cancel: &CancellationToken) -> Result<Vec<u8>> {
    if cancel.is_cancelled() {
      return Err(Error::Cancelled);
    }
    let n = {
      let mut requests = self.requests.lock().unwrap();
      requests.push(request.clone());
      requests.len() - 1
    };
    (self.responder)(&request, n)
  }
}

/// Body of a 202 acknowledgment.
pub fn task_info(task_uid: u64) -> Vec<u8> {
  serde_json::to_vec(&json!({
    "taskUid": task_uid,
    "indexUid": "movies",
    "status": "enqueued",
    "type": "documentAdditionOrUpdate",
    "enqueuedAt": "2024-05-01T10:00:00Z"
  }))
  .unwrap()
}

/// Body of a task lookup in the given status.
pub fn task(uid: u64, status: &str) -> Vec<u8> {
  let mut value = json!({
    "uid": uid,
    "indexUid": "movies",
    "status": status,
    "type": "documentAdditionOrUpdate",
    "enqueuedAt": "2024-05-01T10:00:00Z"
  });
  if status == "failed" {
    value["error"] = json!({
      "message": "The primary key inference failed.",
      "code": "index_primary_key_no_candidate_found",
      "type": "invalid_request",
      "link": "https://docs.meilisearch.com/errors#index_primary_key_no_candidate_found"
    });
  }
  serde_json::to_vec(&value).unwrap()
}

pub fn index_result(uid: &str, primary_key: Option<&str>) -> Vec<u8> {
  serde_json::to_vec(&json!({
    "uid": uid,
    "primaryKey": primary_key,
    "createdAt": "2024-05-01T10:00:00Z",
    "updatedAt": "2024-05-01T10:00:00Z"
  }))
  .unwrap()
}

pub fn query_value<'a>(request: &'a Request, key: &str) -> Option<&'a str> {
  request.query.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
}

pub fn body_json(request: &Request) -> serde_json::Value {
  serde_json::from_slice(&request.body.as_ref().expect("request has a body").bytes).unwrap()
}

pub fn body_text(request: &Request) -> String {
  String::from_utf8(request.body.as_ref().expect("request has a body").bytes.clone()).unwrap()
}
