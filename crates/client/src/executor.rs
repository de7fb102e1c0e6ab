//! Request description and the executor seam every operation goes through.

use async_trait::async_trait;
use meili_core::ContentType;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Encoded request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
  pub bytes: Vec<u8>,
  pub content_type: ContentType,
}

impl Body {
  pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
    Ok(Self {
      bytes: serde_json::to_vec(value).map_err(Error::Encode)?,
      content_type: ContentType::Json,
    })
  }

  pub fn raw(bytes: Vec<u8>, content_type: ContentType) -> Self {
    Self { bytes, content_type }
  }
}

/// One call against the HTTP API.
#[derive(Debug, Clone)]
pub struct Request {
  pub method: Method,
  pub endpoint: String,
  pub query: Vec<(&'static str, String)>,
  pub body: Option<Body>,
  pub accepted: Vec<StatusCode>,
  /// Operation name used in errors and logs.
  pub function: &'static str,
}

impl Request {
  pub fn new(method: Method, endpoint: impl Into<String>, function: &'static str) -> Self {
    Self {
      method,
      endpoint: endpoint.into(),
      query: Vec::new(),
      body: None,
      accepted: Vec::new(),
      function,
    }
  }

  pub fn get(endpoint: impl Into<String>, function: &'static str) -> Self {
    Self::new(Method::GET, endpoint, function).accept(StatusCode::OK)
  }

  pub fn post(endpoint: impl Into<String>, function: &'static str) -> Self {
    Self::new(Method::POST, endpoint, function)
  }

  pub fn put(endpoint: impl Into<String>, function: &'static str) -> Self {
    Self::new(Method::PUT, endpoint, function)
  }

  pub fn patch(endpoint: impl Into<String>, function: &'static str) -> Self {
    Self::new(Method::PATCH, endpoint, function)
  }

  pub fn delete(endpoint: impl Into<String>, function: &'static str) -> Self {
    Self::new(Method::DELETE, endpoint, function)
  }

  pub fn accept(mut self, status: StatusCode) -> Self {
    self.accepted.push(status);
    self
  }

  /// Mutations are acknowledged with 202 and a `TaskInfo` body.
  pub fn accept_task(self) -> Self {
    self.accept(StatusCode::ACCEPTED)
  }

  pub fn query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
    self.query.extend(pairs);
    self
  }

  pub fn body(mut self, body: Body) -> Self {
    self.body = Some(body);
    self
  }

  pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
    Ok(self.body(Body::json(value)?))
  }

  pub fn is_accepted(&self, status: StatusCode) -> bool {
    self.accepted.contains(&status)
  }
}

/// Performs a [`Request`] and returns the raw response body.
///
/// Implementations validate the status against `request.accepted`, classify
/// failures into [`Error`] and must return [`Error::Cancelled`] as soon as
/// `cancel` fires. They never retry.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
  async fn execute(&self, request: Request, cancel: &CancellationToken) -> Result<Vec<u8>>;
}

/// Execute and decode a JSON response.
pub async fn call<T: DeserializeOwned>(
  executor: &dyn RequestExecutor,
  request: Request,
  cancel: &CancellationToken,
) -> Result<T> {
  if cancel.is_cancelled() {
    return Err(Error::Cancelled);
  }
  let bytes = executor.execute(request, cancel).await?;
  serde_json::from_slice(&bytes).map_err(Error::Decode)
}
