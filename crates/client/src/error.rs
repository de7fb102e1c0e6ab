//! Error taxonomy for client operations.
//!
//! Transport failures, status mismatches, lookups of unknown identifiers and
//! caller cancellation are all distinct variants. A task that reaches the
//! `failed` status is not an error: it is returned as a successful
//! [`Task`](meili_core::Task) whose `error` field carries the detail.

use meili_core::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Connection, DNS or protocol failure below the HTTP layer.
  #[error("Transport error: {0}")]
  Transport(String),
  /// The request did not complete within the configured timeout.
  #[error("Request timed out")]
  Timeout,
  /// The server answered with a status code the operation does not accept.
  #[error("{function}: unexpected status {status}: {body}")]
  StatusMismatch {
    function: &'static str,
    status: u16,
    body: String,
    api_error: Option<ApiError>,
  },
  /// The referenced task, index or document does not exist.
  #[error("{function}: not found: {body}")]
  NotFound {
    function: &'static str,
    body: String,
    api_error: Option<ApiError>,
  },
  /// The caller's cancellation token fired.
  #[error("Operation cancelled")]
  Cancelled,
  #[error("Failed to encode request body: {0}")]
  Encode(#[source] serde_json::Error),
  #[error("Failed to decode response: {0}")]
  Decode(#[source] serde_json::Error),
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Batch size must be greater than zero (got {0})")]
  InvalidBatchSize(usize),
  #[error("CSV delimiter must be a single ASCII character (got {0:?})")]
  InvalidDelimiter(char),
  #[error("Invalid URL: {0}")]
  InvalidUrl(String),
  #[error(transparent)]
  Config(#[from] meili_core::Error),
}

impl Error {
  /// Classify a non-accepted response. 404 is singled out as [`Error::NotFound`].
  pub fn from_status(function: &'static str, status: u16, body: String) -> Self {
    let api_error = serde_json::from_str::<ApiError>(&body).ok();
    if status == 404 {
      Self::NotFound {
        function,
        body,
        api_error,
      }
    } else {
      Self::StatusMismatch {
        function,
        status,
        body,
        api_error,
      }
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Cancelled)
  }

  /// HTTP status of a rejected request, if the server answered at all.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::StatusMismatch { status, .. } => Some(*status),
      Self::NotFound { .. } => Some(404),
      _ => None,
    }
  }

  /// Structured server error attached to a rejected request.
  pub fn api_error(&self) -> Option<&ApiError> {
    match self {
      Self::StatusMismatch { api_error, .. } | Self::NotFound { api_error, .. } => api_error.as_ref(),
      _ => None,
    }
  }
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Timeout
    } else {
      Self::Transport(e.to_string())
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
