use std::time::Instant;

use async_trait::async_trait;
use meili_core::ClientConfig;
use reqwest::{
  Url,
  header::{AUTHORIZATION, CONTENT_TYPE},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
  error::{Error, Result},
  executor::{Request, RequestExecutor},
};

/// [`RequestExecutor`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
  client: reqwest::Client,
  host: String,
  api_key: Option<String>,
}

impl HttpExecutor {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    config.validate()?;
    let host = config.host.trim_end_matches('/').to_string();
    Url::parse(&host).map_err(|e| Error::InvalidUrl(format!("{host}: {e}")))?;

    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.request_timeout() {
      builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    debug!(
      host = %host,
      has_api_key = config.api_key.is_some(),
      timeout_secs = config.request_timeout_secs,
      "HTTP executor initialized"
    );

    Ok(Self {
      client,
      host,
      api_key: config.api_key.clone().filter(|k| !k.is_empty()),
    })
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  /// Join the endpoint onto the host path one segment at a time, so uids and
  /// document ids are percent-encoded. A `/` always separates segments.
  fn url_for(&self, request: &Request) -> Result<Url> {
    let mut url = Url::parse(&self.host).map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.host)))?;
    url
      .path_segments_mut()
      .map_err(|()| Error::InvalidUrl(self.host.clone()))?
      .pop_if_empty()
      .extend(request.endpoint.split('/').filter(|s| !s.is_empty()));
    if !request.query.is_empty() {
      let mut pairs = url.query_pairs_mut();
      for (key, value) in &request.query {
        pairs.append_pair(key, value);
      }
    }
    Ok(url)
  }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
  async fn execute(&self, request: Request, cancel: &CancellationToken) -> Result<Vec<u8>> {
    let url = self.url_for(&request)?;
    let function = request.function;

    let mut builder = self.client.request(request.method.clone(), url);
    if let Some(key) = &self.api_key {
      builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
    }
    if let Some(body) = request.body.as_ref() {
      builder = builder.header(CONTENT_TYPE, body.content_type.mime()).body(body.bytes.clone());
    }

    trace!(
      function,
      method = %request.method,
      endpoint = %request.endpoint,
      body_len = request.body.as_ref().map(|b| b.bytes.len()).unwrap_or(0),
      "Sending request"
    );
    let start = Instant::now();

    let response = tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        debug!(function, "Request cancelled before response");
        return Err(Error::Cancelled);
      }
      result = builder.send() => match result {
        Ok(response) => response,
        Err(e) => {
          warn!(function, error = %e, "Transport error");
          return Err(e.into());
        }
      },
    };

    let status = response.status();
    let bytes = tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        debug!(function, "Request cancelled while reading body");
        return Err(Error::Cancelled);
      }
      result = response.bytes() => result?,
    };

    trace!(
      function,
      status = %status,
      elapsed_ms = start.elapsed().as_millis(),
      "Received response"
    );

    if !request.is_accepted(status) {
      let body = String::from_utf8_lossy(&bytes).into_owned();
      warn!(
        function,
        status = %status,
        endpoint = %request.endpoint,
        "Request rejected"
      );
      return Err(Error::from_status(function, status.as_u16(), body));
    }

    Ok(bytes.to_vec())
  }
}
