//! Blocking facade over the async client.
//!
//! Each [`Client`] owns a current-thread tokio runtime shared with the
//! [`Index`] handles it creates, and drives the same futures as the async API
//! with `block_on`. Polling and batching therefore behave identically.
//!
//! Calling these methods from inside another tokio runtime panics, as with
//! any nested `block_on`.

use std::{future::Future, io::Read, sync::Arc, time::Duration};

use meili_core::{
  ClientConfig, CsvDocumentsQuery, DocumentQuery, DocumentsQuery, DocumentsResults, Health, IndexResult, IndexesQuery,
  IndexesResults, SearchRequest, SearchResponse, Settings, StatsIndex, Task, TaskInfo, TaskResult, TasksQuery, Version,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::{error::Result, executor::RequestExecutor};

fn build_runtime() -> Result<Arc<Runtime>> {
  let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
  Ok(Arc::new(runtime))
}

#[derive(Debug, Clone)]
pub struct Client {
  inner: crate::Client,
  runtime: Arc<Runtime>,
}

impl Client {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    Ok(Self {
      inner: crate::Client::new(config)?,
      runtime: build_runtime()?,
    })
  }

  pub fn with_executor(executor: Arc<dyn RequestExecutor>) -> Result<Self> {
    Ok(Self {
      inner: crate::Client::with_executor(executor),
      runtime: build_runtime()?,
    })
  }

  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.inner = self.inner.with_cancellation(cancel);
    self
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    self.inner.cancellation_token()
  }

  pub fn as_async(&self) -> &crate::Client {
    &self.inner
  }

  pub fn index(&self, uid: impl Into<String>) -> Index {
    Index {
      inner: self.inner.index(uid),
      runtime: Arc::clone(&self.runtime),
    }
  }

  pub fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.create_index(uid, primary_key))
  }

  pub fn get_index(&self, uid: &str) -> Result<Index> {
    let inner = self.runtime.block_on(self.inner.get_index(uid))?;
    Ok(Index {
      inner,
      runtime: Arc::clone(&self.runtime),
    })
  }

  pub fn get_raw_index(&self, uid: &str) -> Result<IndexResult> {
    self.runtime.block_on(self.inner.get_raw_index(uid))
  }

  pub fn list_indexes(&self, query: &IndexesQuery) -> Result<IndexesResults> {
    self.runtime.block_on(self.inner.list_indexes(query))
  }

  pub fn delete_index(&self, uid: &str) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete_index(uid))
  }

  pub fn get_task(&self, task_uid: u64) -> Result<Task> {
    self.runtime.block_on(self.inner.get_task(task_uid))
  }

  pub fn get_tasks(&self, query: &TasksQuery) -> Result<TaskResult> {
    self.runtime.block_on(self.inner.get_tasks(query))
  }

  pub fn wait_for_task(&self, task_uid: u64, interval: Duration) -> Result<Task> {
    self.runtime.block_on(self.inner.wait_for_task(task_uid, interval))
  }

  pub fn wait_for_task_with_timeout(&self, task_uid: u64, interval: Duration, timeout: Duration) -> Result<Task> {
    self
      .runtime
      .block_on(self.inner.wait_for_task_with_timeout(task_uid, interval, timeout))
  }

  pub fn health(&self) -> Result<Health> {
    self.runtime.block_on(self.inner.health())
  }

  pub fn version(&self) -> Result<Version> {
    self.runtime.block_on(self.inner.version())
  }
}

#[derive(Debug, Clone)]
pub struct Index {
  inner: crate::Index,
  runtime: Arc<Runtime>,
}

impl Index {
  pub fn uid(&self) -> &str {
    self.inner.uid()
  }

  /// See [`crate::Index::primary_key`]: a local, non-authoritative cache.
  pub fn primary_key(&self) -> Option<&str> {
    self.inner.primary_key()
  }

  pub fn as_async(&self) -> &crate::Index {
    &self.inner
  }

  /// Drive any async operation of the underlying handle to completion, for
  /// the ones without a dedicated blocking method here.
  pub fn run<'a, F, Fut, T>(&'a self, f: F) -> T
  where
    F: FnOnce(&'a crate::Index) -> Fut,
    Fut: Future<Output = T>,
  {
    self.runtime.block_on(f(&self.inner))
  }

  pub fn fetch_info(&mut self) -> Result<IndexResult> {
    self.runtime.block_on(self.inner.fetch_info())
  }

  pub fn fetch_primary_key(&mut self) -> Result<Option<String>> {
    self.runtime.block_on(self.inner.fetch_primary_key())
  }

  pub fn update_index(&mut self, primary_key: &str) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.update_index(primary_key))
  }

  pub fn delete(&mut self) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete())
  }

  pub fn get_stats(&self) -> Result<StatsIndex> {
    self.runtime.block_on(self.inner.get_stats())
  }

  pub fn get_task(&self, task_uid: u64) -> Result<Task> {
    self.runtime.block_on(self.inner.get_task(task_uid))
  }

  pub fn get_tasks(&self, query: &TasksQuery) -> Result<TaskResult> {
    self.runtime.block_on(self.inner.get_tasks(query))
  }

  pub fn wait_for_task(&self, task_uid: u64, interval: Duration) -> Result<Task> {
    self.runtime.block_on(self.inner.wait_for_task(task_uid, interval))
  }

  pub fn wait_for_task_default(&self, task_uid: u64) -> Result<Task> {
    self.runtime.block_on(self.inner.wait_for_task_default(task_uid))
  }

  pub fn wait_for_task_with_timeout(&self, task_uid: u64, interval: Duration, timeout: Duration) -> Result<Task> {
    self
      .runtime
      .block_on(self.inner.wait_for_task_with_timeout(task_uid, interval, timeout))
  }

  pub fn add_documents<T: Serialize>(&self, documents: &[T], primary_key: Option<&str>) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.add_documents(documents, primary_key))
  }

  pub fn add_documents_in_batches<T: Serialize>(
    &self,
    documents: &[T],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .runtime
      .block_on(self.inner.add_documents_in_batches(documents, batch_size, primary_key))
  }

  pub fn update_documents<T: Serialize>(&self, documents: &[T], primary_key: Option<&str>) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.update_documents(documents, primary_key))
  }

  pub fn update_documents_in_batches<T: Serialize>(
    &self,
    documents: &[T],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .runtime
      .block_on(self.inner.update_documents_in_batches(documents, batch_size, primary_key))
  }

  pub fn add_documents_csv(&self, csv: impl Into<Vec<u8>>, query: &CsvDocumentsQuery) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.add_documents_csv(csv, query))
  }

  pub fn add_documents_csv_from_reader_in_batches<R: Read>(
    &self,
    reader: R,
    batch_size: usize,
    query: &CsvDocumentsQuery,
  ) -> Result<Vec<TaskInfo>> {
    self
      .runtime
      .block_on(self.inner.add_documents_csv_from_reader_in_batches(reader, batch_size, query))
  }

  pub fn add_documents_ndjson(&self, ndjson: impl Into<Vec<u8>>, primary_key: Option<&str>) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.add_documents_ndjson(ndjson, primary_key))
  }

  pub fn add_documents_ndjson_from_reader_in_batches<R: Read>(
    &self,
    reader: R,
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .runtime
      .block_on(self.inner.add_documents_ndjson_from_reader_in_batches(reader, batch_size, primary_key))
  }

  pub fn get_document<T: DeserializeOwned>(&self, identifier: &str, query: &DocumentQuery) -> Result<T> {
    self.runtime.block_on(self.inner.get_document(identifier, query))
  }

  pub fn get_documents<T: DeserializeOwned>(&self, query: &DocumentsQuery) -> Result<DocumentsResults<T>> {
    self.runtime.block_on(self.inner.get_documents(query))
  }

  pub fn delete_document(&self, identifier: &str) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete_document(identifier))
  }

  pub fn delete_documents<I: Serialize>(&self, identifiers: &[I]) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete_documents(identifiers))
  }

  pub fn delete_documents_by_filter<F: Serialize>(&self, filter: F) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete_documents_by_filter(filter))
  }

  pub fn delete_all_documents(&self) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.delete_all_documents())
  }

  pub fn search<T: DeserializeOwned>(&self, query: &str, request: &SearchRequest) -> Result<SearchResponse<T>> {
    self.runtime.block_on(self.inner.search(query, request))
  }

  pub fn get_settings(&self) -> Result<Settings> {
    self.runtime.block_on(self.inner.get_settings())
  }

  pub fn update_settings(&self, settings: &Settings) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.update_settings(settings))
  }

  pub fn reset_settings(&self) -> Result<TaskInfo> {
    self.runtime.block_on(self.inner.reset_settings())
  }
}
