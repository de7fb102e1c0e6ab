//! Document operations on an [`Index`].
//!
//! Each ingestion format has a single-call variant and an `_in_batches`
//! variant. The batched forms split the payload by record count and submit
//! through the same path as the single call; see [`crate::batch`] for the
//! ordering and partial-failure contract.
//!
//! Reader variants consume a blocking [`Read`]: the input is read on the
//! calling task.

use std::io::{BufReader, Read};

use meili_core::{
  ContentType, CsvDocumentsQuery, DeleteDocumentsByFilterRequest, DocumentQuery, DocumentsQuery, DocumentsResults,
  TaskInfo,
};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  batch::{self, CsvChunks, DocumentsTarget, NdjsonChunks},
  error::Result,
  executor::{Body, Request, call},
  index::Index,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
  Add,
  Update,
}

impl Write {
  fn method(self) -> Method {
    match self {
      Self::Add => Method::POST,
      Self::Update => Method::PUT,
    }
  }

  fn function(self, content_type: ContentType, batched: bool) -> &'static str {
    match (self, content_type, batched) {
      (Self::Add, ContentType::Json, false) => "AddDocuments",
      (Self::Add, ContentType::Json, true) => "AddDocumentsInBatches",
      (Self::Add, ContentType::Csv, false) => "AddDocumentsCsv",
      (Self::Add, ContentType::Csv, true) => "AddDocumentsCsvInBatches",
      (Self::Add, ContentType::Ndjson, false) => "AddDocumentsNdjson",
      (Self::Add, ContentType::Ndjson, true) => "AddDocumentsNdjsonInBatches",
      (Self::Update, ContentType::Json, false) => "UpdateDocuments",
      (Self::Update, ContentType::Json, true) => "UpdateDocumentsInBatches",
      (Self::Update, ContentType::Csv, false) => "UpdateDocumentsCsv",
      (Self::Update, ContentType::Csv, true) => "UpdateDocumentsCsvInBatches",
      (Self::Update, ContentType::Ndjson, false) => "UpdateDocumentsNdjson",
      (Self::Update, ContentType::Ndjson, true) => "UpdateDocumentsNdjsonInBatches",
    }
  }
}

fn primary_key_query(primary_key: Option<&str>) -> Vec<(&'static str, String)> {
  match primary_key {
    Some(pk) if !pk.is_empty() => vec![("primaryKey", pk.to_string())],
    _ => Vec::new(),
  }
}

impl Index {
  fn documents_target(
    &self,
    write: Write,
    content_type: ContentType,
    batched: bool,
    query: Vec<(&'static str, String)>,
  ) -> DocumentsTarget<'_> {
    DocumentsTarget {
      executor: self.executor(),
      method: write.method(),
      endpoint: self.endpoint("/documents"),
      query,
      function: write.function(content_type, batched),
    }
  }

  async fn write_json<T: Serialize>(&self, write: Write, documents: &[T], primary_key: Option<&str>) -> Result<TaskInfo> {
    self
      .documents_target(write, ContentType::Json, false, primary_key_query(primary_key))
      .submit(Body::json(documents)?, &self.cancel)
      .await
  }

  async fn write_json_in_batches<T: Serialize>(
    &self,
    write: Write,
    documents: &[T],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    let batch_size = batch::check_batch_size(batch_size)?;
    let target = self.documents_target(write, ContentType::Json, true, primary_key_query(primary_key));
    batch::submit_in_batches(&target, batch::json_chunks(documents, batch_size), &self.cancel).await
  }

  async fn write_csv(&self, write: Write, bytes: Vec<u8>, query: &CsvDocumentsQuery) -> Result<TaskInfo> {
    batch::check_csv_delimiter(query)?;
    self
      .documents_target(write, ContentType::Csv, false, query.to_query_pairs())
      .submit(Body::raw(bytes, ContentType::Csv), &self.cancel)
      .await
  }

  async fn write_csv_in_batches<R: Read>(
    &self,
    write: Write,
    reader: R,
    batch_size: usize,
    query: &CsvDocumentsQuery,
  ) -> Result<Vec<TaskInfo>> {
    let batch_size = batch::check_batch_size(batch_size)?;
    let delimiter = batch::check_csv_delimiter(query)?;
    let chunks = CsvChunks::new(reader, batch_size, delimiter);
    let target = self.documents_target(write, ContentType::Csv, true, query.to_query_pairs());
    batch::submit_in_batches(&target, chunks, &self.cancel).await
  }

  async fn write_ndjson(&self, write: Write, bytes: Vec<u8>, primary_key: Option<&str>) -> Result<TaskInfo> {
    self
      .documents_target(write, ContentType::Ndjson, false, primary_key_query(primary_key))
      .submit(Body::raw(bytes, ContentType::Ndjson), &self.cancel)
      .await
  }

  async fn write_ndjson_in_batches<R: Read>(
    &self,
    write: Write,
    reader: R,
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    let batch_size = batch::check_batch_size(batch_size)?;
    let chunks = NdjsonChunks::new(BufReader::new(reader), batch_size);
    let target = self.documents_target(write, ContentType::Ndjson, true, primary_key_query(primary_key));
    batch::submit_in_batches(&target, chunks, &self.cancel).await
  }

  /// Add or replace documents in one call.
  pub async fn add_documents<T: Serialize>(&self, documents: &[T], primary_key: Option<&str>) -> Result<TaskInfo> {
    self.write_json(Write::Add, documents, primary_key).await
  }

  /// Add or replace documents, one call per `batch_size` documents.
  pub async fn add_documents_in_batches<T: Serialize>(
    &self,
    documents: &[T],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .write_json_in_batches(Write::Add, documents, batch_size, primary_key)
      .await
  }

  /// Add or partially update documents in one call.
  pub async fn update_documents<T: Serialize>(&self, documents: &[T], primary_key: Option<&str>) -> Result<TaskInfo> {
    self.write_json(Write::Update, documents, primary_key).await
  }

  pub async fn update_documents_in_batches<T: Serialize>(
    &self,
    documents: &[T],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .write_json_in_batches(Write::Update, documents, batch_size, primary_key)
      .await
  }

  /// Send a CSV payload as is. The first row is the header.
  pub async fn add_documents_csv(&self, csv: impl Into<Vec<u8>>, query: &CsvDocumentsQuery) -> Result<TaskInfo> {
    self.write_csv(Write::Add, csv.into(), query).await
  }

  /// Split a CSV payload into chunks of `batch_size` rows, each starting with
  /// the header row.
  pub async fn add_documents_csv_in_batches(
    &self,
    csv: &[u8],
    batch_size: usize,
    query: &CsvDocumentsQuery,
  ) -> Result<Vec<TaskInfo>> {
    self.write_csv_in_batches(Write::Add, csv, batch_size, query).await
  }

  pub async fn add_documents_csv_from_reader<R: Read>(
    &self,
    mut reader: R,
    query: &CsvDocumentsQuery,
  ) -> Result<TaskInfo> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    self.write_csv(Write::Add, bytes, query).await
  }

  pub async fn add_documents_csv_from_reader_in_batches<R: Read>(
    &self,
    reader: R,
    batch_size: usize,
    query: &CsvDocumentsQuery,
  ) -> Result<Vec<TaskInfo>> {
    self.write_csv_in_batches(Write::Add, reader, batch_size, query).await
  }

  pub async fn update_documents_csv(&self, csv: impl Into<Vec<u8>>, query: &CsvDocumentsQuery) -> Result<TaskInfo> {
    self.write_csv(Write::Update, csv.into(), query).await
  }

  pub async fn update_documents_csv_in_batches(
    &self,
    csv: &[u8],
    batch_size: usize,
    query: &CsvDocumentsQuery,
  ) -> Result<Vec<TaskInfo>> {
    self.write_csv_in_batches(Write::Update, csv, batch_size, query).await
  }

  /// Send an NDJSON payload as is, one document per line.
  pub async fn add_documents_ndjson(&self, ndjson: impl Into<Vec<u8>>, primary_key: Option<&str>) -> Result<TaskInfo> {
    self.write_ndjson(Write::Add, ndjson.into(), primary_key).await
  }

  /// Split an NDJSON payload into chunks of `batch_size` non-blank lines.
  pub async fn add_documents_ndjson_in_batches(
    &self,
    ndjson: &[u8],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .write_ndjson_in_batches(Write::Add, ndjson, batch_size, primary_key)
      .await
  }

  pub async fn add_documents_ndjson_from_reader<R: Read>(
    &self,
    mut reader: R,
    primary_key: Option<&str>,
  ) -> Result<TaskInfo> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    self.write_ndjson(Write::Add, bytes, primary_key).await
  }

  pub async fn add_documents_ndjson_from_reader_in_batches<R: Read>(
    &self,
    reader: R,
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .write_ndjson_in_batches(Write::Add, reader, batch_size, primary_key)
      .await
  }

  pub async fn update_documents_ndjson(
    &self,
    ndjson: impl Into<Vec<u8>>,
    primary_key: Option<&str>,
  ) -> Result<TaskInfo> {
    self.write_ndjson(Write::Update, ndjson.into(), primary_key).await
  }

  pub async fn update_documents_ndjson_in_batches(
    &self,
    ndjson: &[u8],
    batch_size: usize,
    primary_key: Option<&str>,
  ) -> Result<Vec<TaskInfo>> {
    self
      .write_ndjson_in_batches(Write::Update, ndjson, batch_size, primary_key)
      .await
  }

  pub async fn get_document<T: DeserializeOwned>(&self, identifier: &str, query: &DocumentQuery) -> Result<T> {
    let request = Request::get(self.endpoint(&format!("/documents/{identifier}")), "GetDocument")
      .query(query.to_query_pairs());
    call(self.executor(), request, &self.cancel).await
  }

  /// List documents. A query carrying a filter is sent as a POST body to the
  /// fetch endpoint, since filters do not fit the query string.
  pub async fn get_documents<T: DeserializeOwned>(&self, query: &DocumentsQuery) -> Result<DocumentsResults<T>> {
    let request = if query.filter.is_some() {
      Request::post(self.endpoint("/documents/fetch"), "GetDocuments")
        .accept(reqwest::StatusCode::OK)
        .json(query)?
    } else {
      Request::get(self.endpoint("/documents"), "GetDocuments").query(query.to_query_pairs())
    };
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn delete_document(&self, identifier: &str) -> Result<TaskInfo> {
    let request = Request::delete(self.endpoint(&format!("/documents/{identifier}")), "DeleteDocument").accept_task();
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn delete_documents<I: Serialize>(&self, identifiers: &[I]) -> Result<TaskInfo> {
    let request = Request::post(self.endpoint("/documents/delete-batch"), "DeleteDocuments")
      .accept_task()
      .json(identifiers)?;
    call(self.executor(), request, &self.cancel).await
  }

  /// Delete every document matching a filter expression (string or array form).
  pub async fn delete_documents_by_filter<F: Serialize>(&self, filter: F) -> Result<TaskInfo> {
    let request = Request::post(self.endpoint("/documents/delete"), "DeleteDocumentsByFilter")
      .accept_task()
      .json(&DeleteDocumentsByFilterRequest { filter })?;
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn delete_all_documents(&self) -> Result<TaskInfo> {
    let request = Request::delete(self.endpoint("/documents"), "DeleteAllDocuments").accept_task();
    call(self.executor(), request, &self.cancel).await
  }
}
