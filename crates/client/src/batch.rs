//! Batched ingestion: split a payload into bounded chunks and submit one
//! mutation per chunk.
//!
//! `batch_size` always counts records (documents, NDJSON lines or CSV rows),
//! never bytes. Chunks are contiguous and keep input order; every chunk but
//! the last holds exactly `batch_size` records.
//!
//! # Partial failure
//!
//! Chunks are submitted one after another without waiting for their tasks.
//! The first chunk that fails aborts the run and its error is returned; the
//! acknowledgments of earlier chunks are dropped from the result even though
//! their tasks are already enqueued and will still be processed by the
//! server. Their task uids are logged at `warn` level.

use std::{
  io::{BufRead, Read},
  time::Instant,
};

use meili_core::{ContentType, CsvDocumentsQuery, TaskInfo};
use reqwest::Method;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
  error::{Error, Result},
  executor::{Body, Request, RequestExecutor, call},
};

/// One encoded chunk ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
  pub body: Body,
  pub records: usize,
}

/// Reject a zero batch size before any request is made.
pub fn check_batch_size(batch_size: usize) -> Result<usize> {
  if batch_size == 0 {
    return Err(Error::InvalidBatchSize(batch_size));
  }
  Ok(batch_size)
}

/// Resolve the CSV delimiter byte, rejecting delimiters the server cannot
/// accept before any request is made.
pub fn check_csv_delimiter(query: &CsvDocumentsQuery) -> Result<u8> {
  match (query.delimiter_byte(), query.csv_delimiter) {
    (Some(byte), _) => Ok(byte),
    (None, Some(c)) => Err(Error::InvalidDelimiter(c)),
    (None, None) => Ok(b','),
  }
}

/// Encode each slice of `batch_size` documents as a JSON array.
pub fn json_chunks<T: Serialize>(documents: &[T], batch_size: usize) -> impl Iterator<Item = Result<Chunk>> + '_ {
  documents.chunks(batch_size).map(|slice| -> Result<Chunk> {
    Ok(Chunk {
      body: Body::json(slice)?,
      records: slice.len(),
    })
  })
}

/// Groups non-blank NDJSON lines into chunks of `batch_size` records.
pub struct NdjsonChunks<R> {
  lines: std::io::Lines<R>,
  batch_size: usize,
  done: bool,
}

impl<R: BufRead> NdjsonChunks<R> {
  pub fn new(reader: R, batch_size: usize) -> Self {
    Self {
      lines: reader.lines(),
      batch_size,
      done: false,
    }
  }
}

impl<R: BufRead> Iterator for NdjsonChunks<R> {
  type Item = Result<Chunk>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    let mut buf = Vec::new();
    let mut records = 0;
    while records < self.batch_size {
      match self.lines.next() {
        None => {
          self.done = true;
          break;
        }
        Some(Err(e)) => {
          self.done = true;
          return Some(Err(e.into()));
        }
        Some(Ok(line)) => {
          if line.trim().is_empty() {
            continue;
          }
          buf.extend_from_slice(line.as_bytes());
          buf.push(b'\n');
          records += 1;
        }
      }
    }

    if records == 0 {
      return None;
    }
    Some(Ok(Chunk {
      body: Body::raw(buf, ContentType::Ndjson),
      records,
    }))
  }
}

/// Groups CSV rows into chunks of `batch_size` records, repeating the header
/// row at the top of each chunk.
///
/// Rows are parsed, not split on newlines, so quoted fields spanning several
/// lines stay in one record.
pub struct CsvChunks<R> {
  reader: csv::Reader<R>,
  header: Option<csv::ByteRecord>,
  delimiter: u8,
  batch_size: usize,
  done: bool,
}

impl<R: Read> CsvChunks<R> {
  pub fn new(reader: R, batch_size: usize, delimiter: u8) -> Self {
    let reader = csv::ReaderBuilder::new()
      .delimiter(delimiter)
      .has_headers(false)
      .from_reader(reader);
    Self {
      reader,
      header: None,
      delimiter,
      batch_size,
      done: false,
    }
  }

  fn next_chunk(&mut self) -> Result<Option<Chunk>> {
    let mut record = csv::ByteRecord::new();

    let header = match self.header.take() {
      Some(header) => header,
      None => {
        if !self.reader.read_byte_record(&mut record)? {
          return Ok(None);
        }
        record.clone()
      }
    };

    let mut writer = csv::WriterBuilder::new()
      .delimiter(self.delimiter)
      .terminator(csv::Terminator::Any(b'\n'))
      .from_writer(Vec::new());
    writer.write_byte_record(&header)?;

    let mut records = 0;
    while records < self.batch_size {
      if !self.reader.read_byte_record(&mut record)? {
        self.done = true;
        break;
      }
      writer.write_byte_record(&record)?;
      records += 1;
    }
    self.header = Some(header);

    if records == 0 {
      return Ok(None);
    }
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    Ok(Some(Chunk {
      body: Body::raw(bytes, ContentType::Csv),
      records,
    }))
  }
}

impl<R: Read> Iterator for CsvChunks<R> {
  type Item = Result<Chunk>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.next_chunk() {
      Ok(Some(chunk)) => Some(Ok(chunk)),
      Ok(None) => {
        self.done = true;
        None
      }
      Err(e) => {
        self.done = true;
        Some(Err(e))
      }
    }
  }
}

/// Where document chunks are sent: the single-call mutation path shared by
/// batched and unbatched operations.
pub(crate) struct DocumentsTarget<'a> {
  pub executor: &'a dyn RequestExecutor,
  pub method: Method,
  pub endpoint: String,
  pub query: Vec<(&'static str, String)>,
  pub function: &'static str,
}

impl DocumentsTarget<'_> {
  pub async fn submit(&self, body: Body, cancel: &CancellationToken) -> Result<TaskInfo> {
    let request = Request::new(self.method.clone(), self.endpoint.clone(), self.function)
      .accept_task()
      .query(self.query.iter().cloned())
      .body(body);
    call(self.executor, request, cancel).await
  }
}

/// Submit chunks sequentially, returning one acknowledgment per chunk in
/// order, or the first error. See the module docs for the partial-failure
/// caveat.
pub(crate) async fn submit_in_batches<I>(
  target: &DocumentsTarget<'_>,
  chunks: I,
  cancel: &CancellationToken,
) -> Result<Vec<TaskInfo>>
where
  I: IntoIterator<Item = Result<Chunk>>,
{
  let start = Instant::now();
  let mut acknowledged: Vec<TaskInfo> = Vec::new();
  let mut total_records = 0;

  for (index, chunk) in chunks.into_iter().enumerate() {
    if cancel.is_cancelled() {
      abandon(target.function, index, &acknowledged, &Error::Cancelled);
      return Err(Error::Cancelled);
    }

    let Chunk { body, records } = match chunk {
      Ok(chunk) => chunk,
      Err(e) => {
        abandon(target.function, index, &acknowledged, &e);
        return Err(e);
      }
    };

    match target.submit(body, cancel).await {
      Ok(task) => {
        debug!(
          function = target.function,
          chunk = index,
          records,
          task_uid = task.task_uid,
          "Chunk acknowledged"
        );
        total_records += records;
        acknowledged.push(task);
      }
      Err(e) => {
        abandon(target.function, index, &acknowledged, &e);
        return Err(e);
      }
    }
  }

  info!(
    function = target.function,
    chunks = acknowledged.len(),
    records = total_records,
    elapsed_ms = start.elapsed().as_millis(),
    "Batched ingestion submitted"
  );
  Ok(acknowledged)
}

fn abandon(function: &'static str, chunk: usize, acknowledged: &[TaskInfo], error: &Error) {
  if acknowledged.is_empty() {
    debug!(function, chunk, error = %error, "Batched ingestion aborted before any chunk was accepted");
    return;
  }
  let orphaned: Vec<u64> = acknowledged.iter().map(|t| t.task_uid).collect();
  warn!(
    function,
    chunk,
    error = %error,
    orphaned_tasks = ?orphaned,
    "Batched ingestion aborted; tasks of earlier chunks remain enqueued"
  );
}
