//! Document ingestion command

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use meili_core::{CsvDocumentsQuery, Task, TaskInfo};
use serde_json::Value;
use tracing::info;

use super::{Connection, print_json};
use crate::DocsFormat;

pub struct DocsAdd {
  pub index: String,
  pub file: PathBuf,
  pub format: Option<DocsFormat>,
  pub batch_size: Option<usize>,
  pub primary_key: Option<String>,
  pub delimiter: Option<char>,
  pub update: bool,
  pub wait: bool,
}

fn detect_format(file: &std::path::Path) -> Result<DocsFormat> {
  let extension = file
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase);
  match extension.as_deref() {
    Some("json") => Ok(DocsFormat::Json),
    Some("ndjson") | Some("jsonl") => Ok(DocsFormat::Ndjson),
    Some("csv") => Ok(DocsFormat::Csv),
    _ => anyhow::bail!("Cannot infer the format of {}; pass --format", file.display()),
  }
}

pub async fn cmd_docs_add(connection: &Connection, args: DocsAdd) -> Result<()> {
  let (client, config) = connection.connect()?;
  let index = client.index(&args.index);
  let format = match args.format {
    Some(format) => format,
    None => detect_format(&args.file)?,
  };
  let batch_size = args.batch_size.unwrap_or(config.batch_size);
  let primary_key = args.primary_key.as_deref();

  let bytes = std::fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
  let start = Instant::now();

  let tasks: Vec<TaskInfo> = match format {
    DocsFormat::Json => {
      let documents: Vec<Value> =
        serde_json::from_slice(&bytes).with_context(|| format!("{} is not a JSON array", args.file.display()))?;
      if args.update {
        index.update_documents_in_batches(&documents, batch_size, primary_key).await
      } else {
        index.add_documents_in_batches(&documents, batch_size, primary_key).await
      }
    }
    DocsFormat::Ndjson => {
      if args.update {
        index.update_documents_ndjson_in_batches(&bytes, batch_size, primary_key).await
      } else {
        index.add_documents_ndjson_in_batches(&bytes, batch_size, primary_key).await
      }
    }
    DocsFormat::Csv => {
      let query = CsvDocumentsQuery {
        primary_key: args.primary_key.clone(),
        csv_delimiter: args.delimiter,
      };
      if args.update {
        index.update_documents_csv_in_batches(&bytes, batch_size, &query).await
      } else {
        index.add_documents_csv_in_batches(&bytes, batch_size, &query).await
      }
    }
  }
  .with_context(|| format!("Failed to ingest {}", args.file.display()))?;

  info!(
    index = %args.index,
    tasks = tasks.len(),
    batch_size,
    elapsed_ms = start.elapsed().as_millis(),
    "Documents submitted"
  );

  if !args.wait {
    return print_json(&tasks);
  }

  let mut finished: Vec<Task> = Vec::with_capacity(tasks.len());
  for task in &tasks {
    let done = index
      .wait_for_task_default(task.task_uid)
      .await
      .with_context(|| format!("Failed while waiting for task {}", task.task_uid))?;
    finished.push(done);
  }
  print_json(&finished)?;

  let failed: Vec<u64> = finished.iter().filter(|t| t.is_failure()).map(|t| t.uid).collect();
  if !failed.is_empty() {
    anyhow::bail!("{} of {} tasks failed: {:?}", failed.len(), finished.len(), failed);
  }
  Ok(())
}
