//! Document payloads and the query types used to ingest and read them.

use serde::{Deserialize, Serialize};

/// Schema-less document record.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Encoding of a document payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
  Json,
  Csv,
  Ndjson,
}

impl ContentType {
  pub fn mime(&self) -> &'static str {
    match self {
      ContentType::Json => "application/json",
      ContentType::Csv => "text/csv",
      ContentType::Ndjson => "application/x-ndjson",
    }
  }
}

/// Options for CSV ingestion, applied to every batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocumentsQuery {
  pub primary_key: Option<String>,
  pub csv_delimiter: Option<char>,
}

impl CsvDocumentsQuery {
  pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
    self.primary_key = Some(primary_key.into());
    self
  }

  pub fn with_delimiter(mut self, delimiter: char) -> Self {
    self.csv_delimiter = Some(delimiter);
    self
  }

  /// Delimiter byte used to parse and re-encode CSV rows, a comma when
  /// unset. `None` when the configured delimiter is not a single ASCII byte.
  pub fn delimiter_byte(&self) -> Option<u8> {
    match self.csv_delimiter {
      None => Some(b','),
      Some(c) if c.is_ascii() => Some(c as u8),
      Some(_) => None,
    }
  }

  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(pk) = self.primary_key.as_deref().filter(|pk| !pk.is_empty()) {
      pairs.push(("primaryKey", pk.to_string()));
    }
    if let Some(delimiter) = self.csv_delimiter {
      pairs.push(("csvDelimiter", delimiter.to_string()));
    }
    pairs
  }
}

/// Fields to return when fetching one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
  pub fields: Vec<String>,
}

impl DocumentQuery {
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    if self.fields.is_empty() {
      return Vec::new();
    }
    vec![("fields", self.fields.join(","))]
  }
}

/// Paging, projection and filtering for document listing.
///
/// When `filter` is set the listing goes through the POST fetch route, which
/// carries the whole query in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsQuery {
  #[serde(skip_serializing_if = "is_zero")]
  pub offset: u64,
  #[serde(skip_serializing_if = "is_zero")]
  pub limit: u64,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub fields: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<serde_json::Value>,
}

fn is_zero(n: &u64) -> bool {
  *n == 0
}

impl DocumentsQuery {
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if self.offset != 0 {
      pairs.push(("offset", self.offset.to_string()));
    }
    if self.limit != 0 {
      pairs.push(("limit", self.limit.to_string()));
    }
    if !self.fields.is_empty() {
      pairs.push(("fields", self.fields.join(",")));
    }
    pairs
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResults<T = Document> {
  pub results: Vec<T>,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub offset: u64,
  #[serde(default)]
  pub total: u64,
}

/// Body of a delete-by-filter request.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteDocumentsByFilterRequest<F: Serialize> {
  pub filter: F,
}
