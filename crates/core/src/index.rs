use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Index metadata as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResult {
  pub uid: String,
  #[serde(default)]
  pub primary_key: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexesQuery {
  pub limit: u64,
  pub offset: u64,
}

impl IndexesQuery {
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if self.limit != 0 {
      pairs.push(("limit", self.limit.to_string()));
    }
    if self.offset != 0 {
      pairs.push(("offset", self.offset.to_string()));
    }
    pairs
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexesResults {
  pub results: Vec<IndexResult>,
  #[serde(default)]
  pub offset: u64,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsIndex {
  pub number_of_documents: u64,
  pub is_indexing: bool,
  #[serde(default)]
  pub field_distribution: HashMap<String, u64>,
}

/// Body of an index creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexRequest<'a> {
  pub uid: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary_key: Option<&'a str>,
}

/// Body of an index update request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIndexRequest {
  pub primary_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Health {
  pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
  pub commit_sha: String,
  pub commit_date: String,
  pub pkg_version: String,
}
