use serde::{Deserialize, Serialize};

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStrategy {
  Last,
  All,
  Frequency,
}

/// Search parameters. The query string itself is passed separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub offset: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hits_per_page: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub facets: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attributes_to_retrieve: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attributes_to_crop: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub crop_length: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub crop_marker: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attributes_to_highlight: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub highlight_pre_tag: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub highlight_post_tag: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_matches_position: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_ranking_score: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sort: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matching_strategy: Option<MatchingStrategy>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub distinct: Option<String>,
}

/// Wire body: the request parameters plus the query string.
#[derive(Debug, Clone, Serialize)]
pub struct SearchBody<'a> {
  pub q: &'a str,
  #[serde(flatten)]
  pub request: &'a SearchRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T = Document> {
  pub hits: Vec<T>,
  #[serde(default)]
  pub query: String,
  #[serde(default)]
  pub processing_time_ms: u64,
  #[serde(default)]
  pub offset: Option<u64>,
  #[serde(default)]
  pub limit: Option<u64>,
  #[serde(default)]
  pub estimated_total_hits: Option<u64>,
  #[serde(default)]
  pub total_hits: Option<u64>,
  #[serde(default)]
  pub total_pages: Option<u64>,
  #[serde(default)]
  pub hits_per_page: Option<u64>,
  #[serde(default)]
  pub page: Option<u64>,
  #[serde(default)]
  pub facet_distribution: Option<serde_json::Value>,
  #[serde(default)]
  pub facet_stats: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSearchRequest {
  pub facet_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub facet_query: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matching_strategy: Option<MatchingStrategy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetHit {
  pub value: String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSearchResponse {
  pub facet_hits: Vec<FacetHit>,
  #[serde(default)]
  pub facet_query: Option<String>,
  #[serde(default)]
  pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarDocumentQuery {
  pub id: serde_json::Value,
  pub embedder: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub offset: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attributes_to_retrieve: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_ranking_score: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarDocumentResult<T = Document> {
  pub hits: Vec<T>,
  #[serde(default)]
  pub id: serde_json::Value,
  #[serde(default)]
  pub processing_time_ms: u64,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub offset: u64,
  #[serde(default)]
  pub estimated_total_hits: u64,
}
