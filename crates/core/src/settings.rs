//! Index settings. Every field is optional so that a partial `Settings`
//! value can be sent as a PATCH.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ranking_rules: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub distinct_attribute: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub searchable_attributes: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub displayed_attributes: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stop_words: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub synonyms: Option<HashMap<String, Vec<String>>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filterable_attributes: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sortable_attributes: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub typo_tolerance: Option<TypoTolerance>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pagination: Option<Pagination>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub faceting: Option<Faceting>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub embedders: Option<HashMap<String, Embedder>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search_cutoff_ms: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub separator_tokens: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub non_separator_tokens: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dictionary: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypoTolerance {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_word_size_for_typos: Option<MinWordSizeForTypos>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disable_on_words: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disable_on_attributes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinWordSizeForTypos {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub one_typo: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub two_typos: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub max_total_hits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faceting {
  pub max_values_per_facet: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sort_facet_values_by: Option<HashMap<String, String>>,
}

/// Vector embedder configuration. Source-specific keys not modelled here
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedder {
  pub source: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub model: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dimensions: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub document_template: Option<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}
