use meili_core::{
  FacetSearchRequest, FacetSearchResponse, SearchBody, SearchRequest, SearchResponse, SimilarDocumentQuery,
  SimilarDocumentResult,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
  error::Result,
  executor::{Request, call},
  index::Index,
};

impl Index {
  /// Run a search and decode hits into `T`.
  pub async fn search<T: DeserializeOwned>(&self, query: &str, request: &SearchRequest) -> Result<SearchResponse<T>> {
    self.post_search(query, request, "Search").await
  }

  /// Run a search and return the untyped response.
  pub async fn search_raw(&self, query: &str, request: &SearchRequest) -> Result<serde_json::Value> {
    self.post_search(query, request, "SearchRaw").await
  }

  async fn post_search<T: DeserializeOwned>(
    &self,
    query: &str,
    request: &SearchRequest,
    function: &'static str,
  ) -> Result<T> {
    let request = Request::post(self.endpoint("/search"), function)
      .accept(StatusCode::OK)
      .json(&SearchBody { q: query, request })?;
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn facet_search(&self, request: &FacetSearchRequest) -> Result<FacetSearchResponse> {
    let request = Request::post(self.endpoint("/facet-search"), "FacetSearch")
      .accept(StatusCode::OK)
      .json(request)?;
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn search_similar_documents<T: DeserializeOwned>(
    &self,
    query: &SimilarDocumentQuery,
  ) -> Result<SimilarDocumentResult<T>> {
    let request = Request::post(self.endpoint("/similar"), "SearchSimilarDocuments")
      .accept(StatusCode::OK)
      .json(query)?;
    call(self.executor(), request, &self.cancel).await
  }
}
