pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod search;
pub mod settings;
pub mod task;

pub use config::{ClientConfig, DEFAULT_HOST};
pub use document::{
  ContentType, CsvDocumentsQuery, DeleteDocumentsByFilterRequest, Document, DocumentQuery, DocumentsQuery,
  DocumentsResults,
};
pub use error::{Error, Result};
pub use index::{
  CreateIndexRequest, Health, IndexResult, IndexesQuery, IndexesResults, StatsIndex, UpdateIndexRequest, Version,
};
pub use search::{
  FacetHit, FacetSearchRequest, FacetSearchResponse, MatchingStrategy, SearchBody, SearchRequest, SearchResponse,
  SimilarDocumentQuery, SimilarDocumentResult,
};
pub use settings::{Embedder, Faceting, MinWordSizeForTypos, Pagination, Settings, TypoTolerance};
pub use task::{ApiError, Task, TaskDetails, TaskInfo, TaskResult, TaskStatus, TaskType, TasksQuery};
