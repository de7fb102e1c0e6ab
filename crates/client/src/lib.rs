//! Async client for the meili search HTTP API.
//!
//! Mutations return a [`TaskInfo`](meili_core::TaskInfo) acknowledgment
//! immediately; [`Index::wait_for_task`] (or [`tasks::wait_for_task`]) polls
//! until the server has processed it. Large payloads go through the
//! `_in_batches` document operations, which split by record count and submit
//! one mutation per chunk.

pub mod batch;
pub mod blocking;
mod client;
mod documents;
pub mod error;
pub mod executor;
pub mod http;
mod index;
mod search;
mod settings;
pub mod tasks;

#[cfg(test)]
mod __tests__;

pub use client::Client;
pub use error::{Error, Result};
pub use executor::{Body, Request, RequestExecutor};
pub use http::HttpExecutor;
pub use index::Index;
pub use meili_core;
pub use tokio_util::sync::CancellationToken;
