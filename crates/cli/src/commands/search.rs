//! Search and health commands

use anyhow::{Context, Result};
use meili_core::SearchRequest;
use serde_json::Value;

use super::{Connection, print_json};

pub async fn cmd_search(
  connection: &Connection,
  index: &str,
  query: &str,
  limit: u64,
  filter: Option<String>,
) -> Result<()> {
  let (client, _) = connection.connect()?;
  let request = SearchRequest {
    limit: Some(limit),
    filter: filter.map(Value::String),
    ..Default::default()
  };

  let response = client
    .index(index)
    .search::<Value>(query, &request)
    .await
    .with_context(|| format!("Search on {index} failed"))?;
  print_json(&response)
}

pub async fn cmd_health(connection: &Connection) -> Result<()> {
  let (client, config) = connection.connect()?;
  let health = client
    .health()
    .await
    .with_context(|| format!("{} is not reachable", config.host))?;
  let version = client.version().await.context("Failed to get version")?;

  println!("Host:     {}", config.host);
  println!("Status:   {}", health.status);
  println!("Version:  {}", version.pkg_version);
  Ok(())
}
