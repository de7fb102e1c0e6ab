//! Index commands

use anyhow::{Context, Result};
use meili_client::Client;
use meili_core::{IndexesQuery, TaskInfo};

use super::{Connection, print_json};
use crate::IndexCommand;

pub async fn cmd_index(connection: &Connection, command: IndexCommand) -> Result<()> {
  let (client, _) = connection.connect()?;

  match command {
    IndexCommand::Info { uid } => {
      let mut index = client.index(&uid);
      let info = index.fetch_info().await.with_context(|| format!("Failed to fetch index {uid}"))?;
      print_json(&info)
    }
    IndexCommand::Create {
      uid,
      primary_key,
      wait,
    } => {
      let task = client
        .create_index(&uid, primary_key.as_deref())
        .await
        .with_context(|| format!("Failed to create index {uid}"))?;
      finish(&client, task, wait).await
    }
    IndexCommand::Update {
      uid,
      primary_key,
      wait,
    } => {
      let mut index = client.index(&uid);
      let task = index
        .update_index(&primary_key)
        .await
        .with_context(|| format!("Failed to update index {uid}"))?;
      finish(&client, task, wait).await
    }
    IndexCommand::Delete { uid, wait } => {
      let mut index = client.index(&uid);
      let task = index.delete().await.with_context(|| format!("Failed to delete index {uid}"))?;
      finish(&client, task, wait).await
    }
    IndexCommand::Stats { uid } => {
      let stats = client.index(&uid).get_stats().await.context("Failed to get stats")?;
      print_json(&stats)
    }
    IndexCommand::List { limit, offset } => {
      let indexes = client
        .list_indexes(&IndexesQuery { limit, offset })
        .await
        .context("Failed to list indexes")?;
      print_json(&indexes)
    }
  }
}

/// Print the acknowledgment, or wait and print the finished task.
pub async fn finish(client: &Client, task: TaskInfo, wait: bool) -> Result<()> {
  if !wait {
    return print_json(&task);
  }
  let done = client
    .wait_for_task(task.task_uid, client.poll_interval())
    .await
    .with_context(|| format!("Failed while waiting for task {}", task.task_uid))?;
  print_json(&done)?;
  if done.is_failure() {
    anyhow::bail!("Task {} failed", done.uid);
  }
  Ok(())
}
