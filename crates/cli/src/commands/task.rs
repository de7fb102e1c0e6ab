//! Task commands

use std::time::Duration;

use anyhow::{Context, Result};
use meili_core::{TaskStatus, TasksQuery};

use super::{Connection, print_json};
use crate::TaskCommand;

pub async fn cmd_task(connection: &Connection, command: TaskCommand) -> Result<()> {
  let (client, _) = connection.connect()?;

  match command {
    TaskCommand::Get { uid } => {
      let task = client.get_task(uid).await.with_context(|| format!("Failed to get task {uid}"))?;
      print_json(&task)
    }
    TaskCommand::Wait {
      uid,
      interval_ms,
      timeout_secs,
    } => {
      let interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| client.poll_interval());
      let result = match timeout_secs {
        Some(secs) => {
          client
            .wait_for_task_with_timeout(uid, interval, Duration::from_secs(secs))
            .await
        }
        None => client.wait_for_task(uid, interval).await,
      };
      let task = result.with_context(|| format!("Gave up waiting for task {uid}"))?;
      print_json(&task)?;
      if task.is_failure() {
        anyhow::bail!("Task {uid} failed");
      }
      Ok(())
    }
    TaskCommand::List {
      index,
      statuses,
      limit,
    } => {
      let statuses = statuses
        .iter()
        .map(|s| s.parse::<TaskStatus>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid status: {e}"))?;
      let query = TasksQuery::new().with_statuses(statuses).with_limit(limit);
      let result = match index {
        Some(uid) => client.index(uid).get_tasks(&query).await,
        None => client.get_tasks(&query).await,
      }
      .context("Failed to list tasks")?;
      print_json(&result)
    }
  }
}
