//! CLI command implementations

mod config;
mod docs;
mod index;
mod search;
mod task;

use std::path::PathBuf;

use anyhow::{Context, Result};
use meili_client::{CancellationToken, Client};
use meili_core::ClientConfig;
use serde::Serialize;
use tracing::warn;

pub use config::{cmd_config_init, cmd_config_show};
pub use docs::{DocsAdd, cmd_docs_add};
pub use index::cmd_index;
pub use search::{cmd_health, cmd_search};
pub use task::cmd_task;

/// Connection options from the global flags.
pub struct Connection {
  pub host: Option<String>,
  pub api_key: Option<String>,
  pub config: Option<PathBuf>,
}

impl Connection {
  /// Config file and environment, then command line flags on top.
  pub fn load_config(&self) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(self.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = &self.host {
      config.host = host.clone();
    }
    if let Some(api_key) = &self.api_key {
      config.api_key = Some(api_key.clone());
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
  }

  /// Build a client whose token is cancelled on Ctrl-C.
  pub fn connect(&self) -> Result<(Client, ClientConfig)> {
    let config = self.load_config()?;
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, cancelling");
        signal.cancel();
      }
    });

    let client = Client::new(&config)
      .with_context(|| format!("Failed to create client for {}", config.host))?
      .with_cancellation(cancel);
    Ok((client, config))
  }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
