//! Config commands

use anyhow::{Context, Result};
use meili_core::ClientConfig;

use super::Connection;

pub fn cmd_config_show(connection: &Connection) -> Result<()> {
  let config = connection.load_config()?;

  println!("Host:             {}", config.host);
  println!(
    "API key:          {}",
    if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
      "(set)"
    } else {
      "(none)"
    }
  );
  println!("Request timeout:  {}s", config.request_timeout_secs);
  println!("Poll interval:    {}ms", config.poll_interval_ms);
  println!("Batch size:       {}", config.batch_size);
  match ClientConfig::user_config_path() {
    Some(path) => println!("User config:      {}", path.display()),
    None => println!("User config:      (no config directory)"),
  }
  Ok(())
}

pub fn cmd_config_init(force: bool) -> Result<()> {
  let path = ClientConfig::user_config_path().context("Could not determine the config directory")?;

  if path.exists() && !force {
    anyhow::bail!("Config already exists at {} (use --force to overwrite)", path.display());
  }
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  std::fs::write(&path, ClientConfig::generate_template())
    .with_context(|| format!("Failed to write {}", path.display()))?;

  println!("Wrote {}", path.display());
  Ok(())
}
