//! meili - command line client for the meili search HTTP API

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::{
  Connection, cmd_config_init, cmd_config_show, cmd_docs_add, cmd_health, cmd_index, cmd_search, cmd_task,
};
use logging::init_cli_logging;

#[derive(Parser)]
#[command(name = "meili")]
#[command(about = "Command line client for the meili search HTTP API")]
#[command(after_help = "\
QUICK START:
  meili index create movies --primary-key id
  meili docs add movies movies.ndjson --batch-size 500 --wait
  meili search movies \"space odyssey\"

CONFIGURATION:
  meili config init               # Write a config template
  MEILI_HOST / MEILI_API_KEY      # Override host and key")]
struct Cli {
  /// Server URL (overrides config and MEILI_HOST)
  #[arg(long, global = true)]
  host: Option<String>,
  /// API key (overrides config and MEILI_API_KEY)
  #[arg(long, global = true)]
  api_key: Option<String>,
  /// Config file path
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,
  /// Debug logging
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage indexes
  Index {
    #[command(subcommand)]
    command: IndexCommand,
  },
  /// Ingest documents
  Docs {
    #[command(subcommand)]
    command: DocsCommand,
  },
  /// Inspect and wait for tasks
  Task {
    #[command(subcommand)]
    command: TaskCommand,
  },
  /// Search an index
  Search {
    index: String,
    query: String,
    #[arg(short, long, default_value = "20")]
    limit: u64,
    /// Filter expression
    #[arg(short, long)]
    filter: Option<String>,
  },
  /// Check that the server is available
  Health,
  /// Configuration management
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

/// Subcommands for `meili index`
#[derive(Subcommand)]
pub enum IndexCommand {
  /// Show index metadata
  Info { uid: String },
  /// Create an index
  Create {
    uid: String,
    #[arg(long)]
    primary_key: Option<String>,
    /// Wait until the task is processed
    #[arg(long)]
    wait: bool,
  },
  /// Change the primary key of an index
  Update {
    uid: String,
    #[arg(long)]
    primary_key: String,
    #[arg(long)]
    wait: bool,
  },
  /// Delete an index
  Delete {
    uid: String,
    #[arg(long)]
    wait: bool,
  },
  /// Show document count and field distribution
  Stats { uid: String },
  /// List indexes
  List {
    #[arg(short, long, default_value = "20")]
    limit: u64,
    #[arg(long, default_value = "0")]
    offset: u64,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocsFormat {
  Json,
  Ndjson,
  Csv,
}

/// Subcommands for `meili docs`
#[derive(Subcommand)]
pub enum DocsCommand {
  /// Add documents from a JSON, NDJSON or CSV file
  Add {
    index: String,
    file: PathBuf,
    /// File format (default: from the file extension)
    #[arg(long, value_enum)]
    format: Option<DocsFormat>,
    /// Records per request (default: batch_size from config)
    #[arg(short, long)]
    batch_size: Option<usize>,
    #[arg(long)]
    primary_key: Option<String>,
    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,
    /// Partially update documents instead of replacing them
    #[arg(long)]
    update: bool,
    /// Wait for every submitted task
    #[arg(long)]
    wait: bool,
  },
}

/// Subcommands for `meili task`
#[derive(Subcommand)]
pub enum TaskCommand {
  /// Show one task
  Get { uid: u64 },
  /// Poll a task until it is processed
  Wait {
    uid: u64,
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Give up after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
  },
  /// List tasks
  List {
    /// Restrict to an index
    #[arg(short, long)]
    index: Option<String>,
    /// Comma separated statuses
    #[arg(long, value_delimiter = ',')]
    statuses: Vec<String>,
    #[arg(short, long, default_value = "20")]
    limit: u64,
  },
}

#[derive(Subcommand)]
enum ConfigCommand {
  /// Show the effective configuration
  Show,
  /// Write a config template to the user config path
  Init {
    #[arg(long)]
    force: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_cli_logging(cli.verbose);

  let connection = Connection {
    host: cli.host,
    api_key: cli.api_key,
    config: cli.config,
  };

  match cli.command {
    Commands::Index { command } => cmd_index(&connection, command).await,
    Commands::Docs { command } => match command {
      DocsCommand::Add {
        index,
        file,
        format,
        batch_size,
        primary_key,
        delimiter,
        update,
        wait,
      } => {
        cmd_docs_add(
          &connection,
          commands::DocsAdd {
            index,
            file,
            format,
            batch_size,
            primary_key,
            delimiter,
            update,
            wait,
          },
        )
        .await
      }
    },
    Commands::Task { command } => cmd_task(&connection, command).await,
    Commands::Search {
      index,
      query,
      limit,
      filter,
    } => cmd_search(&connection, &index, &query, limit, filter).await,
    Commands::Health => cmd_health(&connection).await,
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&connection),
      ConfigCommand::Init { force } => cmd_config_init(force),
    },
  }
}
