//! Logging setup for the CLI

use tracing_subscriber::EnvFilter;

/// Console logging to stderr. `RUST_LOG` overrides the default level, which
/// is `warn`, or `debug` with `--verbose`.
pub fn init_cli_logging(verbose: bool) {
  let level = if verbose {
    tracing::Level::DEBUG
  } else {
    tracing::Level::WARN
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(verbose)
    .with_writer(std::io::stderr)
    .init();
}
