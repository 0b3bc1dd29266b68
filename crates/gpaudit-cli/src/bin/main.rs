//! gpaudit CLI binary entry point
//!
//! Sets up logging, then calls the library's `run_cli()` function.

use anyhow::Result;
use gpaudit_cli::run_cli;

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for `fields` and `blocks`
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
