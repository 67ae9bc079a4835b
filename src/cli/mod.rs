//! Command line interface for the test data bootstrap.
//!
//! Parses arguments, sets up logging and runs the bootstrap over the
//! built-in package table.

mod args;

pub use args::{Args, RuntimeConfig, UpdateMode};

use crate::bootstrap::Bootstrap;
use crate::error::Result;
use crate::settings::TEST_PACKAGES;

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    let config = RuntimeConfig::try_from(&args)?;
    log::debug!("Runtime configuration: {:?}", config);

    let report = Bootstrap::new(&config, TEST_PACKAGES).run().await?;
    log::info!(
        "Wrote {} ({} project(s))",
        config.manifest_path().display(),
        report.manifest.projects().len()
    );
    Ok(0)
}

/// Initializes `env_logger`: `info` by default, `debug` with `--verbose`.
///
/// `RUST_LOG` takes precedence over both.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Parse arguments without executing (for testing)
pub fn parse_args() -> Args {
    Args::parse_args()
}
