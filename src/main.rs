//! rpm test data bootstrap.
//!
//! Builds the srcdata release tags of the test packages and refreshes the
//! unit test data (source archives, rpms and the repo manifest) in the
//! current directory.

use rpm_testdata_bootstrap::cli;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    // Initialize logging
    cli::init_logging(args.verbose);

    // Run CLI and get exit code
    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
