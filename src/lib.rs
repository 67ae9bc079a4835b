//! Bootstrap and update the rpm unit test data.
//!
//! This library regenerates the fixture data of the git-buildpackage-rpm
//! test suite:
//! - builds the `srcdata/<package>/...` release tags with the packaging tool
//! - collects source archives (`orig/`) and packages (`rpm/`)
//! - writes a manifest of the exported srcdata branches and their revisions
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bootstrap;
pub mod builder;
pub mod cli;
pub mod error;
pub mod git;
pub mod manifest;
pub mod process;
pub mod settings;
pub mod sync;
pub mod workspace;

// Re-export commonly used types
pub use bootstrap::{Bootstrap, RunReport};
pub use error::{BootstrapError, CliError, GitError, Result};
pub use settings::{PackageDescriptor, TEST_PACKAGES};
