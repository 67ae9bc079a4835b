//! Error types for bootstrap operations.
//!
//! Every failure aborts the run; the only recoverable condition (a failed
//! fast-forward under the force policy) is handled inside the synchronizer.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Main error type for all bootstrap operations
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// A git subcommand exited non-zero
    #[error(transparent)]
    Git(#[from] GitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// External process could not be started at all
    #[error("Failed to execute '{command}': {source}")]
    Spawn {
        /// Command line that failed to start
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Local branch diverged from the remote and force was not requested
    #[error("Failed to do fast-forward on {branch}")]
    FastForward {
        /// Local branch name
        branch: String,
    },

    /// The packaging tool exited non-zero; the build directory is left on disk
    #[error("Building {tag} failed! Build data can be found in {}", .build_dir.display())]
    BuildFailed {
        /// Tag that was being exported
        tag: String,
        /// Retained scratch directory
        build_dir: PathBuf,
    },

    /// The packaging tool is not on PATH
    #[error("Build tool '{tool}' not found in PATH")]
    ToolNotFound {
        /// Executable that was looked up
        tool: String,
    },

    /// Hook loading or execution failed
    #[error("Hook '{hook}' failed: {source}{}", retained_dir(.build_dir.as_deref()))]
    Hook {
        /// Hook name (e.g. `postbuild`)
        hook: String,
        /// Scratch directory left on disk, if a build had already run
        build_dir: Option<PathBuf>,
        /// Error raised by the hook
        #[source]
        source: anyhow::Error,
    },

    /// Copying the artifacts of a finished build failed
    #[error("Harvesting {tag} failed: {source}{}", retained_dir(Some(.build_dir.as_path())))]
    Harvest {
        /// Tag whose build output was being collected
        tag: String,
        /// Retained scratch directory
        build_dir: PathBuf,
        #[source]
        source: Box<BootstrapError>,
    },

    /// Invalid glob pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Manifest template errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Manifest rendering errors
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Failure of a single git invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Git cmd ('{command}') failed!{}", format_stderr(.stderr))]
pub struct GitError {
    /// Full command line, e.g. `git merge --ff-only origin/foo`
    pub command: String,
    /// Captured standard error lines
    pub stderr: Vec<String>,
}

fn retained_dir(build_dir: Option<&Path>) -> String {
    build_dir
        .map(|dir| format!("\nBuild data can be found in {}", dir.display()))
        .unwrap_or_default()
}

fn format_stderr(stderr: &[String]) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr.join("\n"))
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
