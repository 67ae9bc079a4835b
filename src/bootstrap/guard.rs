//! RAII guard for the ref that was checked out when the run started.

use crate::error::Result;
use crate::git::Git;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Remembers the starting branch (or detached commit) and puts it back.
///
/// [`restore`](Self::restore) is the normal path. If the guard is dropped
/// without it (panic, cancelled future) the checkout is done synchronously
/// in `Drop`.
#[derive(Debug)]
pub struct OriginalRef {
    rev: String,
    workdir: PathBuf,
    restored: bool,
}

impl OriginalRef {
    pub async fn capture(git: &Git) -> Result<Self> {
        let rev = git.current_ref().await?;
        log::debug!("Original ref: {}", rev);
        Ok(Self {
            rev,
            workdir: git.workdir().to_path_buf(),
            restored: false,
        })
    }

    pub fn rev(&self) -> &str {
        &self.rev
    }

    /// Checks the original ref out again without releasing the guard.
    pub async fn checkout(&self, git: &Git) -> Result<()> {
        git.checkout(&self.rev).await
    }

    /// Final checkout of the original ref.
    pub async fn restore(mut self, git: &Git) -> Result<()> {
        self.restored = true;
        git.checkout(&self.rev).await
    }
}

/// Fallback for runs that never reach [`OriginalRef::restore`].
///
/// Blocks the current thread on `git checkout`, which may be a tokio worker.
/// Only unwinding and dropped futures end up here.
impl Drop for OriginalRef {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        log::warn!("Restoring {} after an interrupted run", self.rev);
        let status = Command::new("git")
            .args(["checkout", self.rev.as_str()])
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => log::error!("git checkout {} exited with {}", self.rev, status),
            Err(e) => log::error!("Failed to run git checkout {}: {}", self.rev, e),
        }
    }
}
