//! Merging the harvested output tree into the working tree.

use crate::error::{BootstrapError, Result};
use std::path::{Path, PathBuf};

/// Outcome of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub copied: usize,
    pub skipped: usize,
}

/// Recreates the directory structure of `from` under `to` and copies every
/// file across. Existing destination files are only replaced when
/// `overwrite` is set; otherwise they are left untouched.
pub async fn merge_output(from: &Path, to: &Path, overwrite: bool) -> Result<MergeSummary> {
    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || merge_blocking(&from, &to, overwrite))
        .await
        .map_err(|e| BootstrapError::Anyhow(anyhow::anyhow!("Output merge task panicked: {}", e)))?
}

fn merge_blocking(from: &Path, to: &Path, overwrite: bool) -> Result<MergeSummary> {
    let mut summary = MergeSummary::default();

    for entry in walkdir::WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel_path = relative(entry.path(), from)?;
        let dest_path = to.join(&rel_path);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else if !dest_path.exists() || overwrite {
            std::fs::copy(entry.path(), &dest_path)?;
            summary.copied += 1;
        } else {
            log::debug!("Skipping {}", rel_path.display());
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

fn relative(path: &Path, root: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|e| BootstrapError::Anyhow(anyhow::anyhow!("{}: {}", path.display(), e)))
}
