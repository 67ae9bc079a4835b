//! Artifact harvesting from a finished build directory.

use crate::error::{BootstrapError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Output subdirectory for upstream source archives.
pub const ORIG_DIR: &str = "orig";

/// Output subdirectory for binary packages.
pub const RPM_DIR: &str = "rpm";

/// What one harvest copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub source_rpms: usize,
    pub rpms: usize,
    pub orig_archives: usize,
}

impl HarvestSummary {
    pub fn total(&self) -> usize {
        self.source_rpms + self.rpms + self.orig_archives
    }
}

/// Copies the artifacts of `build_dir` into `outdir`.
///
/// - `SRPMS/*rpm` → `outdir/`
/// - `RPMS/*/*rpm` → `outdir/rpm/`
/// - `SOURCES/<package>*.{tar.gz,tar.bz2,zip}` → `outdir/orig/`
///
/// Output subdirectories are only created when something is copied into them.
pub async fn harvest_artifacts(package: &str, build_dir: &Path, outdir: &Path) -> Result<HarvestSummary> {
    let mut summary = HarvestSummary::default();
    let escaped = Pattern::escape(&build_dir.to_string_lossy());

    for fname in glob_files(&format!("{}/SRPMS/*rpm", escaped))? {
        copy_into(&fname, outdir).await?;
        summary.source_rpms += 1;
    }

    let rpm_dir = outdir.join(RPM_DIR);
    for fname in glob_files(&format!("{}/RPMS/*/*rpm", escaped))? {
        copy_into(&fname, &rpm_dir).await?;
        summary.rpms += 1;
    }

    let orig_dir = outdir.join(ORIG_DIR);
    for fname in orig_archives(package, &build_dir.join("SOURCES")).await? {
        copy_into(&fname, &orig_dir).await?;
        summary.orig_archives += 1;
    }

    Ok(summary)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(|e| BootstrapError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Source archives in `sources_dir` whose names start with the package name.
async fn orig_archives(package: &str, sources_dir: &Path) -> Result<Vec<PathBuf>> {
    let prefix = Pattern::escape(package);
    let patterns = ["tar.gz", "tar.bz2", "zip"]
        .iter()
        .map(|ext| Pattern::new(&format!("{}*{}", prefix, ext)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut entries = match tokio::fs::read_dir(sources_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut archives = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns.iter().any(|p| p.matches(&name)) && entry.file_type().await?.is_file() {
            archives.push(entry.path());
        }
    }
    archives.sort();
    Ok(archives)
}

/// Copies `file` into `dir`, creating `dir` on first use.
async fn copy_into(file: &Path, dir: &Path) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    log::debug!("Copying {} -> {}", file.display(), dir.display());
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::copy(file, dir.join(name)).await?;
    Ok(())
}
