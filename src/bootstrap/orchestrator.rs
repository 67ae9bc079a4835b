//! Top-level run: sync, build, manifest, merge, cleanup.

use super::guard::OriginalRef;
use crate::builder::{HookRegistry, PackageBuilder, locate_build_tool};
use crate::cli::{RuntimeConfig, UpdateMode};
use crate::error::Result;
use crate::git::Git;
use crate::manifest::{RepoManifest, update_testrepo_manifest};
use crate::process::CommandRunner;
use crate::settings::PackageDescriptor;
use crate::sync::update_from_remote;
use crate::workspace::{MergeSummary, merge_output};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the temporary directory collecting harvested artifacts.
const OUTDATA_PREFIX: &str = "gbp_unittest_outdata_";

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Manifest as written to disk
    pub manifest: RepoManifest,
    /// Number of release tags built
    pub tags_built: usize,
    /// Result of merging the output tree into the working tree
    pub merge: MergeSummary,
    /// Output directory left on disk because of `--keep-tmp`
    pub kept_outdir: Option<PathBuf>,
}

/// Drives one bootstrap run over a package table.
///
/// The ref checked out at start is checked out again when the run ends,
/// whether it succeeded or not.
#[derive(Debug)]
pub struct Bootstrap<'a> {
    config: &'a RuntimeConfig,
    packages: &'a [PackageDescriptor],
    hooks: HookRegistry,
    git: Git,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a RuntimeConfig, packages: &'a [PackageDescriptor]) -> Self {
        Self {
            config,
            packages,
            hooks: HookRegistry::new(),
            git: Git::new(CommandRunner::new(&config.workdir)),
        }
    }

    /// Builtin hooks available to the branches' hook files.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let outdir = tempfile::Builder::new().prefix(OUTDATA_PREFIX).tempdir()?;
        let original = OriginalRef::capture(&self.git).await?;

        let result = self.run_phases(&original, outdir.path()).await;
        let cleanup = self.cleanup(outdir, original).await;

        match (result, cleanup) {
            (Ok(report), Ok(kept_outdir)) => Ok(RunReport {
                kept_outdir,
                ..report
            }),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                log::error!("Cleanup failed: {}", cleanup_err);
                Err(e)
            }
        }
    }

    async fn run_phases(&self, original: &OriginalRef, outdir: &Path) -> Result<RunReport> {
        if self.config.update_branches != UpdateMode::No {
            let force = self.config.update_branches == UpdateMode::Force;
            update_from_remote(&self.git, self.packages, &self.config.remote, force).await?;
            original.checkout(&self.git).await?;
        }

        let build_tool = if self.config.no_build {
            None
        } else {
            Some(locate_build_tool(&self.config.build_tool)?)
        };
        let builder = build_tool
            .as_deref()
            .map(|tool| PackageBuilder::new(&self.git, &self.hooks, tool, self.config.silent_build));

        let mut manifest = RepoManifest::new();
        let mut tags_built = 0;
        for pkg in self.packages {
            if let Some(branches) = pkg.export_branches {
                update_testrepo_manifest(&self.git, &mut manifest, pkg, branches).await?;
            }
            if let Some(builder) = &builder {
                for branch in pkg.build_branches {
                    tags_built += builder.build_test_pkg(pkg, branch, outdir).await?;
                }
            }
        }

        manifest.write(&self.config.manifest_path()).await?;
        let merge = merge_output(outdir, &self.config.workdir, self.config.overwrite).await?;
        log::info!(
            "Built {} tag(s), copied {} file(s), skipped {} existing",
            tags_built,
            merge.copied,
            merge.skipped
        );

        Ok(RunReport {
            manifest,
            tags_built,
            merge,
            kept_outdir: None,
        })
    }

    /// Removes (or spares) the output directory and restores the original ref.
    ///
    /// Both steps are attempted even if the first one fails.
    async fn cleanup(&self, outdir: TempDir, original: OriginalRef) -> Result<Option<PathBuf>> {
        let removal = if self.config.keep_tmp {
            let path = outdir.keep();
            log::info!("Sparing temporary directory: {}", path.display());
            Ok(Some(path))
        } else {
            outdir.close().map(|()| None)
        };

        log::debug!("Checking out {}", original.rev());
        original.restore(&self.git).await?;
        Ok(removal?)
    }
}
