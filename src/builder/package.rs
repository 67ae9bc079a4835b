//! Building one package branch from its release tags.

use super::harvest::harvest_artifacts;
use super::hooks::{HookContext, HookRegistry, HookTable, POSTBUILD};
use crate::error::{BootstrapError, Result};
use crate::git::Git;
use crate::process::{Capture, CommandRunner};
use crate::settings::PackageDescriptor;
use std::path::Path;

/// Default packaging tool.
pub const DEFAULT_BUILD_TOOL: &str = "git-buildpackage-rpm";

/// Builds release tags with the packaging tool and harvests the results.
#[derive(Debug)]
pub struct PackageBuilder<'a> {
    git: &'a Git,
    runner: CommandRunner,
    hooks: &'a HookRegistry,
    build_tool: &'a Path,
    silent: bool,
}

impl<'a> PackageBuilder<'a> {
    /// # Arguments
    ///
    /// * `git` - Gateway for the repository being bootstrapped
    /// * `hooks` - Builtin hooks that hook files may refer to
    /// * `build_tool` - Packaging tool executable
    /// * `silent` - Capture the tool's stderr instead of showing it
    pub fn new(git: &'a Git, hooks: &'a HookRegistry, build_tool: &'a Path, silent: bool) -> Self {
        Self {
            git,
            runner: CommandRunner::new(git.workdir()),
            hooks,
            build_tool,
            silent,
        }
    }

    /// Builds every release tag of `pkg` on `branch`, harvesting into `outdir`.
    ///
    /// Returns the number of tags built; zero matching tags is not an error.
    pub async fn build_test_pkg(&self, pkg: &PackageDescriptor, branch: &str, outdir: &Path) -> Result<usize> {
        log::info!("Building package {}", pkg.name);
        let tag_pattern = pkg.release_tag_pattern(branch);
        let build_branch = pkg.srcdata_branch(branch);

        let hooks = HookTable::load(self.git, &build_branch, self.hooks).await?;
        let tags = self.git.list_tags(&tag_pattern).await?;
        if tags.is_empty() {
            log::debug!("No tags matching {}", tag_pattern);
        }

        for (ind, tag) in tags.iter().enumerate() {
            let build_dir = tempfile::Builder::new()
                .prefix(&format!("build-{}-{}_", pkg.name, ind))
                .tempdir_in(self.git.workdir())?
                .keep();
            self.do_build(tag, &build_dir).await?;

            if let Some(hook) = &hooks.post_build {
                log::info!("Running postbuild hook for {} / {}", pkg.name, tag);
                let ctx = HookContext {
                    package: pkg.name,
                    branch,
                    tag,
                    build_dir: &build_dir,
                };
                hook.on_post_build(&ctx)
                    .await
                    .map_err(|source| BootstrapError::Hook {
                        hook: POSTBUILD.to_string(),
                        build_dir: Some(build_dir.clone()),
                        source,
                    })?;
            }

            let summary = harvest_artifacts(pkg.name, &build_dir, outdir)
                .await
                .map_err(|source| BootstrapError::Harvest {
                    tag: tag.clone(),
                    build_dir: build_dir.clone(),
                    source: Box::new(source),
                })?;
            log::debug!("Harvested {} artifact(s) from {}", summary.total(), tag);

            tokio::fs::remove_dir_all(&build_dir).await?;
        }

        Ok(tags.len())
    }

    /// Runs the packaging tool for `tag`, exporting into `build_dir`.
    ///
    /// On failure the captured output is echoed and `build_dir` is kept.
    async fn do_build(&self, tag: &str, build_dir: &Path) -> Result<()> {
        let args = build_args(tag, build_dir);
        let out = self
            .runner
            .run(self.build_tool, &args, Capture::new(true, self.silent))
            .await?;

        if !out.success() {
            for line in out.stdout_lines().iter().chain(out.stderr_lines()) {
                println!("{}", line);
            }
            return Err(BootstrapError::BuildFailed {
                tag: tag.to_string(),
                build_dir: build_dir.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn build_args(tag: &str, build_dir: &Path) -> Vec<String> {
    vec![
        "--git-ignore-new".to_string(),
        format!("--git-export={}", tag),
        format!("--git-export-dir={}", build_dir.display()),
        "--git-ignore-branch".to_string(),
        "-ba".to_string(),
        "--target=noarch".to_string(),
    ]
}
