//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and the runtime
//! configuration derived from it.

use crate::builder::DEFAULT_BUILD_TOOL;
use crate::error::{BootstrapError, CliError};
use crate::manifest::MANIFEST_FILE;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Whether and how srcdata branches are updated from the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UpdateMode {
    /// Leave local branches alone
    #[default]
    No,
    /// Fast-forward local branches, fail if that is not possible
    Yes,
    /// Fast-forward, falling back to a hard reset
    Force,
}

/// Bootstrap and update the rpm unit test data
#[derive(Parser, Debug)]
#[command(
    name = "rpm_testdata_bootstrap",
    version,
    about = "Bootstrap and update the rpm unit test data",
    long_about = "Builds the srcdata release tags of the test packages with git-buildpackage-rpm,
collects the resulting source archives and rpms into orig/ and rpm/, and writes
a manifest of the exported srcdata branches.

Usage:
  rpm_testdata_bootstrap --update-branches yes
  rpm_testdata_bootstrap --no-build
  rpm_testdata_bootstrap -C tests/data -o -s

The originally checked out branch is restored when the run ends, also on failure."
)]
pub struct Args {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Update branches from remote
    #[arg(long, value_enum, default_value_t = UpdateMode::No)]
    pub update_branches: UpdateMode,

    /// Do not build the packages
    #[arg(long)]
    pub no_build: bool,

    /// Do not remove the temporary data dir
    #[arg(short, long)]
    pub keep_tmp: bool,

    /// Silent build, i.e. no rpmbuild output shown
    #[arg(short, long)]
    pub silent_build: bool,

    /// Remote to update srcdata branches from
    #[arg(long, value_name = "NAME", env = "BOOTSTRAP_REMOTE", default_value = "origin")]
    pub remote: String,

    /// Packaging tool used to build the release tags
    #[arg(long, value_name = "PATH", env = "BOOTSTRAP_BUILD_TOOL", default_value = DEFAULT_BUILD_TOOL)]
    pub build_tool: String,

    /// File name of the repo manifest written into the working directory
    #[arg(long, value_name = "FILE", default_value = MANIFEST_FILE)]
    pub manifest: String,

    /// Repository working directory
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.workdir.is_dir() {
            return Err(format!(
                "Working directory does not exist: {}",
                self.workdir.display()
            ));
        }

        let manifest = Path::new(&self.manifest);
        if self.manifest.is_empty() || manifest.file_name() != Some(manifest.as_os_str()) {
            return Err(format!(
                "Manifest must be a plain file name, got: {}",
                self.manifest
            ));
        }

        if self.remote.is_empty() {
            return Err("Remote cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Absolute repository working directory
    pub workdir: PathBuf,
    /// Branch update policy applied before building
    pub update_branches: UpdateMode,
    /// Replace existing files when merging the output tree
    pub overwrite: bool,
    /// Only write the manifest
    pub no_build: bool,
    /// Leave the output directory on disk
    pub keep_tmp: bool,
    /// Capture the build tool's stderr instead of showing it
    pub silent_build: bool,
    /// Remote the srcdata branches are updated from
    pub remote: String,
    /// Packaging tool name or path
    pub build_tool: String,
    /// Manifest file name inside `workdir`
    pub manifest: String,
}

impl TryFrom<&Args> for RuntimeConfig {
    type Error = BootstrapError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        args.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        // Scratch directories are handed to child processes, keep paths absolute
        let workdir = std::fs::canonicalize(&args.workdir)?;

        Ok(Self {
            workdir,
            update_branches: args.update_branches,
            overwrite: args.overwrite,
            no_build: args.no_build,
            keep_tmp: args.keep_tmp,
            silent_build: args.silent_build,
            remote: args.remote.clone(),
            build_tool: args.build_tool.clone(),
            manifest: args.manifest.clone(),
        })
    }
}

impl RuntimeConfig {
    /// Full path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.workdir.join(&self.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["rpm_testdata_bootstrap"]).unwrap();
        assert!(!args.verbose);
        assert!(!args.overwrite);
        assert!(!args.no_build);
        assert!(!args.keep_tmp);
        assert!(!args.silent_build);
        assert_eq!(args.update_branches, UpdateMode::No);
        assert_eq!(args.manifest, MANIFEST_FILE);
        assert_eq!(args.workdir, PathBuf::from("."));
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from(["rpm_testdata_bootstrap", "-v", "-o", "-k", "-s"]).unwrap();
        assert!(args.verbose && args.overwrite && args.keep_tmp && args.silent_build);
    }

    #[test]
    fn update_branches_values() {
        let args = Args::try_parse_from(["rpm_testdata_bootstrap", "--update-branches", "force"]).unwrap();
        assert_eq!(args.update_branches, UpdateMode::Force);
        assert!(Args::try_parse_from(["rpm_testdata_bootstrap", "--update-branches", "maybe"]).is_err());
    }

    #[test]
    fn manifest_must_be_file_name() {
        let args = Args::try_parse_from(["rpm_testdata_bootstrap", "--manifest", "sub/manifest.xml"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn missing_workdir_is_rejected() {
        let args = Args::try_parse_from(["rpm_testdata_bootstrap", "-C", "/nonexistent/bootstrap/dir"]).unwrap();
        let err = RuntimeConfig::try_from(&args).unwrap_err();
        assert!(matches!(err, BootstrapError::Cli(CliError::InvalidArguments { .. })));
    }

    #[test]
    fn runtime_config_has_absolute_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            OsStr::new("rpm_testdata_bootstrap"),
            OsStr::new("-C"),
            dir.path().as_os_str(),
        ])
        .unwrap();
        let config = RuntimeConfig::try_from(&args).unwrap();
        assert!(config.workdir.is_absolute());
        assert_eq!(config.manifest_path(), config.workdir.join(MANIFEST_FILE));
    }
}
