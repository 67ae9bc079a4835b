//! Git gateway.
//!
//! Thin wrapper around the `git` executable. Every helper fails with
//! [`GitError`] when git exits non-zero, so callers never inspect exit codes.

use crate::error::{GitError, Result};
use crate::process::{Capture, CommandRunner, display_command};
use std::ffi::OsStr;
use std::path::Path;

const GIT: &str = "git";

/// Git commands executed in one working tree.
#[derive(Debug, Clone)]
pub struct Git {
    runner: CommandRunner,
}

impl Git {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub fn workdir(&self) -> &Path {
        self.runner.workdir()
    }

    /// Runs `git <subcommand> <args>`; stderr is always captured for the error.
    ///
    /// Returns the stdout lines when `capture_stdout` is set, otherwise an
    /// empty vector (output went to the console).
    pub async fn cmd(&self, subcommand: &str, args: &[&str], capture_stdout: bool) -> Result<Vec<String>> {
        let mut git_args = Vec::with_capacity(args.len() + 1);
        git_args.push(subcommand);
        git_args.extend_from_slice(args);

        let out = self
            .runner
            .run(GIT, &git_args, Capture::new(capture_stdout, true))
            .await?;

        if !out.success() {
            return Err(GitError {
                command: display_command(OsStr::new(GIT), &git_args),
                stderr: out.stderr.unwrap_or_default(),
            }
            .into());
        }

        Ok(out.stdout.unwrap_or_default())
    }

    pub async fn checkout(&self, rev: &str) -> Result<()> {
        self.cmd("checkout", &[rev], true).await.map(drop)
    }

    pub async fn fetch(&self, remote: &str) -> Result<()> {
        self.cmd("fetch", &[remote], true).await.map(drop)
    }

    /// `git tag -l <pattern>`
    pub async fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let tags = self.cmd("tag", &["-l", pattern], true).await?;
        Ok(tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// `git branch -r --list <pattern>`, raw output lines.
    pub async fn list_remote_branches(&self, pattern: &str) -> Result<Vec<String>> {
        self.cmd("branch", &["-r", "--list", pattern], true).await
    }

    pub async fn merge_ff_only(&self, rev: &str) -> Result<()> {
        self.cmd("merge", &["--ff-only", rev], true).await.map(drop)
    }

    pub async fn reset_hard(&self, rev: &str) -> Result<()> {
        self.cmd("reset", &["--hard", rev], true).await.map(drop)
    }

    /// Resolves `rev` to a full object id.
    pub async fn rev_parse(&self, rev: &str) -> Result<String> {
        let out = self.cmd("rev-parse", &[rev], true).await?;
        Ok(first_line(out))
    }

    pub async fn symbolic_ref(&self, name: &str) -> Result<String> {
        let out = self.cmd("symbolic-ref", &[name], true).await?;
        Ok(first_line(out))
    }

    /// `git show <object>`, e.g. `branch:path/in/tree`.
    pub async fn show(&self, object: &str) -> Result<Vec<String>> {
        self.cmd("show", &[object], true).await
    }

    /// Current branch name, or the commit id when HEAD is detached.
    pub async fn current_ref(&self) -> Result<String> {
        match self.symbolic_ref("HEAD").await {
            Ok(head) => Ok(head
                .strip_prefix("refs/heads/")
                .unwrap_or(&head)
                .to_string()),
            Err(_) => self.rev_parse("HEAD").await,
        }
    }
}

fn first_line(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .next()
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BootstrapError;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "-q", "-b", "master"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[tokio::test]
    async fn current_ref_is_branch_name() {
        let repo = make_git_repo();
        let git = Git::new(CommandRunner::new(repo.path()));
        assert_eq!(git.current_ref().await.unwrap(), "master");
    }

    #[tokio::test]
    async fn current_ref_falls_back_to_sha_when_detached() {
        let repo = make_git_repo();
        let sha = run_git(repo.path(), &["rev-parse", "HEAD"]);
        run_git(repo.path(), &["checkout", "-q", "--detach"]);
        let git = Git::new(CommandRunner::new(repo.path()));
        assert_eq!(git.current_ref().await.unwrap(), sha);
    }

    #[tokio::test]
    async fn list_tags_filters_by_pattern() {
        let repo = make_git_repo();
        run_git(repo.path(), &["tag", "srcdata/foo/release/1.0"]);
        run_git(repo.path(), &["tag", "srcdata/foo/release/1.1"]);
        run_git(repo.path(), &["tag", "unrelated"]);
        let git = Git::new(CommandRunner::new(repo.path()));
        let tags = git.list_tags("srcdata/foo/release/*").await.unwrap();
        assert_eq!(tags, ["srcdata/foo/release/1.0", "srcdata/foo/release/1.1"]);
    }

    #[tokio::test]
    async fn failing_subcommand_is_git_error() {
        let repo = make_git_repo();
        let git = Git::new(CommandRunner::new(repo.path()));
        let err = git.show("no-such-branch:.bootstrap_hooks.toml").await.unwrap_err();
        match err {
            BootstrapError::Git(e) => {
                assert_eq!(e.command, "git show no-such-branch:.bootstrap_hooks.toml");
                assert!(!e.stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
