//! Shared fixtures for the integration tests: throwaway git repositories with
//! srcdata branches and stand-ins for the packaging tool.

#![allow(dead_code)]

use clap::Parser;
use rpm_testdata_bootstrap::{PackageDescriptor, TEST_PACKAGES};
use rpm_testdata_bootstrap::cli::{Args, RuntimeConfig};
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

const MOCK_BUILD_TOOL: &str = include_str!("../fixtures/mock-gbp-rpm.sh");

const FAILING_BUILD_TOOL: &str = "#!/bin/sh
echo 'error: Bad exit status from /var/tmp/rpm-tmp.1234 (%build)'
echo 'rpmbuild: + make' >&2
exit 1
";

/// Single exported package with one build branch.
pub const GBP_TEST: &[PackageDescriptor] = &[PackageDescriptor {
    name: "gbp-test",
    build_branches: &["master"],
    export_branches: Some(&["master", "upstream"]),
}];

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
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

pub fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "test-user"]);
    git(dir, &["config", "user.email", "test@example.com"]);
}

/// Repository on `master` with a single commit.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q", "-b", "master"]);
    configure_identity(dir);
    commit_file(dir, "README", "test data\n", "initial");
}

pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// Creates `branch` from `master` with one extra commit, returning to the
/// previously checked out branch.
pub fn create_branch(dir: &Path, branch: &str, files: &[(&str, &str)]) {
    let current = head(dir);
    git(dir, &["checkout", "-q", "-b", branch, "master"]);
    for (name, content) in files {
        commit_file(dir, name, content, &format!("{} {}", branch, name));
    }
    git(dir, &["checkout", "-q", &current]);
}

/// Branch name, or commit id when detached.
pub fn head(dir: &Path) -> String {
    let output = Command::new("git")
        .args(["symbolic-ref", "--short", "-q", "HEAD"])
        .current_dir(dir)
        .output()
        .unwrap();
    if output.status.success() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        git(dir, &["rev-parse", "HEAD"])
    }
}

/// Repository with `srcdata/gbp-test/{master,upstream}` and, if `tagged`,
/// the release tag `srcdata/gbp-test/release/1.0` on the master branch.
pub fn gbp_test_repo(dir: &Path, tagged: bool) {
    init_repo(dir);
    create_branch(dir, "srcdata/gbp-test/master", &[("gbp-test.spec", "Name: gbp-test\n")]);
    create_branch(dir, "srcdata/gbp-test/upstream", &[("main.c", "int main(void) {}\n")]);
    if tagged {
        git(dir, &["tag", "srcdata/gbp-test/release/1.0", "srcdata/gbp-test/master"]);
    }
}

/// Every export branch of the built-in package table, all pointing at `master`.
pub fn all_srcdata_branches(dir: &Path) {
    for pkg in TEST_PACKAGES {
        for branch in pkg.export_branches.unwrap_or_default() {
            git(dir, &["branch", &pkg.srcdata_branch(branch), "master"]);
        }
    }
}

/// Clones `origin` into `clone` and makes the two diverge on `branch`.
pub fn diverge_clone(origin: &Path, clone: &Path, branch: &str) {
    git(
        clone.parent().unwrap(),
        &["clone", "-q", origin.to_str().unwrap(), clone.to_str().unwrap()],
    );
    configure_identity(clone);

    git(clone, &["checkout", "-q", "-b", branch, &format!("origin/{}", branch)]);
    commit_file(clone, "local.txt", "local\n", "local change");
    git(clone, &["checkout", "-q", "master"]);

    git(origin, &["checkout", "-q", branch]);
    commit_file(origin, "remote.txt", "remote\n", "remote change");
    git(origin, &["checkout", "-q", "master"]);
}

fn install_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn mock_build_tool(dir: &Path) -> PathBuf {
    install_script(dir, "mock-gbp-rpm", MOCK_BUILD_TOOL)
}

pub fn failing_build_tool(dir: &Path) -> PathBuf {
    install_script(dir, "failing-gbp-rpm", FAILING_BUILD_TOOL)
}

/// Tags the mock build tool was invoked with, in order.
pub fn build_invocations(workdir: &Path) -> Vec<String> {
    fs::read_to_string(workdir.join(".build-invocations"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Scratch directories left in `workdir`.
pub fn build_dirs(workdir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<_> = fs::read_dir(workdir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with("build-"))
        })
        .collect();
    dirs.sort();
    dirs
}

/// Runtime configuration as the CLI would build it.
pub fn config(workdir: &Path, build_tool: &Path, extra: &[&str]) -> RuntimeConfig {
    let mut argv: Vec<OsString> = vec![
        "rpm_testdata_bootstrap".into(),
        "-C".into(),
        workdir.into(),
        "--build-tool".into(),
        build_tool.into(),
    ];
    argv.extend(extra.iter().map(OsString::from));
    let args = Args::try_parse_from(argv).unwrap();
    RuntimeConfig::try_from(&args).unwrap()
}
