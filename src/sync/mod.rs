//! Updating local srcdata branches from a remote.

use crate::error::{BootstrapError, Result};
use crate::git::Git;
use crate::settings::PackageDescriptor;

/// Fetches `remote` and updates the srcdata branches of every package.
///
/// Leaves the last updated branch checked out; the caller restores its own ref.
pub async fn update_from_remote(
    git: &Git,
    packages: &[PackageDescriptor],
    remote: &str,
    force: bool,
) -> Result<()> {
    git.fetch(remote).await?;
    for pkg in packages {
        update_package_branches(git, pkg, remote, force).await?;
    }
    Ok(())
}

/// Fast-forwards (or, with `force`, hard-resets) every local
/// `srcdata/<package>/*` branch to its remote counterpart.
pub async fn update_package_branches(
    git: &Git,
    pkg: &PackageDescriptor,
    remote: &str,
    force: bool,
) -> Result<()> {
    let lines = git
        .list_remote_branches(&pkg.remote_branch_pattern(remote))
        .await?;
    let branches = local_branch_names(&lines, remote);
    log::info!("Updating local branches {:?} from '{}'", branches, remote);

    for branch in &branches {
        git.checkout(branch).await?;
        let remote_branch = format!("{}/{}", remote, branch);
        if let Err(e) = git.merge_ff_only(&remote_branch).await {
            if !force {
                log::debug!("{}", e);
                return Err(BootstrapError::FastForward {
                    branch: branch.clone(),
                });
            }
            log::warn!("Doing hard reset for branch {}", branch);
            git.reset_hard(&remote_branch).await?;
        }
    }
    Ok(())
}

/// Turns `git branch -r` lines into local branch names.
fn local_branch_names(lines: &[String], remote: &str) -> Vec<String> {
    let prefix = format!("{}/", remote);
    lines
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| name.strip_prefix(&prefix).unwrap_or(name).to_string())
        .collect()
}
