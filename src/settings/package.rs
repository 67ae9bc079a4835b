//! Package descriptors and srcdata naming rules.

/// Branch whose release tags carry no branch component.
pub const PRIMARY_BRANCH: &str = "master";

/// One logical test package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name, also the srcdata namespace
    pub name: &'static str,

    /// Branches whose release tags are built
    pub build_branches: &'static [&'static str],

    /// Branches recorded in the repo manifest, if the package is exported
    pub export_branches: Option<&'static [&'static str]>,
}

/// Test packages, in processing order.
///
/// The pristine-tar branches are named `pristine_tar` so that pristine-tar
/// itself does not pick them up.
pub const TEST_PACKAGES: &[PackageDescriptor] = &[
    PackageDescriptor {
        name: "gbp-test-native",
        build_branches: &["master"],
        export_branches: Some(&["master"]),
    },
    PackageDescriptor {
        name: "gbp-test-native2",
        build_branches: &["master"],
        export_branches: Some(&["master"]),
    },
    PackageDescriptor {
        name: "gbp-test",
        build_branches: &["master", "fork"],
        export_branches: Some(&["master", "upstream", "pq/master", "pristine_tar"]),
    },
    PackageDescriptor {
        name: "gbp-test2",
        build_branches: &["master"],
        export_branches: Some(&["master", "master-orphan", "upstream", "pristine_tar"]),
    },
];

impl PackageDescriptor {
    /// Fully qualified branch name, e.g. `srcdata/gbp-test/master`.
    pub fn srcdata_branch(&self, branch: &str) -> String {
        format!("srcdata/{}/{}", self.name, branch)
    }

    /// Glob matching the release tags built from `branch`.
    pub fn release_tag_pattern(&self, branch: &str) -> String {
        if branch == PRIMARY_BRANCH {
            format!("srcdata/{}/release/*", self.name)
        } else {
            format!("srcdata/{}/{}/release/*", self.name, branch)
        }
    }

    /// Glob matching this package's remote tracking branches.
    pub fn remote_branch_pattern(&self, remote: &str) -> String {
        format!("{}/srcdata/{}/*", remote, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GBP_TEST: PackageDescriptor = TEST_PACKAGES[2];

    #[test]
    fn primary_branch_tags_have_no_branch_component() {
        assert_eq!(GBP_TEST.release_tag_pattern("master"), "srcdata/gbp-test/release/*");
    }

    #[test]
    fn other_branch_tags_are_namespaced() {
        assert_eq!(
            GBP_TEST.release_tag_pattern("fork"),
            "srcdata/gbp-test/fork/release/*"
        );
    }

    #[test]
    fn srcdata_and_remote_names() {
        assert_eq!(GBP_TEST.srcdata_branch("pq/master"), "srcdata/gbp-test/pq/master");
        assert_eq!(GBP_TEST.remote_branch_pattern("origin"), "origin/srcdata/gbp-test/*");
    }

    #[test]
    fn every_package_builds_something() {
        for pkg in TEST_PACKAGES {
            assert!(!pkg.build_branches.is_empty(), "{} has no build branches", pkg.name);
        }
    }
}
