//! Test repository manifest.
//!
//! Records, per exported package, which srcdata branches were exported and
//! the exact revision each pointed at. The document is rendered once at the
//! end of a successful run:
//!
//! ```xml
//! <?xml version="1.0" ?>
//! <gbp-test-data>
//!   <project name="gbp-test">
//!     <branch name="master" orig_name="srcdata/gbp-test/master" revision="..."/>
//!   </project>
//! </gbp-test-data>
//! ```

use crate::error::Result;
use crate::git::Git;
use crate::settings::PackageDescriptor;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

/// Default manifest file name, relative to the working directory.
pub const MANIFEST_FILE: &str = "test-repo-manifest.xml";

const MANIFEST_TEMPLATE: &str = concat!(
    "<?xml version=\"1.0\" ?>\n",
    "<gbp-test-data>\n",
    "{{#each projects}}  <project name=\"{{name}}\">\n",
    "{{#each branches}}    <branch name=\"{{name}}\" orig_name=\"{{orig_name}}\" revision=\"{{revision}}\"/>\n",
    "{{/each}}  </project>\n",
    "{{/each}}</gbp-test-data>\n",
);

/// One exported branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRecord {
    /// Branch name as used by the tests, e.g. `pq/master`
    pub name: String,
    /// Fully qualified source branch, e.g. `srcdata/gbp-test/pq/master`
    pub orig_name: String,
    /// Commit id the branch resolved to
    pub revision: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    pub branches: Vec<BranchRecord>,
}

/// In-memory manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoManifest {
    projects: Vec<Project>,
}

impl RepoManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&mut self, name: impl Into<String>, branches: Vec<BranchRecord>) {
        self.projects.push(Project {
            name: name.into(),
            branches,
        });
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn render(&self) -> Result<String> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(xml_escape);
        handlebars.register_template_string("manifest", MANIFEST_TEMPLATE)?;
        Ok(handlebars.render("manifest", self)?)
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

fn xml_escape(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Adds `pkg` to the manifest with the current revision of each of `branches`.
pub async fn update_testrepo_manifest(
    git: &Git,
    manifest: &mut RepoManifest,
    pkg: &PackageDescriptor,
    branches: &[&str],
) -> Result<()> {
    let mut records = Vec::with_capacity(branches.len());
    for branch in branches {
        let in_branch = pkg.srcdata_branch(branch);
        let revision = git.rev_parse(&format!("{}^0", in_branch)).await?;
        records.push(BranchRecord {
            name: branch.to_string(),
            orig_name: in_branch,
            revision,
        });
    }
    manifest.add_project(pkg.name, records);
    Ok(())
}
