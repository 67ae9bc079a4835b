//! Post-build hooks.
//!
//! A srcdata branch may carry a `.bootstrap_hooks.toml` file at its tip:
//!
//! ```toml
//! [postbuild]
//! command = ["sh", "fixup.sh"]
//! ```
//!
//! or refer to a hook registered in code:
//!
//! ```toml
//! [postbuild]
//! builtin = "strip-changelog"
//! ```
//!
//! Hooks are trusted; whatever they return propagates to the caller.

use crate::error::{BootstrapError, Result};
use crate::git::Git;
use crate::process::{Capture, CommandRunner};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

/// Path of the hook file inside a srcdata branch.
pub const HOOKS_FILE: &str = ".bootstrap_hooks.toml";

/// Name of the only hook point.
pub const POSTBUILD: &str = "postbuild";

/// What a hook gets to see about the build it follows.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub package: &'a str,
    pub branch: &'a str,
    pub tag: &'a str,
    /// Scratch directory the build tool exported into
    pub build_dir: &'a Path,
}

/// Runs after every successful build, before artifacts are harvested.
#[async_trait]
pub trait PostBuildHook: Send + Sync {
    async fn on_post_build(&self, ctx: &HookContext<'_>) -> anyhow::Result<()>;
}

/// Adapts a plain function or closure into a [`PostBuildHook`].
pub struct FnHook<F>(pub F);

#[async_trait]
impl<F> PostBuildHook for FnHook<F>
where
    F: Fn(&HookContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    async fn on_post_build(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
        (self.0)(ctx)
    }
}

/// External command hook.
///
/// The build directory and tag are appended as the last two arguments and
/// also exported as `BOOTSTRAP_BUILD_DIR` / `BOOTSTRAP_TAG`.
#[derive(Debug, Clone)]
pub struct CommandHook {
    program: String,
    args: Vec<String>,
    runner: CommandRunner,
}

impl CommandHook {
    pub fn new(argv: Vec<String>, runner: CommandRunner) -> anyhow::Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| anyhow::anyhow!("hook command must not be empty"))?;
        Ok(Self {
            program,
            args: argv.collect(),
            runner,
        })
    }
}

#[async_trait]
impl PostBuildHook for CommandHook {
    async fn on_post_build(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
        let mut args: Vec<&OsStr> = self.args.iter().map(OsStr::new).collect();
        args.push(ctx.build_dir.as_os_str());
        args.push(OsStr::new(ctx.tag));

        let out = self
            .runner
            .run_with_env(
                &self.program,
                &args,
                Capture::NONE,
                &[
                    ("BOOTSTRAP_BUILD_DIR", ctx.build_dir.as_os_str()),
                    ("BOOTSTRAP_TAG", OsStr::new(ctx.tag)),
                ],
            )
            .await?;

        if !out.success() {
            anyhow::bail!("'{}' exited with status {:?}", self.program, out.code);
        }
        Ok(())
    }
}

/// Hooks that hook files may refer to with `builtin = "<name>"`.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn PostBuildHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, hook: Arc<dyn PostBuildHook>) -> &mut Self {
        self.hooks.insert(name.into(), hook);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PostBuildHook>> {
        self.hooks.get(name).cloned()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HooksFile {
    postbuild: Option<HookSpec>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum HookSpec {
    Command(Vec<String>),
    Builtin(String),
}

/// Hooks active for one package/branch. Empty when the branch has no hook file.
#[derive(Default, Clone)]
pub struct HookTable {
    pub post_build: Option<Arc<dyn PostBuildHook>>,
}

impl std::fmt::Debug for HookTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookTable")
            .field("post_build", &self.post_build.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl HookTable {
    /// Reads the hook file from the tip of `branch`, if there is one.
    pub async fn load(git: &Git, branch: &str, registry: &HookRegistry) -> Result<Self> {
        let lines = match git.show(&format!("{}:{}", branch, HOOKS_FILE)).await {
            Ok(lines) => lines,
            Err(BootstrapError::Git(_)) => {
                log::debug!("No hooks found for {}", branch);
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        log::info!("Loading bootstrap hooks");
        let runner = CommandRunner::new(git.workdir());
        Self::parse(&lines.join("\n"), registry, runner).map_err(|source| BootstrapError::Hook {
            hook: HOOKS_FILE.to_string(),
            build_dir: None,
            source,
        })
    }

    fn parse(content: &str, registry: &HookRegistry, runner: CommandRunner) -> anyhow::Result<Self> {
        let file: HooksFile = toml::from_str(content)?;
        let post_build = match file.postbuild {
            None => None,
            Some(HookSpec::Command(argv)) => {
                Some(Arc::new(CommandHook::new(argv, runner)?) as Arc<dyn PostBuildHook>)
            }
            Some(HookSpec::Builtin(name)) => Some(
                registry
                    .get(&name)
                    .ok_or_else(|| anyhow::anyhow!("no builtin hook named '{}'", name))?,
            ),
        };
        Ok(Self { post_build })
    }
}
