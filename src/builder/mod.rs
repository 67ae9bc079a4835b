//! Package building and artifact harvesting.
//!
//! For one package and source branch the [`PackageBuilder`]:
//! 1. Computes the release tag glob for the branch
//! 2. Loads the optional hook file from the branch tip
//! 3. Runs the packaging tool once per tag into a scratch directory
//! 4. Runs the post-build hook, if any
//! 5. Harvests source rpms, binary rpms and upstream archives
//! 6. Removes the scratch directory
//!
//! A failed build aborts the run and leaves its scratch directory behind.
//!
//! # Module Organization
//!
//! - [`harvest`] - Copying artifacts into the output tree
//! - [`hooks`] - Post-build hook contract and hook file loading
//! - [`package`] - Main [`PackageBuilder`]
//! - [`tool_detection`] - Packaging tool lookup

pub mod harvest;
pub mod hooks;
mod package;
mod tool_detection;

pub use harvest::{HarvestSummary, ORIG_DIR, RPM_DIR, harvest_artifacts};
pub use hooks::{CommandHook, FnHook, HookContext, HookRegistry, HookTable, PostBuildHook};
pub use package::{DEFAULT_BUILD_TOOL, PackageBuilder};
pub use tool_detection::locate_build_tool;
