//! Run orchestration.
//!
//! A run goes through these phases:
//!
//! 1. Remember the checked out branch (or commit)
//! 2. Optionally update the srcdata branches from the remote
//! 3. Record the export branches in the manifest and build the release tags
//! 4. Write the manifest and merge the harvested output into the working tree
//! 5. Remove the temporary output directory and restore the original ref
//!
//! Step 5 always runs, also after a failure in 2-4.

mod guard;
mod orchestrator;

pub use guard::OriginalRef;
pub use orchestrator::{Bootstrap, RunReport};
