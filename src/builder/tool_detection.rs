//! Build tool availability checking.

use crate::error::{BootstrapError, Result};
use std::path::PathBuf;

/// Resolves the packaging tool on `PATH` before any build is attempted.
pub fn locate_build_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            Err(BootstrapError::ToolNotFound {
                tool: tool.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_shell() {
        assert!(locate_build_tool("sh").is_ok());
    }

    #[test]
    fn reports_missing_tool() {
        let err = locate_build_tool("no-such-packaging-tool-xyz").unwrap_err();
        assert!(matches!(err, BootstrapError::ToolNotFound { ref tool } if tool == "no-such-packaging-tool-xyz"));
    }
}
