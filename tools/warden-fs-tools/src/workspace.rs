//! The workspace directory shared by all file tools.

use std::path::{Path, PathBuf};
use warden_core::ToolError;

/// A single workspace directory that all file tools operate within.
///
/// File arguments are bare names, never paths: anything containing a
/// separator or a `..` component is rejected before touching the
/// filesystem.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a bare file name to a path inside the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] for empty names, names with
    /// path separators, and names containing `..`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ToolError> {
        if name.trim().is_empty() {
            return Err(ToolError::InvalidInput("File name cannot be empty".into()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ToolError::InvalidInput(format!(
                "File name must not contain path separators: {}",
                name
            )));
        }
        if name.contains("..") {
            return Err(ToolError::InvalidInput(format!(
                "File name must not contain '..': {}",
                name
            )));
        }
        Ok(self.root.join(name))
    }
}

/// Pull the `filename` argument out of a tool input object.
pub(crate) fn filename_arg(input: &serde_json::Value) -> Result<&str, ToolError> {
    input
        .get("filename")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidInput("Missing 'filename' field".into()))
}
