//! ReadFile tool.

use crate::workspace::{filename_arg, Workspace};
use async_trait::async_trait;
use serde_json::{json, Value};
use warden_core::{Tool, ToolError, ToolResult};

/// Maximum file size to read (1MB).
const MAX_READ_BYTES: u64 = 1024 * 1024;

/// Read a file from the workspace.
///
/// Enforces a size limit so one oversized file cannot blow up an
/// observation.
#[derive(Debug, Clone)]
pub struct ReadFile {
    workspace: Workspace,
}

impl ReadFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file in the workspace. Takes a bare file name, \
         not a path. Has a 1MB size limit."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name of the file to read"
                }
            },
            "required": ["filename"]
        })
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "read config.txt".to_string(),
            "what is in notes.md?".to_string(),
        ]
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let filename = filename_arg(&input)?;
        let path = self.workspace.resolve(filename)?;

        if !path.exists() {
            return Err(ToolError::NotFound(format!("File not found: {}", filename)));
        }
        if !path.is_file() {
            return Err(ToolError::InvalidInput(format!(
                "Not a regular file: {}",
                filename
            )));
        }

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to stat file: {}", e)))?;

        if metadata.len() > MAX_READ_BYTES {
            return Err(ToolError::InvalidInput(format!(
                "File too large ({} bytes, max {} bytes)",
                metadata.len(),
                MAX_READ_BYTES
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read file: {}", e)))?;

        Ok(ToolResult::with_metadata(
            content,
            json!({"filename": filename, "bytes": metadata.len()}),
        ))
    }
}
