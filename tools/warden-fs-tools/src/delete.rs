//! DeleteFile tool.

use crate::workspace::{filename_arg, Workspace};
use async_trait::async_trait;
use serde_json::{json, Value};
use warden_core::{Tool, ToolError, ToolResult};

/// Delete a file from the workspace.
///
/// Only regular files can be deleted; directories are refused.
#[derive(Debug, Clone)]
pub struct DeleteFile {
    workspace: Workspace,
}

impl DeleteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for DeleteFile {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file from the workspace. Takes a bare file name; directories \
         cannot be deleted."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name of the file to delete"
                }
            },
            "required": ["filename"]
        })
    }

    fn examples(&self) -> Vec<String> {
        vec!["delete old_report.csv".to_string()]
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

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to delete file: {}", e)))?;

        Ok(ToolResult::with_metadata(
            format!("Deleted {}", filename),
            json!({"filename": filename}),
        ))
    }
}
