//! WriteFile tool.

use crate::workspace::{filename_arg, Workspace};
use async_trait::async_trait;
use serde_json::{json, Value};
use warden_core::{Tool, ToolError, ToolResult};

/// Maximum content size for one write (1MB).
const MAX_WRITE_BYTES: usize = 1024 * 1024;

/// Write or append to a file in the workspace.
#[derive(Debug, Clone)]
pub struct WriteFile {
    workspace: Workspace,
}

impl WriteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in the workspace, creating it if needed. \
         Set append to true to add to the end instead of overwriting."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name of the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "Text content to write"
                },
                "append": {
                    "type": "boolean",
                    "description": "Append instead of overwrite (default false)"
                }
            },
            "required": ["filename", "content"]
        })
    }

    fn examples(&self) -> Vec<String> {
        vec!["write 'hello' to greeting.txt".to_string()]
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let filename = filename_arg(&input)?;
        let content = input
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("Missing 'content' field".into()))?;
        let append = input
            .get("append")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if content.len() > MAX_WRITE_BYTES {
            return Err(ToolError::InvalidInput(format!(
                "Content too large ({} bytes, max {} bytes)",
                content.len(),
                MAX_WRITE_BYTES
            )));
        }

        let path = self.workspace.resolve(filename)?;

        if append && path.exists() {
            let existing = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read file: {}", e)))?;
            let combined = format!("{}{}", existing, content);
            if combined.len() > MAX_WRITE_BYTES {
                return Err(ToolError::InvalidInput(format!(
                    "Appending would exceed the {} byte limit",
                    MAX_WRITE_BYTES
                )));
            }
            tokio::fs::write(&path, combined)
                .await
                .map_err(|e| ToolError::ExecutionFailed(format!("Failed to write file: {}", e)))?;
        } else {
            tokio::fs::write(&path, content)
                .await
                .map_err(|e| ToolError::ExecutionFailed(format!("Failed to write file: {}", e)))?;
        }

        Ok(ToolResult::with_metadata(
            format!(
                "{} {} bytes to {}",
                if append { "Appended" } else { "Wrote" },
                content.len(),
                filename
            ),
            json!({"filename": filename, "bytes": content.len(), "append": append}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = tempdir().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));

        let result = tool
            .execute(json!({"filename": "out.txt", "content": "hello"}))
            .await
            .unwrap();

        assert!(result.content.contains("Wrote 5 bytes"));
        let on_disk = tokio::fs::read_to_string(dir.path().join("out.txt"))
            .await
            .unwrap();
        assert_eq!(on_disk, "hello");
    }

    #[tokio::test]
    async fn test_write_overwrites_by_default() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("out.txt"), "old").await.unwrap();

        let tool = WriteFile::new(Workspace::new(dir.path()));
        tool.execute(json!({"filename": "out.txt", "content": "new"}))
            .await
            .unwrap();

        let on_disk = tokio::fs::read_to_string(dir.path().join("out.txt"))
            .await
            .unwrap();
        assert_eq!(on_disk, "new");
    }

    #[tokio::test]
    async fn test_write_append() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("log.txt"), "one\n").await.unwrap();

        let tool = WriteFile::new(Workspace::new(dir.path()));
        tool.execute(json!({"filename": "log.txt", "content": "two\n", "append": true}))
            .await
            .unwrap();

        let on_disk = tokio::fs::read_to_string(dir.path().join("log.txt"))
            .await
            .unwrap();
        assert_eq!(on_disk, "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_write_missing_content() {
        let dir = tempdir().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));
        let result = tool.execute(json!({"filename": "out.txt"})).await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_write_rejects_oversized_content() {
        let dir = tempdir().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));
        let big = "x".repeat(MAX_WRITE_BYTES + 1);
        let result = tool
            .execute(json!({"filename": "out.txt", "content": big}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_write_rejects_path_name() {
        let dir = tempdir().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));
        let result = tool
            .execute(json!({"filename": "sub/out.txt", "content": "x"}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }
}
