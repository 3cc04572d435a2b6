//! Listing tools: files, directories, or both.

use crate::workspace::Workspace;
use async_trait::async_trait;
use serde_json::{json, Value};
use warden_core::{Tool, ToolError, ToolResult};

/// What a listing tool includes in its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Files,
    Directories,
    All,
}

async fn list_entries(workspace: &Workspace, kind: ListKind) -> Result<ToolResult, ToolError> {
    let mut dir = tokio::fs::read_dir(workspace.root())
        .await
        .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read workspace: {}", e)))?;

    let mut files = Vec::new();
    let mut directories = Vec::new();

    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read entry: {}", e)))?
    {
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to stat {}: {}", name, e)))?;

        if file_type.is_dir() {
            directories.push(format!("{}/", name));
        } else {
            files.push(name);
        }
    }

    files.sort();
    directories.sort();

    let (mut entries, empty_message) = match kind {
        ListKind::Files => (files, "No files found in the workspace"),
        ListKind::Directories => (directories, "No directories found in the workspace"),
        ListKind::All => {
            let mut all = directories;
            all.extend(files);
            (all, "The workspace is empty")
        }
    };

    if entries.is_empty() {
        return Ok(ToolResult::new(empty_message));
    }

    entries.sort();
    let count = entries.len();
    Ok(ToolResult::with_metadata(
        entries.join("\n"),
        json!({"count": count}),
    ))
}

fn empty_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

/// List regular files in the workspace.
#[derive(Debug, Clone)]
pub struct ListFiles {
    workspace: Workspace,
}

impl ListFiles {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListFiles {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files in the workspace, one name per line. Directories are not included."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "list files".to_string(),
            "what files are in the workspace?".to_string(),
        ]
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult, ToolError> {
        list_entries(&self.workspace, ListKind::Files).await
    }
}

/// List directories in the workspace.
#[derive(Debug, Clone)]
pub struct ListDirectories {
    workspace: Workspace,
}

impl ListDirectories {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListDirectories {
    fn name(&self) -> &str {
        "list_directories"
    }

    fn description(&self) -> &str {
        "List the directories in the workspace, one name per line. Files are not included."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "list directories".to_string(),
            "show folders".to_string(),
        ]
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult, ToolError> {
        list_entries(&self.workspace, ListKind::Directories).await
    }
}

/// List both files and directories in the workspace.
#[derive(Debug, Clone)]
pub struct ListAll {
    workspace: Workspace,
}

impl ListAll {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListAll {
    fn name(&self) -> &str {
        "list_all"
    }

    fn description(&self) -> &str {
        "List everything in the workspace: files and directories. \
         Directory names end with a slash."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "list all files and directories".to_string(),
            "show everything in the workspace".to_string(),
        ]
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult, ToolError> {
        list_entries(&self.workspace, ListKind::All).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn populated_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.txt"), "b").await.unwrap();
        tokio::fs::write(dir.path().join("a.txt"), "a").await.unwrap();
        tokio::fs::create_dir(dir.path().join("docs")).await.unwrap();
        let workspace = Workspace::new(dir.path());
        (dir, workspace)
    }

    #[tokio::test]
    async fn test_list_files_sorted_without_dirs() {
        let (_dir, workspace) = populated_workspace().await;
        let result = ListFiles::new(workspace).execute(json!({})).await.unwrap();
        assert_eq!(result.content, "a.txt\nb.txt");
        assert_eq!(result.metadata["count"], 2);
    }

    #[tokio::test]
    async fn test_list_directories_only() {
        let (_dir, workspace) = populated_workspace().await;
        let result = ListDirectories::new(workspace)
            .execute(json!({}))
            .await
            .unwrap();
        assert_eq!(result.content, "docs/");
    }

    #[tokio::test]
    async fn test_list_all_marks_directories() {
        let (_dir, workspace) = populated_workspace().await;
        let result = ListAll::new(workspace).execute(json!({})).await.unwrap();
        assert!(result.content.contains("docs/"));
        assert!(result.content.contains("a.txt"));
        assert_eq!(result.metadata["count"], 3);
    }

    #[tokio::test]
    async fn test_list_empty_workspace() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new(dir.path());

        let files = ListFiles::new(workspace.clone())
            .execute(json!({}))
            .await
            .unwrap();
        assert!(files.content.contains("No files"));

        let all = ListAll::new(workspace).execute(json!({})).await.unwrap();
        assert!(all.content.contains("empty"));
    }

    #[tokio::test]
    async fn test_list_missing_workspace_fails() {
        let workspace = Workspace::new("/definitely/not/a/real/workspace");
        let result = ListFiles::new(workspace).execute(json!({})).await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed(_))));
    }
}
