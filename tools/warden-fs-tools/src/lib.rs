//! # Warden FS Tools
//!
//! Workspace file tools for the warden agent: listing, reading, writing,
//! and deleting files inside a single workspace directory.
//!
//! These tools only apply local guards (bare file names, size caps); the
//! surrounding sandbox owns the real enforcement of traversal, size, and
//! rate limits and reports violations through [`warden_core::ToolError`].
//!
//! ## Example
//!
//! ```no_run
//! use warden_core::ToolRegistry;
//! use warden_fs_tools::{register_workspace_tools, Workspace};
//!
//! let workspace = Workspace::new("/path/to/workspace");
//! let mut registry = ToolRegistry::new();
//! register_workspace_tools(&mut registry, workspace);
//!
//! assert!(registry.contains("read_file"));
//! assert!(registry.contains("list_all"));
//! ```

mod delete;
mod list;
mod read;
mod workspace;
mod write;

pub use delete::DeleteFile;
pub use list::{ListAll, ListDirectories, ListFiles};
pub use read::ReadFile;
pub use workspace::Workspace;
pub use write::WriteFile;

use warden_core::ToolRegistry;

/// Register the full workspace tool set on a registry.
pub fn register_workspace_tools(registry: &mut ToolRegistry, workspace: Workspace) {
    registry
        .register(ListFiles::new(workspace.clone()))
        .register(ListDirectories::new(workspace.clone()))
        .register(ListAll::new(workspace.clone()))
        .register(ReadFile::new(workspace.clone()))
        .register(WriteFile::new(workspace.clone()))
        .register(DeleteFile::new(workspace));
}
