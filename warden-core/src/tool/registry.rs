//! Tool registry for managing available tools.

use super::{Tool, ToolMetadata};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools.
///
/// The registry stores tool instances (not factories) since tools are
/// inherently stateless. Tools can be registered, retrieved by name,
/// and listed; [`catalog`](ToolRegistry::catalog) exposes their combined
/// metadata for model-facing prompts.
///
/// # Thread Safety
///
/// The registry stores tools as `Arc<dyn Tool>`, making them safely
/// shareable across threads. Once the composition root has finished
/// registering tools, the registry is read-only to the reasoning core.
///
/// # Example
///
/// ```no_run
/// use warden_core::tool::ToolRegistry;
///
/// let registry = ToolRegistry::new();
///
/// // Get a specific tool
/// if let Some(tool) = registry.get("read_file") {
///     println!("Found: {}", tool.description());
/// }
///
/// // List all tools
/// for name in registry.list() {
///     println!("Available: {}", name);
/// }
/// ```
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    /// Returns `&mut Self` for chaining.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
        self
    }

    /// Register a tool that's already wrapped in Arc.
    ///
    /// Useful when you have an `Arc<dyn Tool>` from elsewhere.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Get a tool by name.
    ///
    /// Returns `None` if no tool with the given name is registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all registered tool names, sorted alphabetically.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get metadata for every registered tool, sorted by tool name.
    ///
    /// This is the model-facing catalog: the selection prompt is built
    /// from these entries, so the model picks by meaning rather than by
    /// keyword matching against hardcoded names.
    pub fn catalog(&self) -> Vec<ToolMetadata> {
        let mut entries: Vec<ToolMetadata> =
            self.tools.values().map(|tool| tool.metadata()).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Get an iterator over all tools.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Tool>)> {
        self.tools.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Clone for ToolRegistry {
    fn clone(&self) -> Self {
        Self {
            tools: self.tools.clone(),
        }
    }
}
