//! Example: the full supervised pipeline over a scratch workspace.
//!
//! This example runs a handful of queries through moderation and the
//! reasoning loop with no model provider attached, so every stage takes
//! its deterministic path and the run is fully reproducible offline.
//!
//! # Running
//!
//! ```bash
//! cargo run -p warden-agent --example supervised_agent
//! ```

use std::sync::Arc;
use tempfile::TempDir;
use warden_agent::SecureAgent;
use warden_core::ToolRegistry;
use warden_fs_tools::{register_workspace_tools, Workspace};
use warden_react::{ReactConfig, ReactLoop};
use warden_supervisor::{RequestSupervisor, SupervisorConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging to see moderation and loop decisions
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Supervised Agent Example ===\n");

    // 1. A scratch workspace with a few files
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("config.txt"), "debug=false\nworkers=4")?;
    std::fs::write(dir.path().join("notes.md"), "# Notes\nremember the milk")?;
    std::fs::create_dir(dir.path().join("src"))?;

    let mut registry = ToolRegistry::new();
    register_workspace_tools(&mut registry, Workspace::new(dir.path()));
    println!("Workspace: {} ({} tools)\n", dir.path().display(), registry.len());

    // 2. Wire the agent from its parts; attach a ModelProvider here to
    //    enable translation and semantic tool selection
    let agent = SecureAgent::new(
        RequestSupervisor::new(SupervisorConfig::default())?,
        ReactLoop::new(ReactConfig::default())?,
        Arc::new(registry),
    );

    // 3. Run a mix of allowed, bilingual, and blocked queries
    let queries = [
        "list directories",
        "mostra cartelle",
        "read config.txt",
        "write 'buy flowers' to reminders.txt",
        "rm -rf /",
    ];

    for (index, query) in queries.iter().enumerate() {
        println!("--- Query: {:?} ---", query);

        let reply = agent.process(query, &format!("demo-{}", index)).await;
        println!("  decision: {:?}", reply.moderation.decision);
        if !reply.moderation.risk_factors.is_empty() {
            println!("  risk factors: {:?}", reply.moderation.risk_factors);
        }

        match reply.result {
            Some(result) => {
                println!("  tools used: {:?}", result.tools_used);
                println!("  steps: {}", result.reasoning_steps.len());
                println!("  response: {}\n", result.response.replace('\n', " | "));
            }
            None => println!("  blocked before the loop: {}\n", reply.moderation.reason),
        }
    }

    Ok(())
}
