// src/core/tools/mod.rs

// One adapter per external tool. Each builds the tool's argument list, runs it
// through a `CommandExecutor` and post-processes the result.
pub mod ffuf;
pub mod gobuster;
pub mod nmap;
pub mod sqlmap;
pub mod wordlist;

use crate::core::config::Config;
use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::CommandExecutor;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::error;

use self::ffuf::run_ffuf;
use self::gobuster::run_gobuster;
use self::nmap::run_nmap;
use self::sqlmap::run_sqlmap;

/// Dispatch seam between the orchestrator and the per-tool adapters.
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    async fn execute(&self, tool: Tool, target: &str) -> ExecutionResult;
}

/// The production adapter set: routes each tool to its adapter function and
/// shares one executor and configuration between them.
pub struct ToolKit<'a, E> {
    executor: E,
    config: &'a Config,
}

impl<'a, E: CommandExecutor> ToolKit<'a, E> {
    pub fn new(executor: E, config: &'a Config) -> Self {
        Self { executor, config }
    }
}

#[async_trait]
impl<'a, E: CommandExecutor> ToolAdapter for ToolKit<'a, E> {
    async fn execute(&self, tool: Tool, target: &str) -> ExecutionResult {
        match tool {
            Tool::Nmap => run_nmap(&self.executor, self.config, target).await,
            Tool::Gobuster => run_gobuster(&self.executor, self.config, target).await,
            Tool::Ffuf => run_ffuf(&self.executor, self.config, target).await,
            Tool::Sqlmap => run_sqlmap(&self.executor, self.config, target).await,
        }
    }
}

/// Provisions the wordlist for `tool`, mapping a failure to a `Failed` result
/// so the caller can return it without launching anything.
pub(crate) fn wordlist_for(tool: Tool, config: &Config) -> Result<PathBuf, ExecutionResult> {
    wordlist::ensure_wordlist(&config.wordlist_path).map_err(|e| {
        let message = format!(
            "Cannot run {}: wordlist {} is unavailable: {}",
            tool,
            config.wordlist_path.display(),
            e
        );
        error!(tool = %tool, error = %e, "Wordlist provisioning failed.");
        ExecutionResult::failed(message)
    })
}
