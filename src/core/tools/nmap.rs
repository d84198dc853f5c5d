// src/core/tools/nmap.rs

use crate::core::config::Config;
use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::{CommandExecutor, CommandLine};
use tracing::info;

/// `nmap -Pn <target>`: skip host discovery and scan the default ports.
pub fn nmap_command(target: &str) -> CommandLine {
    CommandLine::new(Tool::Nmap.binary()).arg("-Pn").arg(target)
}

/// Runs a port scan against `target`. The output is returned verbatim.
pub async fn run_nmap<E>(executor: &E, config: &Config, target: &str) -> ExecutionResult
where
    E: CommandExecutor + ?Sized,
{
    let command = nmap_command(target);
    info!(target, command = %command, "Starting nmap scan.");
    executor.run(&command, config.max_retries).await
}
