// src/core/tools/gobuster.rs

use crate::core::config::Config;
use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::{CommandExecutor, CommandLine};
use crate::core::tools::wordlist_for;
use std::path::Path;
use tracing::info;

const GOBUSTER_THREADS: u32 = 50;

/// Directory enumeration against `target` with the given wordlist.
pub fn gobuster_command(target: &str, wordlist: &Path) -> CommandLine {
    CommandLine::new(Tool::Gobuster.binary())
        .arg("dir")
        .arg("-u")
        .arg(target)
        .arg("-w")
        .arg(wordlist.display().to_string())
        .arg("-t")
        .arg(GOBUSTER_THREADS.to_string())
}

/// Runs gobuster in directory mode. The target is used as given apart from
/// collapsing a doubled `https://` prefix.
pub async fn run_gobuster<E>(executor: &E, config: &Config, target: &str) -> ExecutionResult
where
    E: CommandExecutor + ?Sized,
{
    let wordlist = match wordlist_for(Tool::Gobuster, config) {
        Ok(path) => path,
        Err(failed) => return failed,
    };

    let target = target.replace("https://https://", "https://");
    let command = gobuster_command(&target, &wordlist);
    info!(target = %target, command = %command, "Running gobuster.");
    executor.run(&command, config.max_retries).await
}
