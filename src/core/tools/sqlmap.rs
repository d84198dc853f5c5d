// src/core/tools/sqlmap.rs

use crate::core::config::Config;
use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::{CommandExecutor, CommandLine};
use crate::core::url_check::{validate_sqlmap_url, ValidatedUrl};
use tracing::{error, info, warn};

/// Fixed, low-impact sqlmap options: non-interactive, random user agent,
/// level/risk 1, four threads and a 30 second request timeout.
const SQLMAP_OPTIONS: &[&str] = &[
    "--batch",
    "--random-agent",
    "--level",
    "1",
    "--risk",
    "1",
    "--threads",
    "4",
    "--timeout",
    "30",
];

/// Builds the sqlmap command. Without a query string there is nothing in the
/// URL to inject into, so sqlmap is told to probe HTML forms as well.
pub fn sqlmap_command(target: &ValidatedUrl) -> CommandLine {
    let command = CommandLine::new(Tool::Sqlmap.binary())
        .arg("-u")
        .arg(target.url.as_str())
        .args(SQLMAP_OPTIONS.iter().copied());

    if target.has_query { command } else { command.arg("--forms") }
}

/// Validates `target` and runs sqlmap against it.
///
/// An invalid target short-circuits to a `Failed` result and no process is
/// launched. A validation warning is logged and the run goes ahead.
pub async fn run_sqlmap<E>(executor: &E, config: &Config, target: &str) -> ExecutionResult
where
    E: CommandExecutor + ?Sized,
{
    let validated = match validate_sqlmap_url(target) {
        Ok(v) => v,
        Err(e) => {
            let message = format!("Cannot run SQLMap: {}", e);
            error!(target, error = %e, "SQLMap target rejected.");
            return ExecutionResult::failed(message);
        }
    };

    if let Some(warning) = &validated.warning {
        warn!(url = %validated.url, "{}", warning);
    }

    let command = sqlmap_command(&validated);
    info!(command = %command, "Running sqlmap.");
    executor.run(&command, config.max_retries).await
}
