// src/core/runner.rs

use crate::core::config::Config;
use crate::core::models::ExecutionResult;
use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// An external command as a program plus its argument list.
///
/// Arguments are passed to the process verbatim; nothing goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The argument following `flag`, if `flag` is present.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs a command with bounded retries and folds every outcome into an
/// `ExecutionResult`.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Makes up to `max_retries` attempts (at least one). Returns the first
    /// successful attempt's stdout, or the last attempt's error text.
    async fn run(&self, command: &CommandLine, max_retries: u32) -> ExecutionResult;
}

/// Executes commands as child processes, each attempt bounded by a timeout.
///
/// Retries are immediate; there is no backoff between attempts.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.command_timeout)
    }

    async fn attempt(&self, command: &CommandLine) -> Result<String, String> {
        let mut cmd = Command::new(command.program());
        cmd
            .args(command.get_args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Err(_) => Err(format!(
                "Command timed out after {} seconds: {}",
                format_secs(self.timeout),
                command
            )),
            Ok(Err(e)) => Err(format!("Error executing command {}: {}", command, e)),
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                debug!(command = %command, status = %output.status, "Command exited unsuccessfully.");
                Err(format!("Command failed: {}", String::from_utf8_lossy(&output.stderr)))
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for ProcessRunner {
    async fn run(&self, command: &CommandLine, max_retries: u32) -> ExecutionResult {
        let attempts = max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            info!(command = %command, attempt, attempts, "Running command.");
            match self.attempt(command).await {
                Ok(stdout) => {
                    info!(command = %command, attempt, "Command succeeded.");
                    return ExecutionResult::success(stdout);
                }
                Err(message) => {
                    error!(command = %command, attempt, error = %message, "Command attempt failed.");
                    last_error = message;
                    if attempt < attempts {
                        info!(command = %command, "Retrying command ({}/{}).", attempt, attempts);
                    }
                }
            }
        }

        error!(command = %command, attempts, "Command failed after exhausting retries.");
        ExecutionResult::failed(last_error)
    }
}

fn format_secs(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        duration.as_secs().to_string()
    } else {
        format!("{:.3}", duration.as_secs_f64())
    }
}
