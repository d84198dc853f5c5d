// src/core/testing.rs

//! Test doubles shared by the adapter and orchestrator tests.

use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::{CommandExecutor, CommandLine};
use crate::core::tools::ToolAdapter;
use async_trait::async_trait;
use std::sync::Mutex;

type Script = Box<dyn Fn(&CommandLine) -> ExecutionResult + Send + Sync>;

/// A `CommandExecutor` that never spawns anything: it records each command and
/// answers with a scripted result.
pub struct RecordingExecutor {
    script: Script,
    calls: Mutex<Vec<(CommandLine, u32)>>,
}

impl RecordingExecutor {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&CommandLine) -> ExecutionResult + Send + Sync + 'static,
    {
        Self { script: Box::new(script), calls: Mutex::new(Vec::new()) }
    }

    pub fn succeeding(output: &str) -> Self {
        let output = output.to_string();
        Self::new(move |_| ExecutionResult::success(output.clone()))
    }

    pub fn calls(&self) -> Vec<(CommandLine, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn run(&self, command: &CommandLine, max_retries: u32) -> ExecutionResult {
        self.calls.lock().unwrap().push((command.clone(), max_retries));
        (self.script)(command)
    }
}

/// A `ToolAdapter` answering from a script keyed on tool and target.
pub struct ScriptedAdapter {
    script: Box<dyn Fn(Tool, &str) -> ExecutionResult + Send + Sync>,
    calls: Mutex<Vec<(Tool, String)>>,
}

impl ScriptedAdapter {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(Tool, &str) -> ExecutionResult + Send + Sync + 'static,
    {
        Self { script: Box::new(script), calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<(Tool, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolAdapter for ScriptedAdapter {
    async fn execute(&self, tool: Tool, target: &str) -> ExecutionResult {
        self.calls.lock().unwrap().push((tool, target.to_string()));
        (self.script)(tool, target)
    }
}
