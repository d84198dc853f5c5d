// src/core/models.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// --- Tools & Tasks ---

/// The external reconnaissance tools the engine knows how to drive.
///
/// The string form (`"nmap"`, `"gobuster"`, ...) is both the binary name and the
/// key under which a tool's result is stored in the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tool {
    Nmap,
    Gobuster,
    Ffuf,
    Sqlmap,
}

impl Tool {
    /// Name of the executable looked up on `PATH`.
    pub fn binary(self) -> &'static str {
        self.into()
    }
}

/// One unit of work: run `tool` against `target`.
///
/// The tool is kept as the raw name it was requested under, so that tasks coming
/// from an external planner with an unrecognized tool can still be queued and
/// reported as failures instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    tool: String,
    target: String,
}

impl Task {
    pub fn new(tool: Tool, target: impl Into<String>) -> Self {
        Self { tool: tool.to_string(), target: target.into() }
    }

    /// Builds a task from an arbitrary tool name, recognized or not.
    pub fn from_raw(tool: impl Into<String>, target: impl Into<String>) -> Self {
        Self { tool: tool.into(), target: target.into() }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Resolves the tool name, `None` when it is not one of the known tools.
    pub fn tool(&self) -> Option<Tool> {
        self.tool.parse().ok()
    }
}

// --- Results ---

/// Outcome of running one task.
///
/// Serialized as `{"status": "success", "output": ...}` or
/// `{"status": "failed", "error": ...}`, which is the shape report consumers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionResult {
    Success { output: String },
    Failed { error: String },
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Success { output: output.into() }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failed { .. } => "failed",
        }
    }
}

// --- Report ---

/// Per-tool results of one run, keyed by the tool name each task was requested under.
///
/// Keys keep the position of their first insertion; recording the same tool again
/// replaces its value (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportMap {
    entries: IndexMap<String, ExecutionResult>,
}

impl ReportMap {
    pub fn record(&mut self, tool: impl Into<String>, result: ExecutionResult) {
        self.entries.insert(tool.into(), result);
    }

    pub fn get(&self, tool: &str) -> Option<&ExecutionResult> {
        self.entries.get(tool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExecutionResult)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// --- Scan Profiles ---

/// Which tools the initial task list contains for an in-scope target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanProfile {
    /// Port scan plus directory enumeration.
    #[default]
    Quick,
    /// Every supported tool.
    Full,
    Custom(Vec<Tool>),
}

impl ScanProfile {
    pub fn tools(&self) -> Vec<Tool> {
        match self {
            ScanProfile::Quick => vec![Tool::Nmap, Tool::Gobuster],
            ScanProfile::Full => vec![Tool::Nmap, Tool::Gobuster, Tool::Ffuf, Tool::Sqlmap],
            ScanProfile::Custom(tools) => tools.clone(),
        }
    }
}
