// src/core/error.rs

use std::io;

use thiserror::Error as ThisError;

/// Run-level failures. Per-task failures never surface here; they are folded
/// into `ExecutionResult::Failed` and recorded in the report.
#[derive(ThisError, Debug)]
pub enum ScanError {
    #[error("target {0:?} is out of scope or no valid tasks were generated")]
    OutOfScope(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Reasons a sqlmap target is rejected before any process is launched.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("Invalid URL format: missing host")]
    MissingHost,

    #[error("URL parsing error: {0}")]
    Parse(String),
}

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type Result<T> = core::result::Result<T, ScanError>;
