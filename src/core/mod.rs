// src/core/mod.rs

// The task orchestration engine. `orchestrator` owns the run; everything else
// is a building block it drives.

/// Tools, tasks, execution results and the per-run report map.
pub mod models;

pub mod config;
pub mod error;

/// Subprocess execution with timeout and bounded retries.
pub mod runner;

/// Per-tool command construction and output post-processing.
pub mod tools;

pub mod url_check;
pub mod planner;
pub mod orchestrator;
pub mod report;
pub mod preflight;

#[cfg(test)]
pub(crate) mod testing;
