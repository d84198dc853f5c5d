// src/core/preflight.rs

use crate::core::models::Tool;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::{error, info};

/// Whether one tool is installed, and how to install it if not.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: Option<PathBuf>,
    pub install_hint: String,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Package-manager command for installing `tool` on `os` (as in `std::env::consts::OS`).
pub fn install_hint(tool: Tool, os: &str) -> String {
    match os {
        "linux" => format!("sudo apt install {}", tool.binary()),
        "macos" => format!("brew install {}", tool.binary()),
        "windows" => format!("choco install {}", tool.binary()),
        _ => "Unknown platform".to_string(),
    }
}

/// Resolves every supported tool on `PATH`, logging the ones that are missing.
pub fn check_tools() -> Vec<ToolStatus> {
    Tool::iter()
        .map(|tool| {
            let path = which::which(tool.binary()).ok();
            let install_hint = install_hint(tool, std::env::consts::OS);
            match &path {
                Some(p) => info!(tool = %tool, path = %p.display(), "Tool found."),
                None => error!(tool = %tool, hint = %install_hint, "Tool not found."),
            }
            ToolStatus { tool, path, install_hint }
        })
        .collect()
}
