// src/core/config.rs

//! Process-wide settings, built once at startup and handed to every component
//! that needs them. Nothing in the engine reads the environment on its own.

use crate::core::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

const DEFAULT_WORDLIST: &str = "/usr/share/wordlists/dirb/common.txt";
const DEFAULT_ALLOWED_DOMAINS: &str = "google.com,yahoo.com,example.com";
const DEFAULT_ALLOWED_NETWORKS: &str = "192.168.0.0/24,10.0.0.0/24";
const AUDIT_LOG_FILE: &str = "audit.log";

#[derive(Debug, Clone)]
pub struct Config {
    /// Total attempts the command runner makes per command.
    pub max_retries: u32,
    /// Upper bound on a single command attempt.
    pub command_timeout: Duration,
    pub logs_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub wordlist_path: PathBuf,
    /// Where adapters drop temporary tool output (ffuf's JSON file).
    pub scratch_dir: PathBuf,
    pub allowed_domains: Vec<String>,
    /// CIDR blocks (or bare addresses) that count as in scope.
    pub allowed_networks: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = get_data_dir();
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            logs_dir: data_dir.join("logs"),
            reports_dir: data_dir.join("reports"),
            wordlist_path: PathBuf::from(DEFAULT_WORDLIST),
            scratch_dir: std::env::temp_dir(),
            allowed_domains: split_list(DEFAULT_ALLOWED_DOMAINS),
            allowed_networks: split_list(DEFAULT_ALLOWED_NETWORKS),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for every key the lookup does not answer.
    ///
    /// Recognized keys: `MAX_RETRIES`, `COMMAND_TIMEOUT_SECS`, `RECON_AGENT_LOGS_DIR`,
    /// `RECON_AGENT_REPORTS_DIR`, `RECON_AGENT_WORDLIST`, `RECON_AGENT_SCRATCH_DIR`,
    /// `TARGET_DOMAINS` and `TARGET_IPS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("MAX_RETRIES") {
            config.max_retries = parse_number("MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("COMMAND_TIMEOUT_SECS") {
            config.command_timeout = Duration::from_secs(parse_number("COMMAND_TIMEOUT_SECS", &value)?);
        }
        if let Some(dir) = lookup("RECON_AGENT_LOGS_DIR") {
            config.logs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("RECON_AGENT_REPORTS_DIR") {
            config.reports_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("RECON_AGENT_WORDLIST") {
            config.wordlist_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("RECON_AGENT_SCRATCH_DIR") {
            config.scratch_dir = PathBuf::from(dir);
        }
        if let Some(domains) = lookup("TARGET_DOMAINS") {
            config.allowed_domains = split_list(&domains);
        }
        if let Some(networks) = lookup("TARGET_IPS") {
            config.allowed_networks = split_list(&networks);
        }

        Ok(config)
    }

    /// A configuration rooted entirely under `base`, used for sandboxed runs.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            logs_dir: base.join("logs"),
            reports_dir: base.join("reports"),
            wordlist_path: base.join("wordlists").join("common.txt"),
            scratch_dir: base.join("tmp"),
            ..Config::default()
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join(AUDIT_LOG_FILE)
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "recon-agent", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
        expected: "a non-negative integer",
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
