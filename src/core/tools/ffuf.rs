// src/core/tools/ffuf.rs

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::models::{ExecutionResult, Tool};
use crate::core::runner::{CommandExecutor, CommandLine};
use crate::core::tools::wordlist_for;
use crate::core::url_check::{collapse_doubled_scheme, ensure_scheme};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Output text when ffuf wrote a report without any matches.
pub const NO_RESULTS: &str = "No results found";

const MATCH_CODES: &str = "200,301,302,403";
const FFUF_THREADS: u32 = 40;
const REQUEST_TIMEOUT_SECS: u32 = 10;
const RECURSION_DEPTH: u32 = 2;
const ENTRY_SEPARATOR_WIDTH: usize = 40;

/// The subset of ffuf's JSON report this adapter reads.
#[derive(Debug, Deserialize)]
struct FfufReport {
    #[serde(default)]
    results: Vec<FfufEntry>,
}

#[derive(Debug, Deserialize)]
struct FfufEntry {
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    length: Option<Value>,
    #[serde(default)]
    words: Option<Value>,
    #[serde(default)]
    lines: Option<Value>,
}

/// Normalizes a fuzzing base URL: defaults to `https://`, collapses doubled
/// schemes and guarantees a trailing `/` so `FUZZ` can be appended.
pub fn normalize_ffuf_target(raw: &str) -> String {
    let mut target = collapse_doubled_scheme(&ensure_scheme(raw, "https"));
    if !target.ends_with('/') {
        target.push('/');
    }
    target
}

pub fn ffuf_command(target: &str, wordlist: &Path, output_file: &Path) -> CommandLine {
    CommandLine::new(Tool::Ffuf.binary())
        .arg("-u")
        .arg(format!("{}FUZZ", target))
        .arg("-w")
        .arg(wordlist.display().to_string())
        .arg("-mc")
        .arg(MATCH_CODES)
        .args(["-c", "-v", "-r"])
        .arg("-t")
        .arg(FFUF_THREADS.to_string())
        .arg("-timeout")
        .arg(REQUEST_TIMEOUT_SECS.to_string())
        .arg("-o")
        .arg(output_file.display().to_string())
        .args(["-of", "json", "-recursion"])
        .arg("-recursion-depth")
        .arg(RECURSION_DEPTH.to_string())
}

/// Runs ffuf against `target` and replaces its console output with a readable
/// listing of the matches from its JSON report.
///
/// The JSON report goes to a uniquely named file in the scratch directory, which
/// is removed once the run is over whatever happened. If the report cannot be
/// read or parsed, the raw command output is kept.
pub async fn run_ffuf<E>(executor: &E, config: &Config, target: &str) -> ExecutionResult
where
    E: CommandExecutor + ?Sized,
{
    let wordlist = match wordlist_for(Tool::Ffuf, config) {
        Ok(path) => path,
        Err(failed) => return failed,
    };

    if let Err(e) = fs::create_dir_all(&config.scratch_dir) {
        error!(dir = %config.scratch_dir.display(), error = %e, "Cannot create scratch directory.");
        return ExecutionResult::failed(format!(
            "Cannot run ffuf: scratch directory {} is unavailable: {}",
            config.scratch_dir.display(),
            e
        ));
    }

    let target = normalize_ffuf_target(target);
    let output_file = scratch_file(&config.scratch_dir);
    let command = ffuf_command(&target, &wordlist, &output_file);
    info!(target = %target, command = %command, "Running ffuf.");

    let result = match executor.run(&command, config.max_retries).await {
        ExecutionResult::Success { output } if output_file.exists() => {
            match read_ffuf_report(&output_file) {
                Ok(formatted) => ExecutionResult::success(formatted),
                Err(e) => {
                    error!(file = %output_file.display(), error = %e, "Error processing ffuf output.");
                    ExecutionResult::success(output)
                }
            }
        }
        other => other,
    };

    remove_scratch_file(&output_file);
    debug!(output = result.output().unwrap_or_default(), "ffuf finished.");
    result
}

fn scratch_file(dir: &Path) -> PathBuf {
    dir.join(format!("ffuf_output_{}.json", Uuid::new_v4().simple()))
}

fn remove_scratch_file(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!(file = %path.display(), error = %e, "Could not remove ffuf output file.");
    }
}

fn read_ffuf_report(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    let report: FfufReport = serde_json::from_str(&text)?;
    Ok(format_ffuf_results(&report))
}

fn format_ffuf_results(report: &FfufReport) -> String {
    if report.results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let separator = "-".repeat(ENTRY_SEPARATOR_WIDTH);
    report
        .results
        .iter()
        .map(|entry| {
            format!(
                "Found: {}\nStatus: {}\nLength: {}\nWords: {}\nLines: {}\n{}",
                field(&entry.url),
                field(&entry.status),
                field(&entry.length),
                field(&entry.words),
                field(&entry.lines),
                separator
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn field(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
