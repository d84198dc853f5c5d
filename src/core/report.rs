// src/core/report.rs

use crate::core::error::Result;
use crate::core::models::ReportMap;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const REPORT_PREFIX: &str = "final_report_";
const REPORT_EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A persisted report found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub file_name: String,
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
}

/// `final_report_<YYYYMMDD_HHMMSS>.json` for the given moment.
pub fn report_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}{}", REPORT_PREFIX, at.format(TIMESTAMP_FORMAT), REPORT_EXTENSION)
}

/// Writes `results` as pretty JSON into `dir` (created if missing) under a
/// timestamped name and returns the path written.
pub fn write_report(dir: &Path, results: &ReportMap) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&Local::now()));
    let json = serde_json::to_string_pretty(results)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), tools = results.len(), "Final report saved.");
    Ok(path)
}

pub fn load_report(path: &Path) -> Result<ReportMap> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Lists the reports in `dir`, newest first. A missing directory has no reports;
/// files whose names do not carry a valid timestamp are skipped.
pub fn list_reports(dir: &Path) -> Result<Vec<ReportEntry>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reports = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(stamp) = file_name
            .strip_prefix(REPORT_PREFIX)
            .and_then(|rest| rest.strip_suffix(REPORT_EXTENSION))
        else {
            continue;
        };

        match NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
            Ok(timestamp) => reports.push(ReportEntry {
                path: entry.path(),
                file_name,
                timestamp,
            }),
            Err(e) => warn!(file = %file_name, error = %e, "Skipping report with unparseable timestamp."),
        }
    }

    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(reports)
}
