// src/logging.rs

use crate::core::config::Config;
use color_eyre::eyre::{Result, WrapErr};
use lazy_static::lazy_static;
use std::fs::OpenOptions;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
}

/// Initializes the audit log plus a terse stderr stream.
///
/// Every record goes to `<logs_dir>/audit.log`, which is appended to across runs
/// and carries a timestamp, level and message per line. Warnings and errors are
/// also echoed to stderr.
pub fn initialize_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.logs_dir)
        .wrap_err_with(|| format!("cannot create log directory {}", config.logs_dir.display()))?;
    let log_path = config.log_file();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("cannot open audit log {}", log_path.display()))?;

    let file_log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.clone()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(file_log_level));

    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(stderr_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
