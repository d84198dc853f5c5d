// src/main.rs

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use std::process::ExitCode;

mod core;
mod logging;

use crate::core::config::Config;
use crate::core::error::ScanError;
use crate::core::models::{ScanProfile, Tool};
use crate::core::orchestrator::Orchestrator;
use crate::core::planner::{ScopePolicy, ScopedPlanner};
use crate::core::runner::ProcessRunner;
use crate::core::tools::ToolKit;

#[derive(Parser)]
#[command(name = "recon-agent", version)]
#[command(about = "Chain nmap, gobuster, ffuf and sqlmap against a single authorized target")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one target and save a JSON report
    Scan {
        /// Domain, IP address or URL to scan
        target: String,

        /// Which tools make up the initial task list
        #[arg(long, value_enum, default_value_t = ProfileArg::Quick)]
        profile: ProfileArg,

        /// Explicit comma-separated tool list, overrides --profile
        #[arg(long, value_delimiter = ',')]
        tools: Vec<Tool>,

        /// Attempts per command, overrides MAX_RETRIES
        #[arg(long)]
        retries: Option<u32>,
    },
    /// List saved reports, newest first
    Reports,
    /// Check that the external tools are installed
    Doctor,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    /// nmap and gobuster
    Quick,
    /// every supported tool
    Full,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = Config::from_env().wrap_err("failed to read configuration")?;
    logging::initialize_logging(&config)?;

    match cli.command {
        Commands::Scan { target, profile, tools, retries } => {
            if let Some(retries) = retries {
                config.max_retries = retries;
            }
            let profile = if tools.is_empty() {
                match profile {
                    ProfileArg::Quick => ScanProfile::Quick,
                    ProfileArg::Full => ScanProfile::Full,
                }
            } else {
                ScanProfile::Custom(tools)
            };
            run_scan(&config, &target, profile).await
        }
        Commands::Reports => list_reports(&config),
        Commands::Doctor => Ok(doctor()),
    }
}

async fn run_scan(config: &Config, target: &str, profile: ScanProfile) -> Result<ExitCode> {
    let planner = ScopedPlanner::new(ScopePolicy::from_config(config), profile);
    let adapter = ToolKit::new(ProcessRunner::from_config(config), config);
    let orchestrator = Orchestrator::new(config, &planner, &adapter);

    println!("Starting scan on: {}", target);
    let run = match orchestrator.run_agent(target).await {
        Ok(run) => run,
        Err(ScanError::OutOfScope(_)) => {
            eprintln!("Target is out of scope or no valid tasks were generated: {}", target);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).wrap_err("scan aborted"),
    };

    for (tool, result) in run.results.iter() {
        println!("  {:<10} {}", tool, result.status_label());
    }
    match &run.report_path {
        Some(path) => println!("Scan completed. Report saved to {}", path.display()),
        None => println!("Scan completed, but the report could not be saved. See the audit log."),
    }
    Ok(ExitCode::SUCCESS)
}

fn list_reports(config: &Config) -> Result<ExitCode> {
    let reports = crate::core::report::list_reports(&config.reports_dir)
        .wrap_err_with(|| format!("cannot read {}", config.reports_dir.display()))?;

    if reports.is_empty() {
        println!("No reports in {}", config.reports_dir.display());
        return Ok(ExitCode::SUCCESS);
    }
    for report in reports {
        let tools = match crate::core::report::load_report(&report.path) {
            Ok(map) => map.iter().map(|(k, r)| format!("{}:{}", k, r.status_label())).collect::<Vec<_>>().join(" "),
            Err(e) => format!("unreadable ({})", e),
        };
        println!("{}  {}  {}", report.timestamp.format("%Y-%m-%d %H:%M:%S"), report.file_name, tools);
    }
    Ok(ExitCode::SUCCESS)
}

fn doctor() -> ExitCode {
    let statuses = crate::core::preflight::check_tools();
    for status in &statuses {
        match &status.path {
            Some(path) => println!("  ok       {:<10} {}", status.tool, path.display()),
            None => println!("  missing  {:<10} install with: {}", status.tool, status.install_hint),
        }
    }
    if statuses.iter().all(|s| s.is_available()) { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
