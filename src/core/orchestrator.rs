// src/core/orchestrator.rs

use crate::core::config::Config;
use crate::core::error::ScanError;
use crate::core::models::{ExecutionResult, ReportMap, Task, Tool};
use crate::core::planner::TaskPlanner;
use crate::core::report::write_report;
use crate::core::tools::ToolAdapter;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// FIFO of pending tasks. Tasks are consumed from the front and new ones are
/// only ever appended at the back, so everything pushed mid-run is processed
/// before the queue drains.
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, task: Task) {
        self.pending.push_back(task);
    }

    pub fn pop_front(&mut self) -> Option<Task> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FromIterator<Task> for TaskQueue {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self { pending: iter.into_iter().collect() }
    }
}

impl Extend<Task> for TaskQueue {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}

/// Whether nmap's text output mentions an open port with the given marker
/// (e.g. `"80/tcp"`).
///
/// This is plain substring matching over the whole output, not a parse of
/// nmap's port table, so both markers may come from different lines.
pub fn nmap_reports_open_port(output: &str, port_marker: &str) -> bool {
    output.contains("open") && output.contains(port_marker)
}

/// Follow-up tasks implied by an nmap result for `target`: directory
/// enumeration over HTTP when port 80 looks open, over HTTPS when 443 does.
pub fn follow_up_tasks(target: &str, nmap_output: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    if nmap_reports_open_port(nmap_output, "80/tcp") {
        tasks.push(Task::new(Tool::Gobuster, format!("http://{}", target)));
    }
    if nmap_reports_open_port(nmap_output, "443/tcp") {
        tasks.push(Task::new(Tool::Gobuster, format!("https://{}", target)));
    }
    tasks
}

/// Result of a completed run: the in-memory report plus where it was saved,
/// if saving succeeded.
#[derive(Debug)]
pub struct ScanRun {
    pub results: ReportMap,
    pub report_path: Option<PathBuf>,
}

/// Drives one target scan: plans the initial tasks, executes them strictly in
/// order, expands the queue from nmap results and persists the report.
pub struct Orchestrator<'a> {
    config: &'a Config,
    planner: &'a dyn TaskPlanner,
    adapter: &'a dyn ToolAdapter,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, planner: &'a dyn TaskPlanner, adapter: &'a dyn ToolAdapter) -> Self {
        Self { config, planner, adapter }
    }

    /// Scans `target` end to end.
    ///
    /// Fails only when the planner yields no tasks, in which case nothing is
    /// executed and no report is written. A report that cannot be saved is
    /// logged; the results are returned either way.
    pub async fn run_agent(&self, target: &str) -> Result<ScanRun, ScanError> {
        let tasks = self.planner.generate(target);
        if tasks.is_empty() {
            error!(target, "No tasks generated. The target might be out of scope.");
            return Err(ScanError::OutOfScope(target.to_string()));
        }

        let results = self.process_queue(target, tasks.into_iter().collect()).await;

        let report_path = match write_report(&self.config.reports_dir, &results) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(dir = %self.config.reports_dir.display(), error = %e, "Failed to save final report.");
                None
            }
        };

        Ok(ScanRun { results, report_path })
    }

    /// Drains `queue` front to back, appending follow-up tasks after every nmap
    /// result and recording each result under its task's tool name.
    pub async fn process_queue(&self, target: &str, mut queue: TaskQueue) -> ReportMap {
        let mut results = ReportMap::default();

        while let Some(task) = queue.pop_front() {
            let result = self.execute_task(&task).await;

            if task.tool() == Some(Tool::Nmap) {
                if let Some(output) = result.output() {
                    let follow_ups = follow_up_tasks(target, output);
                    for t in &follow_ups {
                        info!(tool = t.tool_name(), target = t.target(), "Queued follow-up task.");
                    }
                    queue.extend(follow_ups);
                }
            }

            debug!(tool = task.tool_name(), status = result.status_label(), pending = queue.len(), "Task recorded.");
            results.record(task.tool_name(), result);
        }

        results
    }

    /// Runs a single task through the adapter. Unknown tools are recorded as
    /// failures without launching anything.
    pub async fn execute_task(&self, task: &Task) -> ExecutionResult {
        info!(tool = task.tool_name(), target = task.target(), "Executing task.");
        match task.tool() {
            Some(tool) => self.adapter.execute(tool, task.target()).await,
            None => {
                error!(tool = task.tool_name(), "Unknown tool specified.");
                ExecutionResult::failed(format!("Unknown tool specified: {}", task.tool_name()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ScriptedAdapter;
    use tempfile::TempDir;

    struct FixedPlanner(Vec<Task>);

    impl TaskPlanner for FixedPlanner {
        fn generate(&self, _target: &str) -> Vec<Task> {
            self.0.clone()
        }
    }

    fn nmap_says(output: &'static str) -> ScriptedAdapter {
        ScriptedAdapter::new(move |tool, target| match tool {
            Tool::Nmap => ExecutionResult::success(output),
            _ => ExecutionResult::success(format!("{} on {}", tool, target)),
        })
    }

    #[test]
    fn queue_is_fifo_with_appends_at_back() {
        let mut queue: TaskQueue = vec![Task::new(Tool::Nmap, "a"), Task::new(Tool::Ffuf, "b")]
            .into_iter()
            .collect();
        queue.push_back(Task::new(Tool::Sqlmap, "c"));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop_front())
            .map(|t| t.target().to_string())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn follow_ups_depend_on_open_port_markers() {
        assert_eq!(
            follow_up_tasks("example.com", "80/tcp open http"),
            vec![Task::new(Tool::Gobuster, "http://example.com")]
        );
        assert_eq!(
            follow_up_tasks("example.com", "80/tcp open http\n443/tcp open https"),
            vec![
                Task::new(Tool::Gobuster, "http://example.com"),
                Task::new(Tool::Gobuster, "https://example.com"),
            ]
        );
        assert!(follow_up_tasks("example.com", "80/tcp filtered http").is_empty());
        assert!(follow_up_tasks("example.com", "22/tcp open ssh").is_empty());
    }

    #[tokio::test]
    async fn open_http_port_queues_gobuster_over_http() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(vec![Task::new(Tool::Nmap, "example.com")]);
        let adapter = nmap_says("80/tcp open http");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        assert!(run.results.get("nmap").is_some());
        assert!(run.results.get("gobuster").is_some());
        assert_eq!(
            adapter.calls(),
            vec![
                (Tool::Nmap, "example.com".to_string()),
                (Tool::Gobuster, "http://example.com".to_string()),
            ]
        );
        let path = run.report_path.expect("report should be saved");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn appended_tasks_run_after_initial_ones() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(vec![
            Task::new(Tool::Nmap, "example.com"),
            Task::new(Tool::Sqlmap, "example.com/?id=1"),
        ]);
        let adapter = nmap_says("80/tcp open http\n443/tcp open https");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        let called: Vec<(Tool, String)> = adapter.calls();
        assert_eq!(
            called,
            vec![
                (Tool::Nmap, "example.com".to_string()),
                (Tool::Sqlmap, "example.com/?id=1".to_string()),
                (Tool::Gobuster, "http://example.com".to_string()),
                (Tool::Gobuster, "https://example.com".to_string()),
            ]
        );
        assert_eq!(
            run.results.get("gobuster").and_then(ExecutionResult::output),
            Some("gobuster on https://example.com")
        );
        let keys: Vec<&str> = run.results.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["nmap", "sqlmap", "gobuster"]);
    }

    #[tokio::test]
    async fn failed_nmap_does_not_expand_queue() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(vec![Task::new(Tool::Nmap, "example.com")]);
        let adapter = ScriptedAdapter::new(|_, _| ExecutionResult::failed("80/tcp open but exit 1"));
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        assert_eq!(adapter.calls().len(), 1);
        assert_eq!(run.results.len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_recorded_as_failure_without_dispatch() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(vec![
            Task::from_raw("masscan", "example.com"),
            Task::new(Tool::Ffuf, "example.com"),
        ]);
        let adapter = nmap_says("");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        let failed = run.results.get("masscan").expect("unknown tool must be recorded");
        assert_eq!(failed.error(), Some("Unknown tool specified: masscan"));
        assert_eq!(adapter.calls(), vec![(Tool::Ffuf, "example.com".to_string())]);
    }

    #[tokio::test]
    async fn empty_plan_aborts_without_writing_a_report() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(Vec::new());
        let adapter = nmap_says("80/tcp open http");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let err = orchestrator.run_agent("outside.invalid").await.unwrap_err();

        assert!(matches!(err, ScanError::OutOfScope(_)));
        assert!(adapter.calls().is_empty());
        assert!(!config.reports_dir.exists());
    }

    #[tokio::test]
    async fn unwritable_reports_dir_still_returns_results() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::rooted_at(dir.path());
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        config.reports_dir = blocker.join("reports");
        let planner = FixedPlanner(vec![Task::new(Tool::Nmap, "example.com")]);
        let adapter = nmap_says("22/tcp open ssh");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        assert!(run.report_path.is_none());
        assert_eq!(run.results.get("nmap").and_then(ExecutionResult::output), Some("22/tcp open ssh"));
    }

    #[tokio::test]
    async fn duplicate_tasks_each_execute() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let planner = FixedPlanner(vec![
            Task::new(Tool::Ffuf, "a.example.com"),
            Task::new(Tool::Ffuf, "b.example.com"),
        ]);
        let adapter = nmap_says("");
        let orchestrator = Orchestrator::new(&config, &planner, &adapter);

        let run = orchestrator.run_agent("example.com").await.unwrap();

        assert_eq!(adapter.calls().len(), 2);
        assert_eq!(
            run.results.get("ffuf").and_then(ExecutionResult::output),
            Some("ffuf on b.example.com")
        );
    }
}
