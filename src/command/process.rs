//! Command runner backed by `tokio::process`

use super::traits::{CommandLine, CommandOutput, CommandRunner};
use crate::metrics::{LatencyEvent, MetricsSink, TracingMetrics};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

/// Runs commands as child processes, without a shell
///
/// The run of each command is timed under its metric tag.
///
/// # Examples
///
/// ```no_run
/// use package_fetch::command::ProcessCommandRunner;
///
/// // Fail early when the downloader is not installed
/// let aria2c = ProcessCommandRunner::from_path("aria2c")
///     .expect("aria2c not found in PATH");
/// ```
#[derive(Clone)]
pub struct ProcessCommandRunner {
    metrics: Arc<dyn MetricsSink>,
}

impl Default for ProcessCommandRunner {
    fn default() -> Self {
        Self::new(Arc::new(TracingMetrics))
    }
}

impl ProcessCommandRunner {
    /// Create a runner reporting latency to `metrics`
    pub fn new(metrics: Arc<dyn MetricsSink>) -> Self {
        Self { metrics }
    }

    /// Resolve `program` on `PATH`
    ///
    /// Uses the `which` crate; returns the absolute path to use as
    /// [`crate::config::FetchConfig::downloader_executable`], or `None` when
    /// the program is not installed.
    pub fn from_path(program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        command: &CommandLine,
        metric_tag: &'static str,
    ) -> crate::Result<CommandOutput> {
        tracing::debug!(command = %command, metric = metric_tag, "running external command");

        let _latency = LatencyEvent::start(self.metrics.clone(), metric_tag);
        let output = Command::new(&command.program)
            .args(&command.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                tracing::error!(command = %command, error = %e, "failed to execute command");
                e
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
