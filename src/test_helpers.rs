//! Shared test doubles for the collaborator traits.

use crate::auth::TokenProvider;
use crate::command::{CommandLine, CommandOutput, CommandRunner};
use crate::config::{FetchConfig, RetryConfig};
use crate::metrics::MetricsSink;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Token provider that records the resources it was asked for.
pub(crate) struct RecordingTokenProvider {
    token: Option<String>,
    pub(crate) requests: Mutex<Vec<String>>,
}

impl RecordingTokenProvider {
    pub(crate) fn returning(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            token: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenProvider for RecordingTokenProvider {
    async fn get_token(&self, resource_url: &str) -> crate::Result<String> {
        self.requests.lock().unwrap().push(resource_url.to_string());
        self.token
            .clone()
            .ok_or_else(|| crate::Error::TokenProvider("identity endpoint unavailable".into()))
    }
}

/// Command runner that records invocations and optionally writes the output file.
pub(crate) struct RecordingCommandRunner {
    output: CommandOutput,
    /// Bytes written to `-d`/`-o` on success, imitating the real downloader
    payload: Option<Vec<u8>>,
    pub(crate) invocations: Mutex<Vec<(CommandLine, &'static str)>>,
}

impl RecordingCommandRunner {
    pub(crate) fn succeeding(payload: &[u8]) -> Self {
        Self {
            output: CommandOutput {
                stdout: "Download complete".to_string(),
                stderr: String::new(),
                exit_code: Some(0),
            },
            payload: Some(payload.to_vec()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn exiting_with(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            output: CommandOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code: Some(code),
            },
            payload: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[async_trait]
impl CommandRunner for RecordingCommandRunner {
    async fn run(
        &self,
        command: &CommandLine,
        metric_tag: &'static str,
    ) -> crate::Result<CommandOutput> {
        self.invocations
            .lock()
            .unwrap()
            .push((command.clone(), metric_tag));

        if let Some(payload) = &self.payload
            && let (Some(dir), Some(file)) = (
                flag_value(&command.args, "-d"),
                flag_value(&command.args, "-o"),
            )
        {
            std::fs::write(Path::new(dir).join(file), payload)?;
        }

        Ok(self.output.clone())
    }
}

/// Metrics sink that keeps event names in order.
#[derive(Default)]
pub(crate) struct RecordingMetrics {
    pub(crate) events: Mutex<Vec<&'static str>>,
}

impl RecordingMetrics {
    pub(crate) fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn record_latency(&self, event: &'static str, _elapsed: Duration) {
        self.events.lock().unwrap().push(event);
    }
}

/// Config that treats the local mock server as blob storage and writes into `dir`.
pub(crate) fn test_config(dir: &Path) -> FetchConfig {
    FetchConfig {
        blob_host_suffix: "127.0.0.1".to_string(),
        download_dir: Some(dir.to_path_buf()),
        probe_timeout: Duration::from_millis(500),
        retry: RetryConfig {
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(20),
            ..Default::default()
        },
        ..Default::default()
    }
}
