//! Collaborator fakes and fixtures

use async_trait::async_trait;
use package_fetch::auth::TokenProvider;
use package_fetch::metrics::MetricsSink;
use package_fetch::{FetchConfig, RetryConfig};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Token provider handing out a fixed token
pub struct FixedTokenProvider {
    token: String,
    calls: AtomicUsize,
}

impl FixedTokenProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FixedTokenProvider {
    async fn get_token(&self, _resource_url: &str) -> package_fetch::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}

/// Metrics sink keeping event names
#[derive(Default)]
pub struct EventLog(Mutex<Vec<&'static str>>);

impl EventLog {
    pub fn events(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

impl MetricsSink for EventLog {
    fn record_latency(&self, event: &'static str, _elapsed: Duration) {
        self.0.lock().unwrap().push(event);
    }
}

/// Config treating the local mock server as blob storage
pub fn local_config(download_dir: &Path) -> FetchConfig {
    FetchConfig {
        blob_host_suffix: "127.0.0.1".to_string(),
        download_dir: Some(download_dir.to_path_buf()),
        probe_timeout: Duration::from_millis(500),
        retry: RetryConfig {
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(20),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Write an executable shell script standing in for the multi-connection downloader
///
/// On success it writes `content` to `<-d>/<-o>`; otherwise it prints to both
/// streams and exits with `exit_code`.
#[cfg(unix)]
pub fn fake_downloader(dir: &Path, content: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
dir=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -d) dir="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) echo "arg: $1"; shift ;;
  esac
done
if [ {exit_code} -ne 0 ]; then
  echo "errorCode={exit_code}" >&2
  exit {exit_code}
fi
printf '%s' '{content}' > "$dir/$out"
"#
    );

    let path = dir.join("fake-aria2c");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
