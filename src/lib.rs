//! # package-fetch
//!
//! Package retrieval for cold-start specialization of a compute host.
//!
//! Given a remote archive location, [`PackageDownloader::fetch`] brings it to
//! local disk:
//!
//! 1. **Resolve** whether a bearer token is needed. Warm-up requests never get
//!    one; signed and non-blob URLs are used as-is; unsigned blob URLs are
//!    probed anonymously and get a token from the [`auth::TokenProvider`]
//!    when the probe does not succeed.
//! 2. **Select** a [`DownloadStrategy`]. Large, unauthenticated, non-warm-up
//!    packages go to an external multi-connection downloader; everything else
//!    is a single streamed HTTP GET.
//! 3. **Transfer**, with a bounded retry on the GET and no retry around the
//!    external process, which retries on its own.
//!
//! Collaborators are injected as traits: [`auth::TokenProvider`],
//! [`command::CommandRunner`] and [`metrics::MetricsSink`]. Decisions are
//! logged through `tracing`; the host installs the subscriber.
//!
//! ## Quick Start
//!
//! ```no_run
//! use package_fetch::{FetchConfig, PackageDownloader, PackageRequest};
//! use package_fetch::auth::TokenProvider;
//! use package_fetch::command::ProcessCommandRunner;
//! use package_fetch::metrics::TracingMetrics;
//! use std::sync::Arc;
//!
//! struct NoTokens;
//!
//! #[async_trait::async_trait]
//! impl TokenProvider for NoTokens {
//!     async fn get_token(&self, resource_url: &str) -> package_fetch::Result<String> {
//!         Err(package_fetch::Error::TokenProvider(format!("no identity for {resource_url}")))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PackageDownloader::new(
//!         reqwest::Client::new(),
//!         FetchConfig::default(),
//!         Arc::new(NoTokens),
//!         Arc::new(ProcessCommandRunner::default()),
//!         Arc::new(TracingMetrics),
//!     )?;
//!
//!     let request = PackageRequest::new("https://example.com/releases/site.zip");
//!     let outcome = downloader.fetch(&request).await?;
//!     println!("{} bytes written to {}", outcome.bytes, outcome.path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Authentication necessity resolution
pub mod auth;
/// External command execution
pub mod command;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Latency events
pub mod metrics;
/// Bounded retry
pub mod retry;
/// Strategy selection and transfer execution
pub mod transfer;
/// Request, credential and outcome types
pub mod types;
/// URL helpers
pub mod utils;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{FetchConfig, RetryConfig};
pub use error::{Error, Result};
pub use transfer::{PackageDownloader, select_strategy};
pub use types::{Credential, DownloadStrategy, PackageRequest, TransferOutcome};
