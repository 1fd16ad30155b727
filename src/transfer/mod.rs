//! Package transfer: orchestration and the two execution paths
//!
//! [`PackageDownloader::fetch`] validates the URL, resolves the credential,
//! selects a [`DownloadStrategy`] and runs it. Each step completes before the
//! next begins; a strategy is never switched mid-transfer.

mod multi_connection;
mod single_stream;
mod strategy;

pub use strategy::select_strategy;

use crate::auth::{AuthResolver, TokenProvider};
use crate::command::CommandRunner;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::metrics::{MetricsSink, download_event};
use crate::types::{Credential, DownloadStrategy, PackageRequest, TransferOutcome};
use crate::utils::{file_name_from_url, parse_package_url, redact_url};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Fetches packages to local disk
///
/// Cheap to clone; clones share the HTTP connection pool and collaborators,
/// and concurrent fetches are independent of each other.
///
/// # Example
///
/// ```no_run
/// use package_fetch::{FetchConfig, PackageDownloader, PackageRequest};
/// use package_fetch::auth::TokenProvider;
/// use package_fetch::command::ProcessCommandRunner;
/// use package_fetch::metrics::TracingMetrics;
/// use std::sync::Arc;
///
/// struct IdentityEndpoint;
///
/// #[async_trait::async_trait]
/// impl TokenProvider for IdentityEndpoint {
///     async fn get_token(&self, _resource_url: &str) -> package_fetch::Result<String> {
///         Ok("token".to_string())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = PackageDownloader::new(
///     reqwest::Client::new(),
///     FetchConfig::default(),
///     Arc::new(IdentityEndpoint),
///     Arc::new(ProcessCommandRunner::default()),
///     Arc::new(TracingMetrics),
/// )?;
///
/// let request = PackageRequest::new("https://acct.blob.core.windows.net/c/pkg.zip")
///     .with_content_length(200 * 1024 * 1024);
/// let outcome = downloader.fetch(&request).await?;
/// println!("{} bytes at {}", outcome.bytes, outcome.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PackageDownloader {
    client: reqwest::Client,
    config: Arc<FetchConfig>,
    resolver: AuthResolver,
    command_runner: Arc<dyn CommandRunner>,
    metrics: Arc<dyn MetricsSink>,
}

/// Where a request's package lands on disk
struct Destination {
    url: Url,
    dir: PathBuf,
    file_name: String,
}

impl Destination {
    fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl PackageDownloader {
    /// Create a downloader; fails if `config` does not validate
    pub fn new(
        client: reqwest::Client,
        config: FetchConfig,
        token_provider: Arc<dyn TokenProvider>,
        command_runner: Arc<dyn CommandRunner>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let resolver = AuthResolver::new(client.clone(), config.clone(), token_provider);

        Ok(Self {
            client,
            config,
            resolver,
            command_runner,
            metrics,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a package: resolve credential, select strategy, transfer
    ///
    /// Malformed URLs fail before any network activity or token acquisition.
    pub async fn fetch(&self, request: &PackageRequest) -> Result<TransferOutcome> {
        let destination = self.destination(request)?;
        tracing::debug!(
            url = %redact_url(&destination.url),
            warm_up = request.warm_up,
            "Downloading package"
        );

        let credential = self.resolver.resolve(request).await?;
        tracing::debug!(
            needs_token = credential.is_present(),
            warm_up = request.warm_up,
            "credential resolved"
        );

        self.transfer(request, &destination, &credential).await
    }

    /// Transfer a package with an already-resolved credential
    ///
    /// A credential on a warm-up request is a caller bug and fails with
    /// [`Error::PolicyViolation`] before anything is downloaded.
    pub async fn download(
        &self,
        request: &PackageRequest,
        credential: &Credential,
    ) -> Result<TransferOutcome> {
        let destination = self.destination(request)?;
        self.transfer(request, &destination, credential).await
    }

    async fn transfer(
        &self,
        request: &PackageRequest,
        destination: &Destination,
        credential: &Credential,
    ) -> Result<TransferOutcome> {
        if request.warm_up && credential.is_present() {
            let err = Error::PolicyViolation(
                "warm-up requests do not support managed identity tokens".to_string(),
            );
            tracing::error!(url = %redact_url(&destination.url), error = %err, "refusing download");
            return Err(err);
        }

        let strategy = select_strategy(
            request.content_length,
            credential.is_present(),
            request.warm_up,
            self.config.multi_connection_threshold,
        );
        let metric = download_event(credential.is_present(), request.warm_up);

        tracing::debug!(
            strategy = %strategy,
            warm_up = request.warm_up,
            token_prefix = credential.prefix(),
            "Downloading package contents"
        );

        let result = self
            .run_strategy(strategy, request, destination, credential, metric)
            .await;

        match result {
            Ok(bytes) => Ok(TransferOutcome {
                path: destination.path(),
                bytes,
                strategy,
            }),
            Err(e) => {
                tracing::error!(
                    url = %redact_url(&destination.url),
                    expected_bytes = ?request.content_length,
                    strategy = %strategy,
                    warm_up = request.warm_up,
                    error = %e,
                    "Error downloading package"
                );
                Err(e)
            }
        }
    }

    async fn run_strategy(
        &self,
        strategy: DownloadStrategy,
        request: &PackageRequest,
        destination: &Destination,
        credential: &Credential,
        metric: &'static str,
    ) -> Result<u64> {
        tokio::fs::create_dir_all(&destination.dir).await?;

        match strategy {
            DownloadStrategy::MultiConnection => {
                self.download_multi_connection(destination, request.warm_up, metric)
                    .await
            }
            DownloadStrategy::SingleStream => {
                self.download_single_stream(destination, credential, request.warm_up, metric)
                    .await
            }
        }
    }

    fn destination(&self, request: &PackageRequest) -> Result<Destination> {
        let validated = parse_package_url(&request.url)
            .and_then(|url| file_name_from_url(&url).map(|file_name| (url, file_name)));

        match validated {
            Ok((url, file_name)) => Ok(Destination {
                url,
                dir: self.config.download_dir(),
                file_name,
            }),
            Err(e) => {
                tracing::error!(error = %e, "Invalid url for the package");
                Err(e)
            }
        }
    }
}
