//! Transfer with a single streamed HTTP GET

use super::{Destination, PackageDownloader};
use crate::error::{Error, Result};
use crate::metrics::{LatencyEvent, write_event};
use crate::retry::download_with_retry;
use crate::types::Credential;
use crate::utils::{redact_url, redacted};
use futures::StreamExt;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

impl PackageDownloader {
    /// GET the package and stream the body to disk
    ///
    /// Only the request is retried; a failure while copying the body is fatal.
    /// Returns the declared content length, or the bytes written when the
    /// server declared none.
    pub(super) async fn download_single_stream(
        &self,
        destination: &Destination,
        credential: &Credential,
        warm_up: bool,
        metric: &'static str,
    ) -> Result<u64> {
        let url = &destination.url;
        let response = download_with_retry(&self.config.retry, move || {
            self.send_get(url, credential, metric)
        })
        .await?;

        let declared = response.content_length();
        tracing::info!(bytes = ?declared, warm_up, "bytes downloaded");

        let written = {
            let _latency = LatencyEvent::start(self.metrics.clone(), write_event(warm_up));
            write_body(response, url, &destination.path()).await?
        };
        tracing::info!(bytes = ?declared, written, warm_up, "bytes written");

        Ok(declared.unwrap_or(written))
    }

    /// One GET attempt; headers are read, the body is left streaming
    async fn send_get(
        &self,
        url: &Url,
        credential: &Credential,
        metric: &'static str,
    ) -> Result<reqwest::Response> {
        let _latency = LatencyEvent::start(self.metrics.clone(), metric);

        let mut request = self.client.get(url.clone());
        if let Some(token) = credential.token() {
            request = request.bearer_auth(token).header(
                self.config.api_version_header.as_str(),
                self.config.api_version.as_str(),
            );
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(url = %redact_url(url), error = %e, "Error downloading zip content");
            Error::from(e.with_url(redacted(url)))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url = %redact_url(url), status = %status, "Error downloading zip content");
            return Err(Error::Http {
                url: redact_url(url),
                status,
            });
        }

        Ok(response)
    }
}

/// Copy the body into `path`, truncating any existing file
async fn write_body(response: reqwest::Response, url: &Url, path: &Path) -> Result<u64> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;
    let mut writer = BufWriter::new(file);

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error::from(e.with_url(redacted(url))))?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;

    Ok(written)
}
