//! Authentication necessity resolution
//!
//! Decides whether a bearer token is needed before fetching a package and, if
//! so, obtains one from a [`TokenProvider`]. Only unsigned storage-blob URLs
//! that are not publicly readable need a token. Any probe failure, timeout
//! or non-success status means "credential required"; the probe never errors.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::{Credential, PackageRequest};
use crate::utils::{is_blob_without_sas, redact_url};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Source of bearer tokens for storage resources
///
/// Implementations typically talk to a managed-identity endpoint. Failures
/// are fatal for the fetch that asked.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a token for `resource_url` (the canonical absolute URL)
    async fn get_token(&self, resource_url: &str) -> Result<String>;
}

/// Resolves the [`Credential`] a request needs
#[derive(Clone)]
pub struct AuthResolver {
    client: reqwest::Client,
    config: Arc<FetchConfig>,
    token_provider: Arc<dyn TokenProvider>,
}

impl AuthResolver {
    /// Create a resolver sharing `client`'s connection pool
    pub fn new(
        client: reqwest::Client,
        config: Arc<FetchConfig>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            config,
            token_provider,
        }
    }

    /// Credential to use for `request`
    ///
    /// Warm-up requests never get one. Only a token provider failure is an error.
    pub async fn resolve(&self, request: &PackageRequest) -> Result<Credential> {
        let Some(url) = self.token_resource(request).await else {
            tracing::debug!(
                needs_token = false,
                warm_up = request.warm_up,
                "credential not required"
            );
            return Ok(Credential::none());
        };

        tracing::debug!(
            needs_token = true,
            warm_up = request.warm_up,
            url = %redact_url(&url),
            "credential required, requesting token"
        );

        let token = self
            .token_provider
            .get_token(url.as_str())
            .await
            .map_err(|e| {
                tracing::error!(url = %redact_url(&url), error = %e, "failed to obtain token");
                match e {
                    Error::TokenProvider(_) => e,
                    other => Error::TokenProvider(other.to_string()),
                }
            })?;

        Ok(Credential::bearer(token))
    }

    /// The parsed URL when a token must be acquired for it, `None` otherwise
    async fn token_resource(&self, request: &PackageRequest) -> Option<Url> {
        if request.warm_up {
            tracing::debug!("Token retrieval not required for warm-up requests");
            return None;
        }

        let Ok(url) = Url::parse(&request.url) else {
            tracing::debug!("Token retrieval not required since package url is invalid");
            return None;
        };

        if !is_blob_without_sas(&url, &self.config.blob_host_suffix) {
            tracing::debug!(
                url = %redact_url(&url),
                "Token retrieval not required because package is not an unsigned blob URL"
            );
            return None;
        }

        if self.is_publicly_accessible(&url).await {
            tracing::debug!(
                url = %redact_url(&url),
                "Token retrieval not required because package is publicly accessible"
            );
            return None;
        }

        Some(url)
    }

    /// Unauthenticated HEAD probe with a hard deadline; never fails
    async fn is_publicly_accessible(&self, url: &Url) -> bool {
        let probe = self.client.head(url.clone()).send();

        match tokio::time::timeout(self.config.probe_timeout, probe).await {
            Ok(Ok(response)) => {
                let status = response.status();
                tracing::debug!(url = %redact_url(url), status = %status, "accessibility probe");
                status.is_success()
            }
            Ok(Err(e)) => {
                tracing::error!(url = %redact_url(url), error = %e, "accessibility probe failed");
                false
            }
            Err(_) => {
                tracing::error!(
                    url = %redact_url(url),
                    timeout_ms = self.config.probe_timeout.as_millis(),
                    "accessibility probe timed out"
                );
                false
            }
        }
    }
}
