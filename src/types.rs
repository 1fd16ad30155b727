//! Request, credential and outcome types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A package to fetch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    /// Remote archive location; must be an absolute URL
    pub url: String,
    /// Declared content length in bytes, if known
    #[serde(default)]
    pub content_length: Option<u64>,
    /// Low-priority warm-up probe rather than a real fetch
    #[serde(default)]
    pub warm_up: bool,
}

impl PackageRequest {
    /// A real (non warm-up) request with unknown length
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_length: None,
            warm_up: false,
        }
    }

    /// Set the declared content length
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Mark the request as a warm-up
    pub fn warm_up(mut self) -> Self {
        self.warm_up = true;
        self
    }
}

/// Bearer token for the storage backend, or nothing
///
/// Absent covers both "not needed" and "could not be determined necessary";
/// downstream code only looks at presence.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    /// No credential
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a bearer token; an empty token counts as absent
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            Self(None)
        } else {
            Self(Some(token))
        }
    }

    /// Whether a token is present
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// The bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// First three characters of the token, for diagnostics
    pub fn prefix(&self) -> &str {
        match &self.0 {
            Some(token) => {
                let end = token
                    .char_indices()
                    .nth(3)
                    .map_or(token.len(), |(idx, _)| idx);
                &token[..end]
            }
            None => "Null",
        }
    }
}

// Never print the token itself
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "Credential(Bearer {}...)", self.prefix()),
            None => write!(f, "Credential(None)"),
        }
    }
}

/// How a package is transferred; chosen once per request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadStrategy {
    /// External downloader splitting the transfer over several connections
    MultiConnection,
    /// One streamed HTTP GET
    SingleStream,
}

impl fmt::Display for DownloadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadStrategy::MultiConnection => write!(f, "multi-connection"),
            DownloadStrategy::SingleStream => write!(f, "single-stream"),
        }
    }
}

/// A completed transfer
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Local file the package was written to
    pub path: PathBuf,
    /// Bytes transferred, for observability only
    pub bytes: u64,
    /// Strategy that performed the transfer
    pub strategy: DownloadStrategy,
}
