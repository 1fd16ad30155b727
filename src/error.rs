//! Error types for package-fetch
//!
//! Every fatal error carries enough context for operational diagnosis: the
//! (redacted) source URL, the HTTP status, or the external tool's captured
//! output and exit code. The authentication probe never produces an error;
//! its failures are downgraded to "credential required" by the resolver.

use thiserror::Error;

/// Result type alias for package-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for package-fetch
#[derive(Debug, Error)]
pub enum Error {
    /// The source URL is malformed or has no file name to download into
    #[error("invalid url for the package '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL, with any query string removed
        url: String,
        /// Why the URL was rejected
        reason: String,
    },

    /// A caller broke a request invariant (e.g. a bearer token on a warm-up request)
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// The single-stream GET returned a non-success status
    #[error("error downloading package from '{url}': HTTP {status}")]
    Http {
        /// The requested URL, with any query string removed
        url: String,
        /// The status code returned by the server
        status: reqwest::StatusCode,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The external multi-connection downloader exited unsuccessfully
    #[error(
        "error downloading package from '{url}'. stdout: {stdout}, stderr: {stderr}, exitCode: {}",
        exit_code_label(.exit_code)
    )]
    ExternalTool {
        /// The requested URL, with any query string removed
        url: String,
        /// The program that was run
        command: String,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
        /// Exit code, `None` if the process was terminated by a signal
        exit_code: Option<i32>,
    },

    /// The token provider failed to produce a bearer token
    #[error("token provider error: {0}")]
    TokenProvider(String),

    /// I/O error (destination write, process spawn)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "connections")
        key: Option<String>,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

fn exit_code_label(exit_code: &Option<i32>) -> String {
    exit_code.map_or_else(|| "signal".to_string(), |code| code.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_tool_message_embeds_output_and_exit_code() {
        let err = Error::ExternalTool {
            url: "https://acct.blob.core.windows.net/c/pkg.zip".to_string(),
            command: "aria2c --allow-overwrite".to_string(),
            stdout: "partial".to_string(),
            stderr: "connection refused".to_string(),
            exit_code: Some(3),
        };

        let msg = err.to_string();
        assert!(msg.contains("stdout: partial"));
        assert!(msg.contains("stderr: connection refused"));
        assert!(msg.contains("exitCode: 3"));
        assert!(msg.contains("https://acct.blob.core.windows.net/c/pkg.zip"));
    }

    #[test]
    fn external_tool_message_reports_signal_termination() {
        let err = Error::ExternalTool {
            url: "https://acct.blob.core.windows.net/c/pkg.zip".to_string(),
            command: "aria2c".to_string(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
        };

        assert!(err.to_string().ends_with("exitCode: signal"));
    }

    #[test]
    fn http_error_names_url_and_status() {
        let err = Error::Http {
            url: "https://acct.blob.core.windows.net/c/pkg.zip".to_string(),
            status: reqwest::StatusCode::FORBIDDEN,
        };

        let msg = err.to_string();
        assert!(msg.contains("pkg.zip"));
        assert!(msg.contains("403"));
    }

    #[test]
    fn config_shorthand_sets_key() {
        match Error::config("connections", "must be between 1 and 16") {
            Error::Config { message, key } => {
                assert_eq!(key.as_deref(), Some("connections"));
                assert_eq!(message, "must be between 1 and 16");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
