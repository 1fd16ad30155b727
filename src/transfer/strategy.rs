//! Download strategy selection

use crate::types::DownloadStrategy;

/// Pick how to transfer a package
///
/// The multi-connection downloader is used only for packages known to be
/// larger than `threshold` that need no bearer token and are not warm-ups.
/// The external tool cannot send authorization headers.
pub fn select_strategy(
    expected_length: Option<u64>,
    has_credential: bool,
    warm_up: bool,
    threshold: u64,
) -> DownloadStrategy {
    match expected_length {
        Some(length) if length > threshold && !has_credential && !warm_up => {
            DownloadStrategy::MultiConnection
        }
        _ => DownloadStrategy::SingleStream,
    }
}
