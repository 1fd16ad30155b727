//! URL helpers shared by the resolver and the executors

use crate::error::{Error, Result};
use url::Url;

/// Parse a package URL, rejecting anything that is not an absolute URL with a host
pub fn parse_package_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
        url: strip_query(raw).to_string(),
        reason: e.to_string(),
    })?;

    if !url.has_host() {
        return Err(Error::InvalidUrl {
            url: redact_url(&url),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(url)
}

/// Render a URL for logs: no credentials, query string or fragment
///
/// Signed URLs carry their authorization in the query, so it must never be logged.
pub fn redact_url(url: &Url) -> String {
    redacted(url).to_string()
}

/// Copy of `url` without credentials, query string or fragment
pub fn redacted(url: &Url) -> Url {
    let mut cleaned = url.clone();
    cleaned.set_query(None);
    cleaned.set_fragment(None);
    // Only fails for URLs that cannot have credentials, which have none to strip
    let _ = cleaned.set_username("");
    let _ = cleaned.set_password(None);
    cleaned
}

/// Local file name for a package: the URL's last path segment, percent-decoded
///
/// # Examples
///
/// ```
/// use package_fetch::utils::file_name_from_url;
/// use url::Url;
///
/// let url = Url::parse("https://acct.blob.core.windows.net/c/my%20pkg.zip?sig=x").unwrap();
/// assert_eq!(file_name_from_url(&url).unwrap(), "my pkg.zip");
/// ```
pub fn file_name_from_url(url: &Url) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidUrl {
        url: redact_url(url),
        reason: reason.to_string(),
    };

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| invalid("URL path has no file name"))?;

    let decoded = urlencoding::decode(segment)
        .map_err(|_| invalid("file name is not valid UTF-8"))?
        .into_owned();

    if decoded == "." || decoded == ".." || decoded.contains(['/', '\\', '\0']) {
        return Err(invalid("file name is not a plain file name"));
    }

    Ok(decoded)
}

/// Whether a URL points at a storage blob and carries no shared-access signature
///
/// Blob URLs are recognized by host suffix (case-insensitive). A `sig` query
/// parameter marks a signed URL, which is usable as-is.
pub fn is_blob_without_sas(url: &Url, blob_host_suffix: &str) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    let suffix = blob_host_suffix.to_ascii_lowercase();
    if !host.to_ascii_lowercase().ends_with(&suffix) {
        return false;
    }

    !url.query_pairs()
        .any(|(key, _)| key.eq_ignore_ascii_case("sig"))
}

fn strip_query(raw: &str) -> &str {
    raw.split(['?', '#']).next().unwrap_or(raw)
}
