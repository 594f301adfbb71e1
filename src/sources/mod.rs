//! NASA upstream fetchers. Both fail soft and share the same output contract.
pub mod apod;
pub mod epic;

pub use apod::ApodSource;
pub use epic::EpicSource;

use crate::domain::model::GetResult;

/// Appends the API key as the `api_key` query parameter.
pub(crate) fn with_api_key(base: &str, api_key: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}api_key={api_key}")
}

/// Strips the query string so the API key never reaches the logs.
pub(crate) fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Returns the body of a successful response; logs and returns `None` otherwise.
pub(crate) fn success_body<'a>(source: &str, url: &str, res: &'a GetResult) -> Option<&'a [u8]> {
    if !res.is_success() {
        tracing::warn!(
            source,
            url = redact_query(url),
            status = ?res.status,
            error = ?res.error,
            latency_ms = res.latency_ms,
            "Upstream request failed"
        );
        return None;
    }
    match res.body.as_deref() {
        Some(b) => Some(b),
        None => {
            tracing::warn!(source, url = redact_query(url), "Upstream response had no body");
            None
        }
    }
}
