/// Default resource endpoint: San Francisco mobile food schedule.
pub const DEFAULT_SODA_ENDPOINT: &str = "https://data.sfgov.org/resource/bbb8-hzi6.json";

/// Normalize a resource URL to a JSON resource endpoint.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_SODA_ENDPOINT`]
/// 2) trailing `/` and any query string are dropped
/// 3) `.json` is appended when the last path segment has no extension
pub fn normalize_resource_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_SODA_ENDPOINT
    } else {
        input.trim()
    };

    let base = base.split('?').next().unwrap_or(base);
    let trimmed = base.trim_end_matches('/');
    let last_segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if last_segment.contains('.') {
        return trimmed.to_string();
    }
    format!("{trimmed}.json")
}

/// Join a resource endpoint and an already-serialized query string.
pub fn with_query(resource_url: &str, query: &str) -> String {
    if query.is_empty() {
        return resource_url.to_string();
    }
    format!("{resource_url}?{query}")
}
