//! Small helpers shared by the client modules.

/// Trimmed text, or `None` when absent or blank
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// API base URL without surrounding whitespace or trailing slashes.
///
/// `None` unless the value has an http or https scheme.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    is_http_url(trimmed).then(|| trimmed.trim_end_matches('/').to_string())
}

/// Unix milliseconds, the unit of every note timestamp
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Unix seconds, the unit of JWT claims
pub fn unix_timestamp_now() -> i64 {
    chrono::Utc::now().timestamp()
}
