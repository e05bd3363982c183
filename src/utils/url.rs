//! Backend address handling.

use std::fmt;

/// Why a configured backend address cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendUrlError {
    Malformed { input: String, reason: String },
    UnsupportedScheme { input: String, scheme: String },
}

impl fmt::Display for BackendUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendUrlError::Malformed { input, reason } => {
                write!(f, "invalid backend URL '{input}': {reason}")
            }
            BackendUrlError::UnsupportedScheme { input, scheme } => write!(
                f,
                "backend URL '{input}' uses '{scheme}'; only http and https are supported"
            ),
        }
    }
}

impl std::error::Error for BackendUrlError {}

/// Remove trailing slashes so endpoints can be appended safely.
///
/// # Examples
///
/// ```
/// use echo_chat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:8000/"), "http://127.0.0.1:8000");
/// assert_eq!(normalize_base_url("https://bot.example.org/api//"), "https://bot.example.org/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base address and an endpoint path with exactly one slash.
///
/// # Examples
///
/// ```
/// use echo_chat::utils::url::construct_api_url;
///
/// assert_eq!(construct_api_url("http://127.0.0.1:8000", "chat"), "http://127.0.0.1:8000/chat");
/// assert_eq!(construct_api_url("http://127.0.0.1:8000/", "/chat"), "http://127.0.0.1:8000/chat");
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Check that `base_url` parses and uses http or https.
pub fn validate_base_url(base_url: &str) -> Result<(), BackendUrlError> {
    let trimmed = base_url.trim();
    let parsed = reqwest::Url::parse(trimmed).map_err(|err| BackendUrlError::Malformed {
        input: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BackendUrlError::UnsupportedScheme {
            input: trimmed.to_string(),
            scheme: other.to_string(),
        }),
    }
}
