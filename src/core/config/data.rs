use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{DEFAULT_BACKEND_URL, DEFAULT_REVEAL_DELAY_MS};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base address of the chat backend; `/chat` is appended.
    pub backend_url: Option<String>,
    /// Milliseconds between revealed characters; 0 shows replies at once.
    pub reveal_delay_ms: Option<u64>,
    /// Render bot replies as markdown
    pub markdown: Option<bool>,
    /// Give up on a request after this many seconds. Unset waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn backend_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms.unwrap_or(DEFAULT_REVEAL_DELAY_MS))
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
