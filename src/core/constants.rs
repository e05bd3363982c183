//! Shared constants used across the application

/// Appended as a bot message whenever a chat request fails.
pub const REQUEST_FAILED_MESSAGE: &str = "❌ Error getting response. Please try again.";

/// Backend address used when neither the config file nor the CLI sets one.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Pause between revealed characters.
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 15;

pub const APP_TITLE: &str = "Echo - UET Science Society";

/// Shown instead of the transcript while it is empty.
pub const WELCOME_LINES: [&str; 2] = [
    "👋 Ask me anything.",
    "About the Science Society, their events, or activities!",
];
