//! Settings management for CLI set/unset commands.
//!
//! Each key is described by a data-driven [`Setting`] entry that knows how
//! to parse a value into [`Config`] and how to clear it again.

use std::fmt;

use crate::core::config::Config;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// The provided value could not be parsed as a whole number.
    InvalidNumber(String),
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// An error occurred while persisting the configuration.
    ConfigError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {}", known_keys().join(", "));
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::InvalidNumber(input) => {
                eprintln!("❌ Invalid number: {input}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to save configuration: {msg}");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::InvalidNumber(input) => write!(f, "Invalid number: {input}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}

/// One configurable key.
pub struct Setting {
    pub key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    apply: fn(&mut Config, &str) -> Result<String, SettingError>,
    clear: fn(&mut Config),
}

static SETTINGS: &[Setting] = &[
    Setting {
        key: "backend-url",
        hint: "To set the backend address, specify a URL:",
        example: "echo-chat set backend-url http://127.0.0.1:8000",
        default_display: crate::core::constants::DEFAULT_BACKEND_URL,
        apply: |config, value| {
            config.backend_url = Some(value.to_string());
            Ok(value.to_string())
        },
        clear: |config| config.backend_url = None,
    },
    Setting {
        key: "reveal-delay",
        hint: "To set the typewriter delay, specify milliseconds per character:",
        example: "echo-chat set reveal-delay 15",
        default_display: "15 ms",
        apply: |config, value| {
            let ms = parse_u64(value)?;
            config.reveal_delay_ms = Some(ms);
            Ok(format!("{ms} ms"))
        },
        clear: |config| config.reveal_delay_ms = None,
    },
    Setting {
        key: "markdown",
        hint: "To set markdown rendering, specify on or off:",
        example: "echo-chat set markdown off",
        default_display: "on",
        apply: |config, value| {
            let enabled =
                parse_bool(value).ok_or_else(|| SettingError::InvalidBoolean(value.to_string()))?;
            config.markdown = Some(enabled);
            Ok(format_bool(enabled).to_string())
        },
        clear: |config| config.markdown = None,
    },
    Setting {
        key: "request-timeout",
        hint: "To limit how long a request may take, specify seconds (0 waits indefinitely):",
        example: "echo-chat set request-timeout 60",
        default_display: "waits indefinitely",
        apply: |config, value| {
            let secs = parse_u64(value)?;
            config.request_timeout_secs = Some(secs);
            Ok(format!("{secs} s"))
        },
        clear: |config| config.request_timeout_secs = None,
    },
];

fn find(key: &str) -> Result<&'static Setting, SettingError> {
    SETTINGS
        .iter()
        .find(|setting| setting.key == key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

pub fn known_keys() -> Vec<&'static str> {
    SETTINGS.iter().map(|setting| setting.key).collect()
}

/// Apply `key = args` to `config` and return the confirmation message.
pub fn apply_set(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    let setting = find(key)?;
    let value = args.join(" ");
    let value = value.trim();
    if value.is_empty() {
        return Err(SettingError::MissingArgs {
            hint: setting.hint,
            example: setting.example,
        });
    }
    let display = (setting.apply)(config, value)?;
    Ok(format!("✅ Set {} to: {display}", setting.key))
}

/// Clear `key` in `config` and return the confirmation message.
pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let setting = find(key)?;
    (setting.clear)(config);
    Ok(format!(
        "✅ Unset {} (will use default: {})",
        setting.key, setting.default_display
    ))
}

/// Load the config, apply `f`, and save it back.
pub fn mutate_config<F>(f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config = Config::load().map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = f(&mut config)?;
    config
        .save()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn parse_u64(input: &str) -> Result<u64, SettingError> {
    input
        .parse::<u64>()
        .map_err(|_| SettingError::InvalidNumber(input.to_string()))
}
