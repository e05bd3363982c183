//! Diagnostic logging.
//!
//! The terminal belongs to the chat screen, so diagnostics are only recorded
//! when a log file is requested and never go to stdout or stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_FILTER_ENV: &str = "ECHO_CHAT_LOG";

const DEFAULT_FILTER: &str = "echo_chat=info";

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Append tracing output to `path`, filtered by `ECHO_CHAT_LOG`.
pub fn init_tracing(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(build_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}
