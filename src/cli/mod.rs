//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::api::{ChatBackend, HttpChatBackend};
use crate::cli::say::run_say;
use crate::cli::settings::{apply_set, apply_unset, mutate_config};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::reveal::{InstantSleeper, Sleeper, TokioSleeper};
use crate::logging::init_tracing;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::renderer::ViewOptions;
use crate::ui::theme::Theme;
use crate::utils::url::validate_base_url;

fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        format!(
            "{}\ncommit: {}\nbuilt: {}\nrustc: {}",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown"),
            option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
            option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        )
    })
}

#[derive(Parser, Debug)]
#[command(name = "echo-chat")]
#[command(version, long_version = long_version())]
#[command(about = "A terminal chat client for the Echo question-answering backend")]
#[command(
    long_about = "Echo Chat is a full-screen terminal client for the UET Science Society's \
Echo assistant. Replies appear with a typewriter effect, and the conversation memory the \
backend keeps for your session can be inspected alongside each reply.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Shift/Alt+Enter   Insert a new line\n\
  Ctrl+O            Show or hide memory\n\
  Ctrl+L            Start a new conversation\n\
  PageUp/PageDown   Scroll the transcript (mouse wheel also works)\n\
  Ctrl+C            Quit\n\n\
Environment:\n\
  ECHO_CHAT_LOG     Log filter used with --debug-log (default: echo_chat=info)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base address; `/chat` is appended
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Milliseconds between revealed characters
    #[arg(long, global = true, value_name = "MS")]
    pub delay: Option<u64>,

    /// Show replies at once instead of typing them out
    #[arg(long, global = true)]
    pub no_typewriter: bool,

    /// Do not interpret markdown in replies
    #[arg(long, global = true)]
    pub plain: bool,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask one question and print the reply
    Say {
        /// The question to ask
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
        /// Print the backend's memory after the reply
        #[arg(long)]
        memory: bool,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the effective configuration
    Config,
}

/// Effective settings after applying command-line overrides to the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub backend_url: String,
    pub reveal_delay: Duration,
    pub markdown: bool,
    pub request_timeout: Option<Duration>,
}

impl RunSettings {
    pub fn resolve(config: &Config, args: &Args) -> Self {
        let backend_url = args
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(config.backend_url())
            .to_string();
        let reveal_delay = if args.no_typewriter {
            Duration::ZERO
        } else {
            args.delay
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.reveal_delay())
        };
        Self {
            backend_url,
            reveal_delay,
            markdown: config.markdown_enabled() && !args.plain,
            request_timeout: config.request_timeout(),
        }
    }

    pub fn backend(&self) -> Result<Arc<dyn ChatBackend>, Box<dyn Error>> {
        validate_base_url(&self.backend_url)?;
        let backend = HttpChatBackend::with_timeout(&self.backend_url, self.request_timeout)?;
        Ok(Arc::new(backend))
    }

    pub fn sleeper(&self) -> Arc<dyn Sleeper> {
        if self.reveal_delay.is_zero() {
            Arc::new(InstantSleeper)
        } else {
            Arc::new(TokioSleeper)
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.debug_log {
        init_tracing(path)?;
    }

    match args.command.clone().unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = RunSettings::resolve(&Config::load()?, &args);
            tracing::info!(backend = %settings.backend_url, "starting chat session");
            run_chat(ChatOptions {
                backend: settings.backend()?,
                sleeper: settings.sleeper(),
                reveal_delay: settings.reveal_delay,
                view: ViewOptions {
                    theme: Theme::dark_default(),
                    markdown: settings.markdown,
                },
            })
            .await
        }
        Commands::Say { words, memory } => {
            let settings = RunSettings::resolve(&Config::load()?, &args);
            run_say(words, memory, &settings).await
        }
        Commands::Set { key, value } => {
            report_setting(mutate_config(|config| apply_set(config, &key, &value)));
            Ok(())
        }
        Commands::Unset { key } => {
            report_setting(mutate_config(|config| apply_unset(config, &key)));
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            if let Ok(path) = Config::get_config_path() {
                println!("Config file: {}", path_display(path));
            }
            config.print_all();
            Ok(())
        }
    }
}

fn report_setting(result: Result<String, settings::SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_to_interactive_chat() {
        let args = parse(&["echo-chat"]);
        assert!(args.command.is_none());
        let settings = RunSettings::resolve(&Config::default(), &args);
        assert_eq!(settings.backend_url, "http://127.0.0.1:8000");
        assert_eq!(settings.reveal_delay, Duration::from_millis(15));
        assert!(settings.markdown);
        assert_eq!(settings.request_timeout, None);
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            backend_url: Some("http://config:1".to_string()),
            reveal_delay_ms: Some(40),
            ..Config::default()
        };
        let args = parse(&["echo-chat", "--url", "http://flag:2", "--delay", "5", "--plain"]);
        let settings = RunSettings::resolve(&config, &args);
        assert_eq!(settings.backend_url, "http://flag:2");
        assert_eq!(settings.reveal_delay, Duration::from_millis(5));
        assert!(!settings.markdown);
    }

    #[test]
    fn no_typewriter_wins_over_delay() {
        let args = parse(&["echo-chat", "--delay", "50", "--no-typewriter"]);
        let settings = RunSettings::resolve(&Config::default(), &args);
        assert!(settings.reveal_delay.is_zero());
    }

    #[test]
    fn say_collects_words_and_memory_flag() {
        let args = parse(&["echo-chat", "say", "--memory", "what", "is", "Echo?"]);
        assert_eq!(
            args.command,
            Some(Commands::Say {
                words: vec!["what".into(), "is".into(), "Echo?".into()],
                memory: true,
            })
        );
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let args = parse(&["echo-chat", "say", "--url", "http://x:1", "hi"]);
        assert_eq!(args.url.as_deref(), Some("http://x:1"));
    }

    #[test]
    fn set_takes_multi_word_values() {
        let args = parse(&["echo-chat", "set", "backend-url", "http://bot:9000"]);
        assert_eq!(
            args.command,
            Some(Commands::Set {
                key: "backend-url".into(),
                value: vec!["http://bot:9000".into()],
            })
        );
    }

    #[test]
    fn invalid_backend_url_is_rejected_before_requests() {
        let args = parse(&["echo-chat", "--url", "ftp://nope"]);
        let settings = RunSettings::resolve(&Config::default(), &args);
        assert!(settings.backend().is_err());
    }

    #[test]
    fn long_version_includes_build_metadata() {
        let version = long_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains("commit: "));
    }
}
