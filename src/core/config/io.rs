use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Why `config.toml` could not be turned into a [`Config`].
#[derive(Debug)]
pub enum ConfigError {
    /// The platform offers no per-user configuration directory.
    NoConfigDir,
    /// `config.toml` exists but could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// `config.toml` is not valid TOML for echo-chat's settings.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => {
                write!(f, "no per-user configuration directory on this system")
            }
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path_display(path))
            }
            ConfigError::Parse { path, source } => write!(
                f,
                "{} is not a valid echo-chat config: {source}",
                path_display(path)
            ),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    /// Read settings from `config_path`. A missing file means all defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn StdError>> {
        let contents = match fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                }
                .into())
            }
        };
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Replace `config_path` in one rename so readers never see half a file.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(toml::to_string_pretty(self)?.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(config_path).map_err(|err| err.error)?;
        Ok(())
    }

    /// `config.toml` inside the per-user echo-chat config directory.
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "uetss", "echo-chat").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
