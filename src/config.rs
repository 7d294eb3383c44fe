use serde_derive::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::palette::Palette;

/// Errors returned while reading or persisting the options file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// None of the candidate paths holds a config file.
    #[error("no config file found in paths: {paths:?}")]
    NotFound {
        /// The paths that were tried.
        paths: Vec<PathBuf>,
    },

    /// No candidate location is known, e.g. no home directory.
    #[error("cannot determine a config location")]
    NoLocation,

    /// Failed to read the config file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML contents.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The polling interval must be at least one minute.
    #[error("interval in {path} must be at least 1 minute")]
    ZeroInterval { path: PathBuf },

    /// Failed to serialize the defaults.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Refusing to replace options the user already has.
    #[error("config file {path} already exists")]
    Exists { path: PathBuf },

    /// Failed to write the config file.
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A password that stays out of `Debug` output.
#[derive(Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***redacted***)")
    }
}

/// Bar item options.
///
/// `username`, `password` and `hostname` may contain `${env:NAME}`
/// expressions, see [`crate::eval`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub username: String,
    pub password: Password,
    /// Gmail uses `imap.gmail.com`.
    pub hostname: String,
    pub port: u16,
    /// Comma separated list of mailboxes.
    pub mailboxes: String,
    /// Label in front of the counts. Empty disables it.
    pub message: String,
    pub message_color: String,
    pub count_color: String,
    /// Minutes between checks.
    pub interval: u64,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: Password::default(),
            hostname: String::new(),
            port: 993,
            mailboxes: "INBOX".to_string(),
            message: "Mail".to_string(),
            message_color: "default".to_string(),
            count_color: "default".to_string(),
            interval: 5,
            palette: Palette::Plain,
        }
    }
}

impl Config {
    /// Mailbox names in configured order, trimmed, empty entries dropped.
    pub fn mailbox_names(&self) -> impl Iterator<Item = &str> {
        self.mailboxes
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.saturating_mul(60))
    }
}

/// Parse options from TOML text.
pub fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let conf = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&conf).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if config.interval == 0 {
        return Err(ConfigError::ZeroInterval {
            path: path.to_path_buf(),
        });
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Persist the default options at `path`, unless a file is already there.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let contents = toml::to_string(&Config::default())?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(ConfigError::Exists {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(write_err(err)),
    };
    file.write_all(contents.as_bytes()).map_err(write_err)?;

    log::info!("wrote default config to {}", path.display());
    Ok(())
}
