//! Config file locations.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Default config file paths, in order of preference.
pub fn defaults() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("imap-status/config.toml"));
        paths.push(dir.join("imap-status.toml"));
    }
    if let Some(dir) = dirs::home_dir() {
        paths.push(dir.join(".imap-status.toml"));
    }
    paths
}

/// An explicit path replaces the defaults entirely.
pub fn resolve(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    match explicit {
        Some(path) => vec![path],
        None => defaults(),
    }
}

/// First existing path of `paths`.
pub fn locate(paths: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    paths
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            paths: paths.to_vec(),
        })
}

/// Where `init` may write the defaults: the most preferred path, unless any
/// candidate already holds a config.
pub fn init_target(paths: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    if let Ok(path) = locate(paths) {
        return Err(ConfigError::Exists { path });
    }
    paths.first().cloned().ok_or(ConfigError::NoLocation)
}
