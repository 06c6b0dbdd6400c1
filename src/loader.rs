//! File discovery: config, preferences, and the default inventory.
//!
//! The config search order is:
//!
//! 1. `$XDG_CONFIG_HOME/mssh/config.toml`
//! 2. `~/.config/mssh/config.toml`
//!
//! Preferences live in `$XDG_DATA_HOME/mssh/mssh.json`, falling back to
//! `~/.local/share/mssh/mssh.json`.

use crate::config::Config;
use crate::error::{MsshError, Result};
use std::path::{Path, PathBuf};

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or(MsshError::NoHomeDir)
}

/// Read a non-empty environment variable as a path.
fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Determine the config file path.
///
/// Returns the first existing candidate, or `~/.config/mssh/config.toml`
/// when none exists.
///
/// # Errors
///
/// Returns [`MsshError::NoHomeDir`] if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(xdg) = env_dir("XDG_CONFIG_HOME") {
        let path = xdg.join("mssh").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }
    Ok(home()?.join(".config").join("mssh").join("config.toml"))
}

/// Load and parse a config file, treating a missing file as empty.
///
/// # Errors
///
/// - [`MsshError::IoError`] if reading fails
/// - [`MsshError::ConfigError`] if TOML parsing fails
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config = Config::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from the default path.
///
/// Convenience wrapper that combines [`default_config_path`] and [`load_config`].
pub fn load_default_config() -> Result<Config> {
    let path = default_config_path()?;
    load_config(&path)
}

/// Where preferences are stored when the config does not say otherwise.
pub fn default_prefs_path() -> Result<PathBuf> {
    let data = match env_dir("XDG_DATA_HOME") {
        Some(dir) => dir,
        None => home()?.join(".local").join("share"),
    };
    Ok(data.join("mssh").join("mssh.json"))
}

/// Inventory read when no file is named: `$HOME/servers.csv`.
pub fn default_inventory_path() -> Result<PathBuf> {
    Ok(home()?.join("servers.csv"))
}

/// Expand a leading `~` to the home directory.
///
/// Paths that don't start with `~` are returned unchanged.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "client = \"mosh\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.client.as_deref(), Some("mosh"));
    }

    #[test]
    fn test_bad_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "columns = [").unwrap();
        assert!(matches!(load_config(&path), Err(MsshError::ConfigError(_))));
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_tilde(Path::new("~/servers.csv")).unwrap(),
            home.join("servers.csv")
        );
        assert_eq!(
            expand_tilde(Path::new("/etc/servers.csv")).unwrap(),
            PathBuf::from("/etc/servers.csv")
        );
        assert_eq!(
            expand_tilde(Path::new("~other/x")).unwrap(),
            PathBuf::from("~other/x")
        );
    }
}
