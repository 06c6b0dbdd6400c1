//! Configuration types for mssh.
//!
//! The config file is optional. Every key supplies a default that a
//! command-line flag can override.
//!
//! # Config Format
//!
//! ```toml
//! # ~/.config/mssh/config.toml
//! inventory = "~/fleet/servers.csv"
//! user = "ops"
//! client = "ssh"
//! columns = 3
//! reserved_lines = 5
//! separator = "  "
//! strict = true
//! prefs_file = "~/.local/share/mssh/mssh.json"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration structure.
///
/// Parsed from `~/.config/mssh/config.toml` (or XDG equivalent).
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Inventory CSV used when none is given on the command line.
    pub inventory: Option<PathBuf>,
    /// Username offered when none has been remembered for an inventory.
    pub user: Option<String>,
    /// Remote-shell client run in each pane.
    pub client: Option<String>,
    /// Fixed number of menu columns.
    pub columns: Option<usize>,
    /// Terminal lines kept free below the menu.
    pub reserved_lines: Option<usize>,
    /// Gap appended to menu entries.
    pub separator: Option<String>,
    /// Reject ranges whose endpoints fall outside the menu.
    pub strict: bool,
    /// Where remembered selections and usernames are stored.
    pub prefs_file: Option<PathBuf>,
}

impl Config {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the TOML is malformed, a key has the wrong
    /// type, or an unknown key is present.
    pub fn from_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
