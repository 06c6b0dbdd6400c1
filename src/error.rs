//! Error types for mssh.
//!
//! All errors in mssh are represented by [`MsshError`], which covers
//! inventory and preference I/O, selection parsing, and tmux failures.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in mssh.
#[derive(Error, Debug)]
pub enum MsshError {
    /// Inventory CSV does not exist at the given path.
    #[error("`{0}` was not found. Pass a CSV file or create $HOME/servers.csv")]
    InventoryNotFound(PathBuf),

    /// A required external program is not on `PATH`.
    #[error("`{0}` is required but was not found. Obtain `{0}`, and ensure `{0}` is on the system path")]
    ToolNotFound(String),

    /// Could not determine the user's home directory.
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The inventory CSV is malformed.
    #[error("Failed to parse inventory: {0}")]
    CsvError(#[from] csv::Error),

    /// The preferences file is not valid JSON or has the wrong shape.
    #[error("Failed to read preferences: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// A selection token is neither an in-range index nor a valid range.
    #[error("Invalid input: `{0}`")]
    InvalidSelection(String),

    /// A selected index does not address any menu entry.
    #[error("Selection {index} is outside the menu range 1-{max}")]
    SelectionOutOfRange {
        /// The offending 1-based index.
        index: usize,
        /// Number of menu entries.
        max: usize,
    },

    /// The inventory has no hosts, so there is nothing to select.
    #[error("No hosts found in {0}")]
    EmptyInventory(PathBuf),

    /// A tmux command failed to execute.
    #[error("Tmux error: {0}")]
    TmuxError(String),

    /// Standard input closed while waiting for an answer.
    #[error("Input closed before a choice was made")]
    Interrupted,
}

/// Convenient Result type alias for mssh operations.
pub type Result<T> = std::result::Result<T, MsshError>;
