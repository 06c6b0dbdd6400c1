//! The settings of one run.
//!
//! [`Context`] merges command-line flags with the config file and resolves
//! the inventory key under which preferences are stored. It is handed to
//! the menu and the orchestrator instead of living in globals.
//!
//! Precedence: CLI flag > config file > built-in default.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{MsshError, Result};
use crate::layout::{DEFAULT_RESERVED_LINES, DEFAULT_SEPARATOR, LayoutOptions};
use crate::loader;
use crate::selection::RangeCheck;
use crate::ssh::DEFAULT_CLIENT;
use std::path::PathBuf;

/// Everything a run needs to know, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Context {
    /// Inventory CSV as given.
    pub inventory: PathBuf,
    /// Absolute path of the inventory; keys the preference store.
    pub inventory_key: String,
    /// Selection supplied up front; skips the menu.
    pub number: Option<String>,
    /// Username supplied up front; skips the prompt.
    pub user: Option<String>,
    /// Username offered when none is remembered.
    pub fallback_user: Option<String>,
    /// Menu layout settings.
    pub layout: LayoutOptions,
    /// How strictly ranges are validated.
    pub range_check: RangeCheck,
    /// Render the menu and stop.
    pub menu_only: bool,
    /// Print targets instead of launching tmux.
    pub dry_run: bool,
    /// Remote-shell client run in each pane.
    pub client: String,
    /// Preference store location.
    pub prefs_file: PathBuf,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            inventory: PathBuf::new(),
            inventory_key: String::new(),
            number: None,
            user: None,
            fallback_user: None,
            layout: LayoutOptions::default(),
            range_check: RangeCheck::default(),
            menu_only: false,
            dry_run: false,
            client: DEFAULT_CLIENT.to_string(),
            prefs_file: PathBuf::new(),
        }
    }
}

impl Context {
    /// Combine CLI arguments and config into a run context.
    ///
    /// # Errors
    ///
    /// - [`MsshError::InventoryNotFound`] if the inventory file doesn't exist
    /// - [`MsshError::NoHomeDir`] if a default path needs the home directory
    pub fn new(cli: &Cli, config: &Config) -> Result<Self> {
        let inventory = match (&cli.filename, &config.inventory) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => loader::expand_tilde(path)?,
            (None, None) => loader::default_inventory_path()?,
        };
        if !inventory.exists() {
            return Err(MsshError::InventoryNotFound(inventory));
        }
        let inventory_key = std::fs::canonicalize(&inventory)?
            .to_string_lossy()
            .into_owned();

        let prefs_file = match &config.prefs_file {
            Some(path) => loader::expand_tilde(path)?,
            None => loader::default_prefs_path()?,
        };

        let layout = LayoutOptions {
            columns: cli.columns.map(usize::from).or(config.columns.filter(|&c| c > 0)),
            reserved_lines: config.reserved_lines.unwrap_or(DEFAULT_RESERVED_LINES),
            separator: config
                .separator
                .clone()
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
        };

        let range_check = if cli.strict || config.strict {
            RangeCheck::Strict
        } else {
            RangeCheck::Lenient
        };

        let context = Context {
            inventory,
            inventory_key,
            number: cli.number.clone(),
            user: cli.user.clone(),
            fallback_user: config.user.clone(),
            layout,
            range_check,
            menu_only: cli.menu_only,
            dry_run: cli.dry_run,
            client: cli
                .client
                .clone()
                .or_else(|| config.client.clone())
                .unwrap_or_else(|| DEFAULT_CLIENT.to_string()),
            prefs_file,
        };
        tracing::debug!(?context, "resolved run context");
        Ok(context)
    }
}
