//! Command-line interface for mssh.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Command-line arguments for mssh.
///
/// # Examples
///
/// ```bash
/// # Pick tags from ~/servers.csv and connect
/// mssh
///
/// # Use another inventory, skip the menu, and preselect tags 1 and 3-5
/// mssh fleet.csv -n 1,3-5 -u ops
///
/// # Show which user@host pairs would be opened
/// mssh -n 2 -u ops --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(name = "mssh")]
#[command(version)]
#[command(about = "Pick hosts by tag from a CSV file and open synchronized ssh panes in tmux")]
#[command(long_about = "Reads a CSV file whose first column is a host and whose other columns are tags.\n\
    Shows a numbered menu of tags; the hosts of every selected tag are opened\n\
    in one tmux window, one ssh session per pane, with keyboard input synchronized.\n\n\
    `ssh` and `tmux` must be on the system path.")]
#[command(after_help = "Please be responsible.")]
pub struct Cli {
    /// Inventory CSV file (default: $HOME/servers.csv).
    #[arg(value_name = "FILENAME.CSV")]
    pub filename: Option<PathBuf>,

    /// Select menu entries up front instead of showing the menu.
    ///
    /// Numbers separated by commas, with dashes for ranges, e.g. `1,3-5`.
    #[arg(short, long, value_name = "SELECTION")]
    pub number: Option<String>,

    /// Username to connect as, instead of being prompted for one.
    #[arg(short, long, value_name = "USER")]
    pub user: Option<String>,

    /// Use exactly this many menu columns.
    #[arg(short, long, value_name = "N")]
    pub columns: Option<NonZeroUsize>,

    /// Display the menu and exit.
    #[arg(short, long)]
    pub menu_only: bool,

    /// Print the user@host list instead of starting tmux.
    #[arg(short, long, visible_alias = "debug")]
    pub dry_run: bool,

    /// Reject ranges that reach outside the menu.
    #[arg(long)]
    pub strict: bool,

    /// Remote-shell client to run in each pane.
    #[arg(long, value_name = "CMD")]
    pub client: Option<String>,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL")]
    pub completion: Option<Shell>,
}

/// Write the completion script for `shell` to stdout.
pub fn print_completion(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}
