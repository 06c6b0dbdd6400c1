//! # mssh
//!
//! Open synchronized ssh sessions to every host carrying a tag.
//!
//! mssh reads an inventory CSV (host in the first column, tags in the rest),
//! shows a numbered menu of tags, and opens one tmux window with a pane per
//! selected host. Keyboard input is synchronized across the panes, so one
//! command reaches the whole group.
//!
//! ## Quick Example
//!
//! ```text
//! $ cat ~/servers.csv
//! host,role,region
//! web1,prod,east
//! web2,prod,west
//! db1,prod
//!
//! $ mssh
//! 1. east
//! 2. prod
//! 3. west
//! Info: Use commas to separate multiple entries and dash for ranges.
//! Select one or more numbers from the list [1-3,q] (default=none): 2
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into these modules:
//!
//! - [`inventory`]: CSV loading into hosts and tags
//! - [`natural`]: natural ordering of tag names
//! - [`tags`]: tag index and selection-to-host resolution
//! - [`layout`]: fitting the numbered menu to the terminal
//! - [`selection`]: parsing `1,3-5` style selections
//! - [`prefs`]: remembered selections and usernames
//! - [`menu`]: the interactive prompt loop
//! - [`context`]: per-run settings from CLI and config
//! - [`config`] and [`loader`]: optional TOML config and default paths
//! - [`ssh`] and [`tmux`]: launching the synchronized session
//! - [`cli`]: command-line parsing with clap
//! - [`logging`]: tracing setup
//! - [`error`]: error types

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod inventory;
pub mod layout;
pub mod loader;
pub mod logging;
pub mod menu;
pub mod natural;
pub mod prefs;
pub mod selection;
pub mod ssh;
pub mod tags;
pub mod tmux;

pub use context::Context;
pub use error::{MsshError, Result};
pub use inventory::{HostEntry, Inventory, NO_TAG};
pub use selection::{RangeCheck, Selection};
pub use tags::TagIndex;
