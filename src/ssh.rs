//! Remote-shell targets and client lookup.
//!
//! Each selected host becomes a [`Target`]; the pane command is the client
//! followed by `user@host`, e.g. `ssh ops@web1`.

use crate::error::{MsshError, Result};
use std::fmt;
use std::path::PathBuf;

/// Client used when none is configured.
pub const DEFAULT_CLIENT: &str = "ssh";

/// One remote login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Login name.
    pub user: String,
    /// Host name or address.
    pub host: String,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Pair every host with the same user.
pub fn targets(user: &str, hosts: &[String]) -> Vec<Target> {
    hosts
        .iter()
        .map(|host| Target {
            user: user.to_string(),
            host: host.clone(),
        })
        .collect()
}

/// The command a pane runs for `target`.
///
/// ```
/// use mssh::ssh::{remote_command, Target};
///
/// let target = Target { user: "ops".into(), host: "web1".into() };
/// assert_eq!(remote_command("ssh", &target), "ssh ops@web1");
/// ```
pub fn remote_command(client: &str, target: &Target) -> String {
    format!("{} {}", client, target)
}

/// Space-separated `user@host` list, as printed by a dry run.
pub fn display_list(targets: &[Target]) -> String {
    targets
        .iter()
        .map(Target::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fail unless the program that `command` starts with is installed.
///
/// Only the first word is checked, so `ssh -4` requires `ssh`.
///
/// # Errors
///
/// Returns [`MsshError::ToolNotFound`] naming the missing program.
pub fn require_program(command: &str) -> Result<PathBuf> {
    let program = command.split_whitespace().next().unwrap_or(command);
    let path = which::which(program).map_err(|_| MsshError::ToolNotFound(program.to_string()))?;
    tracing::debug!(program, path = %path.display(), "found program");
    Ok(path)
}
