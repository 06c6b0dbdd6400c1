//! Tmux session setup.
//!
//! A fresh detached session is created, one pane is split off per target
//! running the remote-shell client, and the session's original empty pane
//! is killed once the real panes exist. Input is synchronized across panes
//! last, then the session is attached.
//!
//! Every command targets the new session by name, so nothing touches the
//! user's other sessions.

use crate::error::{MsshError, Result};
use crate::ssh::{Target, remote_command};
use chrono::{DateTime, Local};
use std::process::Command;

/// Check if we're running inside a tmux session.
///
/// Checks for the `TMUX` environment variable, which tmux sets when active.
pub fn in_tmux() -> bool {
    std::env::var("TMUX").is_ok()
}

/// Session name for a launch at `now`, e.g. `mssh-20240131T093000`.
pub fn session_name(now: DateTime<Local>) -> String {
    format!("mssh-{}", now.format("%Y%m%dT%H%M%S"))
}

/// The panes to open in one session.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    name: String,
    /// `(title, command)` per pane.
    panes: Vec<(String, String)>,
}

impl SessionPlan {
    /// Plan a session called `name` with one pane per target.
    pub fn new(name: impl Into<String>, client: &str, targets: &[Target]) -> Self {
        let panes = targets
            .iter()
            .map(|t| (t.host.clone(), remote_command(client, t)))
            .collect();
        SessionPlan {
            name: name.into(),
            panes,
        }
    }

    /// Session name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tmux commands run after the session exists, in order.
    ///
    /// `placeholder` is the id of the pane the session was created with.
    pub fn setup_commands(&self, placeholder: &str) -> Vec<Vec<String>> {
        let name = self.name.as_str();
        let cmd = |args: &[&str]| args.iter().map(|a| a.to_string()).collect::<Vec<_>>();

        let mut cmds = vec![
            cmd(&["rename-window", "-t", name, name]),
            cmd(&["set-option", "-t", name, "status-left", "[mssh] "]),
            cmd(&["set-option", "-t", name, "status-left-length", "24"]),
            cmd(&["set-option", "-w", "-t", name, "pane-border-status", "top"]),
            cmd(&["set-option", "-w", "-t", name, "pane-border-format", " [ ###P #T ] "]),
            cmd(&["set-option", "-t", name, "base-index", "1"]),
            cmd(&["set-option", "-w", "-t", name, "pane-base-index", "1"]),
        ];

        for (title, command) in &self.panes {
            cmds.push(cmd(&["split-window", "-t", name, command.as_str()]));
            // The new pane is the active one.
            cmds.push(cmd(&["select-pane", "-t", name, "-T", title.as_str()]));
            cmds.push(cmd(&["select-layout", "-t", name, "tiled"]));
        }

        cmds.push(cmd(&["kill-pane", "-t", placeholder]));
        cmds.push(cmd(&["select-layout", "-t", name, "tiled"]));
        cmds.push(cmd(&["set-option", "-w", "-t", name, "synchronize-panes", "on"]));
        cmds
    }

    /// Create the session, open every pane, and attach to it.
    ///
    /// Blocks until the user detaches or the session ends.
    ///
    /// # Errors
    ///
    /// Returns [`MsshError::TmuxError`] if any tmux command fails.
    pub fn launch(&self) -> Result<()> {
        tracing::info!(session = %self.name, panes = self.panes.len(), "starting tmux session");
        let placeholder = new_session(&self.name)?;
        for args in self.setup_commands(&placeholder) {
            run(&args)?;
        }
        attach(&self.name)
    }
}

/// Run one tmux command, failing on a non-zero exit.
fn run(args: &[String]) -> Result<()> {
    tracing::debug!(?args, "tmux");
    let status = Command::new("tmux")
        .args(args)
        .status()
        .map_err(|e| MsshError::TmuxError(e.to_string()))?;

    if !status.success() {
        let verb = args.first().map(String::as_str).unwrap_or("tmux");
        return Err(MsshError::TmuxError(format!("{} failed", verb)));
    }

    Ok(())
}

/// Create a detached session and return the id of its first pane.
fn new_session(name: &str) -> Result<String> {
    let output = Command::new("tmux")
        .args(["new-session", "-d", "-s", name, "-P", "-F", "#{pane_id}"])
        .output()
        .map_err(|e| MsshError::TmuxError(e.to_string()))?;

    if !output.status.success() {
        return Err(MsshError::TmuxError(format!(
            "new-session {} failed: {}",
            name,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let pane = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if pane.is_empty() {
        return Err(MsshError::TmuxError("new-session did not report a pane".into()));
    }
    Ok(pane)
}

/// Attach to the session, or switch to it from inside tmux.
fn attach(name: &str) -> Result<()> {
    let verb = if in_tmux() { "switch-client" } else { "attach-session" };
    run(&[verb.to_string(), "-t".to_string(), name.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::targets;
    use chrono::TimeZone;

    fn plan() -> SessionPlan {
        let hosts = vec!["web1".to_string(), "web2".to_string(), "db1".to_string()];
        SessionPlan::new("mssh-test", "ssh", &targets("ops", &hosts))
    }

    fn position(cmds: &[Vec<String>], pred: impl Fn(&Vec<String>) -> bool) -> Vec<usize> {
        cmds.iter()
            .enumerate()
            .filter(|(_, c)| pred(c))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_session_name() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 9, 30, 5).unwrap();
        assert_eq!(session_name(now), "mssh-20240131T093005");
    }

    #[test]
    fn test_one_pane_per_target() {
        let cmds = plan().setup_commands("%0");
        let splits: Vec<_> = cmds
            .iter()
            .filter(|c| c[0] == "split-window")
            .map(|c| c.last().unwrap().as_str())
            .collect();
        assert_eq!(splits, vec!["ssh ops@web1", "ssh ops@web2", "ssh ops@db1"]);

        let titles: Vec<_> = cmds
            .iter()
            .filter(|c| c[0] == "select-pane")
            .map(|c| c.last().unwrap().as_str())
            .collect();
        assert_eq!(titles, vec!["web1", "web2", "db1"]);
    }

    #[test]
    fn test_panes_exist_before_sync_and_kill() {
        let cmds = plan().setup_commands("%7");
        let splits = position(&cmds, |c| c[0] == "split-window");
        let kill = position(&cmds, |c| c[0] == "kill-pane");
        let sync = position(&cmds, |c| c.contains(&"synchronize-panes".to_string()));

        assert_eq!(kill.len(), 1);
        assert_eq!(cmds[kill[0]], vec!["kill-pane", "-t", "%7"]);
        assert!(splits.iter().all(|&s| s < kill[0]));
        assert!(splits.iter().all(|&s| s < sync[0]));
        assert_eq!(sync[0], cmds.len() - 1);
    }

    #[test]
    fn test_tiled_before_and_after_kill() {
        let cmds = plan().setup_commands("%0");
        let kill = position(&cmds, |c| c[0] == "kill-pane")[0];
        let tiled = position(&cmds, |c| c[0] == "select-layout");
        assert!(tiled.iter().any(|&t| t < kill));
        assert!(tiled.iter().any(|&t| t > kill));
        assert!(cmds[tiled[0]].ends_with(&["tiled".to_string()]));
    }

    #[test]
    fn test_everything_targets_the_session() {
        let cmds = plan().setup_commands("%0");
        for c in cmds.iter().filter(|c| c[0] != "kill-pane") {
            let t = c.iter().position(|a| a == "-t").unwrap();
            assert_eq!(c[t + 1], "mssh-test", "{:?}", c);
        }
    }

    #[test]
    fn test_session_options_come_first() {
        let cmds = plan().setup_commands("%0");
        let first_split = position(&cmds, |c| c[0] == "split-window")[0];
        let base = position(&cmds, |c| c.contains(&"pane-base-index".to_string()))[0];
        assert!(base < first_split);
        assert_eq!(cmds[0][0], "rename-window");
    }
}
