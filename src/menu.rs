//! The interactive tag menu and username prompt.
//!
//! The menu is a small state machine:
//!
//! ```text
//! RENDER -> AWAIT_INPUT -> ACCEPT   selection parsed, remembered, echoed
//!               |      \-> QUIT     input starts with `q`
//!               \-> RETRY -> RENDER empty input without a default, a bad token,
//!                                  or a range reaching past the menu
//! ```
//!
//! Input and output are generic so the whole exchange can be driven from
//! tests.

use crate::context::Context;
use crate::error::{MsshError, Result};
use crate::layout::{self, TermSize};
use crate::prefs::Preferences;
use crate::selection::{Selection, normalize, parse_selection};
use std::io::{BufRead, Write};

/// How the menu ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user picked these entries.
    Accept(Selection),
    /// The user asked to quit.
    Quit,
}

enum State {
    Render,
    AwaitInput,
    Retry(String),
    Accept { raw: String, selection: Selection },
}

/// Numbered menu over a list of labels.
pub struct Menu<'a> {
    ctx: &'a Context,
    labels: &'a [String],
    term_size: fn() -> TermSize,
}

impl<'a> Menu<'a> {
    /// Menu over `labels`, sized to the real terminal.
    pub fn new(ctx: &'a Context, labels: &'a [String]) -> Self {
        Menu {
            ctx,
            labels,
            term_size: layout::terminal_size,
        }
    }

    /// Use `term_size` instead of querying the terminal.
    pub fn with_term_size(mut self, term_size: fn() -> TermSize) -> Self {
        self.term_size = term_size;
        self
    }

    /// Print the menu, laid out for the terminal's current size.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let size = (self.term_size)();
        for line in layout::menu_lines(self.labels, &self.ctx.layout, size) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Run the menu until the user accepts a selection or quits.
    ///
    /// A selection given up front in the context is parsed directly: nothing
    /// is shown, prompted, or remembered.
    ///
    /// # Errors
    ///
    /// - [`MsshError::InvalidSelection`] if an up-front selection is invalid
    /// - [`MsshError::Interrupted`] if input ends before an answer
    /// - I/O errors writing the menu or saving preferences
    pub fn run<R: BufRead, W: Write>(
        &self,
        prefs: &mut Preferences,
        input: &mut R,
        out: &mut W,
    ) -> Result<Outcome> {
        let max = self.labels.len();

        if let Some(raw) = &self.ctx.number {
            let selection = parse_selection(raw, max, self.ctx.range_check)?;
            if selection.is_empty() {
                return Err(MsshError::InvalidSelection(raw.clone()));
            }
            if let Some(index) = first_out_of_range(&selection, max) {
                return Err(MsshError::SelectionOutOfRange { index, max });
            }
            return Ok(Outcome::Accept(selection));
        }

        let key = self.ctx.inventory_key.as_str();
        let mut state = State::Render;
        loop {
            state = match state {
                State::Render => {
                    self.render(out)?;
                    State::AwaitInput
                }
                State::AwaitInput => {
                    let default = prefs.get(key).last_selection;
                    let range = if max > 1 { format!("1-{}", max) } else { "1".to_string() };
                    writeln!(
                        out,
                        "Info: Use commas to separate multiple entries and dash for ranges."
                    )?;
                    write!(
                        out,
                        "Select one or more numbers from the list [{},q] (default={}): ",
                        range,
                        if default.is_empty() { "none" } else { default.as_str() }
                    )?;
                    out.flush()?;

                    let answer = read_answer(input)?;
                    if answer.to_lowercase().starts_with('q') {
                        writeln!(out, "`q` pressed.\nProgram will now quit.\nBye.")?;
                        return Ok(Outcome::Quit);
                    }

                    let raw = if answer.is_empty() { default } else { normalize(&answer) };
                    if raw.is_empty() {
                        State::Retry("- - - - - - - - - -\nNo selection made. Try again".into())
                    } else {
                        match parse_selection(&raw, max, self.ctx.range_check) {
                            Ok(selection) if selection.is_empty() => {
                                State::Retry("No selection made. Try again".into())
                            }
                            Ok(selection) => match first_out_of_range(&selection, max) {
                                Some(index) => State::Retry(format!("Invalid input: `{}`", index)),
                                None => State::Accept { raw, selection },
                            },
                            Err(MsshError::InvalidSelection(token)) => {
                                State::Retry(format!("Invalid input: `{}`", token))
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
                State::Retry(message) => {
                    tracing::debug!(%message, "menu retry");
                    writeln!(out, "{}", message)?;
                    State::Render
                }
                State::Accept { raw, selection } => {
                    prefs.set_selection(key, &raw);
                    prefs.save()?;
                    writeln!(out, "Selected: {}", self.describe(&selection))?;
                    return Ok(Outcome::Accept(selection));
                }
            };
        }
    }

    /// `` `1. east`, `3. prod` `` for the selected entries.
    fn describe(&self, selection: &Selection) -> String {
        let digits = self.labels.len().to_string().len();
        selection
            .indices()
            .iter()
            .filter_map(|&i| {
                let label = self.labels.get(i.checked_sub(1)?)?;
                Some(format!("`{:>digits$}. {}`", i, label))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// First index a lenient range produced that addresses no entry.
fn first_out_of_range(selection: &Selection, max: usize) -> Option<usize> {
    selection
        .indices()
        .iter()
        .copied()
        .find(|i| !(1..=max).contains(i))
}

/// Read one line, trimmed. End of input counts as an interrupt.
fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(MsshError::Interrupted);
    }
    Ok(line.trim().to_string())
}

/// Decide which user to log in as.
///
/// A user given up front wins and is not remembered. Otherwise the user is
/// prompted, defaulting to the last user for this inventory, then the
/// configured user, then the local login name. The answer is remembered.
pub fn prompt_username<R: BufRead, W: Write>(
    ctx: &Context,
    prefs: &mut Preferences,
    input: &mut R,
    out: &mut W,
) -> Result<String> {
    if let Some(user) = &ctx.user {
        return Ok(user.clone());
    }

    let key = ctx.inventory_key.as_str();
    let remembered = prefs.get(key).user;
    let default = if !remembered.is_empty() {
        remembered
    } else {
        ctx.fallback_user.clone().unwrap_or_else(whoami::username)
    };

    let user = loop {
        write!(
            out,
            "Enter username (default={}): ",
            if default.is_empty() { "none" } else { default.as_str() }
        )?;
        out.flush()?;

        let answer = read_answer(input)?;
        let user = if answer.is_empty() { default.clone() } else { answer };
        if !user.is_empty() {
            break user;
        }
    };

    prefs.set_user(key, &user);
    prefs.save()?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn labels() -> Vec<String> {
        ["east", "prod", "west"].iter().map(|s| s.to_string()).collect()
    }

    fn small_terminal() -> TermSize {
        TermSize {
            width: 80,
            height: 24,
        }
    }

    fn setup() -> (tempfile::TempDir, Context, Preferences) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            inventory_key: "/srv/servers.csv".into(),
            prefs_file: dir.path().join("prefs.json"),
            ..Context::default()
        };
        let prefs = Preferences::open(&ctx.prefs_file).unwrap();
        (dir, ctx, prefs)
    }

    fn run(ctx: &Context, prefs: &mut Preferences, typed: &str) -> (Result<Outcome>, String) {
        let labels = labels();
        let menu = Menu::new(ctx, &labels).with_term_size(small_terminal);
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = menu.run(prefs, &mut input, &mut out);
        (outcome, String::from_utf8(out).unwrap())
    }

    fn accepted(indices: &[usize]) -> Outcome {
        Outcome::Accept(Selection::from(indices.to_vec()))
    }

    #[test]
    fn test_accept_remembers_and_echoes() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, out) = run(&ctx, &mut prefs, "1, 3\n");
        assert_eq!(outcome.unwrap(), accepted(&[1, 3]));
        assert!(out.contains("1. east\n2. prod\n3. west\n"));
        assert!(out.contains("[1-3,q] (default=none)"));
        assert!(out.contains("Selected: `1. east`, `3. west`"));
        assert_eq!(prefs.get("/srv/servers.csv").last_selection, "1,3");
    }

    #[test]
    fn test_empty_input_uses_default() {
        let (_dir, ctx, mut prefs) = setup();
        prefs.set_selection("/srv/servers.csv", "2-3");
        let (outcome, out) = run(&ctx, &mut prefs, "\n");
        assert_eq!(outcome.unwrap(), accepted(&[2, 3]));
        assert!(out.contains("(default=2-3)"));
    }

    #[test]
    fn test_empty_input_without_default_retries() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, out) = run(&ctx, &mut prefs, "\n2\n");
        assert_eq!(outcome.unwrap(), accepted(&[2]));
        assert!(out.contains("No selection made. Try again"));
        // The menu is drawn again after the retry.
        assert_eq!(out.matches("2. prod").count(), 3);
    }

    #[test]
    fn test_invalid_input_retries_without_saving() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, out) = run(&ctx, &mut prefs, "0\n5-3\n1,,2\n3\n");
        assert_eq!(outcome.unwrap(), accepted(&[3]));
        assert!(out.contains("Invalid input: `0`"));
        assert!(out.contains("Invalid input: `5-3`"));
        assert!(out.contains("Invalid input: ``"));
        assert_eq!(prefs.get("/srv/servers.csv").last_selection, "3");
    }

    #[test]
    fn test_range_past_menu_retries_without_saving() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, out) = run(&ctx, &mut prefs, "2-4\n3\n");
        assert_eq!(outcome.unwrap(), accepted(&[3]));
        assert!(out.contains("Invalid input: `4`"));
        assert!(!out.contains("Selected: `2. prod`"));
        assert_eq!(prefs.get("/srv/servers.csv").last_selection, "3");
    }

    #[test]
    fn test_range_past_menu_is_never_remembered() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, _) = run(&ctx, &mut prefs, "2-4\n");
        assert!(matches!(outcome, Err(MsshError::Interrupted)));

        let reopened = Preferences::open(&ctx.prefs_file).unwrap();
        assert_eq!(reopened.get("/srv/servers.csv").last_selection, "");
    }

    #[test]
    fn test_up_front_range_past_menu() {
        let (_dir, mut ctx, mut prefs) = setup();
        ctx.number = Some("2-4".into());
        let (outcome, _) = run(&ctx, &mut prefs, "");
        assert!(matches!(
            outcome,
            Err(MsshError::SelectionOutOfRange { index: 4, max: 3 })
        ));
    }

    #[test]
    fn test_quit() {
        let (_dir, ctx, mut prefs) = setup();
        prefs.set_selection("/srv/servers.csv", "1");
        let (outcome, out) = run(&ctx, &mut prefs, "  Quit\n");
        assert_eq!(outcome.unwrap(), Outcome::Quit);
        assert!(out.contains("Bye."));
    }

    #[test]
    fn test_end_of_input_is_interrupt() {
        let (_dir, ctx, mut prefs) = setup();
        let (outcome, _) = run(&ctx, &mut prefs, "");
        assert!(matches!(outcome, Err(MsshError::Interrupted)));
    }

    #[test]
    fn test_up_front_selection_skips_menu() {
        let (_dir, mut ctx, mut prefs) = setup();
        ctx.number = Some("2-3".into());
        let (outcome, out) = run(&ctx, &mut prefs, "");
        assert_eq!(outcome.unwrap(), accepted(&[2, 3]));
        assert!(out.is_empty());
        assert_eq!(prefs.get("/srv/servers.csv").last_selection, "");
    }

    #[test]
    fn test_up_front_selection_errors_propagate() {
        let (_dir, mut ctx, mut prefs) = setup();
        ctx.number = Some("9".into());
        let (outcome, _) = run(&ctx, &mut prefs, "");
        assert!(matches!(outcome, Err(MsshError::InvalidSelection(t)) if t == "9"));

        ctx.number = Some("3-2".into());
        let (outcome, _) = run(&ctx, &mut prefs, "");
        assert!(matches!(outcome, Err(MsshError::InvalidSelection(_))));
    }

    #[test]
    fn test_single_entry_prompt() {
        let (_dir, ctx, mut prefs) = setup();
        let labels = vec!["only".to_string()];
        let menu = Menu::new(&ctx, &labels).with_term_size(small_terminal);
        let mut out = Vec::new();
        menu.run(&mut prefs, &mut Cursor::new(b"1\n".to_vec()), &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("[1,q]"));
    }

    #[test]
    fn test_username_given_up_front() {
        let (_dir, mut ctx, mut prefs) = setup();
        ctx.user = Some("root".into());
        let mut out = Vec::new();
        let user = prompt_username(&ctx, &mut prefs, &mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert_eq!(user, "root");
        assert!(out.is_empty());
        assert_eq!(prefs.get("/srv/servers.csv").user, "");
    }

    #[test]
    fn test_username_prompt_remembers() {
        let (_dir, mut ctx, mut prefs) = setup();
        ctx.fallback_user = Some("ops".into());

        let mut out = Vec::new();
        let user = prompt_username(&ctx, &mut prefs, &mut Cursor::new(b"\n".to_vec()), &mut out).unwrap();
        assert_eq!(user, "ops");
        assert!(String::from_utf8(out).unwrap().contains("(default=ops)"));

        let mut out = Vec::new();
        let user =
            prompt_username(&ctx, &mut prefs, &mut Cursor::new(b"admin\n".to_vec()), &mut out).unwrap();
        assert_eq!(user, "admin");

        let reopened = Preferences::open(&ctx.prefs_file).unwrap();
        assert_eq!(reopened.get("/srv/servers.csv").user, "admin");
    }
}
