//! Menu selection parsing.
//!
//! A selection is a comma-separated list of menu indices and inclusive
//! ranges, e.g. `1,3-5`. Whitespace anywhere in the input is ignored.
//!
//! Single indices must lie in `1..=max`. Range endpoints are only checked
//! against each other (`end + 1 >= start`) unless strict mode is enabled, in
//! which case both endpoints must also lie in `1..=max`.

use crate::error::{MsshError, Result};
use std::fmt;

/// Parsed menu indices, in the order and multiplicity the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// The 1-based indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&joined.join(","))
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Selection(indices)
    }
}

/// Controls how range endpoints are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeCheck {
    /// Only require `end + 1 >= start`.
    #[default]
    Lenient,
    /// Additionally require both endpoints to lie in `1..=max`.
    Strict,
}

/// Remove every whitespace character.
///
/// This is also the form in which a selection is remembered.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_number(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a selection string against a menu of `max` entries.
///
/// The whole input is rejected if any token is invalid.
///
/// # Errors
///
/// Returns [`MsshError::InvalidSelection`] naming the first bad token.
///
/// # Examples
///
/// ```
/// use mssh::selection::{parse_selection, RangeCheck};
///
/// let sel = parse_selection("1, 3-5", 10, RangeCheck::Lenient).unwrap();
/// assert_eq!(sel.indices(), &[1, 3, 4, 5]);
/// assert!(parse_selection("0", 5, RangeCheck::Lenient).is_err());
/// ```
pub fn parse_selection(input: &str, max: usize, check: RangeCheck) -> Result<Selection> {
    let normalized = normalize(input);
    let mut indices = Vec::new();

    for token in normalized.split(',') {
        let invalid = || MsshError::InvalidSelection(token.to_string());

        if token.matches('-').count() == 1 {
            let (start, end) = token.split_once('-').ok_or_else(invalid)?;
            let (start, end) = match (parse_number(start), parse_number(end)) {
                (Some(s), Some(e)) if s <= e.saturating_add(1) => (s, e),
                _ => return Err(invalid()),
            };
            if check == RangeCheck::Strict && !(in_bounds(start, max) && in_bounds(end, max)) {
                return Err(invalid());
            }
            indices.extend(start..=end);
        } else {
            match parse_number(token) {
                Some(n) if in_bounds(n, max) => indices.push(n),
                _ => return Err(invalid()),
            }
        }
    }

    Ok(Selection(indices))
}

fn in_bounds(n: usize, max: usize) -> bool {
    (1..=max).contains(&n)
}
