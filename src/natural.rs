//! Natural ("version") ordering for tag names.
//!
//! Strings are split into alternating runs of non-digits and ASCII digits.
//! Digit runs compare by numeric value and text runs compare
//! case-insensitively, so `item2` sorts before `item10` and `Item1` sorts
//! before both.
//!
//! ```
//! use mssh::natural::natural_sort;
//!
//! let mut tags = vec!["item10".to_string(), "item2".to_string(), "Item1".to_string()];
//! natural_sort(&mut tags);
//! assert_eq!(tags, ["Item1", "item2", "item10"]);
//! ```

use std::cmp::Ordering;

/// One run of a split string.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(String),
    /// Digits with leading zeros removed.
    Number(&'a str),
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            // Arbitrary length: more significant digits means a larger value.
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            // Runs alternate from a leading text run, so positions always agree.
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split into `text, number, text, number, ..., text`.
///
/// The sequence always starts and ends with a (possibly empty) text run.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    loop {
        let digit_at = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        out.push(Chunk::Text(rest[..digit_at].to_lowercase()));
        rest = &rest[digit_at..];
        if rest.is_empty() {
            break;
        }
        let text_at = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..text_at];
        let trimmed = digits.trim_start_matches('0');
        out.push(Chunk::Number(trimmed));
        rest = &rest[text_at..];
    }
    out
}

/// Compare two strings in natural order.
///
/// Strings equal under natural ordering (`tag` and `Tag`, `a07` and `a7`)
/// compare [`Ordering::Equal`]; see [`natural_sort`] for a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    chunks(a).cmp(&chunks(b))
}

/// Sort strings in natural order.
///
/// Ties under [`natural_cmp`] fall back to byte order so the result does not
/// depend on input order.
pub fn natural_sort(items: &mut [String]) {
    items.sort_by(|a, b| natural_cmp(a, b).then_with(|| a.cmp(b)));
}
