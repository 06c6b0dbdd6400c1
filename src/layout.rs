//! Terminal table layout for the tag menu.
//!
//! Menu entries are numbered and arranged in columns that fit the terminal.
//! By default the menu fills columns top to bottom using as many lines as the
//! terminal offers; when that is too wide it falls back to the largest number
//! of evenly split columns that still fits.
//!
//! Widths are measured in terminal cells, not bytes.

use unicode_width::UnicodeWidthStr;

/// Separator appended to every menu entry except those in the last column.
pub const DEFAULT_SEPARATOR: &str = "  ";

/// Lines kept free below the menu for the prompt.
pub const DEFAULT_RESERVED_LINES: usize = 5;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl Default for TermSize {
    fn default() -> Self {
        TermSize {
            width: 80,
            height: 24,
        }
    }
}

/// Query the current terminal size, falling back to 80x24.
pub fn terminal_size() -> TermSize {
    match crossterm::terminal::size() {
        Ok((width, height)) if width > 0 && height > 0 => TermSize {
            width: width as usize,
            height: height as usize,
        },
        _ => TermSize::default(),
    }
}

/// How to lay out the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Force exactly this many columns instead of fitting to the terminal.
    pub columns: Option<usize>,
    /// Terminal lines to leave for surrounding text.
    pub reserved_lines: usize,
    /// Appended to each entry; acts as the gap between columns.
    pub separator: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            columns: None,
            reserved_lines: DEFAULT_RESERVED_LINES,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// A list of columns, each a list of entries top to bottom.
type Table = Vec<Vec<String>>;

/// Number and pad the labels: `" 7. label<sep>"`.
///
/// The index is right-aligned to the width of the largest index.
pub fn format_items(labels: &[String], separator: &str) -> Vec<String> {
    let digits = labels.len().to_string().len();
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{:>digits$}. {}{}", i + 1, label, separator))
        .collect()
}

/// Split into `count` columns of `per_column` entries, dropping empty ones.
fn chunk(items: &[String], per_column: usize, count: usize, separator: &str) -> Table {
    let per_column = per_column.max(1);
    let mut table: Table = items
        .chunks(per_column)
        .take(count)
        .map(<[String]>::to_vec)
        .collect();

    // The last column needs no trailing gap.
    if let Some(last) = table.last_mut() {
        for item in last.iter_mut() {
            if let Some(stripped) = item.strip_suffix(separator) {
                *item = stripped.to_string();
            }
        }
    }
    table
}

/// Fill columns top to bottom using every available terminal line.
fn vertical_table(items: &[String], reserved_lines: usize, separator: &str, size: TermSize) -> Table {
    let lines = size.height.saturating_sub(reserved_lines).max(1);
    let columns = items.len().div_ceil(lines);
    chunk(items, lines, columns, separator)
}

/// Split evenly into `columns` columns, filling each top to bottom.
fn horizontal_table(items: &[String], columns: usize, separator: &str) -> Table {
    let columns = columns.max(1);
    let rows = items.len().div_ceil(columns);
    chunk(items, rows, columns, separator)
}

fn column_widths(table: &Table) -> Vec<usize> {
    table
        .iter()
        .map(|col| col.iter().map(|item| item.width()).max().unwrap_or(0))
        .collect()
}

fn fits(table: &Table, size: TermSize) -> bool {
    column_widths(table).iter().sum::<usize>() <= size.width
}

/// Largest column count whose even split still fits the terminal.
///
/// Counts are probed upwards from 2; the first that overflows selects the one
/// before it. One column is used even if it overflows.
fn optimal_columns(items: &[String], separator: &str, size: TermSize) -> usize {
    for count in 2..=items.len() {
        if !fits(&horizontal_table(items, count, separator), size) {
            return count - 1;
        }
    }
    items.len().max(1)
}

/// Pad the last column, transpose, and left-align each entry.
fn render(mut table: Table) -> Vec<String> {
    let widths = column_widths(&table);
    let rows = table.iter().map(Vec::len).max().unwrap_or(0);
    if let Some(last) = table.last_mut() {
        last.resize(rows, String::new());
    }

    (0..rows)
        .map(|row| {
            table
                .iter()
                .zip(&widths)
                .map(|(col, &width)| {
                    let item = &col[row];
                    let pad = width.saturating_sub(item.width());
                    format!("{}{}", item, " ".repeat(pad))
                })
                .collect()
        })
        .collect()
}

/// Lay out already formatted entries (see [`format_items`]) as printable lines.
pub fn make_table(items: &[String], options: &LayoutOptions, size: TermSize) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    render(build_table(items, options, size))
}

fn build_table(items: &[String], options: &LayoutOptions, size: TermSize) -> Table {
    let sep = options.separator.as_str();
    match options.columns {
        Some(columns) => horizontal_table(items, columns, sep),
        None => {
            let table = vertical_table(items, options.reserved_lines, sep, size);
            if fits(&table, size) {
                table
            } else {
                let columns = optimal_columns(items, sep, size);
                tracing::debug!(columns, width = size.width, "vertical menu too wide");
                horizontal_table(items, columns, sep)
            }
        }
    }
}

/// Number, lay out, and render menu labels in one step.
pub fn menu_lines(labels: &[String], options: &LayoutOptions, size: TermSize) -> Vec<String> {
    let items = format_items(labels, &options.separator);
    make_table(&items, options, size)
}
