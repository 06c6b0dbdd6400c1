//! Inventory loading.
//!
//! The inventory is a CSV file whose first row is a header, first column is a
//! host, and every later column is a free-form tag:
//!
//! ```text
//! host,role,region
//! web1,prod,east
//! web2,prod,west
//! db1,prod
//! ```
//!
//! Blank lines are skipped, cells are trimmed, and rows without a host are
//! dropped. A host without any tag is filed under [`NO_TAG`].

use crate::error::{MsshError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Tag assigned to hosts whose row carries no tags.
pub const NO_TAG: &str = "No Tag";

/// A host and the tags it carries, in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    /// Host name or address, exactly as written in the CSV (trimmed).
    pub host: String,
    /// Distinct tags for this host.
    pub tags: Vec<String>,
}

impl HostEntry {
    /// Whether this host carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Ordered host/tag table loaded from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<HostEntry>,
    positions: HashMap<String, usize>,
}

impl Inventory {
    /// Load an inventory from a CSV file.
    ///
    /// # Errors
    ///
    /// - [`MsshError::InventoryNotFound`] if the file doesn't exist
    /// - [`MsshError::IoError`] if opening fails
    /// - [`MsshError::CsvError`] if the CSV is malformed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MsshError::InventoryNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let inventory = Self::from_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            hosts = inventory.len(),
            "loaded inventory"
        );
        Ok(inventory)
    }

    /// Parse an inventory from any CSV source.
    ///
    /// The first record is treated as the header and discarded.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut inventory = Inventory::default();
        for record in csv_reader.records() {
            let record = record?;
            let mut cells = record.iter();
            let host = match cells.next() {
                Some(h) if !h.is_empty() => h,
                // A row with tags but no host is not addressable.
                _ => continue,
            };

            let mut tags: Vec<&str> = cells.filter(|t| !t.is_empty()).collect();
            if tags.is_empty() {
                tags.push(NO_TAG);
            }
            inventory.insert(host, tags);
        }

        Ok(inventory)
    }

    /// Add a row, merging its tags into an earlier row for the same host.
    fn insert(&mut self, host: &str, tags: Vec<&str>) {
        let idx = match self.positions.get(host) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push(HostEntry {
                    host: host.to_string(),
                    tags: Vec::new(),
                });
                self.positions.insert(host.to_string(), idx);
                idx
            }
        };

        let entry = &mut self.entries[idx];
        for tag in tags {
            if !entry.has_tag(tag) {
                entry.tags.push(tag.to_string());
            }
        }
    }

    /// All hosts in order of first appearance.
    pub fn hosts(&self) -> &[HostEntry] {
        &self.entries
    }

    /// Position of `host` in the inventory (0-based, first appearance).
    pub fn position(&self, host: &str) -> Option<usize> {
        self.positions.get(host).copied()
    }

    /// Number of distinct hosts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the inventory has no hosts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
