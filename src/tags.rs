//! Tag index: which hosts carry which tag.
//!
//! Tags are kept in natural order; their 1-based position is the number a
//! user types in the menu.

use crate::error::{MsshError, Result};
use crate::inventory::Inventory;
use crate::natural::natural_sort;
use crate::selection::Selection;
use std::collections::{HashMap, HashSet};

/// Naturally sorted tags and the hosts filed under each.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: Vec<String>,
    hosts: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    /// Build the index from a loaded inventory.
    pub fn build(inventory: &Inventory) -> Self {
        let mut hosts: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in inventory.hosts() {
            for tag in &entry.tags {
                hosts
                    .entry(tag.clone())
                    .or_default()
                    .insert(entry.host.clone());
            }
        }

        let mut tags: Vec<String> = hosts.keys().cloned().collect();
        natural_sort(&mut tags);
        tracing::debug!(tags = tags.len(), "built tag index");

        TagIndex { tags, hosts }
    }

    /// All tags in menu order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of tags (the largest valid menu index).
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tag at a 1-based menu index.
    pub fn tag(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.tags.get(i))
            .map(String::as_str)
    }

    /// Hosts carrying `tag`, in no particular order.
    pub fn hosts(&self, tag: &str) -> Option<&HashSet<String>> {
        self.hosts.get(tag)
    }

    /// Resolve menu indices to the union of their hosts.
    ///
    /// Hosts are returned once each, in the order they first appear in the
    /// inventory. Repeated indices have no effect.
    ///
    /// # Errors
    ///
    /// Returns [`MsshError::SelectionOutOfRange`] if an index addresses no
    /// tag. Only ranges can produce such indices; see
    /// [`crate::selection::RangeCheck`].
    pub fn resolve(&self, inventory: &Inventory, selection: &Selection) -> Result<Vec<String>> {
        let mut chosen: HashSet<&str> = HashSet::new();
        for &index in selection.indices() {
            let tag = self.tag(index).ok_or(MsshError::SelectionOutOfRange {
                index,
                max: self.len(),
            })?;
            if let Some(hosts) = self.hosts.get(tag) {
                chosen.extend(hosts.iter().map(String::as_str));
            }
        }

        let mut resolved: Vec<&str> = chosen.into_iter().collect();
        resolved.sort_by_key(|host| inventory.position(host));
        Ok(resolved.into_iter().map(str::to_string).collect())
    }
}
