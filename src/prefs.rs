//! Remembered answers, keyed by inventory file.
//!
//! The store is a small JSON document mapping the absolute path of each
//! inventory to the last selection and username used with it:
//!
//! ```json
//! {
//!   "/home/ops/servers.csv": {
//!     "user": "ops",
//!     "last_selection": "1,3-5"
//!   }
//! }
//! ```
//!
//! Older files stored `last_selection` as an array of indices; those are
//! read back as a comma-separated string.
//!
//! Every update rewrites the whole file. Two runs against the same
//! inventory at once race and the last writer wins.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What is remembered for one inventory file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Last username entered.
    #[serde(default)]
    pub user: String,
    /// Last accepted selection, as typed (whitespace removed).
    #[serde(default, deserialize_with = "selection_from_either")]
    pub last_selection: String,
}

/// `last_selection` as found on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSelection {
    Text(String),
    Indices(Vec<u64>),
}

fn selection_from_either<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let stored: Option<StoredSelection> = Option::deserialize(deserializer)?;
    Ok(match stored {
        None => String::new(),
        Some(StoredSelection::Text(s)) => s,
        Some(StoredSelection::Indices(v)) => v
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(","),
    })
}

/// The on-disk preference store.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    records: BTreeMap<String, Record>,
}

impl Preferences {
    /// Open the store at `path`. A missing or empty file is an empty store.
    ///
    /// # Errors
    ///
    /// - [`crate::MsshError::IoError`] if the file exists but can't be read
    /// - [`crate::MsshError::JsonError`] if it isn't a valid store
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), entries = records.len(), "opened preferences");

        Ok(Preferences {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Record for `key`, or an empty one if nothing is remembered yet.
    ///
    /// Looking up an unknown key does not add it to the store.
    pub fn get(&self, key: &str) -> Record {
        self.records.get(key).cloned().unwrap_or_default()
    }

    /// Remember `selection` as the last selection for `key`.
    pub fn set_selection(&mut self, key: &str, selection: &str) {
        self.records.entry(key.to_string()).or_default().last_selection = selection.to_string();
    }

    /// Remember `user` as the last username for `key`.
    pub fn set_user(&mut self, key: &str, user: &str) {
        self.records.entry(key.to_string()).or_default().user = user.to_string();
    }

    /// Write the whole store, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
