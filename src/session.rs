//! Session-local state: the history log, alias table, and bookmark table.
//!
//! All three tables live for the process session only and are owned by one
//! [`Session`] value passed explicitly to the shell, so command handlers can
//! be exercised against fixture state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::alias::AliasTable;

#[derive(Debug, Default)]
pub struct Session {
    pub aliases: AliasTable,
    history: Vec<String>,
    bookmarks: BTreeMap<String, PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one dispatched line to the history log.
    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    /// The log in dispatch order. Display indices are 1-based.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Drop the whole log. Entries are never edited in place.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Save `path` under `name`, overwriting any previous bookmark.
    pub fn set_bookmark(&mut self, name: &str, path: PathBuf) {
        self.bookmarks.insert(name.to_string(), path);
    }

    /// The directory saved under `name`, if any. The path is resolved at
    /// `goto` time, so a bookmark can go stale without this failing.
    pub fn bookmark(&self, name: &str) -> Option<&Path> {
        self.bookmarks.get(name).map(PathBuf::as_path)
    }

    /// Remove a bookmark. Returns whether it existed.
    pub fn remove_bookmark(&mut self, name: &str) -> bool {
        self.bookmarks.remove(name).is_some()
    }

    pub fn has_bookmarks(&self) -> bool {
        !self.bookmarks.is_empty()
    }

    /// Bookmarks in name order.
    pub fn bookmarks(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.bookmarks
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }
}
