//! Multi-select state keyed by record identifier.

use std::collections::HashSet;

/// The set of selected record identifiers.
///
/// Identifiers are not purged when the collection is refreshed, so a
/// selection may refer to records that are no longer present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Adds or removes one identifier. Returns `true` if the set changed.
    pub fn set(&mut self, key: impl Into<String>, selected: bool) -> bool {
        let key = key.into();
        if selected {
            self.selected.insert(key)
        } else {
            self.selected.remove(&key)
        }
    }

    /// Replaces the whole selection.
    pub fn replace<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selected = keys.into_iter().collect();
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns the number of selected identifiers.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get all selected keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
