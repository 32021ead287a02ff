//! Query State Value Objects
//!
//! Immutable snapshots of the persisted query state, recomputed wholesale
//! on every navigation change rather than mutated incrementally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::model::SortKey;
use crate::core::tabs::Tab;

// ============================================================================
// Filter State
// ============================================================================

/// Ordered mapping from filter key to selected option ids.
///
/// Keys keep insertion order so the encoded form is deterministic; values
/// behave as a set per key (duplicates dropped on insert).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    entries: IndexMap<String, Vec<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter entry; empty values are dropped and duplicates
    /// collapsed. An entry left with no values is removed entirely.
    pub fn insert<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        let mut deduped: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim().to_string();
            if !value.is_empty() && !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        if deduped.is_empty() {
            self.entries.shift_remove(&key.into());
        } else {
            self.entries.insert(key.into(), deduped);
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keep only entries whose key satisfies the predicate.
    pub fn retain_keys<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|k, _| keep(k));
    }
}

// ============================================================================
// Query State
// ============================================================================

/// One decoded snapshot of the persisted query representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Active tab
    pub tab: Tab,
    /// Free-text search term
    #[serde(default)]
    pub search: String,
    /// Requested page, 1-based
    pub page: u32,
    /// Requested page size, already clamped by the codec
    pub page_size: u32,
    /// Sort order
    pub sort: SortKey,
    /// Active tab-scoped filters
    #[serde(default)]
    pub filters: FilterState,
    /// Collapsed UI section ids, persisted verbatim; not semantic
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collapsed: Vec<String>,
}

impl QueryState {
    /// Fresh state for a tab with its default sort and a given page size.
    pub fn for_tab(tab: Tab, page_size: u32) -> Self {
        Self {
            tab,
            search: String::new(),
            page: 1,
            page_size,
            sort: tab.spec().default_sort,
            filters: FilterState::new(),
            collapsed: Vec::new(),
        }
    }
}
