//! Query State Holder
//!
//! The persisted query representation is the single mutable shared
//! resource in the engine. This holder exposes exactly two operations,
//! `read` and `commit`; every mutation (user edits and silent
//! corrections alike) routes through `commit`, never through side
//! effects of fetch or assembly.

use std::sync::RwLock;

/// Single state-holder for the persisted textual query representation.
#[derive(Debug, Default)]
pub struct QueryStateStore {
    raw: RwLock<String>,
}

impl QueryStateStore {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(initial.into()),
        }
    }

    /// Current persisted representation. Read at the start of every
    /// cycle; no component caches it independently.
    pub fn read(&self) -> String {
        self.raw.read().expect("query state lock poisoned").clone()
    }

    /// Replace the persisted representation. Returns whether anything
    /// changed (a no-op commit is not a navigation event).
    pub fn commit(&self, next: impl Into<String>) -> bool {
        let next = next.into();
        let mut raw = self.raw.write().expect("query state lock poisoned");
        if *raw == next {
            return false;
        }
        log::debug!("Query state commit: '{}' -> '{}'", raw, next);
        *raw = next;
        true
    }
}
