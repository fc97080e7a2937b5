//! Recently viewed locations, most recent first.

use serde::Serialize;

use crate::model::ResolvedLocation;

pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecentHistory {
    entries: Vec<ResolvedLocation>,
}

impl RecentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new history with `location` in front. An entry at the same
    /// coordinates is replaced, and anything past [`HISTORY_LIMIT`] is dropped.
    #[must_use]
    pub fn record(&self, location: ResolvedLocation) -> Self {
        let mut entries = Vec::with_capacity(HISTORY_LIMIT);
        entries.push(location);

        let newest = entries[0].coordinates;
        entries.extend(
            self.entries
                .iter()
                .filter(|e| e.coordinates != newest)
                .take(HISTORY_LIMIT - 1)
                .cloned(),
        );

        Self { entries }
    }

    pub fn entries(&self) -> &[ResolvedLocation] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedLocation> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
