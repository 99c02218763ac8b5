use std::collections::VecDeque;

use crate::model::AnalysisEntry;

pub const HISTORY_LIMIT: usize = 10;

/// Most recent manual analyses, newest first, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisHistory {
    entries: VecDeque<AnalysisEntry>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: AnalysisEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn latest(&self) -> Option<&AnalysisEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
