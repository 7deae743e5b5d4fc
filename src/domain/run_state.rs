// src/domain/run_state.rs

use std::collections::HashSet;

use crate::domain::property::PropertyRecord;

/// URLs already written out during the current execution. The set lives for
/// the process lifetime only; a fresh run starts empty and may re-scrape
/// anything an earlier run already appended to the file.
#[derive(Debug, Default)]
pub struct RunState {
    seen_urls: HashSet<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            seen_urls: HashSet::new(),
        }
    }

    /// Drops records whose URL has already been seen this run, then marks
    /// the kept URLs as seen. Records are matched against the set as it was
    /// on entry, so a URL repeated within one batch passes through both
    /// times.
    pub fn filter_new(&mut self, batch: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
        let fresh: Vec<PropertyRecord> = batch
            .into_iter()
            .filter(|record| !self.seen_urls.contains(&record.url))
            .collect();

        for record in &fresh {
            self.seen_urls.insert(record.url.clone());
        }
        fresh
    }

    /// Distinct URLs handed out by `filter_new` so far.
    pub fn seen_count(&self) -> usize {
        self.seen_urls.len()
    }
}
