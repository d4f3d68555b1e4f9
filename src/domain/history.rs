// Bounded upload history, most recent first
use super::summary::DatasetSummary;
use std::collections::VecDeque;
use std::sync::Arc;

pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Arc<DatasetSummary>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Restore from entries already ordered newest first
    pub fn from_entries(entries: Vec<Arc<DatasetSummary>>) -> Self {
        let mut history = Self::default();
        history.entries.extend(entries);
        history.entries.truncate(history.capacity);
        history
    }

    /// Prepend an entry, evicting the oldest ones beyond capacity
    pub fn push(&mut self, summary: Arc<DatasetSummary>) {
        self.entries.push_front(summary);
        self.entries.truncate(self.capacity);
    }

    pub fn find(&self, id: &str) -> Option<Arc<DatasetSummary>> {
        self.entries.iter().find(|s| s.id == id).cloned()
    }

    pub fn newest(&self) -> Option<Arc<DatasetSummary>> {
        self.entries.front().cloned()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> Vec<Arc<DatasetSummary>> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> Arc<DatasetSummary> {
        Arc::new(DatasetSummary::summarize(name, vec![]))
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut history = History::default();
        history.push(upload("1.csv"));
        history.push(upload("2.csv"));

        let names: Vec<String> = history.entries().iter().map(|s| s.file_name.clone()).collect();
        assert_eq!(names, vec!["2.csv", "1.csv"]);
        assert_eq!(history.newest().unwrap().file_name, "2.csv");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::default();
        for i in 1..=6 {
            history.push(upload(&format!("{}.csv", i)));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let names: Vec<String> = history.entries().iter().map(|s| s.file_name.clone()).collect();
        assert_eq!(names, vec!["6.csv", "5.csv", "4.csv", "3.csv", "2.csv"]);
    }

    #[test]
    fn test_from_entries_truncates() {
        let entries: Vec<_> = (1..=7).map(|i| upload(&format!("{}.csv", i))).collect();
        let history = History::from_entries(entries);
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.newest().unwrap().file_name, "1.csv");
    }

    #[test]
    fn test_find_and_clear() {
        let mut history = History::default();
        let summary = upload("a.csv");
        history.push(summary.clone());

        assert_eq!(history.find(&summary.id).unwrap().file_name, "a.csv");
        assert!(history.find("missing").is_none());

        history.clear();
        assert!(history.is_empty());
        assert!(history.newest().is_none());
    }
}
