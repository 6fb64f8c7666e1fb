//! Bounded linear undo/redo over snapshots of the campaign collection.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::ledger::Campaign;

/// Snapshot stack with a cursor. Entries are deep copies; nothing in the
/// live collection aliases a snapshot.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Campaign>>,
    index: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history holding at most `capacity` snapshots (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: None,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records `state` as the newest snapshot, dropping any redo branch and
    /// evicting the oldest entry once full.
    pub fn push(&mut self, state: &[Campaign]) {
        let keep = self.index.map_or(0, |index| index + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(state.to_vec());
        if self.snapshots.len() > self.capacity {
            let overflow = self.snapshots.len() - self.capacity;
            self.snapshots.drain(..overflow);
        }
        self.index = Some(self.snapshots.len() - 1);
    }

    /// Steps back one snapshot and returns a copy of it.
    pub fn undo(&mut self) -> Option<Vec<Campaign>> {
        let index = self.index.filter(|index| *index > 0)? - 1;
        self.index = Some(index);
        self.snapshots.get(index).cloned()
    }

    /// Steps forward one snapshot and returns a copy of it.
    pub fn redo(&mut self) -> Option<Vec<Campaign>> {
        if !self.can_redo() {
            return None;
        }
        let index = self.index.map_or(0, |index| index + 1);
        self.index = Some(index);
        self.snapshots.get(index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(index) if index > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(index) => index + 1 < self.snapshots.len(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position, `None` while nothing has been recorded.
    pub fn position(&self) -> Option<usize> {
        self.index
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CampaignForm, DateRange, MetricType, RateConfig, TemplateType};
    use chrono::NaiveDate;

    fn state(name: &str) -> Vec<Campaign> {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        vec![Campaign::new(
            name,
            TemplateType::SemSocial,
            RateConfig::new(8.0, MetricType::Cpm),
            DateRange::new(day, day).unwrap(),
            CampaignForm::default(),
            Vec::new(),
        )]
    }

    fn name_of(state: &[Campaign]) -> &str {
        &state[0].name
    }

    #[test]
    fn empty_history_cannot_move() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.position(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn first_snapshot_is_not_undoable() {
        let mut history = History::new();
        history.push(&state("a"));
        assert_eq!(history.position(), Some(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn undo_and_redo_walk_the_stack() {
        let mut history = History::new();
        history.push(&state("a"));
        history.push(&state("b"));
        history.push(&state("c"));

        assert_eq!(name_of(&history.undo().unwrap()), "b");
        assert_eq!(name_of(&history.undo().unwrap()), "a");
        assert!(history.can_redo());
        assert_eq!(name_of(&history.redo().unwrap()), "b");
        assert_eq!(name_of(&history.redo().unwrap()), "c");
        assert!(!history.can_redo());
    }

    #[test]
    fn push_after_undo_discards_the_redo_branch() {
        let mut history = History::new();
        history.push(&state("a"));
        history.push(&state("b"));
        history.undo();
        history.push(&state("c"));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(name_of(&history.undo().unwrap()), "a");
    }

    #[test]
    fn capacity_evicts_oldest_snapshots() {
        let mut history = History::with_capacity(3);
        for name in ["a", "b", "c", "d", "e"] {
            history.push(&state(name));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(name_of(&history.undo().unwrap()), "d");
        assert_eq!(name_of(&history.undo().unwrap()), "c");
        assert!(history.undo().is_none());
    }

    #[test]
    fn snapshots_do_not_alias_live_state() {
        let mut history = History::new();
        let mut live = state("a");
        history.push(&live);
        live[0].name = "mutated".into();
        history.push(&live);
        assert_eq!(name_of(&history.undo().unwrap()), "a");
    }
}
