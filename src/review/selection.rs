//! Bulk-selection of table rows.

use serde::Serialize;
use std::collections::BTreeSet;

/// Selected record ids, kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    ids: BTreeSet<u64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: u64) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: u64) {
        self.ids.remove(&id);
    }

    /// Flip one row's checkbox. Returns whether the row is now selected.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// The header checkbox: select exactly `visible` or clear everything.
    pub fn set_all<I>(&mut self, visible: I, checked: bool)
    where
        I: IntoIterator<Item = u64>,
    {
        self.ids.clear();
        if checked {
            self.ids.extend(visible);
        }
    }

    /// True when every visible id is selected and there is at least one.
    pub fn is_all_selected(&self, visible: &[u64]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    /// Drop ids that are no longer visible. Returns how many were dropped.
    pub fn retain(&mut self, visible: &[u64]) -> usize {
        let before = self.ids.len();
        let visible: BTreeSet<u64> = visible.iter().copied().collect();
        self.ids.retain(|id| visible.contains(id));
        before - self.ids.len()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }
}
