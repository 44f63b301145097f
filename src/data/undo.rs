use crate::data::day_key::DayKey;
use std::collections::HashMap;

/// Per-cell stacks of earlier note text, keyed by the month index that was
/// active when the edit happened and the edited day.
///
/// In-memory only and unbounded; it lives as long as the session.
#[derive(Debug, Default)]
pub struct UndoHistory {
    stacks: HashMap<(usize, DayKey), Vec<String>>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, month_index: usize, key: DayKey, previous_text: &str) {
        self.stacks
            .entry((month_index, key))
            .or_default()
            .push(previous_text.to_string());
    }

    /// Removes and returns the most recent snapshot, or `None` when there is
    /// nothing to undo.
    pub fn pop_restore(&mut self, month_index: usize, key: DayKey) -> Option<String> {
        let stack = self.stacks.get_mut(&(month_index, key))?;
        let text = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(&(month_index, key));
        }
        text
    }

    #[cfg(test)]
    pub fn clear(&mut self, month_index: usize, key: DayKey) {
        self.stacks.remove(&(month_index, key));
    }

    #[cfg(test)]
    pub fn depth(&self, month_index: usize, key: DayKey) -> usize {
        self.stacks
            .get(&(month_index, key))
            .map(Vec::len)
            .unwrap_or(0)
    }
}
