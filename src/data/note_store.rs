use crate::data::day_key::DayKey;
use crate::data::error::PlannerError;
use crate::data::holiday::HolidayTable;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct NoteEntry {
    pub text: String,
    /// Fixed at construction; a holiday entry never takes user text.
    pub holiday_name: Option<String>,
}

impl NoteEntry {
    pub fn is_holiday(&self) -> bool {
        self.holiday_name.is_some()
    }
}

/// Owns the note text of every day in the planner year.
#[derive(Debug)]
pub struct NoteStore {
    entries: BTreeMap<DayKey, NoteEntry>,
}

impl NoteStore {
    pub fn new(holidays: &HolidayTable) -> Self {
        let entries = DayKey::all()
            .map(|key| {
                let entry = NoteEntry {
                    text: String::new(),
                    holiday_name: holidays.name_for(key).map(str::to_string),
                };
                (key, entry)
            })
            .collect();
        NoteStore { entries }
    }

    pub fn entry(&self, key: DayKey) -> &NoteEntry {
        // Every valid key gets an entry in `new`.
        &self.entries[&key]
    }

    pub fn get(&self, key: DayKey) -> &str {
        &self.entry(key).text
    }

    pub fn is_holiday(&self, key: DayKey) -> bool {
        self.entry(key).is_holiday()
    }

    /// Replaces the text of `key`. The text is stored as given.
    pub fn set(&mut self, key: DayKey, text: &str) -> Result<(), PlannerError> {
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| PlannerError::InvalidDayKey(key.to_string()))?;
        if entry.is_holiday() {
            return Err(PlannerError::InvalidTarget(key));
        }
        entry.text = text.to_string();
        Ok(())
    }

    /// Trimmed text of every entry that is not blank, in calendar order.
    pub fn snapshot_non_empty(&self) -> BTreeMap<DayKey, String> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                let trimmed = entry.text.trim();
                (!trimmed.is_empty()).then(|| (*key, trimmed.to_string()))
            })
            .collect()
    }

    /// Applies a loaded notes mapping. Notes on holiday days cannot be
    /// applied; their keys are returned.
    pub fn restore(&mut self, notes: BTreeMap<DayKey, String>) -> Vec<DayKey> {
        notes
            .into_iter()
            .filter_map(|(key, text)| self.set(key, &text).err().map(|_| key))
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(m: u32, d: u32) -> DayKey {
        DayKey::new(m, d).unwrap()
    }

    fn store() -> NoteStore {
        NoteStore::new(&HolidayTable::brazil_2025())
    }

    #[test]
    fn test_new_has_one_entry_per_day() {
        let s = store();
        assert_eq!(s.len(), 365);
        assert!(s.snapshot_non_empty().is_empty());
    }

    #[test]
    fn test_get_defaults_to_empty() {
        assert_eq!(store().get(key(3, 15)), "");
    }

    #[test]
    fn test_set_then_get() {
        let mut s = store();
        s.set(key(3, 15), "Dentist 3pm").unwrap();
        assert_eq!(s.get(key(3, 15)), "Dentist 3pm");
    }

    #[test]
    fn test_set_preserves_whitespace() {
        let mut s = store();
        s.set(key(3, 15), "  two  spaces ").unwrap();
        assert_eq!(s.get(key(3, 15)), "  two  spaces ");
    }

    #[test]
    fn test_set_on_holiday_fails_and_leaves_state() {
        let mut s = store();
        let err = s.set(key(1, 1), "party").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidTarget(k) if k == key(1, 1)));
        assert_eq!(s.get(key(1, 1)), "");
        assert!(s.snapshot_non_empty().is_empty());
    }

    #[test]
    fn test_holiday_flags_match_table() {
        let table = HolidayTable::brazil_2025();
        let s = NoteStore::new(&table);
        for k in DayKey::all() {
            let entry = s.entry(k);
            assert_eq!(entry.is_holiday(), table.is_holiday(k.month(), k.day()));
            assert_eq!(entry.holiday_name.as_deref(), table.name_for(k));
        }
    }

    #[test]
    fn test_snapshot_skips_blank_and_trims() {
        let mut s = store();
        s.set(key(3, 15), "  Dentist 3pm \n").unwrap();
        s.set(key(3, 16), "   \n\t").unwrap();
        s.set(key(3, 17), "").unwrap();
        let snap = s.snapshot_non_empty();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[&key(3, 15)], "Dentist 3pm");
    }

    #[test]
    fn test_restore_skips_holidays() {
        let mut s = store();
        let mut notes = BTreeMap::new();
        notes.insert(key(1, 1), "should not apply".to_string());
        notes.insert(key(1, 2), "back to work".to_string());
        assert_eq!(s.restore(notes), vec![key(1, 1)]);
        assert_eq!(s.get(key(1, 1)), "");
        assert_eq!(s.get(key(1, 2)), "back to work");
    }
}
