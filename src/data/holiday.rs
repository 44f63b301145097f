use crate::data::day_key::DayKey;
use crate::data::persistence::Persistable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Holiday {
    pub name: String,
    pub month: u32,
    pub day: u32,
}

impl Holiday {
    pub fn new(name: &str, month: u32, day: u32) -> Self {
        Holiday {
            name: name.to_string(),
            month,
            day,
        }
    }
}

/// On-disk holiday configuration (`holidays.yaml`).
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct HolidayData {
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl Persistable for HolidayData {
    fn filename() -> &'static str {
        "holidays.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl HolidayData {
    #[cfg(test)]
    pub fn add(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
    }

    /// National holidays of Brazil for 2025.
    pub fn brazil_2025() -> Self {
        let holidays = [
            ("Ano Novo", 1, 1),
            ("Carnaval", 2, 16),
            ("Carnaval", 2, 17),
            ("Sexta-feira Santa", 4, 2),
            ("Tiradentes", 4, 21),
            ("Dia do Trabalho", 5, 1),
            ("Corpus Christi", 6, 15),
            ("Independência", 9, 7),
            ("Nossa Senhora Aparecida", 10, 12),
            ("Finados", 11, 2),
            ("Proclamação da República", 11, 15),
            ("Natal", 12, 25),
        ]
        .into_iter()
        .map(|(name, month, day)| Holiday::new(name, month, day))
        .collect();
        HolidayData { holidays }
    }
}

/// Read-only lookup from a calendar day to its holiday name.
#[derive(Clone, Debug, Default)]
pub struct HolidayTable {
    names: BTreeMap<DayKey, String>,
}

impl HolidayTable {
    /// Builds the table from configuration entries. Entries that are not a
    /// day of the planner year are skipped.
    pub fn from_holidays(data: &HolidayData) -> Self {
        let mut names = BTreeMap::new();
        for h in &data.holidays {
            match DayKey::new(h.month, h.day) {
                Ok(key) => {
                    names.insert(key, h.name.clone());
                }
                Err(e) => log::warn!("skipping holiday '{}': {e}", h.name),
            }
        }
        HolidayTable { names }
    }

    pub fn brazil_2025() -> Self {
        Self::from_holidays(&HolidayData::brazil_2025())
    }

    pub fn is_holiday(&self, month: u32, day: u32) -> bool {
        self.name_of(month, day).is_some()
    }

    pub fn name_of(&self, month: u32, day: u32) -> Option<&str> {
        let key = DayKey::new(month, day).ok()?;
        self.name_for(key)
    }

    pub fn name_for(&self, key: DayKey) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }

    /// Holidays in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &str)> {
        self.names.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
