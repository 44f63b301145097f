use crate::data::error::PlannerError;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The year every planner cell belongs to.
pub const PLANNER_YEAR: i32 = 2025;

/// Identifies one calendar cell of the planner year.
///
/// Only constructible for dates that exist in [`PLANNER_YEAR`], so a `DayKey`
/// in hand is always valid. Ordered by month, then day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    month: u32,
    day: u32,
}

impl DayKey {
    pub fn new(month: u32, day: u32) -> Result<Self, PlannerError> {
        if NaiveDate::from_ymd_opt(PLANNER_YEAR, month, day).is_none() {
            return Err(PlannerError::InvalidDayKey(format!("{month}_{day}")));
        }
        Ok(DayKey { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Zero-based month index, as used by the active-month record.
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// Day 1 of the month with zero-based `month_index` (taken modulo 12).
    pub fn first_of_month(month_index: usize) -> Self {
        DayKey {
            month: (month_index % 12) as u32 + 1,
            day: 1,
        }
    }

    pub fn date(&self) -> NaiveDate {
        // Validated on construction.
        NaiveDate::from_ymd_opt(PLANNER_YEAR, self.month, self.day).unwrap_or_default()
    }

    /// Every day of the planner year in calendar order.
    pub fn all() -> impl Iterator<Item = DayKey> {
        (1..=12).flat_map(|month| {
            (1..=days_in_month(month)).map(move |day| DayKey { month, day })
        })
    }

    /// Every day of one month (1-based) in order. Empty for an invalid month.
    pub fn month_days(month: u32) -> impl Iterator<Item = DayKey> {
        let last = if (1..=12).contains(&month) {
            days_in_month(month)
        } else {
            0
        };
        (1..=last).map(move |day| DayKey { month, day })
    }
}

/// Number of days in `month` (1-based) of the planner year.
pub fn days_in_month(month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(PLANNER_YEAR + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(PLANNER_YEAR, month + 1, 1)
    };
    match (next, NaiveDate::from_ymd_opt(PLANNER_YEAR, month, 1)) {
        (Some(n), Some(first)) => n.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.month, self.day)
    }
}

impl FromStr for DayKey {
    type Err = PlannerError;

    /// Parses the `{month}_{day}` form used by the notes record.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidDayKey(s.to_string());
        let (month, day) = s.trim().split_once('_').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        DayKey::new(month, day).map_err(|_| invalid())
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_dates() {
        let key = DayKey::new(3, 15).unwrap();
        assert_eq!(key.month(), 3);
        assert_eq!(key.day(), 15);
        assert_eq!(key.month_index(), 2);
    }

    #[test]
    fn test_new_rejects_impossible_dates() {
        assert!(DayKey::new(2, 29).is_err()); // 2025 is not a leap year
        assert!(DayKey::new(4, 31).is_err());
        assert!(DayKey::new(13, 1).is_err());
        assert!(DayKey::new(0, 1).is_err());
        assert!(DayKey::new(1, 0).is_err());
    }

    #[test]
    fn test_display_uses_unpadded_underscore_form() {
        assert_eq!(DayKey::new(3, 5).unwrap().to_string(), "3_5");
        assert_eq!(DayKey::new(12, 25).unwrap().to_string(), "12_25");
    }

    #[test]
    fn test_parse_round_trips_display() {
        let key: DayKey = "11_15".parse().unwrap();
        assert_eq!(key, DayKey::new(11, 15).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("3-15".parse::<DayKey>().is_err());
        assert!("3_".parse::<DayKey>().is_err());
        assert!("x_1".parse::<DayKey>().is_err());
        assert!("2_30".parse::<DayKey>().is_err());
        assert!("".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_all_yields_365_days_in_order() {
        let days: Vec<DayKey> = DayKey::all().collect();
        assert_eq!(days.len(), 365);
        assert_eq!(days[0], DayKey::new(1, 1).unwrap());
        assert_eq!(days[364], DayKey::new(12, 31).unwrap());
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(DayKey::first_of_month(0), DayKey::new(1, 1).unwrap());
        assert_eq!(DayKey::first_of_month(11), DayKey::new(12, 1).unwrap());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1), 31);
        assert_eq!(days_in_month(2), 28);
        assert_eq!(days_in_month(4), 30);
        assert_eq!(days_in_month(12), 31);
    }

    #[test]
    fn test_month_days_invalid_month_is_empty() {
        assert_eq!(DayKey::month_days(13).count(), 0);
        assert_eq!(DayKey::month_days(2).count(), 28);
    }

    #[test]
    fn test_serializes_as_string_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(DayKey::new(3, 15).unwrap(), "Dentist 3pm".to_string());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"3_15":"Dentist 3pm"}"#);
    }
}
