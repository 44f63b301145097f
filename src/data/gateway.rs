use crate::data::day_key::DayKey;
use crate::data::error::PlannerError;
use crate::data::persistence::{read_if_exists, write_atomic};
use crate::data::settings::Settings;
use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const NOTES_FILE: &str = "data.json";
pub const ACTIVE_MONTH_FILE: &str = "active_month.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the application directory under the user's home.
pub const APP_DIR_NAME: &str = "AgendaApp";

#[derive(Serialize, Deserialize, Default, Debug)]
struct ActiveMonthRecord {
    #[serde(default)]
    active_month: i64,
}

/// Reads and writes the notes, active-month and settings records.
///
/// Holds no planner state; it only converts snapshots to and from files in
/// one directory, which is created on the first save.
#[derive(Clone, Debug)]
pub struct PersistenceGateway {
    dir: PathBuf,
}

impl PersistenceGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PersistenceGateway { dir: dir.into() }
    }

    /// `~/AgendaApp`.
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let dirs = directories::BaseDirs::new().context("locating home directory")?;
        Ok(dirs.home_dir().join(APP_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn save_all(
        &self,
        notes: &BTreeMap<DayKey, String>,
        active_month: usize,
        settings: &Settings,
    ) -> Result<(), PlannerError> {
        fs::create_dir_all(&self.dir).map_err(|e| PlannerError::persistence(&self.dir, e))?;
        self.write_record(NOTES_FILE, notes)?;
        self.write_record(
            ACTIVE_MONTH_FILE,
            &ActiveMonthRecord {
                active_month: active_month as i64,
            },
        )?;
        self.write_record(SETTINGS_FILE, settings)?;
        debug!(
            "saved {} note(s), active month {active_month} to {}",
            notes.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Missing or malformed record yields an empty map. Entries whose key is
    /// not a day of the planner year are dropped.
    pub fn load_notes(&self) -> Result<BTreeMap<DayKey, String>, PlannerError> {
        let Some(raw) = self.read_record(NOTES_FILE)? else {
            return Ok(BTreeMap::new());
        };
        let parsed: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!("{NOTES_FILE} is malformed, starting with no notes: {e}");
                return Ok(BTreeMap::new());
            }
        };
        let mut notes = BTreeMap::new();
        for (raw_key, value) in parsed {
            let key = match raw_key.parse::<DayKey>() {
                Ok(k) => k,
                Err(e) => {
                    warn!("dropping note: {e}");
                    continue;
                }
            };
            match value {
                serde_json::Value::String(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        notes.insert(key, text.to_string());
                    }
                }
                other => warn!("dropping note {key}: expected a string, found {other}"),
            }
        }
        Ok(notes)
    }

    /// Missing, malformed or out-of-range record yields 0.
    pub fn load_active_month(&self) -> Result<usize, PlannerError> {
        let Some(raw) = self.read_record(ACTIVE_MONTH_FILE)? else {
            return Ok(0);
        };
        let record: ActiveMonthRecord = match serde_json::from_str(&raw) {
            Ok(r) => r,
            Err(e) => {
                warn!("{ACTIVE_MONTH_FILE} is malformed, defaulting to January: {e}");
                return Ok(0);
            }
        };
        if !(0..12).contains(&record.active_month) {
            warn!(
                "{ACTIVE_MONTH_FILE} holds month {}, defaulting to January",
                record.active_month
            );
            return Ok(0);
        }
        Ok(record.active_month as usize)
    }

    /// Missing fields fall back to defaults one by one.
    pub fn load_settings(&self) -> Result<Settings, PlannerError> {
        let Some(raw) = self.read_record(SETTINGS_FILE)? else {
            return Ok(Settings::default());
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => Ok(Settings::from_record(&value)),
            Err(e) => {
                warn!("{SETTINGS_FILE} is malformed, using default settings: {e}");
                Ok(Settings::default())
            }
        }
    }

    fn read_record(&self, file: &str) -> Result<Option<String>, PlannerError> {
        let path = self.path_of(file);
        read_if_exists(&path).map_err(|e| PlannerError::persistence(path, e))
    }

    fn write_record<T: Serialize>(&self, file: &str, value: &T) -> Result<(), PlannerError> {
        let path = self.path_of(file);
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| PlannerError::persistence(&path, e.into()))?;
        write_atomic(&path, contents.as_bytes()).map_err(|e| PlannerError::persistence(path, e))
    }
}
