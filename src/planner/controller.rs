use crate::data::active_month::{month_name, ActiveMonthTracker};
use crate::data::day_key::DayKey;
use crate::data::error::PlannerError;
use crate::data::gateway::PersistenceGateway;
use crate::data::holiday::HolidayTable;
use crate::data::note_store::NoteStore;
use crate::data::settings::{Settings, SettingsStore};
use crate::data::undo::UndoHistory;
use crate::planner::autosave::{AutosavePolicy, SaveState, SessionState};
use log::{debug, info, warn};
use std::time::Instant;

/// What the renderer needs to draw one day.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayData {
    pub text: String,
    pub is_holiday: bool,
    pub holiday_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UndoOutcome {
    NothingToUndo,
    Restored {
        key: DayKey,
        text: String,
        save: SaveState,
    },
}

/// Drives one planner session: routes edits, undo, month changes and
/// settings into the stores and decides when they reach disk.
pub struct PlannerController {
    gateway: PersistenceGateway,
    holidays: HolidayTable,
    notes: NoteStore,
    undo: UndoHistory,
    settings: SettingsStore,
    active_month: ActiveMonthTracker,
    policy: AutosavePolicy,
    state: SessionState,
    /// The (month index at edit time, day) the undo command applies to.
    last_touched: Option<(usize, DayKey)>,
}

impl PlannerController {
    pub fn new(
        gateway: PersistenceGateway,
        holidays: &HolidayTable,
        policy: AutosavePolicy,
    ) -> Self {
        let mut active_month = ActiveMonthTracker::default();
        active_month.subscribe(|index| debug!("active month is now {}", month_name(index)));
        PlannerController {
            gateway,
            holidays: holidays.clone(),
            notes: NoteStore::new(holidays),
            undo: UndoHistory::new(),
            settings: SettingsStore::default(),
            active_month,
            policy,
            state: SessionState::Idle,
            last_touched: None,
        }
    }

    /// Builds a controller and loads the saved records into it.
    ///
    /// Load failures never stop startup: the affected record falls back to
    /// its default and a warning is returned for the user.
    pub fn open(
        gateway: PersistenceGateway,
        holidays: &HolidayTable,
        policy: AutosavePolicy,
    ) -> (Self, Vec<String>) {
        let mut controller = Self::new(gateway, holidays, policy);
        let mut warnings = Vec::new();

        match controller.gateway.load_notes() {
            Ok(notes) => {
                let total = notes.len();
                let dropped = controller.notes.restore(notes);
                info!(
                    "loaded {} note(s) from {}",
                    total - dropped.len(),
                    controller.gateway.dir().display()
                );
                for key in dropped {
                    let name = controller.holidays.name_for(key).unwrap_or_default();
                    warnings.push(format!(
                        "Note for {key} dropped: the day is now the holiday {name}"
                    ));
                }
            }
            Err(e) => warnings.push(format!("Notes not loaded: {e}")),
        }
        match controller.gateway.load_active_month() {
            Ok(index) => {
                if let Err(e) = controller.active_month.set(index as i64) {
                    warnings.push(format!("Active month not applied: {e}"));
                }
            }
            Err(e) => warnings.push(format!("Active month not loaded: {e}")),
        }
        match controller.gateway.load_settings() {
            Ok(settings) => {
                if let Err(e) = controller.settings.set(settings) {
                    warnings.push(format!("Settings not applied: {e}"));
                }
            }
            Err(e) => warnings.push(format!("Settings not loaded: {e}")),
        }

        for w in &warnings {
            warn!("{w}");
        }
        (controller, warnings)
    }

    pub fn on_edit(&mut self, key: DayKey, new_text: &str) -> Result<SaveState, PlannerError> {
        if self.notes.is_holiday(key) {
            warn!("rejected edit on holiday {key}");
            return Err(PlannerError::InvalidTarget(key));
        }
        let previous = self.notes.get(key).to_string();
        if previous == new_text {
            return Ok(self.pending_state());
        }
        self.notes.set(key, new_text)?;

        let month = self.active_month.get();
        // A blank cell has nothing worth restoring.
        if !previous.trim().is_empty() {
            self.undo.push(month, key, &previous);
        }
        self.last_touched = Some((month, key));
        Ok(self.after_change())
    }

    pub fn on_undo_requested(&mut self) -> UndoOutcome {
        let Some((month, key)) = self.last_touched else {
            info!("nothing to undo");
            return UndoOutcome::NothingToUndo;
        };
        let Some(text) = self.undo.pop_restore(month, key) else {
            info!("nothing to undo for {key}");
            return UndoOutcome::NothingToUndo;
        };
        if let Err(e) = self.notes.set(key, &text) {
            warn!("undo on {key} failed: {e}");
            return UndoOutcome::NothingToUndo;
        }
        debug!("restored {key} from history");
        let save = self.after_change();
        UndoOutcome::Restored { key, text, save }
    }

    pub fn on_month_changed(&mut self, index: i64) -> Result<(), PlannerError> {
        if self.active_month.set(index)? {
            self.state = SessionState::Dirty(Instant::now());
        }
        Ok(())
    }

    pub fn on_settings_changed(&mut self, settings: Settings) -> Result<SaveState, PlannerError> {
        self.settings.set(settings)?;
        info!("settings updated");
        Ok(self.after_change())
    }

    /// Final flush before the process exits.
    pub fn on_shutdown(&mut self) -> Result<(), PlannerError> {
        info!("shutting down, saving planner");
        self.flush()
    }

    /// Writes all three records now.
    pub fn flush(&mut self) -> Result<(), PlannerError> {
        self.gateway.save_all(
            &self.notes.snapshot_non_empty(),
            self.active_month.get(),
            self.settings.get(),
        )?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Runs a due autosave. Returns `None` when nothing was attempted.
    pub fn tick(&mut self, now: Instant) -> Option<SaveState> {
        if self.state.flush_due(self.policy, now) {
            Some(self.flush_reporting(now))
        } else {
            None
        }
    }

    pub fn display_data(&self, key: DayKey) -> DisplayData {
        let (month, day) = (key.month(), key.day());
        let is_holiday = self.holidays.is_holiday(month, day);
        DisplayData {
            text: if is_holiday {
                String::new()
            } else {
                self.notes.get(key).to_string()
            },
            is_holiday,
            holiday_name: self.holidays.name_of(month, day).map(str::to_string),
        }
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    pub fn active_month(&self) -> usize {
        self.active_month.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    #[cfg(test)]
    pub fn last_touched(&self) -> Option<(usize, DayKey)> {
        self.last_touched
    }

    #[cfg(test)]
    pub fn undo_depth(&self) -> usize {
        self.last_touched
            .map(|(month, key)| self.undo.depth(month, key))
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    fn after_change(&mut self) -> SaveState {
        let now = Instant::now();
        self.state = SessionState::Dirty(now);
        match self.policy {
            AutosavePolicy::Immediate => self.flush_reporting(now),
            AutosavePolicy::Debounced(_) => SaveState::Pending,
        }
    }

    fn flush_reporting(&mut self, now: Instant) -> SaveState {
        match self.flush() {
            Ok(()) => SaveState::Saved,
            Err(e) => {
                warn!("autosave failed, keeping changes in memory: {e}");
                self.state = SessionState::failed(self.policy, now);
                SaveState::Failed(e.to_string())
            }
        }
    }

    fn pending_state(&self) -> SaveState {
        if self.state.is_dirty() {
            SaveState::Pending
        } else {
            SaveState::Saved
        }
    }
}
