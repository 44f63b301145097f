pub mod autosave;
pub mod controller;

pub use autosave::{AutosavePolicy, SaveState};
pub use controller::{DisplayData, PlannerController, UndoOutcome};
