pub mod holidays;
pub mod init;
pub mod notes;
pub mod root;
pub mod settings;

use crate::data::{HolidayData, HolidayTable, Persistable, PersistenceGateway};
use crate::planner::{AutosavePolicy, PlannerController};
use anyhow::Result;
use std::path::Path;

/// The holiday table for this data directory: `holidays.yaml` when present,
/// otherwise the built-in 2025 national holidays.
pub fn holiday_table(data_dir: &Path) -> Result<HolidayTable> {
    if data_dir.join(HolidayData::filename()).exists() {
        let data = HolidayData::load_from(data_dir)?;
        log::info!("using {} holiday(s) from {}", data.holidays.len(), HolidayData::filename());
        Ok(HolidayTable::from_holidays(&data))
    } else {
        Ok(HolidayTable::brazil_2025())
    }
}

/// Opens a planner session, printing load warnings to stderr.
pub(crate) fn open_planner(data_dir: &Path, policy: AutosavePolicy) -> Result<PlannerController> {
    let holidays = holiday_table(data_dir)?;
    let (controller, warnings) =
        PlannerController::open(PersistenceGateway::new(data_dir), &holidays, policy);
    for w in warnings {
        eprintln!("warning: {w}");
    }
    Ok(controller)
}
