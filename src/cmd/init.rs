use crate::data::{HolidayData, Persistable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run(data_dir: &Path) -> Result<()> {
    println!("Initializing data directory: {}", data_dir.display());
    let wrote = run_in_dir(data_dir)?;
    if wrote {
        println!("✓ {} created", HolidayData::filename());
    } else {
        println!("• {} already present, left untouched", HolidayData::filename());
    }
    println!("\n✓ Initialization complete!");
    Ok(())
}

/// Creates `dir` and writes the editable holiday configuration unless one
/// exists. Returns whether the file was written.
pub(crate) fn run_in_dir(dir: &Path) -> Result<bool> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    if dir.join(HolidayData::filename()).exists() {
        return Ok(false);
    }
    HolidayData::brazil_2025().save_to(dir)?;
    log::info!("wrote default holidays to {}", dir.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::holiday::Holiday;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_writes_builtin_holidays() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("AgendaApp");
        assert!(run_in_dir(&dir).unwrap());
        let loaded = HolidayData::load_from(&dir).unwrap();
        assert_eq!(loaded.holidays, HolidayData::brazil_2025().holidays);
    }

    #[test]
    fn test_run_in_dir_keeps_existing_file() {
        let tmp = TempDir::new().unwrap();
        let mut custom = HolidayData::default();
        custom.add(Holiday::new("Custom", 3, 3));
        custom.save_to(tmp.path()).unwrap();
        assert!(!run_in_dir(tmp.path()).unwrap());
        let loaded = HolidayData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.holidays.len(), 1);
        assert_eq!(loaded.holidays[0].name, "Custom");
    }
}
