use crate::data::DayKey;
use crate::planner::{AutosavePolicy, DisplayData, PlannerController, SaveState};
use anyhow::{Context, Result};
use std::path::Path;

pub fn show(data_dir: &Path, key: &str) -> Result<()> {
    let key: DayKey = key.parse()?;
    let planner = super::open_planner(data_dir, AutosavePolicy::Immediate)?;
    write_day(key, &planner.display_data(key), &mut std::io::stdout())
}

pub fn set(data_dir: &Path, key: &str, text: &str) -> Result<()> {
    let key: DayKey = key.parse()?;
    let mut planner = super::open_planner(data_dir, AutosavePolicy::Immediate)?;
    set_note(&mut planner, key, text)?;
    println!("Saved {key}");
    Ok(())
}

pub fn list(data_dir: &Path) -> Result<()> {
    let planner = super::open_planner(data_dir, AutosavePolicy::Immediate)?;
    write_notes(&planner, &mut std::io::stdout())
}

/// Stores trimmed `text` for `key` and fails unless it reached disk.
pub(crate) fn set_note(planner: &mut PlannerController, key: DayKey, text: &str) -> Result<()> {
    match planner.on_edit(key, text.trim())? {
        SaveState::Failed(msg) => anyhow::bail!("note for {key} not saved: {msg}"),
        SaveState::Saved | SaveState::Pending => {}
    }
    planner
        .on_shutdown()
        .with_context(|| format!("failed to save note for {key}"))
}

pub(crate) fn write_day<W: std::io::Write>(
    key: DayKey,
    data: &DisplayData,
    out: &mut W,
) -> Result<()> {
    let date = key.date().format("%a %d %b %Y");
    match &data.holiday_name {
        Some(name) => writeln!(out, "{key} ({date}) holiday: {name}")?,
        None if data.text.trim().is_empty() => writeln!(out, "{key} ({date}) no note")?,
        None => {
            writeln!(out, "{key} ({date})")?;
            for line in data.text.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }
    Ok(())
}

pub(crate) fn write_notes<W: std::io::Write>(planner: &PlannerController, out: &mut W) -> Result<()> {
    let notes = planner.notes().snapshot_non_empty();
    writeln!(out, "Notes")?;
    writeln!(out, "---")?;
    for (key, text) in &notes {
        let first = text.lines().next().unwrap_or_default();
        let more = if text.lines().count() > 1 { " …" } else { "" };
        writeln!(out, "  {:<8} {first}{more}", key.to_string())?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} note(s)", notes.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HolidayTable, PersistenceGateway};
    use tempfile::TempDir;

    fn key(m: u32, d: u32) -> DayKey {
        DayKey::new(m, d).unwrap()
    }

    fn planner(tmp: &TempDir) -> PlannerController {
        PlannerController::open(
            PersistenceGateway::new(tmp.path()),
            &HolidayTable::brazil_2025(),
            AutosavePolicy::Immediate,
        )
        .0
    }

    #[test]
    fn test_set_note_trims_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut p = planner(&tmp);
        set_note(&mut p, key(3, 15), "  Dentist 3pm \n").unwrap();
        assert_eq!(planner(&tmp).notes().get(key(3, 15)), "Dentist 3pm");
    }

    #[test]
    fn test_set_note_on_holiday_fails() {
        let tmp = TempDir::new().unwrap();
        let mut p = planner(&tmp);
        let err = set_note(&mut p, key(12, 25), "gifts").unwrap_err();
        assert!(err.to_string().contains("holiday"));
    }

    #[test]
    fn test_write_day_holiday() {
        let tmp = TempDir::new().unwrap();
        let p = planner(&tmp);
        let mut buf = Vec::new();
        write_day(key(1, 1), &p.display_data(key(1, 1)), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("holiday: Ano Novo"));
    }

    #[test]
    fn test_write_day_note_and_empty() {
        let tmp = TempDir::new().unwrap();
        let mut p = planner(&tmp);
        p.on_edit(key(3, 15), "line one\nline two").unwrap();
        let mut buf = Vec::new();
        write_day(key(3, 15), &p.display_data(key(3, 15)), &mut buf).unwrap();
        write_day(key(3, 16), &p.display_data(key(3, 16)), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("  line one\n  line two\n"));
        assert!(out.contains("3_16"));
        assert!(out.contains("no note"));
    }

    #[test]
    fn test_write_notes_lists_in_calendar_order() {
        let tmp = TempDir::new().unwrap();
        let mut p = planner(&tmp);
        p.on_edit(key(10, 1), "later").unwrap();
        p.on_edit(key(2, 1), "earlier").unwrap();
        let mut buf = Vec::new();
        write_notes(&p, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.find("earlier").unwrap() < out.find("later").unwrap());
        assert!(out.contains("Total: 2 note(s)"));
    }
}
