use crate::data::HolidayTable;
use anyhow::Result;
use std::path::Path;

pub fn run(data_dir: &Path) -> Result<()> {
    let table = super::holiday_table(data_dir)?;
    write_holidays(&table, &mut std::io::stdout())
}

pub(crate) fn write_holidays<W: std::io::Write>(table: &HolidayTable, out: &mut W) -> Result<()> {
    writeln!(out, "Holidays")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<8} {}", "Day", "Name")?;
    for (key, name) in table.iter() {
        writeln!(out, "  {:<8} {}", key.to_string(), name)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} holiday(s)", table.len())?;
    Ok(())
}
