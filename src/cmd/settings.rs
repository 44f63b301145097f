use crate::data::{FontSpec, HexColor, Settings};
use crate::planner::{AutosavePolicy, PlannerController, SaveState};
use anyhow::Result;
use std::path::Path;

/// Requested changes; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub font_family: Option<String>,
    pub font_size: Option<i64>,
    pub text_color: Option<String>,
    pub holiday_color: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.font_size.is_none()
            && self.text_color.is_none()
            && self.holiday_color.is_none()
    }

    pub(crate) fn apply(&self, current: &Settings) -> Result<Settings> {
        let family = self.font_family.as_deref().unwrap_or(&current.font.family);
        let size = self.font_size.unwrap_or(current.font.size as i64);
        Ok(Settings {
            font: FontSpec::new(family, size)?,
            text_color: parse_color(self.text_color.as_deref(), &current.text_color)?,
            holiday_color: parse_color(self.holiday_color.as_deref(), &current.holiday_color)?,
        })
    }
}

fn parse_color(input: Option<&str>, current: &HexColor) -> Result<HexColor> {
    match input {
        Some(s) => Ok(s.parse()?),
        None => Ok(current.clone()),
    }
}

pub fn run(data_dir: &Path, update: SettingsUpdate) -> Result<()> {
    let mut planner = super::open_planner(data_dir, AutosavePolicy::Immediate)?;
    if !update.is_empty() {
        apply_update(&mut planner, &update)?;
        println!("Settings saved.");
    }
    write_settings(planner.settings(), &mut std::io::stdout())
}

pub(crate) fn apply_update(planner: &mut PlannerController, update: &SettingsUpdate) -> Result<()> {
    let next = update.apply(planner.settings())?;
    if let SaveState::Failed(msg) = planner.on_settings_changed(next)? {
        anyhow::bail!("settings not saved: {msg}");
    }
    Ok(())
}

pub(crate) fn write_settings<W: std::io::Write>(settings: &Settings, out: &mut W) -> Result<()> {
    writeln!(out, "Settings")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<16} {} {}", "Font", settings.font.family, settings.font.size)?;
    writeln!(out, "  {:<16} {}", "Text color", settings.text_color)?;
    writeln!(out, "  {:<16} {}", "Holiday color", settings.holiday_color)?;
    Ok(())
}
