use crate::data::error::PlannerError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 10;
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_HOLIDAY_COLOR: &str = "#FFEB99";

/// A `#RRGGBB` color, stored upper-case. `#RGB` input is expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidSettings(format!("'{s}' is not a hex color"));
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(invalid()),
        };
        Ok(HexColor(format!("#{}", expanded.to_ascii_uppercase())))
    }
}

impl TryFrom<String> for HexColor {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Font as `(family, size)`; serialized as a two-element array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(String, i64)", into = "(String, u32)")]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

impl FontSpec {
    pub fn new(family: &str, size: i64) -> Result<Self, PlannerError> {
        if family.trim().is_empty() {
            return Err(PlannerError::InvalidSettings("font family is empty".to_string()));
        }
        if size <= 0 || size > u32::MAX as i64 {
            return Err(PlannerError::InvalidSettings(format!(
                "font size must be positive, got {size}"
            )));
        }
        Ok(FontSpec {
            family: family.to_string(),
            size: size as u32,
        })
    }
}

impl TryFrom<(String, i64)> for FontSpec {
    type Error = PlannerError;

    fn try_from((family, size): (String, i64)) -> Result<Self, Self::Error> {
        FontSpec::new(&family, size)
    }
}

impl From<FontSpec> for (String, u32) {
    fn from(font: FontSpec) -> Self {
        (font.family, font.size)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub font: FontSpec,
    pub text_color: HexColor,
    pub holiday_color: HexColor,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            font: FontSpec {
                family: DEFAULT_FONT_FAMILY.to_string(),
                size: DEFAULT_FONT_SIZE,
            },
            text_color: HexColor(DEFAULT_TEXT_COLOR.to_string()),
            holiday_color: HexColor(DEFAULT_HOLIDAY_COLOR.to_string()),
        }
    }
}

impl Settings {
    /// Builds settings from a parsed settings record. Each field that is
    /// missing or invalid falls back to its default on its own.
    pub fn from_record(record: &serde_json::Value) -> Self {
        let defaults = Settings::default();
        Settings {
            font: record_field(record, "font").unwrap_or(defaults.font),
            text_color: record_field(record, "text_color").unwrap_or(defaults.text_color),
            holiday_color: record_field(record, "holiday_color")
                .unwrap_or(defaults.holiday_color),
        }
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        FontSpec::new(&self.font.family, self.font.size as i64)?;
        self.text_color.as_str().parse::<HexColor>()?;
        self.holiday_color.as_str().parse::<HexColor>()?;
        Ok(())
    }
}

fn record_field<T: DeserializeOwned>(record: &serde_json::Value, name: &str) -> Option<T> {
    let raw = record.get(name)?;
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("settings field '{name}' ignored: {e}");
            None
        }
    }
}

/// Holds the current settings; rejects malformed replacements.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: Settings,
}

impl SettingsStore {
    pub fn get(&self) -> &Settings {
        &self.current
    }

    pub fn set(&mut self, settings: Settings) -> Result<(), PlannerError> {
        settings.validate()?;
        self.current = settings;
        Ok(())
    }
}
