use std::path::PathBuf;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::gauge::{DEFAULT_MAX_SPEED, DEFAULT_REDLINE_START, MIN_MAX_SPEED};
use crate::instrument::{InstrumentConfig, VisualizationKind};
use crate::speed_filter::{DEFAULT_DAMPING, MAX_DAMPING, MIN_DAMPING};

lazy_static! {
    pub static ref SETTINGS_PATH: PathBuf = {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
            .unwrap_or_default()
            .join("settings.json")
    };
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub show_on_startup: bool,
    pub selected_kind: VisualizationKind,
    pub max_speed: f32,
    pub redline_start: f32,
    pub damping: f32,
    pub show_history_table: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 0,
            show_on_startup: true,
            selected_kind: VisualizationKind::Gauge,
            max_speed: DEFAULT_MAX_SPEED,
            redline_start: DEFAULT_REDLINE_START,
            damping: DEFAULT_DAMPING,
            show_history_table: false,
        }
    }
}

impl Settings {
    pub fn save(&self) -> anyhow::Result<()> {
        let settings = serde_json::to_string_pretty(&self)?;
        std::fs::write((*SETTINGS_PATH).clone(), settings)?;
        Ok(())
    }

    pub fn load_or_default() -> anyhow::Result<Self> {
        if !(*SETTINGS_PATH).exists() {
            return Ok(Self::default());
        }

        let settings = std::fs::read_to_string((*SETTINGS_PATH).clone())?;
        Self::from_json(&settings)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamps every value into the range the instruments accept.
    pub fn sanitized(mut self) -> Self {
        self.max_speed = self.max_speed.max(MIN_MAX_SPEED);
        self.redline_start = self.redline_start.clamp(0.0, self.max_speed);
        self.damping = self.damping.clamp(MIN_DAMPING, MAX_DAMPING);
        self
    }

    pub fn instrument_config(&self) -> InstrumentConfig {
        InstrumentConfig {
            max_speed: self.max_speed,
            redline_start: self.redline_start,
            damping: self.damping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = Settings::from_json(r#"{ "max_speed": 30.0, "selected_kind": "Trail" }"#).unwrap();
        assert_eq!(settings.max_speed, 30.0);
        assert_eq!(settings.selected_kind, VisualizationKind::Trail);
        assert_eq!(settings.redline_start, DEFAULT_REDLINE_START);
        assert!(settings.show_on_startup);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let settings = Settings::from_json(r#"{ "max_speed": 1.0, "redline_start": 9.0, "damping": 0.0 }"#).unwrap();
        assert_eq!(settings.max_speed, MIN_MAX_SPEED);
        assert_eq!(settings.redline_start, MIN_MAX_SPEED);
        assert_eq!(settings.damping, MIN_DAMPING);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }
}
