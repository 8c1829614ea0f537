use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::{interval_count, DomainTable, IntervalType, DEFAULT_INTERVAL_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Day indices (0 = Sunday) in display order
    pub fn order(self) -> [u8; 7] {
        match self {
            WeekStart::Sunday => [0, 1, 2, 3, 4, 5, 6],
            WeekStart::Monday => [1, 2, 3, 4, 5, 6, 0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub week_start: WeekStart,
    /// Interval types whose profiles show the holiday checkbox
    #[serde(default = "default_holiday_types")]
    pub holiday_types: Vec<IntervalType>,
    #[serde(default)]
    pub domains: DomainTable,
    #[serde(default = "default_interval_minutes")]
    pub default_interval_minutes: u32,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    /// Profile store; `profiles.json` in the data dir when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_holiday_types() -> Vec<IntervalType> {
    IntervalType::ALL.to_vec()
}

fn default_interval_minutes() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            week_start: WeekStart::Sunday,
            holiday_types: default_holiday_types(),
            domains: DomainTable::default(),
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            font_scale: 1.0,
            data_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            Self::parse(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(contents)
            .context("Failed to parse config file")?;
        if interval_count(config.default_interval_minutes).is_err() {
            tracing::warn!(
                minutes = config.default_interval_minutes,
                "default interval duration does not divide the day, using hourly slots"
            );
            config.default_interval_minutes = DEFAULT_INTERVAL_MINUTES;
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn holiday_visible(&self, interval_type: IntervalType) -> bool {
        self.holiday_types.contains(&interval_type)
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        Ok(Self::project_dirs()?.data_dir().join("profiles.json"))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("net", "iobroker", "profile-editor")
            .context("Could not determine config directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Domain;

    #[test]
    fn missing_fields_use_defaults() {
        let config = Config::parse("{}").expect("empty object is valid");
        assert_eq!(config.language, "en");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.default_interval_minutes, 60);
        assert!(config.holiday_visible(IntervalType::OnOff));
    }

    #[test]
    fn domain_overrides_are_partial() {
        let config = Config::parse(
            r#"{ "week_start": "monday", "domains": { "temperature": { "min": 5, "max": 25 } } }"#,
        )
        .expect("valid config");
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.domains.get(IntervalType::Temperature), Domain::new(5.0, 25.0));
        assert_eq!(config.domains.get(IntervalType::Percent), Domain::new(0.0, 100.0));
    }

    #[test]
    fn invalid_default_duration_falls_back_to_hourly() {
        let config = Config::parse(r#"{ "default_interval_minutes": 50 }"#).expect("valid json");
        assert_eq!(config.default_interval_minutes, 60);
    }

    #[test]
    fn week_start_orders() {
        assert_eq!(WeekStart::Monday.order(), [1, 2, 3, 4, 5, 6, 0]);
        assert_eq!(WeekStart::Sunday.order(), [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn explicit_data_file_wins() {
        let config = Config {
            data_file: Some(PathBuf::from("/tmp/profiles.json")),
            ..Config::default()
        };
        assert_eq!(
            config.data_path().expect("explicit path"),
            PathBuf::from("/tmp/profiles.json")
        );
    }
}
