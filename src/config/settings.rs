use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::GeoPosition;

fn default_latitude() -> f64 {
    39.1434
}
fn default_longitude() -> f64 {
    -77.2014
}
fn default_location_name() -> String {
    "Gaithersburg, MD".to_string()
}
fn default_calc_method() -> String {
    "NorthAmerica".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_aladhan_method() -> String {
    "Islamic Society of North America (ISNA)".to_string()
}
fn default_aladhan_url() -> String {
    crate::prayer_times::aladhan::DEFAULT_BASE_URL.to_string()
}
fn default_tick_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimesSource {
    #[default]
    Offline,
    Aladhan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Minutes from UTC. Unset follows the system timezone, DST included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
}

impl LocationConfig {
    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone_offset: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerConfig {
    #[serde(default)]
    pub source: TimesSource,
    /// Offline calculation method (see `musalla methods`)
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    /// Al-Adhan method, by name or part of one
    #[serde(default = "default_aladhan_method")]
    pub aladhan_method: String,
    #[serde(default = "default_aladhan_url")]
    pub aladhan_url: String,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            source: TimesSource::default(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            aladhan_method: default_aladhan_method(),
            aladhan_url: default_aladhan_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub prayer: PrayerConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "musalla")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.location.name, "Gaithersburg, MD");
        assert_eq!(config.prayer.source, TimesSource::Offline);
        assert_eq!(config.countdown.tick_ms, 1000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[location]\nname = \"Leicester\"\nlatitude = 52.6369\nlongitude = -1.1398\n\n[prayer]\nsource = \"aladhan\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.name, "Leicester");
        assert_eq!(config.location.timezone_offset, None);
        assert_eq!(config.prayer.source, TimesSource::Aladhan);
        assert_eq!(config.prayer.madhab, "Shafi");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.location.latitude = 21.4225;
        config.location.longitude = 39.8262;
        config.location.timezone_offset = Some(180);
        config.prayer.calc_method = "UmmAlQura".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.location.latitude, 21.4225);
        assert_eq!(loaded.location.timezone_offset, Some(180));
        assert_eq!(loaded.prayer.calc_method, "UmmAlQura");
    }

    #[test]
    fn default_offset_is_left_to_the_system() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        AppConfig::default().save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("timezone_offset"));
        assert_eq!(AppConfig::load_from(&path).unwrap().location.timezone_offset, None);
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[location\nname=").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
