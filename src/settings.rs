//! Persistent user settings.

use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::nutrition::{EnergyProfile, FALLBACK_WEIGHT_KG};
use crate::period::Period;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window used when none is given on the command line.
    pub default_period: Period,
    pub profile: EnergyProfile,
    /// Weight assumed for the energy estimate before anything is logged.
    pub fallback_weight_kg: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_period: Period::ThreeMonths,
            profile: EnergyProfile::default(),
            fallback_weight_kg: FALLBACK_WEIGHT_KG,
        }
    }
}

impl Settings {
    const FILE: &'static str = "progress_trends.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file.
    ///
    /// Missing fields take their default values, and a missing or unreadable
    /// file yields `Settings::default()`.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if let Ok(data) = std::fs::read_to_string(path) {
            match serde_json::from_str(&data) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("Ignoring malformed settings {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Persist the settings to the configuration directory.
    pub fn save(&self) -> std::io::Result<()> {
        match Self::path() {
            Some(path) => self.save_to(path),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no configuration directory",
            )),
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, data)
    }
}
