use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::Coordinates,
    provider::{LocateOptions, device, nominatim, openmeteo},
};

pub const DEFAULT_USER_AGENT: &str = "geoweather/0.1 (+https://github.com/geoweather)";

/// Remote service endpoints. Defaults point at the public services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather: String,
    pub reverse_geocode: String,
    pub search: String,
    pub ip_location: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather: openmeteo::DEFAULT_URL.to_string(),
            reverse_geocode: nominatim::DEFAULT_REVERSE_URL.to_string(),
            search: nominatim::DEFAULT_SEARCH_URL.to_string(),
            ip_location: device::DEFAULT_IP_LOCATION_URL.to_string(),
        }
    }
}

/// Where "locate me" gets its position from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    #[default]
    Ip,
    Fixed,
    Off,
}

impl DeviceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceMode::Ip => "ip",
            DeviceMode::Fixed => "fixed",
            DeviceMode::Off => "off",
        }
    }

    pub const fn all() -> &'static [DeviceMode] {
        &[DeviceMode::Ip, DeviceMode::Fixed, DeviceMode::Off]
    }
}

impl std::fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub mode: DeviceMode,
    /// `false` behaves like a user who declined the location prompt.
    pub allow: bool,
    pub timeout_secs: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mode: DeviceMode::Ip,
            allow: true,
            timeout_secs: 10,
            latitude: None,
            longitude: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// log_level = "info"
///
/// [device]
/// mode = "fixed"
/// latitude = 37.5665
/// longitude = 126.978
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub user_agent: String,
    pub endpoints: Endpoints,
    pub device: DeviceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoints: Endpoints::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The pinned device position. Only meaningful in `fixed` mode, where it is required.
    pub fn fixed_position(&self) -> Result<Coordinates> {
        match (self.device.latitude, self.device.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .context("Configured device position is out of range"),
            _ => Err(anyhow!(
                "Device mode is 'fixed' but no position is configured.\n\
                 Hint: run `geoweather configure` or set device.latitude and device.longitude."
            )),
        }
    }

    pub fn set_fixed_position(&mut self, coords: Coordinates) {
        self.device.mode = DeviceMode::Fixed;
        self.device.latitude = Some(coords.latitude());
        self.device.longitude = Some(coords.longitude());
    }

    pub fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            timeout: Duration::from_secs(self.device.timeout_secs),
            ..LocateOptions::default()
        }
    }
}
