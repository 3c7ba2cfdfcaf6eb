//! Platform configuration: one entry per dew point sensor, keyed by slug.
//!
//! ```toml
//! [sensors.outside_dewpoint]
//! friendly_name = "Outside dew point"
//! temperature = "sensor.outside_temperature"
//! rel_hum = "sensor.outside_humidity"
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sensor::DewPointSensor;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct PlatformConfig {
    pub sensors: BTreeMap<String, SensorConfig>,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub friendly_name: Option<String>,
    /// Entity id of the dry-bulb temperature source.
    pub temperature: String,
    /// Entity id of the relative humidity source.
    pub rel_hum: String,
}

impl PlatformConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }
}

/// Build one sensor per configured entry; the friendly name defaults to the slug.
pub fn setup_platform(config: &PlatformConfig) -> Vec<DewPointSensor> {
    config
        .sensors
        .iter()
        .map(|(device, sensor)| {
            let name = sensor.friendly_name.as_deref().unwrap_or(device);
            DewPointSensor::new(device, name, &sensor.temperature, &sensor.rel_hum)
        })
        .collect()
}
