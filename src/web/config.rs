use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::location::DEFAULT_NOMINATIM_URL;
use crate::servo::{GatewayTimeouts, DEFAULT_ENDPOINT};
use crate::solar::SolarOptions;
use crate::tracker::TrackingSettings;
use crate::weather::DEFAULT_WEATHER_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration for {field}: '{value}' ({reason})")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid UTC offset '{0}', expected e.g. +01:00")]
    InvalidOffset(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub actuator: ActuatorConfig,
    pub tracking: TrackingConfig,
    pub weather: WeatherConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub connect_timeout: String,
    #[serde(default = "default_timeout")]
    pub read_timeout: String,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout: default_timeout(),
            read_timeout: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> String {
    "5s".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_update_interval")]
    pub update_interval: String,
    #[serde(default = "default_true")]
    pub invert_azimuth: bool,
    /// e.g. "+01:00"; the host's standard offset (no DST) when unset.
    #[serde(default)]
    pub utc_offset: Option<String>,
    /// Used when tracking is enabled without a live fix or request text.
    #[serde(default)]
    pub location: Option<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            update_interval: default_update_interval(),
            invert_azimuth: true,
            utc_offset: None,
            location: None,
        }
    }
}

fn default_update_interval() -> String {
    "5m".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Weather lookups are disabled without a key.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_geocoder_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        // Surface bad durations and offsets at load time.
        config.gateway_timeouts()?;
        config.tracking_settings()?;
        config.weather_timeout()?;
        config.geocoder_timeout()?;
        Ok(config)
    }

    pub fn gateway_timeouts(&self) -> Result<GatewayTimeouts, ConfigError> {
        Ok(GatewayTimeouts {
            connect: parse_duration("actuator.connect_timeout", &self.actuator.connect_timeout)?,
            read: parse_duration("actuator.read_timeout", &self.actuator.read_timeout)?,
        })
    }

    pub fn tracking_settings(&self) -> Result<TrackingSettings, ConfigError> {
        let utc_offset = self
            .tracking
            .utc_offset
            .as_deref()
            .map(parse_offset)
            .transpose()?;
        Ok(TrackingSettings {
            update_interval: parse_duration(
                "tracking.update_interval",
                &self.tracking.update_interval,
            )?,
            solar: SolarOptions {
                invert_azimuth: self.tracking.invert_azimuth,
            },
            utc_offset,
        })
    }

    pub fn weather_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("weather.timeout", &self.weather.timeout)
    }

    pub fn geocoder_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("geocoder.timeout", &self.geocoder.timeout)
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason,
    };
    let duration = humantime::parse_duration(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if duration.is_zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(duration)
}

fn parse_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    value
        .trim()
        .parse::<FixedOffset>()
        .map_err(|_| ConfigError::InvalidOffset(value.to_string()))
}
