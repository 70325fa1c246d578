use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::format::{DisplayField, TooltipFormat, VisibilityIcons};
use crate::map::FootprintScale;
use crate::position::DEFAULT_POSITION_URL;
use crate::session::{Timers, TrackerProfile};

pub const MAX_ZOOM: u8 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub terminator: TerminatorConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub poll_interval: Duration,
    #[serde(
        default = "default_tooltip_close_after",
        deserialize_with = "deserialize_duration"
    )]
    pub tooltip_close_after: Duration,
    #[serde(default, deserialize_with = "deserialize_optional_duration")]
    pub request_timeout: Option<Duration>,
    #[serde(default)]
    pub footprint: FootprintScale,
    #[serde(default = "default_fields")]
    pub fields: Vec<DisplayField>,
    #[serde(default)]
    pub visibility_icons: VisibilityIcons,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            label: default_label(),
            zoom: default_zoom(),
            poll_interval: default_poll_interval(),
            tooltip_close_after: default_tooltip_close_after(),
            request_timeout: None,
            footprint: FootprintScale::default(),
            fields: default_fields(),
            visibility_icons: VisibilityIcons::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TerminatorConfig {
    #[serde(
        default = "default_terminator_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,
    #[serde(default = "default_resolution")]
    pub resolution_deg: f64,
}

impl Default for TerminatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_terminator_interval(),
            resolution_deg: default_resolution(),
        }
    }
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

fn default_url() -> String {
    DEFAULT_POSITION_URL.to_string()
}

fn default_label() -> String {
    "ISS".to_string()
}

fn default_zoom() -> u8 {
    4
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_tooltip_close_after() -> Duration {
    Duration::from_secs(2)
}

fn default_fields() -> Vec<DisplayField> {
    DisplayField::ALL.to_vec()
}

fn default_terminator_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_resolution() -> f64 {
    2.0
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the built-in ISS defaults when no file is given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, message: &str| {
            Err(ConfigError::Invalid {
                field,
                message: message.to_string(),
            })
        };

        if self.tracker.url.trim().is_empty() {
            return invalid("tracker.url", "must not be empty");
        }
        if self.tracker.poll_interval.is_zero() {
            return invalid("tracker.poll_interval", "must be greater than zero");
        }
        if self.tracker.zoom > MAX_ZOOM {
            return invalid("tracker.zoom", &format!("must be at most {}", MAX_ZOOM));
        }
        if self.tracker.fields.is_empty() {
            return invalid("tracker.fields", "must list at least one field");
        }
        if let FootprintScale::PixelRadius { scale } = self.tracker.footprint {
            if !(scale.is_finite() && scale > 0.0) {
                return invalid("tracker.footprint.scale", "must be a positive number");
            }
        }
        if self.terminator.refresh_interval.is_zero() {
            return invalid("terminator.refresh_interval", "must be greater than zero");
        }
        let resolution = self.terminator.resolution_deg;
        if !(resolution > 0.0 && resolution <= 90.0) {
            return invalid("terminator.resolution_deg", "must be in (0, 90]");
        }

        Ok(())
    }

    pub fn profile(&self) -> TrackerProfile {
        TrackerProfile {
            zoom: self.tracker.zoom,
            footprint: self.tracker.footprint.clone(),
            tooltip: TooltipFormat {
                label: self.tracker.label.clone(),
                fields: self.tracker.fields.clone(),
                icons: self.tracker.visibility_icons.clone(),
            },
            terminator_resolution_deg: self.terminator.resolution_deg,
        }
    }

    pub fn timers(&self) -> Timers {
        Timers {
            poll_interval: self.tracker.poll_interval,
            terminator_interval: self.terminator.refresh_interval,
            tooltip_close_after: self.tracker.tooltip_close_after,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom))
        .transpose()
}
