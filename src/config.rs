//! Configuration for density lookups.
//!
//! This module provides a streamlined, serializable configuration type that
//! covers the knobs a lookup exposes: catalog granularity, the resolver's
//! search bound, and the interpolation extrapolation policy.

use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WamdensError};

/// Behavior when a query point falls outside the snapshot grid hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Fail with `OutOfDomain` (never extrapolate).
    #[default]
    Deny,
    /// Clamp each coordinate to the nearest hull face and interpolate there.
    /// Bounded by construction: the result is always a value the grid
    /// actually contains on its boundary.
    ClampToEdge,
}

/// Lookup configuration.
///
/// Designed to be easily serializable and loadable from JSON or TOML while
/// keeping complexity minimal.
///
/// # Example
///
/// ```rust
/// use wamdens::{Config, ExtrapolationPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.granularity_minutes, 10);
///
/// let json = r#"{
///     "granularity_minutes": 10,
///     "max_search_steps": 24,
///     "extrapolation": "clamp_to_edge"
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.extrapolation, ExtrapolationPolicy::ClampToEdge);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Width of each snapshot's time window, in minutes. Must divide evenly
    /// into an hour so window boundaries repeat every day.
    #[serde(default = "Config::default_granularity_minutes")]
    pub granularity_minutes: u32,

    /// Hard cap on outward steps the resolver takes in each direction before
    /// reporting the catalog exhausted.
    #[serde(default = "Config::default_max_search_steps")]
    pub max_search_steps: usize,

    /// What to do with queries outside the grid hull.
    #[serde(default)]
    pub extrapolation: ExtrapolationPolicy,
}

impl Config {
    const fn default_granularity_minutes() -> u32 {
        10
    }

    const fn default_max_search_steps() -> usize {
        // One day of 10-minute windows
        144
    }

    pub fn with_granularity_minutes(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    pub fn with_max_search_steps(mut self, steps: usize) -> Self {
        self.max_search_steps = steps;
        self
    }

    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.granularity_minutes == 0 {
            return Err(WamdensError::Config(
                "granularity_minutes must be greater than zero".to_string(),
            ));
        }
        if 60 % self.granularity_minutes != 0 {
            return Err(WamdensError::Config(format!(
                "granularity_minutes must divide 60, got {}",
                self.granularity_minutes
            )));
        }
        if self.max_search_steps == 0 {
            return Err(WamdensError::Config(
                "max_search_steps must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            granularity_minutes: Self::default_granularity_minutes(),
            max_search_steps: Self::default_max_search_steps(),
            extrapolation: ExtrapolationPolicy::default(),
        }
    }
}
