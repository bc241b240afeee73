//! Configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Role;
use crate::view_model::FilterMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name published in this participant's profile
    pub profile_name: String,
    /// Role granted by links minted from the invite button
    pub invite_role: Role,
    pub default_filter: FilterMode,
    pub badge: BadgeConfig,
    pub qr: QrConfig,
    /// Lines kept by the rolling log buffer
    pub log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_name: "Anonymous".to_string(),
            invite_role: Role::Writer,
            default_filter: FilterMode::All,
            badge: BadgeConfig::default(),
            qr: QrConfig::default(),
            log_capacity: 500,
        }
    }
}

/// Lightness and saturation of the identity-seeded badge colors, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub light_lightness: u8,
    pub dark_lightness: u8,
    /// Inclusive lower and exclusive upper bound
    pub saturation: (u8, u8),
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            light_lightness: 80,
            dark_lightness: 20,
            saturation: (50, 55),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// One of L, M, Q, H
    pub error_correction: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            error_correction: "L".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (low, high) = self.badge.saturation;
        if low >= high || high > 100 {
            return Err(ConfigError::Invalid(format!("badge.saturation {low}..{high}")));
        }
        if self.badge.light_lightness > 100 || self.badge.dark_lightness > 100 {
            return Err(ConfigError::Invalid("badge lightness above 100".to_string()));
        }
        if !matches!(self.qr.error_correction.as_str(), "L" | "M" | "Q" | "H") {
            return Err(ConfigError::Invalid(format!(
                "qr.error_correction {}",
                self.qr.error_correction
            )));
        }
        if self.profile_name.trim().is_empty() {
            return Err(ConfigError::Invalid("profile_name must not be empty".to_string()));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(r#"{"invite_role":"reader","badge":{"dark_lightness":30}}"#).unwrap();
        assert_eq!(config.invite_role, Role::Reader);
        assert_eq!(config.badge.dark_lightness, 30);
        assert_eq!(config.badge.light_lightness, 80);
        assert_eq!(config.default_filter, FilterMode::All);
        assert_eq!(config.profile_name, "Anonymous");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_json(r#"{"qr":{"error_correction":"X"}}"#).is_err());
        assert!(Config::from_json(r#"{"badge":{"saturation":[60,50]}}"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }
}
