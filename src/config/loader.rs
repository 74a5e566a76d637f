//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the audit rule
//! set from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{AuditError, AuditResult};
use crate::models::ShiftType;

use super::types::{AuditConfig, ShiftProfile};

/// Loads and provides access to the audit configuration.
///
/// # Example
///
/// ```no_run
/// use swipe_audit::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/audit.yaml").unwrap();
/// println!("Night shift starts at {}", loader.config().night.work_start);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AuditConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// Returns an error if the file is missing, is not valid YAML, or holds
    /// values rejected by [`ConfigLoader::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> AuditResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AuditError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: AuditConfig =
            serde_yaml::from_str(&content).map_err(|e| AuditError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    /// Wraps the built-in rule set.
    pub fn from_defaults() -> Self {
        Self {
            config: AuditConfig::default(),
        }
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: AuditConfig) -> AuditResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Checks that thresholds are usable.
    ///
    /// Rejects non-positive windows and limits, a noise threshold that is not
    /// below the outing limit, and an inverted night dead zone.
    pub fn validate(config: &AuditConfig) -> AuditResult<()> {
        let thresholds = &config.thresholds;

        if thresholds.burst_window_seconds <= 0 {
            return Err(invalid("thresholds.burst_window_seconds", "must be positive"));
        }
        if thresholds.outing_noise_minutes < 0 {
            return Err(invalid("thresholds.outing_noise_minutes", "must not be negative"));
        }
        if thresholds.outing_limit_minutes <= thresholds.outing_noise_minutes {
            return Err(invalid(
                "thresholds.outing_limit_minutes",
                "must exceed outing_noise_minutes",
            ));
        }
        if thresholds.minimum_overtime_hours <= Decimal::ZERO {
            return Err(invalid("thresholds.minimum_overtime_hours", "must be positive"));
        }

        let anchoring = &config.night_anchoring;
        if anchoring.dead_zone_end < anchoring.dead_zone_start {
            return Err(invalid(
                "night_anchoring.dead_zone_end",
                "must not precede dead_zone_start",
            ));
        }

        for (name, profile) in [("night", &config.night), ("day", &config.day)] {
            if profile.work_start == profile.work_end {
                return Err(invalid(
                    &format!("{name}.work_end"),
                    "must differ from work_start",
                ));
            }
        }

        Ok(())
    }

    /// Returns the underlying audit configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the profile for a shift type, if it is evaluated at all.
    pub fn profile(&self, shift_type: ShiftType) -> Option<&ShiftProfile> {
        self.config.profile(shift_type)
    }
}

fn invalid(field: &str, message: &str) -> AuditError {
    AuditError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
