// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that configuration values are finite, within valid ranges, and
//! consistent with each other. All problems are collected before reporting.

use crate::{ConfigError, ConfigResult, PintConfig, MAX_SWEEPS_PER_PASS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NegativeRadius { field: String, value: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeRadius { field, value } => {
                write!(f, "{} = {} must be a finite, non-negative distance", field, value)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &PintConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_radii(config, &mut errors);
    validate_iteration(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_radii(config: &PintConfig, errors: &mut Vec<ConfigValidationError>) {
    let search = &config.search;
    for (field, value) in [
        ("search.sampling_radius_mm", search.sampling_radius_mm),
        ("search.search_radius_mm", search.search_radius_mm),
        ("search.padding_radius_mm", search.padding_radius_mm),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigValidationError::NegativeRadius {
                field: field.to_string(),
                value,
            });
        }
    }

    if !search.reporting_radius_mm.is_finite() || search.reporting_radius_mm <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "search.reporting_radius_mm".to_string(),
            reason: "must be a positive distance".to_string(),
        });
    } else if search.reporting_radius_mm < search.search_radius_mm {
        errors.push(ConfigValidationError::InvalidValue {
            field: "search.reporting_radius_mm".to_string(),
            reason: format!(
                "{} is smaller than the search radius {}",
                search.reporting_radius_mm, search.search_radius_mm
            ),
        });
    }
}

fn validate_iteration(config: &PintConfig, errors: &mut Vec<ConfigValidationError>) {
    let sweeps = config.search.max_sweeps_per_pass;
    if sweeps == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "search.max_sweeps_per_pass".to_string(),
            reason: "at least one sweep is required".to_string(),
        });
    } else if sweeps > MAX_SWEEPS_PER_PASS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "search.max_sweeps_per_pass".to_string(),
            reason: format!("{} exceeds the limit of {} sweeps", sweeps, MAX_SWEEPS_PER_PASS),
        });
    }

    let threshold = config.search.convergence_threshold_mm;
    if !threshold.is_finite() || threshold < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "search.convergence_threshold_mm".to_string(),
            reason: format!("{} is not a non-negative distance", threshold),
        });
    }

    if config.quality.enabled && !config.quality.min_value.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "quality.min_value".to_string(),
            reason: "must be finite".to_string(),
        });
    }
}

fn validate_logging(config: &PintConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }
}
