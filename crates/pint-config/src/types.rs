// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `pint.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PintConfig {
    pub search: SearchConfig,
    pub quality: QualityConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Objective maximized when relocating a seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveMode {
    /// Pearson correlation with the network target
    #[default]
    Full,
    /// Correlation after regressing out every other network's mean series
    Partial,
}

impl fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveMode::Full => write!(f, "full"),
            ObjectiveMode::Partial => write!(f, "partial"),
        }
    }
}

impl FromStr for ObjectiveMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "pearson" => Ok(ObjectiveMode::Full),
            "partial" | "pcorr" => Ok(ObjectiveMode::Partial),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown objective mode '{}' (expected 'full' or 'partial')",
                other
            ))),
        }
    }
}

/// Sweep budget of one pass; configuration may lower it but never raise it
pub const MAX_SWEEPS_PER_PASS: u32 = 50;

/// Vertex search parameters shared by the region builder and the iteration controller
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Radius (mm) of the regions averaged into each seed's mean series
    pub sampling_radius_mm: f64,
    /// Radius (mm) of the candidate window around each seed
    pub search_radius_mm: f64,
    /// Radius (mm) of the exclusion buffer between neighbouring seeds
    pub padding_radius_mm: f64,
    /// Geodesic search radius (mm) for the final template-to-optimized distance
    pub reporting_radius_mm: f64,
    /// Sweep budget for one pass of the iteration controller (1..=50)
    pub max_sweeps_per_pass: u32,
    /// A sweep whose largest displacement is at or below this value (mm) converges
    pub convergence_threshold_mm: f64,
    pub objective: ObjectiveMode,
    /// Seed for the per-sweep visitation order (None = entropy)
    pub random_seed: Option<u64>,
    /// Score seeds concurrently within a sweep
    pub parallel_scoring: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sampling_radius_mm: 6.0,
            search_radius_mm: 6.0,
            padding_radius_mm: 12.0,
            reporting_radius_mm: 150.0,
            max_sweeps_per_pass: MAX_SWEEPS_PER_PASS,
            convergence_threshold_mm: 1.0,
            objective: ObjectiveMode::Full,
            random_seed: None,
            parallel_scoring: true,
        }
    }
}

/// Signal dropout detection on the functional data
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualityConfig {
    pub enabled: bool,
    /// Timepoint (0-based) inspected for dropout
    pub timepoint: usize,
    /// Vertices whose value at `timepoint` is below this are excluded from every region
    pub min_value: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timepoint: 5,
            min_value: 5.0,
        }
    }
}

/// Result table configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write every per-sweep vertex and distance column to the summary table
    pub output_all: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console level; the run log file always records `info` and above
    pub level: String,
    /// Write `<output_prefix>_pint.log` next to the results
    pub write_log_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            write_log_file: true,
        }
    }
}
