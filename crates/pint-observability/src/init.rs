// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for PINT
//!
//! Console output always; an optional plain-text log file per run
//! (`<output_prefix>_pint.log`).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Logging initialization result
///
/// Keep it alive for the duration of the run: dropping it flushes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl LoggingGuard {
    /// Path of the run log file, if one is being written
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Log file written next to the outputs of a run
pub fn log_file_for_prefix(output_prefix: &Path) -> PathBuf {
    let mut name = output_prefix
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push("_pint.log");
    output_prefix.with_file_name(name)
}

/// Initialize logging with console output and an optional log file
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `base_level` - Level for everything not raised by a debug flag
/// * `log_file` - Path of the run log; its parent directory is created
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    base_level: &str,
    log_file: Option<&Path>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(base_level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter)
        .boxed();
    layers.push(console_layer);

    let mut file_guard = None;
    if let Some(path) = log_file {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;

        let appender = rolling::never(&directory, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_filter(EnvFilter::try_new(debug_flags.to_filter_string("info"))?)
            .boxed();
        layers.push(file_layer);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_file: log_file.map(Path::to_path_buf),
    })
}

/// Initialize console-only logging at the given level
pub fn init_console_logging(debug_flags: &CrateDebugFlags, base_level: &str) -> Result<LoggingGuard> {
    init_logging(debug_flags, base_level, None)
}
