// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # pint-observability
//!
//! Logging infrastructure for PINT runs.
//!
//! Provides consistent logging across all PINT crates with per-crate debug
//! flag support and an optional per-run log file written next to the results.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known PINT crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "pint",
    "pint-config",
    "pint-core",
    "pint-surface",
    "pint-io",
    "pint-cli",
];

/// Section header used to mark run phases in the log
pub fn section_header(title: &str) -> String {
    let rule = "-".repeat(title.len().max(40));
    format!("\n{}\n{}\n{}", rule, title, rule)
}
