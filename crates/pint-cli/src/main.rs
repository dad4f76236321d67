// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use tracing::info;

use pint_cli::{run, Args};
use pint_config::load_config_or_default;
use pint_observability::{init_logging, log_file_for_prefix};

/// Main entry point
fn main() -> Result<()> {
    let (args, mut debug_flags) = Args::parse_with_debug_flags();

    // PINT_DEBUG adds to the command-line flags
    for crate_name in pint_observability::parse_debug_flags().enabled_crates {
        debug_flags.enabled_crates.insert(crate_name);
    }

    let overrides = args.cli_overrides();
    let config = load_config_or_default(args.config.as_deref(), Some(&overrides))
        .context("Failed to load configuration")?;

    let log_file = config
        .logging
        .write_log_file
        .then(|| log_file_for_prefix(&args.output_prefix));
    let _logging = init_logging(&debug_flags, &config.logging.level, log_file.as_deref())?;

    info!("pint-vertices {}", env!("CARGO_PKG_VERSION"));
    let outcome = run(&args, &config)?;

    info!(
        "Summary written to {} (converged: {})",
        outcome.outputs.summary.display(),
        outcome.report.converged
    );
    Ok(())
}
