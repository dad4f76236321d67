// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! PINT command-line driver
//!
//! Argument definitions and the run itself live here so they can be tested
//! without spawning the binary.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pint_config::{ObjectiveMode, PintConfig};
use pint_core::{rng_from_config, run_pint, PintReport, SeedRegistry};
use pint_io::{
    read_functional_data, read_limits, read_seed_table, summary_table, write_meants,
    write_summary, OutputPaths,
};
use pint_observability::{section_header, CrateDebugFlags};
use pint_surface::{MeshGeodesics, SurfaceMesh};
use tracing::{info, warn};

/// Personalized Intrinsic Network Topography: move network seed vertices to
/// the locations that best represent their network's signal
#[derive(Parser, Debug, Clone)]
#[command(name = "pint-vertices", version, author, long_about = None)]
pub struct Args {
    /// Left hemisphere functional data (one row per vertex)
    pub func_left: PathBuf,

    /// Right hemisphere functional data (one row per vertex)
    pub func_right: PathBuf,

    /// Left hemisphere surface (JSON mesh)
    pub surface_left: PathBuf,

    /// Right hemisphere surface (JSON mesh)
    pub surface_right: PathBuf,

    /// Seed table with columns hemi, NETWORK, tvertex and optionally roiidx
    pub seeds: PathBuf,

    /// Prefix of every output file
    pub output_prefix: PathBuf,

    /// Use partial correlation against the other networks' means
    #[arg(long, default_value_t = false)]
    pub pcorr: bool,

    /// Write every per-sweep vertex and distance column to the summary
    #[arg(long, default_value_t = false)]
    pub outputall: bool,

    /// Radius (mm) of the regions averaged into each seed's series
    #[arg(long)]
    pub sampling_radius: Option<f64>,

    /// Radius (mm) of the candidate window around each seed
    #[arg(long)]
    pub search_radius: Option<f64>,

    /// Radius (mm) of the exclusion buffer between seeds
    #[arg(long)]
    pub padding_radius: Option<f64>,

    /// Left hemisphere limits (one row per vertex, one column per seed)
    #[arg(long, requires = "roi_limits_right")]
    pub roi_limits_left: Option<PathBuf>,

    /// Right hemisphere limits (one row per vertex, one column per seed)
    #[arg(long, requires = "roi_limits_left")]
    pub roi_limits_right: Option<PathBuf>,

    /// Configuration file (default: PINT_CONFIG_PATH or ./pint.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed for the seed visiting order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Parse the process arguments, setting aside per-crate `--debug-<crate>` flags
    pub fn parse_with_debug_flags() -> (Self, CrateDebugFlags) {
        let (rest, flags) = split_debug_flags(std::env::args());
        (Args::parse_from(rest), flags)
    }

    /// CLI values that override the configuration file
    pub fn cli_overrides(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(r) = self.sampling_radius {
            map.insert("sampling_radius".to_string(), r.to_string());
        }
        if let Some(r) = self.search_radius {
            map.insert("search_radius".to_string(), r.to_string());
        }
        if let Some(r) = self.padding_radius {
            map.insert("padding_radius".to_string(), r.to_string());
        }
        if self.pcorr {
            map.insert("pcorr".to_string(), "true".to_string());
        }
        if let Some(seed) = self.seed {
            map.insert("random_seed".to_string(), seed.to_string());
        }
        if self.outputall {
            map.insert("output_all".to_string(), "true".to_string());
        }
        if self.debug {
            map.insert("log_level".to_string(), "debug".to_string());
        } else if self.verbose {
            map.insert("log_level".to_string(), "info".to_string());
        }
        map
    }

    pub fn limits(&self) -> Option<(&Path, &Path)> {
        match (&self.roi_limits_left, &self.roi_limits_right) {
            (Some(left), Some(right)) => Some((left.as_path(), right.as_path())),
            _ => None,
        }
    }
}

/// Separate `--debug-<crate>` / `--debug-all` flags from the arguments clap parses
pub fn split_debug_flags<I>(args: I) -> (Vec<String>, CrateDebugFlags)
where
    I: IntoIterator<Item = String>,
{
    let (debug, rest): (Vec<String>, Vec<String>) =
        args.into_iter().partition(|a| a.starts_with("--debug-"));
    (rest, CrateDebugFlags::from_args(debug))
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub report: PintReport,
    pub registry: SeedRegistry,
    pub outputs: OutputPaths,
}

/// Load the inputs, run the search and write every output file
pub fn run(args: &Args, config: &PintConfig) -> Result<RunOutcome> {
    info!("{}", section_header("Starting PINT"));
    let search = &config.search;
    info!(
        "Sampling radius {} mm, search radius {} mm, padding radius {} mm",
        search.sampling_radius_mm, search.search_radius_mm, search.padding_radius_mm
    );
    if search.objective == ObjectiveMode::Partial {
        info!("Using partial correlation: other networks' means are regressed out");
    }

    let data = read_functional_data(&args.func_left, &args.func_right)
        .context("Failed to read functional data")?
        .with_quality(&config.quality)
        .context("Failed to apply the signal quality mask")?;

    let left = SurfaceMesh::load_json(&args.surface_left)
        .with_context(|| format!("Failed to read surface {}", args.surface_left.display()))?;
    let right = SurfaceMesh::load_json(&args.surface_right)
        .with_context(|| format!("Failed to read surface {}", args.surface_right.display()))?;
    let geometry = MeshGeodesics::new(&left, &right);

    let specs = read_seed_table(&args.seeds).context("Failed to read seed table")?;
    let mut registry = SeedRegistry::new(specs, config.output.output_all)
        .context("Invalid seed table")?;

    let limits = match args.limits() {
        Some((l, r)) => Some(read_limits(l, r).context("Failed to read ROI limits")?),
        None => None,
    };
    if limits.is_some() && !config.output.output_all {
        info!("ROI limits supplied; reconciliation columns are written with --outputall");
    }

    let mut rng = rng_from_config(search);
    let report = run_pint(&geometry, &data, &mut registry, limits.as_ref(), search, &mut rng)
        .context("PINT search failed")?;

    if !report.converged {
        warn!(
            "Search did not converge; final max distance {:.3} mm",
            report.max_displacement
        );
    }
    if let Some(reconciliation) = &report.reconciliation {
        if !reconciliation.still_outside.is_empty() {
            warn!(
                "{} seeds remain outside their ROI limits",
                reconciliation.still_outside.len()
            );
        }
    }

    let prefix = args.output_prefix.to_string_lossy().to_string();
    if let Some(parent) = args.output_prefix.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }
    let outputs = OutputPaths::from_prefix(&prefix);

    let table = summary_table(&registry, &report, config.output.output_all);
    write_summary(&outputs.summary, &table).context("Failed to write summary")?;
    write_meants(&outputs.tvertex_meants, &report.template_meants)
        .context("Failed to write template mean time series")?;
    write_meants(&outputs.ivertex_meants, &report.optimized_meants)
        .context("Failed to write optimized mean time series")?;

    if report.template_meants.len() != registry.len() {
        warn!(
            "{} of {} seeds have no valid vertices in their template sampling region",
            registry.len() - report.template_meants.len(),
            registry.len()
        );
    }

    info!("{}", section_header("PINT finished"));
    Ok(RunOutcome {
        report,
        registry,
        outputs,
    })
}
