// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Whole-run orchestration: preflight checks, first pass, optional
//! reconciliation, and the template / optimized mean time series.

use pint_config::{ObjectiveMode, SearchConfig};
use pint_surface::{GeometryProvider, Hemisphere};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::aggregate::{sampling_meants, SamplingMeans};
use crate::controller::{IterationController, PassOutcome};
use crate::reconcile::{reconcile, ReconcileOutcome, RoiLimits};
use crate::regions::RegionBuilder;
use crate::registry::SeedRegistry;
use crate::timeseries::FunctionalData;
use crate::types::{PintError, PintResult};

/// Everything a run reports besides the per-seed records in the registry
#[derive(Debug, Clone)]
pub struct PintReport {
    pub first_pass: PassOutcome,
    pub reconciliation: Option<ReconcileOutcome>,
    pub converged: bool,
    /// Largest displacement of the final sweep (mm)
    pub max_displacement: f64,
    /// Sampling means at the template positions
    pub template_meants: SamplingMeans,
    /// Sampling means at the optimized positions
    pub optimized_meants: SamplingMeans,
}

impl PintReport {
    /// The pass whose positions are reported as optimized
    pub fn final_pass(&self) -> &PassOutcome {
        self.reconciliation
            .as_ref()
            .and_then(|r| r.second_pass.as_ref())
            .unwrap_or(&self.first_pass)
    }
}

/// Visitation RNG: reproducible when `random_seed` is set
pub fn rng_from_config(search: &SearchConfig) -> StdRng {
    match search.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Fatal checks that must pass before any sweep
///
/// # Errors
/// Resolution mismatches between provider, data and limits; template
/// vertices out of range; single-member networks in partial mode.
pub fn preflight<G: GeometryProvider + ?Sized>(
    provider: &G,
    data: &FunctionalData,
    registry: &SeedRegistry,
    limits: Option<&RoiLimits>,
    search: &SearchConfig,
) -> PintResult<()> {
    for hemisphere in Hemisphere::BOTH {
        let surface = provider.vertex_count(hemisphere);
        let series = data.vertex_count(hemisphere);
        if surface != series {
            return Err(PintError::ResolutionMismatch {
                what: format!("surface of hemisphere {}", hemisphere),
                expected: series,
                actual: surface,
            });
        }
    }

    for record in registry.records() {
        let count = data.vertex_count(record.hemisphere);
        if record.template_vertex >= count {
            return Err(PintError::SeedOutOfRange {
                roiidx: record.roiidx,
                hemisphere: record.hemisphere,
                vertex: record.template_vertex,
                count,
            });
        }
    }

    for network in registry.networks() {
        let members = registry.members(network).len();
        if members >= 2 {
            continue;
        }
        match search.objective {
            ObjectiveMode::Partial => {
                return Err(PintError::SingletonNetwork {
                    network: network.clone(),
                    members,
                })
            }
            ObjectiveMode::Full => warn!(
                target: "pint_core",
                "Network '{}' has a single seed; it will stay at its template vertex",
                network
            ),
        }
    }

    if let Some(limits) = limits {
        limits.validate(data, registry)?;
    }
    Ok(())
}

/// Run the full search: first pass, reconciliation when limits are given,
/// then aggregate sampling means at the template and optimized positions
pub fn run_pint<G, R>(
    provider: &G,
    data: &FunctionalData,
    registry: &mut SeedRegistry,
    limits: Option<&RoiLimits>,
    search: &SearchConfig,
    rng: &mut R,
) -> PintResult<PintReport>
where
    G: GeometryProvider + ?Sized,
    R: Rng + ?Sized,
{
    preflight(provider, data, registry, limits, search)?;

    info!(
        target: "pint_core",
        "Running PINT on {} seeds in {} networks ({} correlation)",
        registry.len(),
        registry.networks().len(),
        search.objective
    );

    let controller = IterationController::new(provider, data, search);
    let first_pass = controller.run_pass(registry, 0, rng)?;

    let reconciliation = match limits {
        Some(limits) => Some(reconcile(
            &controller,
            registry,
            limits,
            search.max_sweeps_per_pass,
            rng,
        )?),
        None => None,
    };

    let builder = RegionBuilder::new(provider, data);
    let template_mask = builder.build(&registry.template_positions(), search.sampling_radius_mm)?;
    let optimized_mask = builder.build(&registry.optimized_positions(), search.sampling_radius_mm)?;

    let mut report = PintReport {
        first_pass,
        reconciliation,
        converged: false,
        max_displacement: 0.0,
        template_meants: sampling_meants(&template_mask, data),
        optimized_meants: sampling_meants(&optimized_mask, data),
    };
    let (converged, max_displacement) = {
        let final_pass = report.final_pass();
        (final_pass.converged(), final_pass.max_displacement)
    };
    report.converged = converged;
    report.max_displacement = max_displacement;

    Ok(report)
}
