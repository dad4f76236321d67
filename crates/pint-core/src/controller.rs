// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Iteration controller.

A pass runs `INIT -> SWEEP* -> {Converged | Exhausted}`. Every sweep:

1. rebuilds the sampling, search and padding masks at the current positions,
2. aggregates seed and network means once,
3. evaluates every seed in a fresh random order against those frozen inputs,
4. merges the buffered decisions into the registry and measures displacement.

The pass converges when the largest displacement of a sweep is at most the
convergence threshold, and is exhausted after `max_sweeps_per_pass` sweeps.
*/

use pint_config::SearchConfig;
use pint_surface::{distance_between, GeometryProvider, Hemisphere, VertexIdx};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::objective::{evaluate_seed, MoveDecision, MoveOutcome, SweepInputs};
use crate::regions::RegionBuilder;
use crate::registry::SeedRegistry;
use crate::timeseries::FunctionalData;
use crate::types::PintResult;

/// Terminal state of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Converged,
    Exhausted,
}

/// Summary of one sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    pub sweep: u32,
    pub max_displacement: f64,
    pub moved: usize,
}

/// Summary of one pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    pub state: PassState,
    /// Sweep index the pass started at
    pub start_sweep: u32,
    pub sweeps: Vec<SweepReport>,
    /// Index of the last sweep run
    pub last_sweep: u32,
    /// Largest displacement of the last sweep (mm)
    pub max_displacement: f64,
}

impl PassOutcome {
    pub fn converged(&self) -> bool {
        self.state == PassState::Converged
    }
}

pub struct IterationController<'a, G: GeometryProvider + ?Sized> {
    provider: &'a G,
    data: &'a FunctionalData,
    search: &'a SearchConfig,
}

impl<'a, G: GeometryProvider + ?Sized> IterationController<'a, G> {
    pub fn new(provider: &'a G, data: &'a FunctionalData, search: &'a SearchConfig) -> Self {
        Self {
            provider,
            data,
            search,
        }
    }

    pub fn data(&self) -> &FunctionalData {
        self.data
    }

    pub fn search(&self) -> &SearchConfig {
        self.search
    }

    /// Run sweeps from the registry's current positions until convergence or
    /// budget exhaustion, then record optimized positions and template distances
    pub fn run_pass<R: Rng + ?Sized>(
        &self,
        registry: &mut SeedRegistry,
        start_sweep: u32,
        rng: &mut R,
    ) -> PintResult<PassOutcome> {
        let budget = self.search.max_sweeps_per_pass;
        let mut sweeps = Vec::new();
        let mut state = PassState::Exhausted;

        for sweep in start_sweep..start_sweep + budget {
            let report = self.run_sweep(registry, sweep, rng)?;
            sweeps.push(report);
            if report.max_displacement <= self.search.convergence_threshold_mm {
                state = PassState::Converged;
                break;
            }
        }

        let last = sweeps.last().copied();
        let outcome = PassOutcome {
            state,
            start_sweep,
            last_sweep: last.map_or(start_sweep, |r| r.sweep),
            max_displacement: last.map_or(0.0, |r| r.max_displacement),
            sweeps,
        };

        match outcome.state {
            PassState::Converged => info!(
                target: "pint_core",
                "Converged after {} sweeps (last sweep {})",
                outcome.sweeps.len(),
                outcome.last_sweep
            ),
            PassState::Exhausted => warn!(
                target: "pint_core",
                "Did not converge within {} sweeps; last max distance {:.3} mm",
                budget,
                outcome.max_displacement
            ),
        }

        self.finish_pass(registry)?;
        Ok(outcome)
    }

    /// One sweep over every seed
    pub fn run_sweep<R: Rng + ?Sized>(
        &self,
        registry: &mut SeedRegistry,
        sweep: u32,
        rng: &mut R,
    ) -> PintResult<SweepReport> {
        let positions = registry.positions();
        let regions = RegionBuilder::new(self.provider, self.data).build_set(&positions, self.search)?;
        let inputs = SweepInputs::prepare(self.data, regions, registry, self.search.objective);

        let mut order: Vec<usize> = (0..registry.len()).collect();
        order.shuffle(rng);

        let decisions = self.evaluate_all(&inputs, registry, &order);

        let degenerate: Vec<_> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.outcome == MoveOutcome::DegenerateTarget)
            .map(|(i, _)| registry.record(i).roiidx)
            .collect();
        if !degenerate.is_empty() {
            warn!(
                target: "pint_core",
                "Sweep {}: no network target for roiidx {:?}; holding in place",
                sweep,
                degenerate
            );
        }

        let mut moves = Vec::with_capacity(decisions.len());
        let mut moved = 0usize;
        let mut max_displacement = 0.0f64;
        for (index, decision) in decisions.iter().enumerate() {
            let record = registry.record(index);
            let distance = if decision.vertex == record.current_vertex {
                0.0
            } else {
                moved += 1;
                self.displacement(record.hemisphere, record.current_vertex, decision.vertex)?
            };
            max_displacement = max_displacement.max(distance);
            moves.push((decision.vertex, distance));
        }

        for (index, decision) in decisions.iter().enumerate() {
            if decision.outcome == MoveOutcome::DegenerateTarget {
                registry.record_mut(index).degenerate_target = true;
            }
        }
        registry.commit_sweep(sweep, &moves);

        info!(
            target: "pint_core",
            "Iteration {} max distance: {:.3} Vertices Moved: {}",
            sweep,
            max_displacement,
            moved
        );

        Ok(SweepReport {
            sweep,
            max_displacement,
            moved,
        })
    }

    /// Decisions indexed by registry row, whatever the visiting order
    fn evaluate_all(
        &self,
        inputs: &SweepInputs<'_>,
        registry: &SeedRegistry,
        order: &[usize],
    ) -> Vec<MoveDecision> {
        #[cfg(feature = "parallel")]
        let scored: Vec<(usize, MoveDecision)> = if self.search.parallel_scoring {
            order
                .par_iter()
                .map(|&i| (i, evaluate_seed(inputs, registry, i)))
                .collect()
        } else {
            order
                .iter()
                .map(|&i| (i, evaluate_seed(inputs, registry, i)))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let scored: Vec<(usize, MoveDecision)> = order
            .iter()
            .map(|&i| (i, evaluate_seed(inputs, registry, i)))
            .collect();

        let mut buffer: Vec<Option<MoveDecision>> = vec![None; registry.len()];
        for (index, decision) in scored {
            buffer[index] = Some(decision);
        }
        buffer
            .into_iter()
            .enumerate()
            .map(|(index, decision)| {
                decision.unwrap_or(MoveDecision {
                    vertex: registry.record(index).current_vertex,
                    score: None,
                    outcome: MoveOutcome::Unchanged,
                })
            })
            .collect()
    }

    /// Geodesic length of a move; falls back to the reporting radius
    fn displacement(&self, hemisphere: Hemisphere, from: VertexIdx, to: VertexIdx) -> PintResult<f64> {
        let search = self.search;
        if let Some(d) = distance_between(self.provider, hemisphere, from, to, search.search_radius_mm)? {
            return Ok(d);
        }
        if let Some(d) =
            distance_between(self.provider, hemisphere, from, to, search.reporting_radius_mm)?
        {
            return Ok(d);
        }
        warn!(
            target: "pint_core",
            "No geodesic path from vertex {} to {} on hemisphere {} within {} mm",
            from,
            to,
            hemisphere,
            search.reporting_radius_mm
        );
        Ok(search.reporting_radius_mm)
    }

    /// Optimized position and template distance of every seed
    fn finish_pass(&self, registry: &mut SeedRegistry) -> PintResult<()> {
        let radius = self.search.reporting_radius_mm;
        for index in 0..registry.len() {
            let record = registry.record(index);
            let (hemisphere, template, current) =
                (record.hemisphere, record.template_vertex, record.current_vertex);
            let distance = distance_between(self.provider, hemisphere, template, current, radius)?;
            if distance.is_none() {
                warn!(
                    target: "pint_core",
                    "roiidx {} moved beyond {} mm of its template vertex",
                    record.roiidx,
                    radius
                );
            }
            debug!(
                target: "pint_core",
                "roiidx {}: template {} -> optimized {}",
                record.roiidx,
                template,
                current
            );

            let record = registry.record_mut(index);
            record.optimized_vertex = Some(current);
            record.template_distance = distance;
        }
        Ok(())
    }
}
