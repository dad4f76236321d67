// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation against positional limits
//!
//! Each seed has a permitted region (a column of the limits matrix, indexed
//! by stacked vertex). Seeds whose optimized vertex falls outside it restart
//! from their template vertex; if any seed restarts, every seed runs a second
//! pass whose sweep counter continues after the first pass budget.

use ndarray::{concatenate, Array2, Axis};
use pint_surface::{GeometryProvider, RoiIdx, VertexIdx};
use rand::Rng;
use tracing::{info, warn};

use crate::controller::{IterationController, PassOutcome};
use crate::registry::SeedRegistry;
use crate::timeseries::FunctionalData;
use crate::types::{PintError, PintResult};

/// Stacked vertex x seed matrix; a value > 0 permits the vertex
#[derive(Debug, Clone)]
pub struct RoiLimits {
    matrix: Array2<f64>,
}

impl RoiLimits {
    /// Stack per-hemisphere limit matrices (vertices x seeds)
    pub fn new(left: Array2<f64>, right: Array2<f64>) -> PintResult<Self> {
        if left.ncols() != right.ncols() {
            return Err(PintError::ResolutionMismatch {
                what: "limit columns of the right hemisphere".to_string(),
                expected: left.ncols(),
                actual: right.ncols(),
            });
        }
        let matrix = concatenate(Axis(0), &[left.view(), right.view()])
            .map_err(|e| PintError::Config(format!("failed to stack limits: {}", e)))?;
        Ok(Self { matrix })
    }

    pub fn from_stacked(matrix: Array2<f64>) -> Self {
        Self { matrix }
    }

    pub fn vertex_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn seed_count(&self) -> usize {
        self.matrix.ncols()
    }

    /// Limits must cover every stacked vertex and every seed
    pub fn validate(&self, data: &FunctionalData, registry: &SeedRegistry) -> PintResult<()> {
        if self.vertex_count() != data.total_vertices() {
            return Err(PintError::ResolutionMismatch {
                what: "limits rows".to_string(),
                expected: data.total_vertices(),
                actual: self.vertex_count(),
            });
        }
        if self.seed_count() != registry.len() {
            return Err(PintError::ResolutionMismatch {
                what: "limits columns (one per seed)".to_string(),
                expected: registry.len(),
                actual: self.seed_count(),
            });
        }
        Ok(())
    }

    /// Whether the seed in registry row `seed` may sit at stacked vertex `stacked`
    pub fn permits(&self, seed: usize, stacked: usize) -> bool {
        self.matrix
            .get((stacked, seed))
            .map_or(false, |&value| value > 0.0)
    }

    /// Whether a seed's hemisphere-local vertex is permitted
    pub fn check(
        &self,
        data: &FunctionalData,
        registry: &SeedRegistry,
        seed: usize,
        vertex: VertexIdx,
    ) -> bool {
        let record = registry.record(seed);
        self.permits(seed, data.stacked_index(record.hemisphere, vertex))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// Seeds reset to their template vertex
    pub reset: Vec<RoiIdx>,
    /// Second pass, run only when some seed was reset
    pub second_pass: Option<PassOutcome>,
    /// Seeds still outside their limits after the second pass
    pub still_outside: Vec<RoiIdx>,
}

/// Test optimized positions against `limits` and re-run the search if needed
pub fn reconcile<G, R>(
    controller: &IterationController<'_, G>,
    registry: &mut SeedRegistry,
    limits: &RoiLimits,
    start_sweep: u32,
    rng: &mut R,
) -> PintResult<ReconcileOutcome>
where
    G: GeometryProvider + ?Sized,
    R: Rng + ?Sized,
{
    let data = controller.data();
    let mut starts = Vec::with_capacity(registry.len());
    let mut reset = Vec::new();

    for index in 0..registry.len() {
        let record = registry.record(index);
        let optimized = record.optimized_vertex.unwrap_or(record.current_vertex);
        if limits.check(data, registry, index, optimized) {
            starts.push(optimized);
        } else {
            reset.push(record.roiidx);
            starts.push(record.template_vertex);
        }
    }

    for (index, &vertex) in starts.iter().enumerate() {
        registry.record_mut(index).reconciled_vertex = Some(vertex);
    }

    if reset.is_empty() {
        info!(target: "pint_core", "All seeds within their limits");
        return Ok(ReconcileOutcome {
            reset,
            second_pass: None,
            still_outside: Vec::new(),
        });
    }

    info!(
        target: "pint_core",
        "{} seeds outside their limits, restarting from template: {:?}",
        reset.len(),
        reset
    );
    registry.restart_from(&starts);
    let second_pass = controller.run_pass(registry, start_sweep, rng)?;

    let mut still_outside = Vec::new();
    for index in 0..registry.len() {
        let record = registry.record(index);
        let optimized = record.optimized_vertex.unwrap_or(record.current_vertex);
        let outside = !limits.check(data, registry, index, optimized);
        if outside {
            still_outside.push(record.roiidx);
        }
        registry.record_mut(index).outside_limits = outside;
    }
    if !still_outside.is_empty() {
        warn!(
            target: "pint_core",
            "Seeds still outside their limits after reconciliation: {:?}",
            still_outside
        );
    }

    Ok(ReconcileOutcome {
        reset,
        second_pass: Some(second_pass),
        still_outside,
    })
}
