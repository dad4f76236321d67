// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Objective evaluator
//!
//! Scores the admissible candidate vertices of one seed against the
//! leave-one-out mean of its network. Everything read here is frozen for the
//! sweep, so seeds can be evaluated in any order.

use ahash::AHashMap;
use ndarray::Array1;
use pint_config::ObjectiveMode;
use pint_surface::VertexIdx;

use crate::aggregate::{
    leave_one_out_target, network_meants, sampling_meants, NetworkMeans, SamplingMeans,
};
use crate::regions::RegionSet;
use crate::registry::SeedRegistry;
use crate::stats::{pearson, Residualizer};
use crate::timeseries::FunctionalData;

/// Frozen per-sweep state shared by every seed evaluation
#[derive(Debug)]
pub struct SweepInputs<'a> {
    data: &'a FunctionalData,
    regions: RegionSet,
    sampling: SamplingMeans,
    networks: NetworkMeans,
    objective: ObjectiveMode,
    /// Per-network projection onto the other networks' means (partial mode only)
    residualizers: AHashMap<String, Residualizer>,
}

impl<'a> SweepInputs<'a> {
    /// Aggregate the sweep's sampling mask and prepare the objective
    pub fn prepare(
        data: &'a FunctionalData,
        regions: RegionSet,
        registry: &SeedRegistry,
        objective: ObjectiveMode,
    ) -> Self {
        let sampling = sampling_meants(&regions.sampling, data);
        let networks = network_meants(&sampling, registry);

        let residualizers = match objective {
            ObjectiveMode::Full => AHashMap::new(),
            ObjectiveMode::Partial => networks
                .networks()
                .iter()
                .map(|n| (n.clone(), Residualizer::new(networks.others(n).view())))
                .collect(),
        };

        Self {
            data,
            regions,
            sampling,
            networks,
            objective,
            residualizers,
        }
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    pub fn sampling(&self) -> &SamplingMeans {
        &self.sampling
    }

    pub fn networks(&self) -> &NetworkMeans {
        &self.networks
    }

    pub fn objective(&self) -> ObjectiveMode {
        self.objective
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Best candidate differs from the current vertex
    Moved,
    /// Best candidate is the current vertex
    Unchanged,
    /// Search and padding disks share no vertex of this seed
    NoCandidates,
    /// No other member of the network has a sampling region
    DegenerateTarget,
    /// Every candidate scored NaN
    NoFiniteScore,
}

/// Where a seed goes after one evaluation (hemisphere-local vertex)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDecision {
    pub vertex: VertexIdx,
    pub score: Option<f64>,
    pub outcome: MoveOutcome,
}

impl MoveDecision {
    fn stay(vertex: VertexIdx, outcome: MoveOutcome) -> Self {
        Self {
            vertex,
            score: None,
            outcome,
        }
    }
}

/// Pick the best candidate vertex for the seed in registry row `seed`
///
/// Candidates are scanned in ascending stacked order; the first maximum wins
/// and NaN scores are skipped.
pub fn evaluate_seed(inputs: &SweepInputs<'_>, registry: &SeedRegistry, seed: usize) -> MoveDecision {
    let record = registry.record(seed);
    let current = record.current_vertex;

    let candidates = inputs.regions.candidates(record.roiidx);
    if candidates.is_empty() {
        return MoveDecision::stay(current, MoveOutcome::NoCandidates);
    }

    let target = match leave_one_out_target(&inputs.sampling, registry, seed) {
        Some(target) => target,
        None => return MoveDecision::stay(current, MoveOutcome::DegenerateTarget),
    };

    let residualizer = match inputs.objective {
        ObjectiveMode::Full => None,
        ObjectiveMode::Partial => inputs.residualizers.get(&record.network),
    };
    let target: Array1<f64> = match residualizer {
        Some(r) => r.residual(target.view()),
        None => target,
    };

    let mut best: Option<(usize, f64)> = None;
    for &stacked in &candidates {
        let series = inputs.data.series(stacked);
        let score = match residualizer {
            Some(r) => pearson(target.view(), r.residual(series).view()),
            None => pearson(target.view(), series),
        };
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((stacked, score));
        }
    }

    match best {
        Some((stacked, score)) => {
            let (_, vertex) = inputs.data.local_index(stacked);
            let outcome = if vertex == current {
                MoveOutcome::Unchanged
            } else {
                MoveOutcome::Moved
            };
            MoveDecision {
                vertex,
                score: Some(score),
                outcome,
            }
        }
        None => MoveDecision::stay(current, MoveOutcome::NoFiniteScore),
    }
}
