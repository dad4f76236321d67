// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seed registry
//!
//! One record per seed, in seed-table row order. The set of `roiidx` labels
//! and each seed's network are fixed at construction; only positions and
//! diagnostics change during a run. Positions are hemisphere-local.

use ahash::AHashSet;
use pint_surface::{Hemisphere, RoiIdx, RoiSeed, VertexIdx, UNASSIGNED};

use crate::types::{PintError, PintResult};

/// One row of the seed table
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSpec {
    pub hemisphere: Hemisphere,
    pub network: String,
    pub template_vertex: VertexIdx,
    /// Explicit label; when every row omits it, rows are numbered from 1
    pub roiidx: Option<RoiIdx>,
}

/// Position and displacement of a seed after one sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStep {
    pub sweep: u32,
    pub vertex: VertexIdx,
    pub distance: f64,
}

/// Where a seed currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPosition {
    pub roiidx: RoiIdx,
    pub hemisphere: Hemisphere,
    pub vertex: VertexIdx,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedRecord {
    pub roiidx: RoiIdx,
    pub network: String,
    pub hemisphere: Hemisphere,
    pub template_vertex: VertexIdx,
    pub current_vertex: VertexIdx,
    /// Geodesic length (mm) of the most recent move
    pub displacement: f64,
    /// Final position of the latest completed pass (`ivertex`)
    pub optimized_vertex: Option<VertexIdx>,
    /// Template to optimized distance (`distance`), `None` beyond the reporting radius
    pub template_distance: Option<f64>,
    /// Start position of the reconciliation pass (`avertex`)
    pub reconciled_vertex: Option<VertexIdx>,
    /// Still outside its permitted region after reconciliation
    pub outside_limits: bool,
    /// The leave-one-out network target could not be formed
    pub degenerate_target: bool,
    history: Vec<SweepStep>,
}

impl SeedRecord {
    fn new(spec: SeedSpec, roiidx: RoiIdx) -> Self {
        Self {
            roiidx,
            network: spec.network,
            hemisphere: spec.hemisphere,
            template_vertex: spec.template_vertex,
            current_vertex: spec.template_vertex,
            displacement: 0.0,
            optimized_vertex: None,
            template_distance: None,
            reconciled_vertex: None,
            outside_limits: false,
            degenerate_target: false,
            history: Vec::new(),
        }
    }

    /// Recorded sweeps (all of them with full trace, otherwise the last two)
    pub fn history(&self) -> &[SweepStep] {
        &self.history
    }

    /// Step recorded for a given sweep index, if it is still held
    pub fn step(&self, sweep: u32) -> Option<&SweepStep> {
        self.history.iter().find(|s| s.sweep == sweep)
    }

    pub fn position(&self) -> SeedPosition {
        SeedPosition {
            roiidx: self.roiidx,
            hemisphere: self.hemisphere,
            vertex: self.current_vertex,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedRegistry {
    records: Vec<SeedRecord>,
    networks: Vec<String>,
    trace: bool,
}

impl SeedRegistry {
    /// Build the registry from seed-table rows
    ///
    /// # Errors
    /// Empty tables, duplicate or zero labels, and tables where only some rows
    /// carry a label.
    pub fn new(specs: Vec<SeedSpec>, trace: bool) -> PintResult<Self> {
        if specs.is_empty() {
            return Err(PintError::NoSeeds);
        }

        let labelled = specs.iter().filter(|s| s.roiidx.is_some()).count();
        if labelled != 0 && labelled != specs.len() {
            return Err(PintError::PartialRoiIdx);
        }

        let mut seen = AHashSet::new();
        let mut networks: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(specs.len());

        for (row, spec) in specs.into_iter().enumerate() {
            let roiidx = spec.roiidx.unwrap_or(row as RoiIdx + 1);
            if roiidx == UNASSIGNED {
                return Err(PintError::InvalidRoiIdx(roiidx));
            }
            if !seen.insert(roiidx) {
                return Err(PintError::DuplicateRoiIdx(roiidx));
            }
            if !networks.contains(&spec.network) {
                networks.push(spec.network.clone());
            }
            records.push(SeedRecord::new(spec, roiidx));
        }

        Ok(Self {
            records,
            networks,
            trace,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> &SeedRecord {
        &self.records[index]
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> &mut SeedRecord {
        &mut self.records[index]
    }

    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Network labels in order of first appearance in the seed table
    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    /// Registry rows belonging to a network
    pub fn members(&self, network: &str) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.network == network)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn roiidx_set(&self) -> Vec<RoiIdx> {
        let mut labels: Vec<RoiIdx> = self.records.iter().map(|r| r.roiidx).collect();
        labels.sort_unstable();
        labels
    }

    pub fn index_of(&self, roiidx: RoiIdx) -> Option<usize> {
        self.records.iter().position(|r| r.roiidx == roiidx)
    }

    pub fn positions(&self) -> Vec<SeedPosition> {
        self.records.iter().map(SeedRecord::position).collect()
    }

    pub fn template_positions(&self) -> Vec<SeedPosition> {
        self.records
            .iter()
            .map(|r| SeedPosition {
                roiidx: r.roiidx,
                hemisphere: r.hemisphere,
                vertex: r.template_vertex,
            })
            .collect()
    }

    /// Final positions, falling back to the current position before any pass finished
    pub fn optimized_positions(&self) -> Vec<SeedPosition> {
        self.records
            .iter()
            .map(|r| SeedPosition {
                roiidx: r.roiidx,
                hemisphere: r.hemisphere,
                vertex: r.optimized_vertex.unwrap_or(r.current_vertex),
            })
            .collect()
    }

    /// Seed centres of one hemisphere, for the geometry provider
    pub fn hemisphere_seeds(positions: &[SeedPosition], hemisphere: Hemisphere) -> Vec<RoiSeed> {
        positions
            .iter()
            .filter(|p| p.hemisphere == hemisphere)
            .map(|p| RoiSeed::new(p.roiidx, p.vertex))
            .collect()
    }

    /// Set the start position of every seed for a new pass
    pub(crate) fn restart_from(&mut self, starts: &[VertexIdx]) {
        for (record, &vertex) in self.records.iter_mut().zip(starts) {
            record.current_vertex = vertex;
            record.displacement = 0.0;
        }
    }

    /// Merge one sweep's buffered positions and displacements
    pub(crate) fn commit_sweep(&mut self, sweep: u32, moves: &[(VertexIdx, f64)]) {
        let trace = self.trace;
        for (record, &(vertex, distance)) in self.records.iter_mut().zip(moves) {
            record.current_vertex = vertex;
            record.displacement = distance;
            record.history.push(SweepStep {
                sweep,
                vertex,
                distance,
            });
            if !trace && record.history.len() > 2 {
                record.history.remove(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(hemi: Hemisphere, network: &str, vertex: VertexIdx, roiidx: Option<RoiIdx>) -> SeedSpec {
        SeedSpec {
            hemisphere: hemi,
            network: network.to_string(),
            template_vertex: vertex,
            roiidx,
        }
    }

    #[test]
    fn test_sequential_labels_when_absent() {
        let registry = SeedRegistry::new(
            vec![
                spec(Hemisphere::Left, "DMN", 10, None),
                spec(Hemisphere::Right, "VIS", 20, None),
                spec(Hemisphere::Right, "DMN", 30, None),
            ],
            false,
        )
        .unwrap();

        assert_eq!(registry.roiidx_set(), vec![1, 2, 3]);
        assert_eq!(registry.networks(), &["DMN".to_string(), "VIS".to_string()]);
        assert_eq!(registry.members("DMN"), vec![0, 2]);
        assert_eq!(registry.record(1).current_vertex, 20);
    }

    #[test]
    fn test_label_errors() {
        let dup = SeedRegistry::new(
            vec![
                spec(Hemisphere::Left, "A", 1, Some(4)),
                spec(Hemisphere::Left, "A", 2, Some(4)),
            ],
            false,
        );
        assert!(matches!(dup, Err(PintError::DuplicateRoiIdx(4))));

        let zero = SeedRegistry::new(vec![spec(Hemisphere::Left, "A", 1, Some(0))], false);
        assert!(matches!(zero, Err(PintError::InvalidRoiIdx(0))));

        let partial = SeedRegistry::new(
            vec![
                spec(Hemisphere::Left, "A", 1, Some(3)),
                spec(Hemisphere::Left, "A", 2, None),
            ],
            false,
        );
        assert!(matches!(partial, Err(PintError::PartialRoiIdx)));

        assert!(matches!(SeedRegistry::new(vec![], false), Err(PintError::NoSeeds)));
    }

    #[test]
    fn test_history_bounded_without_trace() {
        let mut registry =
            SeedRegistry::new(vec![spec(Hemisphere::Left, "A", 1, None)], false).unwrap();
        for sweep in 0..4 {
            registry.commit_sweep(sweep, &[(sweep as usize + 2, 1.5)]);
        }
        let sweeps: Vec<u32> = registry.record(0).history().iter().map(|s| s.sweep).collect();
        assert_eq!(sweeps, vec![2, 3]);
        assert_eq!(registry.record(0).current_vertex, 5);
        assert!(registry.record(0).step(0).is_none());
    }

    #[test]
    fn test_history_kept_with_trace() {
        let mut registry =
            SeedRegistry::new(vec![spec(Hemisphere::Left, "A", 1, None)], true).unwrap();
        for sweep in 0..4 {
            registry.commit_sweep(sweep, &[(1, 0.0)]);
        }
        assert_eq!(registry.record(0).history().len(), 4);
    }

    #[test]
    fn test_hemisphere_seeds() {
        let registry = SeedRegistry::new(
            vec![
                spec(Hemisphere::Left, "A", 3, Some(7)),
                spec(Hemisphere::Right, "A", 4, Some(9)),
            ],
            false,
        )
        .unwrap();
        let seeds = SeedRegistry::hemisphere_seeds(&registry.positions(), Hemisphere::Right);
        assert_eq!(seeds, vec![RoiSeed::new(9, 4)]);
    }
}
