// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region builder
//!
//! Turns seed positions into hemisphere-stacked label masks through the
//! geometry provider. One provider call per hemisphere per radius; no
//! aggregation happens here.

use pint_config::SearchConfig;
use pint_surface::{GeometryProvider, Hemisphere, RoiIdx, UNASSIGNED};
use tracing::debug;

use crate::registry::{SeedPosition, SeedRegistry};
use crate::timeseries::FunctionalData;
use crate::types::{PintError, PintResult};

/// Stacked vertex -> roiidx map (0 = unassigned)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    labels: Vec<RoiIdx>,
}

impl RegionMask {
    pub fn from_labels(labels: Vec<RoiIdx>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[RoiIdx] {
        &self.labels
    }

    pub fn label(&self, stacked: usize) -> RoiIdx {
        self.labels[stacked]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Stacked vertices carrying `roiidx`, ascending
    pub fn vertices_of(&self, roiidx: RoiIdx) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == roiidx && label != UNASSIGNED)
            .map(|(v, _)| v)
            .collect()
    }

    /// Distinct nonzero labels, ascending
    pub fn distinct_labels(&self) -> Vec<RoiIdx> {
        let mut labels: Vec<RoiIdx> = self
            .labels
            .iter()
            .copied()
            .filter(|&l| l != UNASSIGNED)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    fn exclude_invalid(&mut self, data: &FunctionalData) {
        for (v, label) in self.labels.iter_mut().enumerate() {
            if !data.is_valid(v) {
                *label = UNASSIGNED;
            }
        }
    }
}

/// The three masks rebuilt at the start of every sweep
#[derive(Debug, Clone)]
pub struct RegionSet {
    pub sampling: RegionMask,
    pub search: RegionMask,
    pub padding: RegionMask,
}

impl RegionSet {
    /// Vertices a seed may move to: its search disk intersected with its padding disk
    pub fn candidates(&self, roiidx: RoiIdx) -> Vec<usize> {
        self.search
            .vertices_of(roiidx)
            .into_iter()
            .filter(|&v| self.padding.label(v) == roiidx)
            .collect()
    }
}

pub struct RegionBuilder<'a, G: GeometryProvider + ?Sized> {
    provider: &'a G,
    data: &'a FunctionalData,
}

impl<'a, G: GeometryProvider + ?Sized> RegionBuilder<'a, G> {
    pub fn new(provider: &'a G, data: &'a FunctionalData) -> Self {
        Self { provider, data }
    }

    /// Disk mask of `radius_mm` around every position, invalid vertices removed
    pub fn build(&self, positions: &[SeedPosition], radius_mm: f64) -> PintResult<RegionMask> {
        let mut labels = Vec::with_capacity(self.data.total_vertices());

        for hemisphere in Hemisphere::BOTH {
            let seeds = SeedRegistry::hemisphere_seeds(positions, hemisphere);
            let expected = self.data.vertex_count(hemisphere);
            let hemi_labels = if seeds.is_empty() {
                vec![UNASSIGNED; expected]
            } else {
                self.provider.disk_rois(hemisphere, radius_mm, &seeds)?
            };
            if hemi_labels.len() != expected {
                return Err(PintError::ResolutionMismatch {
                    what: format!("disk ROI labels for hemisphere {}", hemisphere),
                    expected,
                    actual: hemi_labels.len(),
                });
            }
            labels.extend(hemi_labels);
        }

        let mut mask = RegionMask::from_labels(labels);
        mask.exclude_invalid(self.data);

        debug!(
            target: "pint_core",
            "Built {} mm mask for {} seeds",
            radius_mm,
            positions.len()
        );
        Ok(mask)
    }

    /// Sampling, search and padding masks for the current positions
    pub fn build_set(
        &self,
        positions: &[SeedPosition],
        search: &SearchConfig,
    ) -> PintResult<RegionSet> {
        Ok(RegionSet {
            sampling: self.build(positions, search.sampling_radius_mm)?,
            search: self.build(positions, search.search_radius_mm)?,
            padding: self.build(positions, search.padding_radius_mm)?,
        })
    }
}
