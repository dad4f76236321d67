// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Aggregator
//!
//! Pure reductions over a frozen sampling mask: one mean series per seed
//! region, one mean series per network. Recomputed once per sweep.

use ahash::AHashMap;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use pint_surface::RoiIdx;

use crate::regions::RegionMask;
use crate::registry::SeedRegistry;
use crate::timeseries::FunctionalData;

/// Mean time series of every labelled sampling region, ordered by label
#[derive(Debug, Clone)]
pub struct SamplingMeans {
    labels: Vec<RoiIdx>,
    means: Array2<f64>,
    rows: AHashMap<RoiIdx, usize>,
}

impl SamplingMeans {
    pub fn labels(&self) -> &[RoiIdx] {
        &self.labels
    }

    /// One row per label, one column per timepoint
    pub fn means(&self) -> ArrayView2<'_, f64> {
        self.means.view()
    }

    pub fn row(&self, roiidx: RoiIdx) -> Option<ArrayView1<'_, f64>> {
        self.rows.get(&roiidx).map(|&r| self.means.row(r))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Mean of the rows of `members`; `None` if none of them has a region
    fn mean_of(&self, members: impl Iterator<Item = RoiIdx>) -> Option<Array1<f64>> {
        let mut sum = Array1::<f64>::zeros(self.means.ncols());
        let mut count = 0usize;
        for roiidx in members {
            if let Some(row) = self.row(roiidx) {
                sum += &row;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }
}

/// Mean series per network, in seed-table order of first appearance
#[derive(Debug, Clone)]
pub struct NetworkMeans {
    networks: Vec<String>,
    means: Array2<f64>,
}

impl NetworkMeans {
    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    pub fn means(&self) -> ArrayView2<'_, f64> {
        self.means.view()
    }

    pub fn mean(&self, network: &str) -> Option<ArrayView1<'_, f64>> {
        self.networks
            .iter()
            .position(|n| n == network)
            .map(|i| self.means.row(i))
    }

    /// Timepoints x k matrix of every other network's mean series
    pub fn others(&self, network: &str) -> Array2<f64> {
        let keep: Vec<usize> = self
            .networks
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_str() != network)
            .map(|(i, _)| i)
            .collect();
        let mut others = Array2::<f64>::zeros((self.means.ncols(), keep.len()));
        for (mut column, &row) in others.axis_iter_mut(Axis(1)).zip(&keep) {
            column.assign(&self.means.row(row));
        }
        others
    }
}

/// Mean time series over the vertices of each distinct nonzero label
pub fn sampling_meants(mask: &RegionMask, data: &FunctionalData) -> SamplingMeans {
    let labels = mask.distinct_labels();
    let rows: AHashMap<RoiIdx, usize> = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();

    let mut sums = Array2::<f64>::zeros((labels.len(), data.timepoints()));
    let mut counts = vec![0usize; labels.len()];
    for (vertex, &label) in mask.labels().iter().enumerate() {
        if let Some(&row) = rows.get(&label) {
            let mut target = sums.row_mut(row);
            target += &data.series(vertex);
            counts[row] += 1;
        }
    }
    for (mut row, &count) in sums.axis_iter_mut(Axis(0)).zip(&counts) {
        row /= count as f64;
    }

    SamplingMeans {
        labels,
        means: sums,
        rows,
    }
}

/// Mean of member sampling rows for every network that has at least one sampled member
pub fn network_meants(sampling: &SamplingMeans, registry: &SeedRegistry) -> NetworkMeans {
    let mut networks = Vec::new();
    let mut rows = Vec::new();

    for network in registry.networks() {
        let members = registry
            .records()
            .iter()
            .filter(|r| &r.network == network)
            .map(|r| r.roiidx);
        if let Some(mean) = sampling.mean_of(members) {
            networks.push(network.clone());
            rows.push(mean);
        }
    }

    let mut means = Array2::<f64>::zeros((rows.len(), sampling.means.ncols()));
    for (mut target, row) in means.axis_iter_mut(Axis(0)).zip(&rows) {
        target.assign(row);
    }

    NetworkMeans { networks, means }
}

/// Network target of a seed: mean of the *other* members' sampling rows
///
/// `None` when no other member of the network has a sampling region.
pub fn leave_one_out_target(
    sampling: &SamplingMeans,
    registry: &SeedRegistry,
    seed: usize,
) -> Option<Array1<f64>> {
    let record = registry.record(seed);
    let others = registry
        .records()
        .iter()
        .filter(|r| r.network == record.network && r.roiidx != record.roiidx)
        .map(|r| r.roiidx);
    sampling.mean_of(others)
}
