// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hemisphere-stacked functional data
//!
//! Rows are vertices (left hemisphere block first), columns are timepoints.
//! The matrix is read-only for the whole run. Vertices flagged invalid are
//! dropped from every region mask.

use ndarray::{concatenate, Array2, ArrayView1, ArrayView2, Axis};
use pint_config::QualityConfig;
use pint_surface::{Hemisphere, VertexIdx};
use tracing::info;

use crate::types::{PintError, PintResult};

#[derive(Debug, Clone)]
pub struct FunctionalData {
    data: Array2<f64>,
    left_vertices: usize,
    valid: Vec<bool>,
}

impl FunctionalData {
    /// Stack per-hemisphere matrices (vertices x timepoints); every vertex starts valid
    pub fn new(left: Array2<f64>, right: Array2<f64>) -> PintResult<Self> {
        if left.ncols() != right.ncols() {
            return Err(PintError::TimepointMismatch {
                left: left.ncols(),
                right: right.ncols(),
            });
        }
        let left_vertices = left.nrows();
        let data = concatenate(Axis(0), &[left.view(), right.view()]).map_err(|e| {
            PintError::Config(format!("failed to stack hemisphere data: {}", e))
        })?;
        let valid = vec![true; data.nrows()];
        Ok(Self {
            data,
            left_vertices,
            valid,
        })
    }

    /// Replace the validity flags; one flag per stacked vertex
    pub fn with_validity(mut self, valid: Vec<bool>) -> PintResult<Self> {
        if valid.len() != self.data.nrows() {
            return Err(PintError::ResolutionMismatch {
                what: "validity mask".to_string(),
                expected: self.data.nrows(),
                actual: valid.len(),
            });
        }
        self.valid = valid;
        Ok(self)
    }

    /// Flag signal dropout: a vertex is invalid when its value at the quality
    /// timepoint is below the configured minimum
    pub fn with_quality(self, quality: &QualityConfig) -> PintResult<Self> {
        if !quality.enabled {
            return Ok(self);
        }
        if quality.timepoint >= self.timepoints() {
            return Err(PintError::Config(format!(
                "quality timepoint {} is beyond the {} available timepoints",
                quality.timepoint,
                self.timepoints()
            )));
        }
        let valid: Vec<bool> = self
            .data
            .column(quality.timepoint)
            .iter()
            .map(|&value| value >= quality.min_value)
            .collect();
        let dropped = valid.iter().filter(|v| !**v).count();
        if dropped > 0 {
            info!(
                target: "pint_core",
                "Excluding {} of {} vertices with signal below {} at timepoint {}",
                dropped,
                valid.len(),
                quality.min_value,
                quality.timepoint
            );
        }
        self.with_validity(valid)
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn timepoints(&self) -> usize {
        self.data.ncols()
    }

    pub fn total_vertices(&self) -> usize {
        self.data.nrows()
    }

    pub fn left_vertices(&self) -> usize {
        self.left_vertices
    }

    pub fn vertex_count(&self, hemisphere: Hemisphere) -> usize {
        match hemisphere {
            Hemisphere::Left => self.left_vertices,
            Hemisphere::Right => self.data.nrows() - self.left_vertices,
        }
    }

    /// Row of a hemisphere-local vertex in the stacked matrix
    pub fn stacked_index(&self, hemisphere: Hemisphere, vertex: VertexIdx) -> usize {
        match hemisphere {
            Hemisphere::Left => vertex,
            Hemisphere::Right => vertex + self.left_vertices,
        }
    }

    /// Hemisphere-local vertex of a stacked row
    pub fn local_index(&self, stacked: usize) -> (Hemisphere, VertexIdx) {
        if stacked < self.left_vertices {
            (Hemisphere::Left, stacked)
        } else {
            (Hemisphere::Right, stacked - self.left_vertices)
        }
    }

    pub fn series(&self, stacked: usize) -> ArrayView1<'_, f64> {
        self.data.row(stacked)
    }

    pub fn is_valid(&self, stacked: usize) -> bool {
        self.valid[stacked]
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }
}
