// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for the vertex search.
*/

use pint_surface::{GeometryError, Hemisphere, RoiIdx, VertexIdx};

/// Result type for PINT operations
pub type PintResult<T> = Result<T, PintError>;

/// Errors that can occur during a PINT run
///
/// Non-convergence, empty candidate windows and seeds ending outside their
/// limits are reported through [`crate::PintReport`], not as errors.
#[derive(Debug, thiserror::Error)]
pub enum PintError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Resolution mismatch for {what}: expected {expected} vertices, got {actual}")]
    ResolutionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Timepoint mismatch: left hemisphere has {left} timepoints, right has {right}")]
    TimepointMismatch { left: usize, right: usize },

    #[error("Seed roiidx {roiidx} template vertex {vertex} is outside hemisphere {hemisphere} ({count} vertices)")]
    SeedOutOfRange {
        roiidx: RoiIdx,
        hemisphere: Hemisphere,
        vertex: VertexIdx,
        count: usize,
    },

    #[error("Duplicate roiidx {0} in seed table")]
    DuplicateRoiIdx(RoiIdx),

    #[error("Invalid roiidx {0}: labels must be positive")]
    InvalidRoiIdx(RoiIdx),

    #[error("Seed table mixes rows with and without roiidx")]
    PartialRoiIdx,

    #[error("Seed table is empty")]
    NoSeeds,

    #[error("Partial correlation needs at least two seeds per network; network '{network}' has {members}")]
    SingletonNetwork { network: String, members: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}
