// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Geometry provider contract
//!
//! Implementations may be expensive (external tools, large meshes). Callers
//! should expect each call to block.

use crate::Hemisphere;

/// Seed label carried by region masks (0 = unassigned)
pub type RoiIdx = u32;

/// Hemisphere-local vertex index
pub type VertexIdx = usize;

/// Label of vertices that belong to no region
pub const UNASSIGNED: RoiIdx = 0;

/// A labelled region centre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiSeed {
    pub roiidx: RoiIdx,
    pub vertex: VertexIdx,
}

impl RoiSeed {
    pub fn new(roiidx: RoiIdx, vertex: VertexIdx) -> Self {
        Self { roiidx, vertex }
    }
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur during geometry operations
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Vertex {vertex} is out of range for hemisphere {hemisphere} ({count} vertices)")]
    VertexOutOfRange {
        hemisphere: Hemisphere,
        vertex: VertexIdx,
        count: usize,
    },

    #[error("Invalid radius: {0} mm")]
    InvalidRadius(f64),

    #[error("Unknown hemisphere: '{0}'")]
    UnknownHemisphere(String),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Seed label {0} is reserved for unassigned vertices")]
    ReservedLabel(RoiIdx),

    #[error("Failed to read surface: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse surface: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Geometry provider failed: {0}")]
    Provider(String),
}

/// Geodesic services on a pair of hemisphere surfaces
///
/// `disk_rois` must assign every vertex to at most one seed. Vertices out of
/// range of every seed are labelled [`UNASSIGNED`].
pub trait GeometryProvider: Send + Sync {
    /// Number of vertices on a hemisphere surface
    fn vertex_count(&self, hemisphere: Hemisphere) -> usize;

    /// Per-vertex region labels for disks of `radius_mm` around `seeds`
    fn disk_rois(
        &self,
        hemisphere: Hemisphere,
        radius_mm: f64,
        seeds: &[RoiSeed],
    ) -> GeometryResult<Vec<RoiIdx>>;

    /// Distance from `origin` to every vertex, `None` beyond `radius_mm`
    fn geodesic_distances(
        &self,
        hemisphere: Hemisphere,
        origin: VertexIdx,
        radius_mm: f64,
    ) -> GeometryResult<Vec<Option<f64>>>;
}

/// Geodesic distance between two vertices of one hemisphere
///
/// Identical vertices are 0 apart without consulting the provider. Returns
/// `None` when `to` lies beyond `radius_mm` of `from`.
pub fn distance_between<G: GeometryProvider + ?Sized>(
    provider: &G,
    hemisphere: Hemisphere,
    from: VertexIdx,
    to: VertexIdx,
    radius_mm: f64,
) -> GeometryResult<Option<f64>> {
    if from == to {
        return Ok(Some(0.0));
    }
    let count = provider.vertex_count(hemisphere);
    if to >= count {
        return Err(GeometryError::VertexOutOfRange {
            hemisphere,
            vertex: to,
            count,
        });
    }
    let distances = provider.geodesic_distances(hemisphere, from, radius_mm)?;
    Ok(distances.get(to).copied().flatten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Vertices on a line, 2 mm apart
    struct Line {
        calls: AtomicUsize,
    }

    impl GeometryProvider for Line {
        fn vertex_count(&self, _hemisphere: Hemisphere) -> usize {
            10
        }

        fn disk_rois(
            &self,
            _hemisphere: Hemisphere,
            _radius_mm: f64,
            _seeds: &[RoiSeed],
        ) -> GeometryResult<Vec<RoiIdx>> {
            Ok(vec![UNASSIGNED; 10])
        }

        fn geodesic_distances(
            &self,
            _hemisphere: Hemisphere,
            origin: VertexIdx,
            radius_mm: f64,
        ) -> GeometryResult<Vec<Option<f64>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..10)
                .map(|v| {
                    let d = (v as f64 - origin as f64).abs() * 2.0;
                    (d <= radius_mm).then_some(d)
                })
                .collect())
        }
    }

    #[test]
    fn test_identical_vertices_skip_provider() {
        let line = Line { calls: AtomicUsize::new(0) };
        let d = distance_between(&line, Hemisphere::Left, 4, 4, 6.0).unwrap();
        assert_eq!(d, Some(0.0));
        assert_eq!(line.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_distance_within_and_beyond_radius() {
        let line = Line { calls: AtomicUsize::new(0) };
        assert_eq!(distance_between(&line, Hemisphere::Left, 1, 3, 6.0).unwrap(), Some(4.0));
        assert_eq!(distance_between(&line, Hemisphere::Left, 1, 9, 6.0).unwrap(), None);
    }

    #[test]
    fn test_target_out_of_range() {
        let line = Line { calls: AtomicUsize::new(0) };
        let err = distance_between(&line, Hemisphere::Right, 1, 42, 6.0).unwrap_err();
        assert!(matches!(err, GeometryError::VertexOutOfRange { vertex: 42, .. }));
    }
}
