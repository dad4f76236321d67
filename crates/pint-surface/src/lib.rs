// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# PINT Surface Geometry

Geometric services used by the vertex search:
- Disk-shaped regions of interest around seed vertices, with mutually
  exclusive vertex assignment
- Geodesic distances from an origin vertex, bounded by a search radius

The search itself only depends on the [`GeometryProvider`] trait.
[`MeshGeodesics`] implements it over a pair of triangle meshes using
shortest paths along mesh edges.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod geodesic;
pub mod hemisphere;
pub mod mesh;
pub mod provider;

pub use geodesic::{MeshGeodesics, OverlapRule};
pub use hemisphere::Hemisphere;
pub use mesh::SurfaceMesh;
pub use provider::{
    distance_between, GeometryError, GeometryProvider, GeometryResult, RoiIdx, RoiSeed,
    VertexIdx, UNASSIGNED,
};
