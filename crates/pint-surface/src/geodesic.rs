// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Mesh-based geodesic provider

Geodesic distance is approximated by the shortest path along mesh edges
(Dijkstra with Euclidean edge lengths). Searches stop at the requested radius,
so the cost of a query scales with the disk area rather than the mesh size.
*/

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use tracing::debug;

use crate::{
    GeometryError, GeometryProvider, GeometryResult, Hemisphere, RoiIdx, RoiSeed, SurfaceMesh,
    VertexIdx, UNASSIGNED,
};

/// How vertices reached by more than one seed disk are labelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapRule {
    /// Contested vertices belong to no seed
    #[default]
    Exclude,
    /// Contested vertices go to the closest seed (lower label on ties)
    Nearest,
}

/// Frontier entry, ordered so the max-heap pops the closest vertex first
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    vertex: VertexIdx,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Edge graph of one hemisphere surface
#[derive(Debug, Clone)]
struct MeshGraph {
    adjacency: Vec<Vec<(VertexIdx, f64)>>,
}

impl MeshGraph {
    fn from_mesh(mesh: &SurfaceMesh) -> Self {
        Self {
            adjacency: mesh.adjacency(),
        }
    }

    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Shortest-path distances from `origin` to every vertex within `radius_mm`
    fn bounded_distances(&self, origin: VertexIdx, radius_mm: f64) -> AHashMap<VertexIdx, f64> {
        let mut settled: AHashMap<VertexIdx, f64> = AHashMap::new();
        let mut best: AHashMap<VertexIdx, f64> = AHashMap::new();
        let mut heap = BinaryHeap::new();

        best.insert(origin, 0.0);
        heap.push(Frontier {
            distance: 0.0,
            vertex: origin,
        });

        while let Some(Frontier { distance, vertex }) = heap.pop() {
            if settled.contains_key(&vertex) {
                continue;
            }
            settled.insert(vertex, distance);

            for &(next, length) in &self.adjacency[vertex] {
                let candidate = distance + length;
                if candidate > radius_mm || settled.contains_key(&next) {
                    continue;
                }
                let improved = best.get(&next).map_or(true, |&known| candidate < known);
                if improved {
                    best.insert(next, candidate);
                    heap.push(Frontier {
                        distance: candidate,
                        vertex: next,
                    });
                }
            }
        }

        settled
    }
}

/// [`GeometryProvider`] over a left and a right triangle mesh
#[derive(Debug, Clone)]
pub struct MeshGeodesics {
    left: MeshGraph,
    right: MeshGraph,
    overlap: OverlapRule,
}

impl MeshGeodesics {
    pub fn new(left: &SurfaceMesh, right: &SurfaceMesh) -> Self {
        Self {
            left: MeshGraph::from_mesh(left),
            right: MeshGraph::from_mesh(right),
            overlap: OverlapRule::default(),
        }
    }

    pub fn with_overlap_rule(mut self, overlap: OverlapRule) -> Self {
        self.overlap = overlap;
        self
    }

    fn graph(&self, hemisphere: Hemisphere) -> &MeshGraph {
        match hemisphere {
            Hemisphere::Left => &self.left,
            Hemisphere::Right => &self.right,
        }
    }

    fn check_vertex(&self, hemisphere: Hemisphere, vertex: VertexIdx) -> GeometryResult<()> {
        let count = self.graph(hemisphere).vertex_count();
        if vertex >= count {
            return Err(GeometryError::VertexOutOfRange {
                hemisphere,
                vertex,
                count,
            });
        }
        Ok(())
    }
}

fn check_radius(radius_mm: f64) -> GeometryResult<()> {
    if !radius_mm.is_finite() || radius_mm < 0.0 {
        return Err(GeometryError::InvalidRadius(radius_mm));
    }
    Ok(())
}

impl GeometryProvider for MeshGeodesics {
    fn vertex_count(&self, hemisphere: Hemisphere) -> usize {
        self.graph(hemisphere).vertex_count()
    }

    fn disk_rois(
        &self,
        hemisphere: Hemisphere,
        radius_mm: f64,
        seeds: &[RoiSeed],
    ) -> GeometryResult<Vec<RoiIdx>> {
        check_radius(radius_mm)?;
        let graph = self.graph(hemisphere);
        let count = graph.vertex_count();

        // (label, distance, number of disks covering the vertex)
        let mut owners: Vec<(RoiIdx, f64, u32)> = vec![(UNASSIGNED, f64::INFINITY, 0); count];

        for seed in seeds {
            if seed.roiidx == UNASSIGNED {
                return Err(GeometryError::ReservedLabel(seed.roiidx));
            }
            self.check_vertex(hemisphere, seed.vertex)?;

            for (vertex, distance) in graph.bounded_distances(seed.vertex, radius_mm) {
                let owner = &mut owners[vertex];
                owner.2 += 1;
                let closer = distance < owner.1 || (distance == owner.1 && seed.roiidx < owner.0);
                if owner.0 == UNASSIGNED || closer {
                    owner.0 = seed.roiidx;
                    owner.1 = distance;
                }
            }
        }

        let labels: Vec<RoiIdx> = owners
            .into_iter()
            .map(|(label, _, hits)| match self.overlap {
                OverlapRule::Exclude if hits > 1 => UNASSIGNED,
                _ => label,
            })
            .collect();

        debug!(
            target: "pint_surface",
            "disk_rois {}: {} seeds, radius {} mm, {} vertices labelled",
            hemisphere,
            seeds.len(),
            radius_mm,
            labels.iter().filter(|&&l| l != UNASSIGNED).count()
        );

        Ok(labels)
    }

    fn geodesic_distances(
        &self,
        hemisphere: Hemisphere,
        origin: VertexIdx,
        radius_mm: f64,
    ) -> GeometryResult<Vec<Option<f64>>> {
        check_radius(radius_mm)?;
        self.check_vertex(hemisphere, origin)?;
        let graph = self.graph(hemisphere);

        let mut distances = vec![None; graph.vertex_count()];
        for (vertex, distance) in graph.bounded_distances(origin, radius_mm) {
            distances[vertex] = Some(distance);
        }
        Ok(distances)
    }
}
