// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Triangle surface meshes
//!
//! Surfaces are exchanged as JSON:
//! `{ "coordinates": [[x, y, z], ...], "triangles": [[a, b, c], ...] }`
//! with coordinates in millimetres.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{GeometryError, GeometryResult, VertexIdx};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub coordinates: Vec<[f64; 3]>,
    pub triangles: Vec<[VertexIdx; 3]>,
}

impl SurfaceMesh {
    /// Build a mesh, checking that every triangle references existing vertices
    pub fn new(coordinates: Vec<[f64; 3]>, triangles: Vec<[VertexIdx; 3]>) -> GeometryResult<Self> {
        let mesh = Self {
            coordinates,
            triangles,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Load a mesh from a JSON surface file
    pub fn load_json(path: &Path) -> GeometryResult<Self> {
        let content = fs::read_to_string(path)?;
        let mesh: SurfaceMesh = serde_json::from_str(&content)?;
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    fn validate(&self) -> GeometryResult<()> {
        if let Some(v) = self
            .coordinates
            .iter()
            .position(|c| c.iter().any(|x| !x.is_finite()))
        {
            return Err(GeometryError::InvalidMesh(format!(
                "vertex {} has a non-finite coordinate",
                v
            )));
        }
        let count = self.coordinates.len();
        for (t, triangle) in self.triangles.iter().enumerate() {
            if let Some(&bad) = triangle.iter().find(|&&v| v >= count) {
                return Err(GeometryError::InvalidMesh(format!(
                    "triangle {} references vertex {} but the mesh has {} vertices",
                    t, bad, count
                )));
            }
        }
        Ok(())
    }

    /// Euclidean length of the edge between two vertices
    pub fn edge_length(&self, a: VertexIdx, b: VertexIdx) -> f64 {
        let pa = self.coordinates[a];
        let pb = self.coordinates[b];
        ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2) + (pa[2] - pb[2]).powi(2)).sqrt()
    }

    /// Undirected edge adjacency with edge lengths, deduplicated per vertex
    pub fn adjacency(&self) -> Vec<Vec<(VertexIdx, f64)>> {
        let mut neighbours: Vec<Vec<VertexIdx>> = vec![Vec::new(); self.vertex_count()];
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                if u != v {
                    neighbours[u].push(v);
                    neighbours[v].push(u);
                }
            }
        }

        neighbours
            .into_iter()
            .enumerate()
            .map(|(u, mut list)| {
                list.sort_unstable();
                list.dedup();
                list.into_iter().map(|v| (v, self.edge_length(u, v))).collect()
            })
            .collect()
    }

    /// Regular triangulated grid in the z = 0 plane
    ///
    /// Vertex `(row, col)` has index `row * cols + col` and sits at
    /// `(col * spacing, row * spacing, 0)`.
    pub fn grid(rows: usize, cols: usize, spacing_mm: f64) -> Self {
        let mut coordinates = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                coordinates.push([col as f64 * spacing_mm, row as f64 * spacing_mm, 0.0]);
            }
        }

        let mut triangles = Vec::new();
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                let v = row * cols + col;
                triangles.push([v, v + 1, v + cols]);
                triangles.push([v + 1, v + cols + 1, v + cols]);
            }
        }

        Self {
            coordinates,
            triangles,
        }
    }
}
