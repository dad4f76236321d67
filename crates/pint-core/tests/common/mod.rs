// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities and helpers

#![allow(dead_code)]

use std::f64::consts::PI;

use ndarray::Array2;
use pint_core::{FunctionalData, SearchConfig, SeedRegistry, SeedSpec};
use pint_surface::{
    GeometryError, GeometryProvider, GeometryResult, Hemisphere, RoiIdx, RoiSeed, VertexIdx,
    UNASSIGNED,
};

pub const TIMEPOINTS: usize = 16;
pub const OFFSET: f64 = 100.0;

/// Vertices on a straight line, `spacing` mm apart, one line per hemisphere
pub struct LineSurface {
    pub left: usize,
    pub right: usize,
    pub spacing: f64,
}

impl LineSurface {
    pub fn new(left: usize, right: usize) -> Self {
        Self {
            left,
            right,
            spacing: 1.0,
        }
    }

    fn distance(&self, a: VertexIdx, b: VertexIdx) -> f64 {
        (a as f64 - b as f64).abs() * self.spacing
    }
}

impl GeometryProvider for LineSurface {
    fn vertex_count(&self, hemisphere: Hemisphere) -> usize {
        match hemisphere {
            Hemisphere::Left => self.left,
            Hemisphere::Right => self.right,
        }
    }

    fn disk_rois(
        &self,
        hemisphere: Hemisphere,
        radius_mm: f64,
        seeds: &[RoiSeed],
    ) -> GeometryResult<Vec<RoiIdx>> {
        if radius_mm < 0.0 {
            return Err(GeometryError::InvalidRadius(radius_mm));
        }
        let count = self.vertex_count(hemisphere);
        Ok((0..count)
            .map(|v| {
                let owners: Vec<RoiIdx> = seeds
                    .iter()
                    .filter(|s| self.distance(s.vertex, v) <= radius_mm)
                    .map(|s| s.roiidx)
                    .collect();
                if owners.len() == 1 {
                    owners[0]
                } else {
                    UNASSIGNED
                }
            })
            .collect())
    }

    fn geodesic_distances(
        &self,
        hemisphere: Hemisphere,
        origin: VertexIdx,
        radius_mm: f64,
    ) -> GeometryResult<Vec<Option<f64>>> {
        let count = self.vertex_count(hemisphere);
        if origin >= count {
            return Err(GeometryError::VertexOutOfRange {
                hemisphere,
                vertex: origin,
                count,
            });
        }
        Ok((0..count)
            .map(|v| {
                let d = self.distance(origin, v);
                (d <= radius_mm).then_some(d)
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Wave {
    Sin(usize),
    Cos(usize),
}

impl Wave {
    pub fn at(self, t: usize) -> f64 {
        let phase = |k: usize| 2.0 * PI * k as f64 * t as f64 / TIMEPOINTS as f64;
        match self {
            Wave::Sin(k) => phase(k).sin(),
            Wave::Cos(k) => phase(k).cos(),
        }
    }
}

/// Hemisphere matrix where every vertex is a sum of harmonics plus a constant offset
pub fn harmonic_hemisphere(vertices: &[&[Wave]]) -> Array2<f64> {
    Array2::from_shape_fn((vertices.len(), TIMEPOINTS), |(v, t)| {
        OFFSET + vertices[v].iter().map(|w| w.at(t)).sum::<f64>()
    })
}

/// Two 5-vertex hemispheres with one seed each at vertex 1, both in network "A".
///
/// Vertex 3 of each hemisphere carries the shared component only, so both
/// seeds move 2 mm to vertex 3 on the first sweep and stay there.
pub fn two_seed_data() -> FunctionalData {
    let left = harmonic_hemisphere(&[
        &[Wave::Cos(2)],
        &[Wave::Sin(1), Wave::Cos(1)],
        &[Wave::Cos(3)],
        &[Wave::Sin(1)],
        &[Wave::Sin(3)],
    ]);
    let right = harmonic_hemisphere(&[
        &[Wave::Cos(4)],
        &[Wave::Sin(1), Wave::Sin(2)],
        &[Wave::Cos(5)],
        &[Wave::Sin(1)],
        &[Wave::Sin(4)],
    ]);
    FunctionalData::new(left, right).expect("hemispheres share timepoints")
}

pub fn seed(hemisphere: Hemisphere, network: &str, vertex: VertexIdx) -> SeedSpec {
    SeedSpec {
        hemisphere,
        network: network.to_string(),
        template_vertex: vertex,
        roiidx: None,
    }
}

pub fn two_seed_registry(trace: bool) -> SeedRegistry {
    SeedRegistry::new(
        vec![
            seed(Hemisphere::Left, "A", 1),
            seed(Hemisphere::Right, "A", 1),
        ],
        trace,
    )
    .expect("valid seed table")
}

/// Two 9-vertex hemispheres, 8 timepoints, networks A and B with two seeds each.
///
/// The A seed at left vertex 1 sits between left vertex 0, which follows the
/// B signal it shares with the A target, and left vertex 2, which follows
/// the A-only signal.
pub fn two_network_data() -> FunctionalData {
    let filler = |n: usize, shift: usize| {
        Array2::from_shape_fn((n, 8), |(v, t)| {
            10.0 + ((v * 5 + t * 3 + shift) % 7) as f64 * 0.1
        })
    };
    let set = |m: &mut Array2<f64>, v: usize, row: [f64; 8]| {
        for (t, value) in row.into_iter().enumerate() {
            m[[v, t]] = value;
        }
    };

    let mut left = filler(9, 0);
    set(&mut left, 0, [10.0, 12.2, 11.0, 12.8, 11.2, 9.0, 12.0, 13.8]);
    set(&mut left, 1, [11.0, 10.3, 9.0, 9.7, 11.3, 10.0, 9.0, 9.7]);
    set(&mut left, 2, [11.0, 9.9, 12.0, 9.1, 8.9, 11.0, 9.0, 9.1]);
    set(&mut left, 7, [10.5, 12.0, 10.5, 13.0, 11.5, 9.0, 11.5, 14.0]);

    let mut right = filler(9, 3);
    set(&mut right, 1, [11.0, 11.0, 13.0, 13.0, 9.0, 10.0, 11.0, 14.0]);
    set(&mut right, 7, [9.5, 12.0, 11.5, 13.0, 10.5, 9.0, 12.5, 14.0]);

    FunctionalData::new(left, right).expect("hemispheres share timepoints")
}

pub fn two_network_registry() -> SeedRegistry {
    SeedRegistry::new(
        vec![
            seed(Hemisphere::Left, "A", 1),
            seed(Hemisphere::Right, "A", 1),
            seed(Hemisphere::Left, "B", 7),
            seed(Hemisphere::Right, "B", 7),
        ],
        false,
    )
    .expect("valid seed table")
}

/// Single-vertex sampling, 2 mm candidate window, reproducible order
pub fn line_search_config() -> SearchConfig {
    SearchConfig {
        sampling_radius_mm: 0.0,
        search_radius_mm: 2.0,
        padding_radius_mm: 2.0,
        random_seed: Some(7),
        ..SearchConfig::default()
    }
}
