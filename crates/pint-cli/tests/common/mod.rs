// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities and helpers

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pint_surface::SurfaceMesh;
use tempfile::TempDir;

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Input files of a small run
pub struct Inputs {
    pub func_left: PathBuf,
    pub func_right: PathBuf,
    pub surface_left: PathBuf,
    pub surface_right: PathBuf,
    pub seeds: PathBuf,
}

impl Inputs {
    /// Positional arguments in command-line order, followed by the output prefix
    pub fn argv(&self, prefix: &Path) -> Vec<String> {
        let mut argv = vec!["pint-vertices".to_string()];
        for p in [
            &self.func_left,
            &self.func_right,
            &self.surface_left,
            &self.surface_right,
            &self.seeds,
        ] {
            argv.push(p.display().to_string());
        }
        argv.push(prefix.display().to_string());
        argv
    }
}

fn series_text(vertices: usize, timepoints: usize, phase: usize) -> String {
    let mut text = String::new();
    for v in 0..vertices {
        let row: Vec<String> = (0..timepoints)
            .map(|t| {
                let x = ((v + phase) * 13 + t * 7) % 19;
                (50.0 + x as f64 + (t as f64 * 0.3 + v as f64).cos()).to_string()
            })
            .collect();
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

/// Two 3 x 4 grid hemispheres, 10 timepoints, two networks with two seeds each
pub fn write_inputs(dir: &Path) -> Inputs {
    let mesh = SurfaceMesh::grid(3, 4, 2.0);
    let json = serde_json::to_string(&mesh).expect("mesh serializes");

    let inputs = Inputs {
        func_left: dir.join("func_L.csv"),
        func_right: dir.join("func_R.csv"),
        surface_left: dir.join("L.surf.json"),
        surface_right: dir.join("R.surf.json"),
        seeds: dir.join("seeds.csv"),
    };
    fs::write(&inputs.func_left, series_text(12, 10, 0)).unwrap();
    fs::write(&inputs.func_right, series_text(12, 10, 5)).unwrap();
    fs::write(&inputs.surface_left, &json).unwrap();
    fs::write(&inputs.surface_right, &json).unwrap();
    fs::write(
        &inputs.seeds,
        "hemi,NETWORK,tvertex\nL,1,0\nL,2,11\nR,1,3\nR,2,8\n",
    )
    .unwrap();
    inputs
}

/// Limits that permit every vertex for every seed
pub fn write_open_limits(dir: &Path) -> (PathBuf, PathBuf) {
    let row = vec!["1"; 4].join(",");
    let text: String = (0..12).map(|_| format!("{}\n", row)).collect();
    let left = dir.join("limits_L.csv");
    let right = dir.join("limits_R.csv");
    fs::write(&left, &text).unwrap();
    fs::write(&right, &text).unwrap();
    (left, right)
}
