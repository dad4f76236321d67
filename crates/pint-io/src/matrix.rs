// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Vertex matrices as text: one row per vertex, values separated by commas
//! and/or whitespace. Blank lines and `#` comments are skipped.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, ArrayView2};
use pint_core::{FunctionalData, RoiLimits};
use tracing::{debug, info};

use crate::{IoError, IoResult};

/// Parse a numeric matrix from text
pub fn parse_matrix(text: &str, source_name: &str) -> IoResult<Array2<f64>> {
    let mut values = Vec::new();
    let mut columns: Option<usize> = None;
    let mut rows = 0usize;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut count = 0usize;
        for field in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
        {
            let value: f64 = field.parse().map_err(|_| {
                IoError::parse(source_name, index + 1, format!("'{}' is not a number", field))
            })?;
            values.push(value);
            count += 1;
        }
        match columns {
            None => columns = Some(count),
            Some(expected) if expected != count => {
                return Err(IoError::Ragged {
                    source_name: source_name.to_string(),
                    line: index + 1,
                    expected,
                    actual: count,
                })
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let columns = columns.ok_or_else(|| IoError::Empty(source_name.to_string()))?;
    Array2::from_shape_vec((rows, columns), values)
        .map_err(|e| IoError::parse(source_name, rows, e.to_string()))
}

/// Read a numeric matrix file
pub fn read_matrix(path: &Path) -> IoResult<Array2<f64>> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let matrix = parse_matrix(&text, &path.display().to_string())?;
    debug!(
        target: "pint_io",
        "Read {} x {} matrix from {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(matrix)
}

/// Write a matrix comma separated, no header
pub fn write_matrix(path: &Path, matrix: ArrayView2<'_, f64>) -> IoResult<()> {
    let file = fs::File::create(path).map_err(|e| IoError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", line.join(",")).map_err(|e| IoError::io(path, e))?;
    }
    out.flush().map_err(|e| IoError::io(path, e))
}

/// Load and stack the per-hemisphere functional data (vertices x timepoints)
pub fn read_functional_data(left: &Path, right: &Path) -> IoResult<FunctionalData> {
    let data = FunctionalData::new(read_matrix(left)?, read_matrix(right)?)?;
    info!(
        target: "pint_io",
        "Loaded functional data: {} + {} vertices, {} timepoints",
        data.left_vertices(),
        data.total_vertices() - data.left_vertices(),
        data.timepoints()
    );
    Ok(data)
}

/// Load and stack the per-hemisphere limits (vertices x seeds)
pub fn read_limits(left: &Path, right: &Path) -> IoResult<RoiLimits> {
    Ok(RoiLimits::new(read_matrix(left)?, read_matrix(right)?)?)
}
