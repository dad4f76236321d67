// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seed table reader
//!
//! Comma-separated with a header row. Required columns are `hemi`, `NETWORK`
//! and `tvertex`; `roiidx` is optional and other columns are ignored.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use pint_core::{Hemisphere, RoiIdx, SeedSpec, VertexIdx};
use tracing::info;

use crate::{IoError, IoResult};

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn column(header: &[&str], name: &str, source_name: &str) -> IoResult<usize> {
    header
        .iter()
        .position(|h| *h == name)
        .ok_or_else(|| IoError::MissingColumn {
            source_name: source_name.to_string(),
            column: name.to_string(),
        })
}

/// Integer index, also accepting integral floats such as `12.0`
fn parse_index(raw: &str) -> Option<usize> {
    if let Ok(v) = raw.parse::<usize>() {
        return Some(v);
    }
    let v: f64 = raw.parse().ok()?;
    (v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64).then_some(v as usize)
}

/// Parse seed table text
///
/// # Errors
/// Missing required columns, unknown hemisphere codes, unparsable vertices,
/// and non-positive or duplicate `roiidx` values.
pub fn parse_seed_table(text: &str, source_name: &str) -> IoResult<Vec<SeedSpec>> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| IoError::Empty(source_name.to_string()))?;
    let header: Vec<&str> = header_line.split(',').map(unquote).collect();

    let hemi_col = column(&header, "hemi", source_name)?;
    let network_col = column(&header, "NETWORK", source_name)?;
    let vertex_col = column(&header, "tvertex", source_name)?;
    let roiidx_col = header.iter().position(|h| *h == "roiidx");

    let mut seen: HashSet<RoiIdx> = HashSet::new();
    let mut specs = Vec::new();

    for (index, line) in lines {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split(',').map(unquote).collect();
        let field = |col: usize| {
            fields.get(col).copied().ok_or_else(|| IoError::Ragged {
                source_name: source_name.to_string(),
                line: line_no,
                expected: header.len(),
                actual: fields.len(),
            })
        };

        let hemisphere = field(hemi_col)?
            .parse::<Hemisphere>()
            .map_err(|e| IoError::parse(source_name, line_no, e.to_string()))?;

        let network = field(network_col)?.to_string();
        if network.is_empty() {
            return Err(IoError::parse(source_name, line_no, "empty NETWORK label"));
        }

        let raw_vertex = field(vertex_col)?;
        let template_vertex: VertexIdx = parse_index(raw_vertex).ok_or_else(|| {
            IoError::parse(source_name, line_no, format!("invalid tvertex '{}'", raw_vertex))
        })?;

        let roiidx = match roiidx_col {
            Some(col) => {
                let raw = field(col)?;
                let label = parse_index(raw)
                    .filter(|&v| v > 0)
                    .map(|v| v as RoiIdx)
                    .ok_or_else(|| {
                        IoError::parse(
                            source_name,
                            line_no,
                            format!("roiidx must be a positive integer, got '{}'", raw),
                        )
                    })?;
                if !seen.insert(label) {
                    return Err(IoError::parse(
                        source_name,
                        line_no,
                        format!("duplicate roiidx {}", label),
                    ));
                }
                Some(label)
            }
            None => None,
        };

        specs.push(SeedSpec {
            hemisphere,
            network,
            template_vertex,
            roiidx,
        });
    }

    if specs.is_empty() {
        return Err(IoError::Empty(source_name.to_string()));
    }
    Ok(specs)
}

/// Read a seed table file
pub fn read_seed_table(path: &Path) -> IoResult<Vec<SeedSpec>> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let specs = parse_seed_table(&text, &path.display().to_string())?;
    info!(target: "pint_io", "Read {} seeds from {}", specs.len(), path.display());
    Ok(specs)
}
