// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run outputs: the per-seed summary table and the mean time series files.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pint_core::{PintReport, SamplingMeans, SeedRecord, SeedRegistry};
use tracing::info;

use crate::matrix::write_matrix;
use crate::{IoError, IoResult};

/// Output files derived from a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub summary: PathBuf,
    pub tvertex_meants: PathBuf,
    pub ivertex_meants: PathBuf,
}

impl OutputPaths {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            summary: PathBuf::from(format!("{}_summary.csv", prefix)),
            tvertex_meants: PathBuf::from(format!("{}_tvertex_meants.csv", prefix)),
            ivertex_meants: PathBuf::from(format!("{}_ivertex_meants.csv", prefix)),
        }
    }
}

/// Header plus one row of rendered cells per seed, in seed-table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[index].as_str()).collect())
    }
}

fn distance_cell(distance: Option<f64>) -> String {
    distance.map_or_else(|| "NaN".to_string(), |d| d.to_string())
}

type Cell = fn(&SeedRecord) -> String;

/// Build the summary table
///
/// Base columns are `hemi, NETWORK, roiidx, tvertex, ivertex, distance`.
/// With `output_all`, every recorded sweep adds `vertex_k, dist_k`, and runs
/// with limits add `avertex, outside_limits`. Otherwise a run that did not
/// converge adds the last sweep's `dist_k` and the previous sweep's `vertex_k`.
pub fn summary_table(registry: &SeedRegistry, report: &PintReport, output_all: bool) -> SummaryTable {
    let base: [(&str, Cell); 6] = [
        ("hemi", |r| r.hemisphere.to_string()),
        ("NETWORK", |r| r.network.clone()),
        ("roiidx", |r| r.roiidx.to_string()),
        ("tvertex", |r| r.template_vertex.to_string()),
        ("ivertex", |r| r.optimized_vertex.unwrap_or(r.current_vertex).to_string()),
        ("distance", |r| distance_cell(r.template_distance)),
    ];

    let mut columns: Vec<String> = base.iter().map(|(name, _)| name.to_string()).collect();
    let mut rows: Vec<Vec<String>> = registry
        .records()
        .iter()
        .map(|record| base.iter().map(|(_, cell)| cell(record)).collect())
        .collect();

    if output_all {
        let sweeps: Vec<u32> = registry
            .records()
            .first()
            .map(|r| r.history().iter().map(|s| s.sweep).collect())
            .unwrap_or_default();
        for sweep in sweeps {
            columns.push(format!("vertex_{}", sweep));
            columns.push(format!("dist_{}", sweep));
            for (row, record) in rows.iter_mut().zip(registry.records()) {
                let step = record.step(sweep);
                row.push(step.map_or_else(String::new, |s| s.vertex.to_string()));
                row.push(step.map_or_else(String::new, |s| s.distance.to_string()));
            }
        }
        if report.reconciliation.is_some() {
            columns.push("avertex".to_string());
            columns.push("outside_limits".to_string());
            for (row, record) in rows.iter_mut().zip(registry.records()) {
                row.push(record.reconciled_vertex.map_or_else(String::new, |v| v.to_string()));
                row.push(record.outside_limits.to_string());
            }
        }
    } else if !report.converged {
        let last = report.final_pass().last_sweep;
        columns.push(format!("dist_{}", last));
        for (row, record) in rows.iter_mut().zip(registry.records()) {
            row.push(record.step(last).map_or_else(String::new, |s| s.distance.to_string()));
        }
        if let Some(previous) = last.checked_sub(1) {
            if registry.records().iter().all(|r| r.step(previous).is_some()) {
                columns.push(format!("vertex_{}", previous));
                for (row, record) in rows.iter_mut().zip(registry.records()) {
                    row.push(record.step(previous).map_or_else(String::new, |s| s.vertex.to_string()));
                }
            }
        }
    }

    SummaryTable { columns, rows }
}

/// Write the summary table as CSV with a header row
pub fn write_summary(path: &Path, table: &SummaryTable) -> IoResult<()> {
    let file = fs::File::create(path).map_err(|e| IoError::io(path, e))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{}", table.columns.join(",")).map_err(|e| IoError::io(path, e))?;
    for row in &table.rows {
        writeln!(out, "{}", row.join(",")).map_err(|e| IoError::io(path, e))?;
    }
    out.flush().map_err(|e| IoError::io(path, e))?;
    info!(target: "pint_io", "Wrote summary of {} seeds to {}", table.rows.len(), path.display());
    Ok(())
}

/// Write one row per seed label (ascending), comma separated, no header
pub fn write_meants(path: &Path, meants: &SamplingMeans) -> IoResult<()> {
    write_matrix(path, meants.means())?;
    info!(target: "pint_io", "Wrote {} mean time series to {}", meants.len(), path.display());
    Ok(())
}
