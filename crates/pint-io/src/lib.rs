// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# PINT I/O

Plain-text interchange for the vertex search:

- seed tables (`hemi`, `NETWORK`, `tvertex`, optional `roiidx`)
- per-hemisphere vertex matrices (functional data, positional limits)
- the summary table and the template / optimized mean time series

## File layout of a run

```text
<prefix>_summary.csv          one row per seed
<prefix>_tvertex_meants.csv   sampling means at template vertices
<prefix>_ivertex_meants.csv   sampling means at optimized vertices
<prefix>_pint.log             run log (written by the CLI)
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod matrix;
pub mod seeds;
pub mod summary;

use std::path::PathBuf;

use pint_core::PintError;
use pint_surface::GeometryError;

pub use matrix::{parse_matrix, read_functional_data, read_limits, read_matrix, write_matrix};
pub use seeds::{parse_seed_table, read_seed_table};
pub use summary::{summary_table, write_meants, write_summary, OutputPaths, SummaryTable};

/// Result type for file operations
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading inputs or writing outputs
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}: missing column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("{source_name}, line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("{source_name}, line {line}: expected {expected} values, found {actual}")]
    Ragged {
        source_name: String,
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{0}: no data")]
    Empty(String),

    #[error(transparent)]
    Core(#[from] PintError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        IoError::Parse {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}
