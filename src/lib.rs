// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # PINT - Personalized Intrinsic Network Topography
//!
//! Moves per-subject functional network "seed" vertices on a cortical surface
//! to the locations whose local time series best represent their network.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! pint = "0.1"  # Default: text I/O included
//! ```
//!
//! ## Feature Flags
//!
//! - **`io`** (default): seed table, vertex matrix and result readers/writers
//!
//! Multi-threaded per-seed scoring is controlled by the `parallel` feature of
//! `pint-core` (on by default) and switched per run by
//! `search.parallel_scoring`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pint::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let left = SurfaceMesh::load_json("L.surf.json".as_ref())?;
//! let right = SurfaceMesh::load_json("R.surf.json".as_ref())?;
//! let geometry = MeshGeodesics::new(&left, &right);
//!
//! let data = pint::io::read_functional_data("func_L.csv".as_ref(), "func_R.csv".as_ref())?;
//! let seeds = pint::io::read_seed_table("seeds.csv".as_ref())?;
//! let mut registry = SeedRegistry::new(seeds, false)?;
//!
//! let search = SearchConfig::default();
//! let report = run_pint(&geometry, &data, &mut registry, None, &search, &mut rng_from_config(&search))?;
//! println!("converged: {}", report.converged);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! pint (this crate)
//! ├── pint-config         (TOML + env + CLI configuration)
//! ├── pint-observability  (tracing setup, run log file)
//! ├── pint-surface        (hemispheres, GeometryProvider, mesh geodesics)
//! ├── pint-core           (the vertex search)
//! └── pint-io             (text interchange, optional)
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use pint_config as config;
pub use pint_core as core;
pub use pint_observability as observability;
pub use pint_surface as surface;

#[cfg(feature = "io")]
pub use pint_io as io;

/// Common imports for running a search
pub mod prelude {
    pub use crate::config::{load_config_or_default, ObjectiveMode, PintConfig, SearchConfig};
    pub use crate::core::{
        rng_from_config, run_pint, FunctionalData, PintError, PintReport, PintResult, RoiLimits,
        SeedRegistry, SeedSpec,
    };
    pub use crate::surface::{GeometryProvider, Hemisphere, MeshGeodesics, SurfaceMesh};
}
