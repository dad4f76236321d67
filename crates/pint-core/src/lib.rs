// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# PINT Core (Personalized Intrinsic Network Topography)

Iterative relocation of functional-network seed vertices on a cortical
surface, so that each seed's local time series best represents the mean
signal of its network.

## Architecture

```text
SeedRegistry ──positions──▶ RegionBuilder ──masks──▶ Aggregator
     ▲                       (sampling/search/        (seed means,
     │                        padding disks)           network means)
     │                                                     │
     └──── merged per sweep ◀── IterationController ◀── Objective
                                 (random visit order,     (full / partial
                                  displacement check)      correlation)
```

Each sweep freezes its masks and aggregates before any seed is scored, so
seeds may be scored in any order (or concurrently with the `parallel`
feature) without changing the selected vertices.

Geometry is provided through [`pint_surface::GeometryProvider`].
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod aggregate;
pub mod controller;
pub mod objective;
pub mod pipeline;
pub mod reconcile;
pub mod regions;
pub mod registry;
pub mod stats;
pub mod timeseries;
pub mod types;

pub use aggregate::{leave_one_out_target, network_meants, sampling_meants, NetworkMeans, SamplingMeans};
pub use controller::{IterationController, PassOutcome, PassState, SweepReport};
pub use objective::{evaluate_seed, MoveDecision, MoveOutcome, SweepInputs};
pub use pipeline::{preflight, rng_from_config, run_pint, PintReport};
pub use reconcile::{reconcile, ReconcileOutcome, RoiLimits};
pub use regions::{RegionBuilder, RegionMask, RegionSet};
pub use registry::{SeedPosition, SeedRecord, SeedRegistry, SeedSpec, SweepStep};
pub use stats::{partial_correlation, pearson, Residualizer};
pub use timeseries::FunctionalData;
pub use types::{PintError, PintResult};

// Re-export the geometry and configuration types that appear in this crate's API
pub use pint_config::{ObjectiveMode, QualityConfig, SearchConfig};
pub use pint_surface::{GeometryProvider, Hemisphere, RoiIdx, VertexIdx, UNASSIGNED};
