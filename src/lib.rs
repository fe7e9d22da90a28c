//! # swe-rs
//!
//! A block-distributed finite-volume solver for the 2D shallow water
//! equations.
//!
//! The domain is a rectangular Cartesian grid split over a lattice of
//! blocks. Each block advances the conservative cell averages `(h, hu, hv)`
//! with a first-order dimensional-splitting scheme: an x-sweep and a
//! y-sweep of 1-D Riemann problems, both reading the pre-step state, folded
//! into one conservative update. Blocks run concurrently, exchange
//! one-cell-thick copy layers with their neighbors every step, and agree on
//! a CFL-bounded global time step through a min-reduction.
//!
//! The crate provides:
//! - Column-major grid buffers with ghost halos ([`grid`])
//! - Wall/outflow/connect/passive boundary handling ([`block`])
//! - An f-wave Riemann kernel behind a narrow solver trait ([`solver`])
//! - Copy-layer halo exchange over channels ([`block`], [`simulation`])
//! - The lock-step time-step coordinator and launcher ([`simulation`])
//! - Scenario and writer seams, with NetCDF output behind the `netcdf`
//!   feature ([`scenario`], [`io`])

pub mod block;
pub mod grid;
pub mod io;
pub mod scenario;
pub mod simulation;
pub mod solver;
pub mod types;

// Re-export the main types for convenience.
pub use block::{Block, BlockLayout, CopyLayer};
pub use grid::Float2D;
pub use io::{MemoryWriter, NullWriter, Writer, WriterError};
pub use scenario::{DamBreak, LakeAtRest, RadialDamBreak, Scenario};
pub use simulation::{
    BlockDriver, BlockSummary, ConfigError, MinReduction, NeighborLink, ReductionHandle,
    SimulationConfig, SimulationError, StepTimings, launch,
};
pub use solver::{FWaveSolver, NetUpdates, RiemannSolver};
pub use types::{
    BoundaryEdge, BoundaryType, CFL_NUMBER, DRY_TOLERANCE, EdgeBoundaries, GRAVITY,
};

#[cfg(feature = "netcdf")]
pub use io::NetCdfWriter;
