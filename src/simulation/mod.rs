//! The distributed time-step coordinator.
//!
//! A run is a `BX × BY` lattice of blocks executing the same state machine
//! in lock step. Blocks never share memory: each one lives on its own
//! thread, trades copy layers with up to four neighbors over channels, and
//! agrees on the global time step through the min-reduction collective.
//! [`launch`] wires all of that up from an immutable [`SimulationConfig`].

mod config;
mod driver;
mod launch;
mod reduction;

pub use config::{ConfigError, SimulationConfig};
pub use driver::{BlockDriver, BlockSummary, NeighborLink, StepTimings};
pub use launch::launch;
pub use reduction::{MinReduction, ReductionHandle};

use thiserror::Error;

use crate::io::WriterError;

/// Fatal simulation failure; aborts the whole run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Invalid run configuration, surfaced before any block starts.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Checkpoint output failed.
    #[error("writer error: {0}")]
    Writer(#[from] WriterError),

    /// A neighbor block or the reduction collective went away, usually
    /// because another block already failed.
    #[error("a neighbor block or the dt reduction disconnected")]
    Disconnected,
}
