//! The per-block state machine.
//!
//! Each block thread runs one [`BlockDriver`] to completion:
//!
//! ```text
//! init -> exchange bathymetry -> [ apply BCs -> compute fluxes
//!     -> reduce dt -> update -> advance clock -> (write checkpoints)
//!     -> exchange copy layers ]* -> done
//! ```
//!
//! The driver suspends only while waiting for neighbor copy layers and for
//! the dt reduction; all numeric work between those points runs to
//! completion. Sends never block (channels are unbounded), so layers from
//! faster neighbors queue up until this block reaches its own exchange
//! phase. Per-edge FIFO order guarantees that the k-th layer a neighbor
//! sends is consumed by the k-th exchange here.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::block::{Block, CopyLayer};
use crate::io::Writer;
use crate::solver::RiemannSolver;
use crate::types::BoundaryEdge;

use super::{SimulationConfig, SimulationError, reduction::ReductionHandle};

/// Channel pair connecting one block edge to the neighbor across it.
#[derive(Debug)]
pub struct NeighborLink {
    /// Outgoing copy layers toward the neighbor.
    pub tx: Sender<CopyLayer>,
    /// Incoming copy layers from the neighbor.
    pub rx: Receiver<CopyLayer>,
}

/// Coarse-grained per-block timing, accumulated around whole kernel calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepTimings {
    /// Time spent in the sweeps and the unknown update.
    pub compute: Duration,
    /// Wall-clock time of the whole run, including waits.
    pub wall: Duration,
}

/// What a finished block hands back to the launcher.
#[derive(Debug)]
pub struct BlockSummary {
    /// The block in its final state.
    pub block: Block,
    /// Number of completed time steps.
    pub steps: usize,
    /// Accumulated timings.
    pub timings: StepTimings,
}

/// Drives one block through the whole simulation.
pub struct BlockDriver<W: Writer> {
    block: Block,
    links: crate::types::EdgeBoundaries<Option<NeighborLink>>,
    reduction: ReductionHandle,
    writer: W,
    checkpoint_instants: Vec<f32>,
    simulation_duration: f32,
    current_time: f32,
    current_checkpoint: usize,
    steps: usize,
    timings: StepTimings,
}

impl<W: Writer> BlockDriver<W> {
    /// Assemble a driver for an initialized block.
    ///
    /// `links` must hold a channel pair for every `Connect` edge of the
    /// block and may be `None` elsewhere.
    pub fn new(
        block: Block,
        links: crate::types::EdgeBoundaries<Option<NeighborLink>>,
        reduction: ReductionHandle,
        writer: W,
        config: &SimulationConfig,
    ) -> Self {
        for edge in BoundaryEdge::ALL {
            debug_assert_eq!(
                links.get(edge).is_some(),
                *block.layout().boundaries.get(edge) == crate::types::BoundaryType::Connect,
                "neighbor links must match the connect edges exactly"
            );
        }
        Self {
            block,
            links,
            reduction,
            writer,
            checkpoint_instants: config.checkpoint_instants(),
            simulation_duration: config.simulation_duration,
            current_time: 0.0,
            current_checkpoint: 0,
            steps: 0,
            timings: StepTimings::default(),
        }
    }

    /// Run the state machine to completion and return the final state.
    pub fn run(mut self, solver: &impl RiemannSolver) -> Result<BlockSummary, SimulationError> {
        let wall_start = Instant::now();
        let (pos_x, pos_y) = (self.block.layout().pos_x, self.block.layout().pos_y);
        debug!(pos_x, pos_y, "block started");

        // Initial state goes out before the first step.
        self.write_checkpoint()?;

        // The one bathymetry-bearing exchange; it also fills the state
        // ghost strips for the first step.
        self.exchange_copy_layers(true)?;

        loop {
            self.block.apply_boundary_conditions();

            let compute_start = Instant::now();
            let local_dt = self.block.compute_numerical_fluxes(solver);
            self.timings.compute += compute_start.elapsed();

            let dt = self.reduction.contribute(local_dt)?;
            self.block.set_max_timestep(dt);

            let compute_start = Instant::now();
            self.block.update_unknowns(dt);
            self.timings.compute += compute_start.elapsed();

            self.current_time += dt;
            self.steps += 1;

            while self.current_checkpoint < self.checkpoint_instants.len()
                && self.current_time >= self.checkpoint_instants[self.current_checkpoint]
            {
                self.write_checkpoint()?;
                self.current_checkpoint += 1;
                debug!(
                    pos_x,
                    pos_y,
                    checkpoint = self.current_checkpoint,
                    t = self.current_time,
                    "checkpoint written"
                );
            }

            if self.current_checkpoint >= self.checkpoint_instants.len()
                || self.current_time >= self.simulation_duration
            {
                break;
            }

            self.exchange_copy_layers(false)?;
        }

        self.timings.wall = wall_start.elapsed();
        info!(
            pos_x,
            pos_y,
            steps = self.steps,
            compute_s = self.timings.compute.as_secs_f64(),
            wall_s = self.timings.wall.as_secs_f64(),
            "block finished"
        );

        Ok(BlockSummary {
            block: self.block,
            steps: self.steps,
            timings: self.timings,
        })
    }

    /// Send one copy layer per `Connect` edge, then consume one from each.
    ///
    /// Sends are buffered, so nothing here can deadlock as long as every
    /// neighbor eventually reaches its own exchange phase.
    fn exchange_copy_layers(&mut self, with_bathymetry: bool) -> Result<(), SimulationError> {
        for edge in BoundaryEdge::ALL {
            if let Some(link) = self.links.get(edge) {
                let layer = self.block.copy_layer(edge, with_bathymetry);
                link.tx
                    .send(layer)
                    .map_err(|_| SimulationError::Disconnected)?;
            }
        }

        for edge in BoundaryEdge::ALL {
            if let Some(link) = self.links.get(edge) {
                let layer = link.rx.recv().map_err(|_| SimulationError::Disconnected)?;
                debug_assert_eq!(
                    layer.edge,
                    edge.opposite(),
                    "copy layer arrived on the wrong edge"
                );
                self.block.apply_copy_layer(&layer);
            }
        }

        Ok(())
    }

    fn write_checkpoint(&mut self) -> Result<(), SimulationError> {
        self.writer.write_time_step(
            self.block.water_height(),
            self.block.momentum_x(),
            self.block.momentum_y(),
            self.current_time,
        )?;
        Ok(())
    }
}
