//! Partition the global grid and run one thread per block.
//!
//! The launcher is the only place that knows the whole lattice: it slices
//! the global grid into block layouts, creates one channel pair per
//! interior seam, spawns the reduction collective, and runs every block
//! driver on a scoped thread. Blocks index the lattice column-major
//! (`index = pos_x * block_count_y + pos_y`), so the left/right neighbors
//! of block `i` are `i ∓ block_count_y` and the bottom/top neighbors are
//! `i ∓ 1`.

use std::sync::mpsc::channel;
use std::thread;

use tracing::info;

use crate::block::{Block, BlockLayout};
use crate::io::{Writer, WriterError};
use crate::scenario::Scenario;
use crate::solver::RiemannSolver;
use crate::types::EdgeBoundaries;

use super::driver::{BlockDriver, BlockSummary, NeighborLink};
use super::reduction::MinReduction;
use super::{SimulationConfig, SimulationError};

/// Run a whole simulation and return one summary per block, in lattice
/// order (column-major).
///
/// `make_writer` runs on each block's thread after scenario
/// initialization, so the writer sees the block's sampled bathymetry. A
/// writer failure aborts the run before the failing block takes its first
/// step.
pub fn launch<S, R, W, F>(
    config: &SimulationConfig,
    scenario: &S,
    solver: &R,
    make_writer: F,
) -> Result<Vec<BlockSummary>, SimulationError>
where
    S: Scenario + Sync,
    R: RiemannSolver + Sync,
    W: Writer + Send,
    F: Fn(&Block) -> Result<W, WriterError> + Sync,
{
    config.validate()?;

    let bx = config.block_count_x;
    let by = config.block_count_y;
    let block_count = bx * by;
    info!(
        blocks_x = bx,
        blocks_y = by,
        cells_x = config.cell_count_x,
        cells_y = config.cell_count_y,
        "launching simulation"
    );

    let layouts: Vec<BlockLayout> = (0..block_count)
        .map(|index| config.block_layout(index / by, index % by))
        .collect();

    // One channel pair per directed seam.
    let mut links: Vec<EdgeBoundaries<Option<NeighborLink>>> = (0..block_count)
        .map(|_| EdgeBoundaries::default())
        .collect();
    for px in 0..bx {
        for py in 0..by {
            let index = px * by + py;
            if px + 1 < bx {
                let right = index + by;
                let (to_right_tx, to_right_rx) = channel();
                let (to_left_tx, to_left_rx) = channel();
                links[index].right = Some(NeighborLink {
                    tx: to_right_tx,
                    rx: to_left_rx,
                });
                links[right].left = Some(NeighborLink {
                    tx: to_left_tx,
                    rx: to_right_rx,
                });
            }
            if py + 1 < by {
                let top = index + 1;
                let (to_top_tx, to_top_rx) = channel();
                let (to_bottom_tx, to_bottom_rx) = channel();
                links[index].top = Some(NeighborLink {
                    tx: to_top_tx,
                    rx: to_bottom_rx,
                });
                links[top].bottom = Some(NeighborLink {
                    tx: to_bottom_tx,
                    rx: to_top_rx,
                });
            }
        }
    }

    let reduction_handles = MinReduction::spawn(block_count);
    let make_writer = &make_writer;

    let results: Vec<Result<BlockSummary, SimulationError>> = thread::scope(|scope| {
        let mut join_handles = Vec::with_capacity(block_count);
        let blocks = layouts.into_iter().zip(links).zip(reduction_handles);
        for ((layout, block_links), reduction) in blocks {
            join_handles.push(scope.spawn(move || {
                let mut block = Block::new(layout);
                block.init_scenario(scenario);
                let writer = make_writer(&block)?;
                BlockDriver::new(block, block_links, reduction, writer, config).run(solver)
            }));
        }
        join_handles
            .into_iter()
            .map(|handle| handle.join().expect("block thread panicked"))
            .collect()
    });

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryWriter;
    use crate::scenario::LakeAtRest;
    use crate::solver::FWaveSolver;
    use crate::types::BoundaryType;

    #[test]
    fn test_invalid_config_fails_before_spawning() {
        let config = SimulationConfig {
            checkpoint_count: 0,
            ..SimulationConfig::default()
        };
        let result = launch(
            &config,
            &LakeAtRest::default(),
            &FWaveSolver::default(),
            |_| Ok(MemoryWriter::new()),
        );
        assert!(matches!(result, Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_two_by_two_lattice_runs_in_lockstep() {
        let config = SimulationConfig {
            block_count_x: 2,
            block_count_y: 2,
            cell_count_x: 20,
            cell_count_y: 20,
            simulation_duration: 2.0,
            checkpoint_count: 2,
            ..SimulationConfig::default()
        };

        let summaries = launch(
            &config,
            &LakeAtRest::default(),
            &FWaveSolver::default(),
            |_| Ok(MemoryWriter::new()),
        )
        .unwrap();

        assert_eq!(summaries.len(), 4);
        // Lock-step: every block took the same number of steps.
        let steps = summaries[0].steps;
        assert!(steps > 0);
        assert!(summaries.iter().all(|s| s.steps == steps));
        // Interior seams were all Connect.
        assert_eq!(
            summaries[0].block.layout().boundaries.right,
            BoundaryType::Connect
        );
        assert_eq!(
            summaries[3].block.layout().boundaries.left,
            BoundaryType::Connect
        );
    }

    #[test]
    fn test_lattice_order_is_column_major() {
        let config = SimulationConfig {
            block_count_x: 2,
            block_count_y: 2,
            cell_count_x: 8,
            cell_count_y: 8,
            simulation_duration: 1.0,
            checkpoint_count: 1,
            ..SimulationConfig::default()
        };

        let summaries = launch(
            &config,
            &LakeAtRest::default(),
            &FWaveSolver::default(),
            |_| Ok(MemoryWriter::new()),
        )
        .unwrap();

        let positions: Vec<(usize, usize)> = summaries
            .iter()
            .map(|s| (s.block.layout().pos_x, s.block.layout().pos_y))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
