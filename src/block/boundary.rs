//! Ghost-layer filling for the outer domain edges.
//!
//! `Wall` mirrors the interior strip and negates the momentum component
//! normal to the edge; `Outflow` copies the strip unchanged (zero
//! gradient). `Connect` ghost cells belong to the halo exchange and
//! `Passive` ghost cells to the caller, so both are left untouched here.
//!
//! The four corner ghost cells always take the value of their diagonal
//! interior neighbor. That choice makes the corner Riemann problems of the
//! dimensionally split sweeps trivial (zero-wave steady states), which the
//! scheme requires for correctness.

use super::Block;
use crate::types::BoundaryType;

impl Block {
    /// Fill the ghost layer according to the outer boundary types.
    ///
    /// Called once per step before the sweeps, after any halo exchange.
    pub fn apply_boundary_conditions(&mut self) {
        let nx = self.layout.nx;
        let ny = self.layout.ny;

        match self.layout.boundaries.left {
            BoundaryType::Wall => {
                for j in 1..=ny {
                    self.h[(0, j)] = self.h[(1, j)];
                    self.hu[(0, j)] = -self.hu[(1, j)];
                    self.hv[(0, j)] = self.hv[(1, j)];
                }
            }
            BoundaryType::Outflow => {
                for j in 1..=ny {
                    self.h[(0, j)] = self.h[(1, j)];
                    self.hu[(0, j)] = self.hu[(1, j)];
                    self.hv[(0, j)] = self.hv[(1, j)];
                }
            }
            BoundaryType::Connect | BoundaryType::Passive => {}
        }

        match self.layout.boundaries.right {
            BoundaryType::Wall => {
                for j in 1..=ny {
                    self.h[(nx + 1, j)] = self.h[(nx, j)];
                    self.hu[(nx + 1, j)] = -self.hu[(nx, j)];
                    self.hv[(nx + 1, j)] = self.hv[(nx, j)];
                }
            }
            BoundaryType::Outflow => {
                for j in 1..=ny {
                    self.h[(nx + 1, j)] = self.h[(nx, j)];
                    self.hu[(nx + 1, j)] = self.hu[(nx, j)];
                    self.hv[(nx + 1, j)] = self.hv[(nx, j)];
                }
            }
            BoundaryType::Connect | BoundaryType::Passive => {}
        }

        match self.layout.boundaries.bottom {
            BoundaryType::Wall => {
                for i in 1..=nx {
                    self.h[(i, 0)] = self.h[(i, 1)];
                    self.hu[(i, 0)] = self.hu[(i, 1)];
                    self.hv[(i, 0)] = -self.hv[(i, 1)];
                }
            }
            BoundaryType::Outflow => {
                for i in 1..=nx {
                    self.h[(i, 0)] = self.h[(i, 1)];
                    self.hu[(i, 0)] = self.hu[(i, 1)];
                    self.hv[(i, 0)] = self.hv[(i, 1)];
                }
            }
            BoundaryType::Connect | BoundaryType::Passive => {}
        }

        match self.layout.boundaries.top {
            BoundaryType::Wall => {
                for i in 1..=nx {
                    self.h[(i, ny + 1)] = self.h[(i, ny)];
                    self.hu[(i, ny + 1)] = self.hu[(i, ny)];
                    self.hv[(i, ny + 1)] = -self.hv[(i, ny)];
                }
            }
            BoundaryType::Outflow => {
                for i in 1..=nx {
                    self.h[(i, ny + 1)] = self.h[(i, ny)];
                    self.hu[(i, ny + 1)] = self.hu[(i, ny)];
                    self.hv[(i, ny + 1)] = self.hv[(i, ny)];
                }
            }
            BoundaryType::Connect | BoundaryType::Passive => {}
        }

        // Corner ghost cells mirror the diagonal interior neighbor, which
        // produces a zero Riemann problem across each corner.
        for (gx, gy, ix, iy) in [
            (0, 0, 1, 1),
            (0, ny + 1, 1, ny),
            (nx + 1, 0, nx, 1),
            (nx + 1, ny + 1, nx, ny),
        ] {
            self.h[(gx, gy)] = self.h[(ix, iy)];
            self.hu[(gx, gy)] = self.hu[(ix, iy)];
            self.hv[(gx, gy)] = self.hv[(ix, iy)];
        }
    }

    /// Copy the bathymetry of the adjacent interior strip into the ghost
    /// strip on `Wall` and `Outflow` edges, then fill the corners.
    ///
    /// Called after the initial scenario load and whenever a boundary
    /// changes to `Wall`/`Outflow`. The left/right copies are contiguous
    /// column memcpys thanks to the column-major layout.
    pub fn apply_boundary_bathymetry(&mut self) {
        let nx = self.layout.nx;
        let ny = self.layout.ny;
        let rows = ny + 2;

        if matches!(
            self.layout.boundaries.left,
            BoundaryType::Wall | BoundaryType::Outflow
        ) {
            self.b.as_mut_slice().copy_within(rows..2 * rows, 0);
        }
        if matches!(
            self.layout.boundaries.right,
            BoundaryType::Wall | BoundaryType::Outflow
        ) {
            self.b
                .as_mut_slice()
                .copy_within(nx * rows..(nx + 1) * rows, (nx + 1) * rows);
        }
        if matches!(
            self.layout.boundaries.bottom,
            BoundaryType::Wall | BoundaryType::Outflow
        ) {
            for i in 0..=nx + 1 {
                self.b[(i, 0)] = self.b[(i, 1)];
            }
        }
        if matches!(
            self.layout.boundaries.top,
            BoundaryType::Wall | BoundaryType::Outflow
        ) {
            for i in 0..=nx + 1 {
                self.b[(i, ny + 1)] = self.b[(i, ny)];
            }
        }

        self.b[(0, 0)] = self.b[(1, 1)];
        self.b[(0, ny + 1)] = self.b[(1, ny)];
        self.b[(nx + 1, 0)] = self.b[(nx, 1)];
        self.b[(nx + 1, ny + 1)] = self.b[(nx, ny)];
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Block, BlockLayout};
    use crate::types::{BoundaryEdge, BoundaryType, EdgeBoundaries};

    fn block_with(boundaries: EdgeBoundaries<BoundaryType>) -> Block {
        let mut block = Block::new(BlockLayout {
            nx: 3,
            ny: 3,
            dx: 1.0,
            dy: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            pos_x: 0,
            pos_y: 0,
            boundaries,
        });
        // Distinct values per interior cell so mirroring is observable.
        for x in 1..=3 {
            for y in 1..=3 {
                let v = (10 * x + y) as f32;
                block.water_height_mut().set(x, y, v);
                block.momentum_x_mut().set(x, y, v + 0.25);
                block.momentum_y_mut().set(x, y, v + 0.5);
            }
        }
        block
    }

    #[test]
    fn test_wall_mirrors_and_negates_normal_momentum() {
        let mut block = block_with(EdgeBoundaries::uniform(BoundaryType::Wall));
        block.apply_boundary_conditions();

        for j in 1..=3 {
            // Left edge: hu is normal, hv tangential.
            assert_eq!(block.water_height().get(0, j), block.water_height().get(1, j));
            assert_eq!(block.momentum_x().get(0, j), -block.momentum_x().get(1, j));
            assert_eq!(block.momentum_y().get(0, j), block.momentum_y().get(1, j));
            // Right edge.
            assert_eq!(block.momentum_x().get(4, j), -block.momentum_x().get(3, j));
        }
        for i in 1..=3 {
            // Bottom/top edges: hv is the normal component.
            assert_eq!(block.momentum_y().get(i, 0), -block.momentum_y().get(i, 1));
            assert_eq!(block.momentum_y().get(i, 4), -block.momentum_y().get(i, 3));
            assert_eq!(block.momentum_x().get(i, 0), block.momentum_x().get(i, 1));
        }
    }

    #[test]
    fn test_outflow_copies_unchanged() {
        let mut block = block_with(EdgeBoundaries::uniform(BoundaryType::Outflow));
        block.apply_boundary_conditions();

        for j in 1..=3 {
            assert_eq!(block.water_height().get(0, j), block.water_height().get(1, j));
            assert_eq!(block.momentum_x().get(0, j), block.momentum_x().get(1, j));
            assert_eq!(block.momentum_y().get(0, j), block.momentum_y().get(1, j));
        }
    }

    #[test]
    fn test_corners_take_diagonal_neighbor() {
        let mut block = block_with(EdgeBoundaries::uniform(BoundaryType::Wall));
        block.apply_boundary_conditions();

        assert_eq!(block.water_height().get(0, 0), block.water_height().get(1, 1));
        assert_eq!(block.momentum_x().get(0, 0), block.momentum_x().get(1, 1));
        assert_eq!(block.water_height().get(4, 4), block.water_height().get(3, 3));
        assert_eq!(block.water_height().get(0, 4), block.water_height().get(1, 3));
        assert_eq!(block.water_height().get(4, 0), block.water_height().get(3, 1));
    }

    #[test]
    fn test_connect_and_passive_leave_ghosts_alone() {
        let mut block = block_with(EdgeBoundaries::new(
            BoundaryType::Connect,
            BoundaryType::Passive,
            BoundaryType::Wall,
            BoundaryType::Wall,
        ));
        block.water_height_mut().set(0, 2, -99.0);
        block.water_height_mut().set(4, 2, -77.0);
        block.apply_boundary_conditions();

        assert_eq!(block.water_height().get(0, 2), -99.0);
        assert_eq!(block.water_height().get(4, 2), -77.0);
    }

    #[test]
    fn test_bathymetry_ghosts_on_wall_and_outflow_only() {
        let mut block = block_with(EdgeBoundaries::new(
            BoundaryType::Wall,
            BoundaryType::Connect,
            BoundaryType::Outflow,
            BoundaryType::Connect,
        ));
        for x in 1..=3 {
            for y in 1..=3 {
                block.b.set(x, y, (x + y) as f32);
            }
        }
        block.b.set(4, 2, 123.0);
        block.apply_boundary_bathymetry();

        // Wall left edge copied.
        assert_eq!(block.bathymetry().get(0, 2), block.bathymetry().get(1, 2));
        // Outflow bottom edge copied.
        assert_eq!(block.bathymetry().get(2, 0), block.bathymetry().get(2, 1));
        // Connect right edge untouched.
        assert_eq!(block.bathymetry().get(4, 2), 123.0);
        // Corners always filled from the diagonal.
        assert_eq!(block.bathymetry().get(0, 0), block.bathymetry().get(1, 1));
    }

    #[test]
    fn test_set_boundary_type_refreshes_bathymetry() {
        let mut block = block_with(EdgeBoundaries::uniform(BoundaryType::Connect));
        for x in 1..=3 {
            for y in 1..=3 {
                block.b.set(x, y, 7.0);
            }
        }
        assert_eq!(block.bathymetry().get(0, 2), 0.0);
        block.set_boundary_type(BoundaryEdge::Left, BoundaryType::Wall);
        assert_eq!(block.bathymetry().get(0, 2), 7.0);
    }
}
