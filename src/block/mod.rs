//! A single Cartesian grid block of the distributed simulation.
//!
//! A [`Block`] owns a tile of the global grid: four state fields (water
//! height `h`, momenta `hu`/`hv`, bathymetry `b`) with a one-cell ghost
//! halo, plus the eight net-update scratch fields written by the two
//! sweeps. Blocks never share memory; neighbor coupling happens through
//! copy layers (see [`CopyLayer`]) and the global time-step reduction.
//!
//! The per-step contract is narrow: fill the ghost layer (boundary applier
//! and/or halo exchange), call [`Block::compute_numerical_fluxes`], agree on
//! a global `dt`, then call [`Block::update_unknowns`]. Both sweeps read the
//! pre-step state and the one combined update applies the x- and y-
//! contributions together; this directionally combined first-order scheme is
//! deliberate and must not be replaced by alternating sweeps.

mod boundary;
mod exchange;
mod sweep;

pub use exchange::CopyLayer;

use crate::grid::Float2D;
use crate::scenario::Scenario;
use crate::solver::RiemannSolver;
use crate::types::{
    BoundaryEdge, BoundaryType, CFL_NUMBER, DRY_TOLERANCE, DT_AGREEMENT_TOLERANCE, EdgeBoundaries,
    GRAVITY,
};

/// Immutable identity of a block: grid geometry, lattice position and
/// outer boundary types.
#[derive(Clone, Debug)]
pub struct BlockLayout {
    /// Interior cell count in x.
    pub nx: usize,
    /// Interior cell count in y.
    pub ny: usize,
    /// Cell width in meters.
    pub dx: f32,
    /// Cell height in meters.
    pub dy: f32,
    /// x-coordinate of the bottom-left corner of the interior.
    pub origin_x: f32,
    /// y-coordinate of the bottom-left corner of the interior.
    pub origin_y: f32,
    /// Column of this block on the block lattice.
    pub pos_x: usize,
    /// Row of this block on the block lattice.
    pub pos_y: usize,
    /// Boundary type per outer edge.
    pub boundaries: EdgeBoundaries<BoundaryType>,
}

/// One grid block: cell averages, ghost halo and sweep scratch space.
#[derive(Clone, Debug)]
pub struct Block {
    layout: BlockLayout,

    // State fields, (nx + 2) x (ny + 2) with ghost halo.
    h: Float2D,
    hu: Float2D,
    hv: Float2D,
    b: Float2D,

    // x-sweep net updates, (nx + 2) x (ny + 2).
    h_net_left: Float2D,
    h_net_right: Float2D,
    hu_net_left: Float2D,
    hu_net_right: Float2D,

    // y-sweep net updates, (nx + 1) x (ny + 2).
    h_net_below: Float2D,
    h_net_above: Float2D,
    hv_net_below: Float2D,
    hv_net_above: Float2D,

    max_timestep: f32,
}

impl Block {
    /// Allocate a zeroed block for the given layout.
    pub fn new(layout: BlockLayout) -> Self {
        let cols = layout.nx + 2;
        let rows = layout.ny + 2;
        let sweep_cols = layout.nx + 1;
        Self {
            h: Float2D::new(cols, rows),
            hu: Float2D::new(cols, rows),
            hv: Float2D::new(cols, rows),
            b: Float2D::new(cols, rows),
            h_net_left: Float2D::new(cols, rows),
            h_net_right: Float2D::new(cols, rows),
            hu_net_left: Float2D::new(cols, rows),
            hu_net_right: Float2D::new(cols, rows),
            h_net_below: Float2D::new(sweep_cols, rows),
            h_net_above: Float2D::new(sweep_cols, rows),
            hv_net_below: Float2D::new(sweep_cols, rows),
            hv_net_above: Float2D::new(sweep_cols, rows),
            max_timestep: 0.0,
            layout,
        }
    }

    /// Sample a scenario at cell centers and fill the ghost layer.
    ///
    /// Interior index `(i, j)` maps to the physical point
    /// `(origin_x + (i - 0.5) * dx, origin_y + (j - 0.5) * dy)`. Momentum is
    /// initialized as velocity times height.
    pub fn init_scenario(&mut self, scenario: &impl Scenario) {
        for i in 1..=self.layout.nx {
            let x = self.layout.origin_x + (i as f32 - 0.5) * self.layout.dx;
            for j in 1..=self.layout.ny {
                let y = self.layout.origin_y + (j as f32 - 0.5) * self.layout.dy;
                let h = scenario.water_height(x, y);
                self.b.set(i, j, scenario.bathymetry(x, y));
                self.h.set(i, j, h);
                self.hu.set(i, j, scenario.velocity_u(x, y) * h);
                self.hv.set(i, j, scenario.velocity_v(x, y) * h);
            }
        }

        self.apply_boundary_conditions();
        self.apply_boundary_bathymetry();
    }

    /// Run both sweeps over the current state and derive the local
    /// CFL-bounded time step.
    ///
    /// Fills all eight net-update fields, stores the result in
    /// `max_timestep` and returns it. The ghost layer must be fresh; it is
    /// frozen for the duration of the sweeps. Returns `+∞` when every edge
    /// is dry, which the global reduction treats as "no constraint".
    pub fn compute_numerical_fluxes(&mut self, solver: &impl RiemannSolver) -> f32 {
        let (max_horizontal, max_vertical) = sweep::compute_net_updates(self, solver);

        // dx and dy are bounded by their own sweep's wave speed; taking the
        // overall max first would over-restrict anisotropic grids.
        let mut dt = f32::INFINITY;
        if max_horizontal > 0.0 {
            dt = dt.min(self.layout.dx / max_horizontal);
        }
        if max_vertical > 0.0 {
            dt = dt.min(self.layout.dy / max_vertical);
        }
        self.max_timestep = CFL_NUMBER * dt;

        debug_assert!(
            max_vertical == 0.0 || self.max_timestep < 0.5 * (self.layout.dy / max_vertical),
            "CFL condition violated in y-direction"
        );

        self.max_timestep
    }

    /// Apply the net updates to the interior cells under the agreed `dt`.
    ///
    /// `dt` is the globally reduced minimum and must match the value stored
    /// in `max_timestep` (the coordinator overwrites it with the reduction
    /// result before calling this).
    pub fn update_unknowns(&mut self, dt: f32) {
        if !dt.is_finite() {
            // Every block is dry; there is nothing to advect.
            return;
        }
        assert!(
            (dt - self.max_timestep).abs() < DT_AGREEMENT_TOLERANCE,
            "update dt {} disagrees with the reduced max_timestep {}",
            dt,
            self.max_timestep
        );

        #[cfg(feature = "parallel")]
        self.apply_net_updates_parallel(dt);
        #[cfg(not(feature = "parallel"))]
        self.apply_net_updates_serial(dt);
    }

    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn apply_net_updates_serial(&mut self, dt: f32) {
        let dtdx = dt / self.layout.dx;
        let dtdy = dt / self.layout.dy;
        for x in 1..=self.layout.nx {
            for y in 1..=self.layout.ny {
                let dh = dtdx * (self.h_net_right.get(x, y) + self.h_net_left.get(x, y))
                    + dtdy * (self.h_net_above.get(x, y) + self.h_net_below.get(x, y));
                let dhu = dtdx * (self.hu_net_right.get(x, y) + self.hu_net_left.get(x, y));
                let dhv = dtdy * (self.hv_net_above.get(x, y) + self.hv_net_below.get(x, y));
                self.h[(x, y)] -= dh;
                self.hu[(x, y)] -= dhu;
                self.hv[(x, y)] -= dhv;
            }
        }
    }

    /// Parallel update: interior columns of `h`, `hu`, `hv` are disjoint
    /// bands, the net-update fields are only read.
    #[cfg(feature = "parallel")]
    fn apply_net_updates_parallel(&mut self, dt: f32) {
        use rayon::prelude::*;

        let nx = self.layout.nx;
        let ny = self.layout.ny;
        let rows = ny + 2;
        let dtdx = dt / self.layout.dx;
        let dtdy = dt / self.layout.dy;

        let h_net_left = &self.h_net_left;
        let h_net_right = &self.h_net_right;
        let hu_net_left = &self.hu_net_left;
        let hu_net_right = &self.hu_net_right;
        let h_net_below = &self.h_net_below;
        let h_net_above = &self.h_net_above;
        let hv_net_below = &self.hv_net_below;
        let hv_net_above = &self.hv_net_above;

        // Columns 1..=nx of each state field.
        let span = rows..(nx + 1) * rows;
        self.h.as_mut_slice()[span.clone()]
            .par_chunks_mut(rows)
            .zip(self.hu.as_mut_slice()[span.clone()].par_chunks_mut(rows))
            .zip(self.hv.as_mut_slice()[span].par_chunks_mut(rows))
            .enumerate()
            .for_each(|(i, ((h_col, hu_col), hv_col))| {
                let x = i + 1;
                for y in 1..=ny {
                    h_col[y] -= dtdx * (h_net_right.get(x, y) + h_net_left.get(x, y))
                        + dtdy * (h_net_above.get(x, y) + h_net_below.get(x, y));
                    hu_col[y] -= dtdx * (hu_net_right.get(x, y) + hu_net_left.get(x, y));
                    hv_col[y] -= dtdy * (hv_net_above.get(x, y) + hv_net_below.get(x, y));
                }
            });
    }

    /// Reference global estimate of the admissible time step.
    ///
    /// Scans the interior wave speeds directly instead of going through the
    /// sweeps. The canonical per-step value is the one produced by
    /// [`Block::compute_numerical_fluxes`]; this estimate exists for
    /// diagnostics and tests.
    pub fn estimate_max_timestep(&self) -> f32 {
        let mut max_speed = 0.0f32;
        for x in 1..=self.layout.nx {
            for y in 1..=self.layout.ny {
                let h = self.h.get(x, y);
                if h > DRY_TOLERANCE {
                    let momentum = self.hu.get(x, y).abs().max(self.hv.get(x, y).abs());
                    let speed = momentum / h + (GRAVITY * h).sqrt();
                    max_speed = max_speed.max(speed);
                }
            }
        }
        if max_speed > 0.0 {
            CFL_NUMBER * self.layout.dx.min(self.layout.dy) / max_speed
        } else {
            f32::INFINITY
        }
    }

    /// Total water volume over the interior, in m³.
    ///
    /// Accumulated in f64 so the checksum is stable across step counts.
    pub fn total_mass(&self) -> f64 {
        let cell_area = (self.layout.dx * self.layout.dy) as f64;
        let mut sum = 0.0f64;
        for x in 1..=self.layout.nx {
            for y in 1..=self.layout.ny {
                sum += self.h.get(x, y) as f64;
            }
        }
        sum * cell_area
    }

    /// Change the boundary type of one outer edge.
    ///
    /// Switching to `Wall` or `Outflow` refreshes the bathymetry ghost
    /// copies, which are otherwise only written at initialization.
    pub fn set_boundary_type(&mut self, edge: BoundaryEdge, ty: BoundaryType) {
        *self.layout.boundaries.get_mut(edge) = ty;
        if matches!(ty, BoundaryType::Wall | BoundaryType::Outflow) {
            self.apply_boundary_bathymetry();
        }
    }

    /// Block identity: geometry, lattice position, boundary types.
    #[inline]
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Interior cell count in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.layout.nx
    }

    /// Interior cell count in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.layout.ny
    }

    /// Water height field, including ghost cells.
    #[inline]
    pub fn water_height(&self) -> &Float2D {
        &self.h
    }

    /// x-momentum field, including ghost cells.
    #[inline]
    pub fn momentum_x(&self) -> &Float2D {
        &self.hu
    }

    /// y-momentum field, including ghost cells.
    #[inline]
    pub fn momentum_y(&self) -> &Float2D {
        &self.hv
    }

    /// Bathymetry field, including ghost cells.
    #[inline]
    pub fn bathymetry(&self) -> &Float2D {
        &self.b
    }

    /// Mutable water height, for `Passive` boundaries whose ghost cells are
    /// owned by the caller.
    #[inline]
    pub fn water_height_mut(&mut self) -> &mut Float2D {
        &mut self.h
    }

    /// Mutable x-momentum, for `Passive` boundaries.
    #[inline]
    pub fn momentum_x_mut(&mut self) -> &mut Float2D {
        &mut self.hu
    }

    /// Mutable y-momentum, for `Passive` boundaries.
    #[inline]
    pub fn momentum_y_mut(&mut self) -> &mut Float2D {
        &mut self.hv
    }

    /// The most recent local time-step bound.
    #[inline]
    pub fn max_timestep(&self) -> f32 {
        self.max_timestep
    }

    /// Overwrite the local bound with the globally reduced time step.
    #[inline]
    pub fn set_max_timestep(&mut self, dt: f32) {
        self.max_timestep = dt;
    }
}
