//! The two dimensional-splitting sweeps.
//!
//! The x-sweep solves one Riemann problem per horizontally adjacent cell
//! pair `(x, y)-(x+1, y)` with `x ∈ [0, nx]`, `y ∈ [1, ny]`; the y-sweep
//! covers `(x, y)-(x, y+1)` with `x ∈ [1, nx]`, `y ∈ [0, ny]`. Both read
//! the same pre-step snapshot (including the frozen ghost layer) and write
//! each net-update element exactly once, so the iterations are independent
//! and the only cross-iteration state is the max-reduction over wave
//! speeds.
//!
//! The parallel path exploits that independence: every column band of the
//! output fields is written by exactly one edge column. The x-sweep pairs
//! column `x` of the left-going fields with column `x + 1` of the
//! right-going fields (offsetting the right slices by one column), the
//! y-sweep keeps everything in column `x`. Columns are contiguous in the
//! column-major layout, so `par_chunks_mut` hands each worker a disjoint
//! band without copying.

use super::Block;
use crate::grid::Float2D;
use crate::solver::RiemannSolver;

/// Run both sweeps, filling the net-update fields of `block`.
///
/// Returns `(max_horizontal_wave_speed, max_vertical_wave_speed)`.
pub(super) fn compute_net_updates(
    block: &mut Block,
    solver: &impl RiemannSolver,
) -> (f32, f32) {
    let Block {
        layout,
        h,
        hu,
        hv,
        b,
        h_net_left,
        h_net_right,
        hu_net_left,
        hu_net_right,
        h_net_below,
        h_net_above,
        hv_net_below,
        hv_net_above,
        ..
    } = block;
    let nx = layout.nx;
    let ny = layout.ny;

    #[cfg(feature = "parallel")]
    {
        let max_horizontal = x_sweep_parallel(
            solver,
            h,
            hu,
            b,
            h_net_left,
            h_net_right,
            hu_net_left,
            hu_net_right,
            nx,
            ny,
        );
        let max_vertical = y_sweep_parallel(
            solver,
            h,
            hv,
            b,
            h_net_below,
            h_net_above,
            hv_net_below,
            hv_net_above,
            nx,
            ny,
        );
        (max_horizontal, max_vertical)
    }
    #[cfg(not(feature = "parallel"))]
    {
        let max_horizontal = x_sweep_serial(
            solver,
            h,
            hu,
            b,
            h_net_left,
            h_net_right,
            hu_net_left,
            hu_net_right,
            nx,
            ny,
        );
        let max_vertical = y_sweep_serial(
            solver,
            h,
            hv,
            b,
            h_net_below,
            h_net_above,
            hv_net_below,
            hv_net_above,
            nx,
            ny,
        );
        (max_horizontal, max_vertical)
    }
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
#[allow(clippy::too_many_arguments)]
fn x_sweep_serial(
    solver: &impl RiemannSolver,
    h: &Float2D,
    hu: &Float2D,
    b: &Float2D,
    h_left: &mut Float2D,
    h_right: &mut Float2D,
    hu_left: &mut Float2D,
    hu_right: &mut Float2D,
    nx: usize,
    ny: usize,
) -> f32 {
    let mut max_speed = 0.0f32;
    for x in 0..=nx {
        for y in 1..=ny {
            let nu = solver.net_updates(
                h.get(x, y),
                h.get(x + 1, y),
                hu.get(x, y),
                hu.get(x + 1, y),
                b.get(x, y),
                b.get(x + 1, y),
            );
            h_left.set(x, y, nu.h_left);
            h_right.set(x + 1, y, nu.h_right);
            hu_left.set(x, y, nu.hu_left);
            hu_right.set(x + 1, y, nu.hu_right);
            max_speed = max_speed.max(nu.max_wave_speed);
        }
    }
    max_speed
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
#[allow(clippy::too_many_arguments)]
fn y_sweep_serial(
    solver: &impl RiemannSolver,
    h: &Float2D,
    hv: &Float2D,
    b: &Float2D,
    h_below: &mut Float2D,
    h_above: &mut Float2D,
    hv_below: &mut Float2D,
    hv_above: &mut Float2D,
    nx: usize,
    ny: usize,
) -> f32 {
    let mut max_speed = 0.0f32;
    for x in 1..=nx {
        for y in 0..=ny {
            let nu = solver.net_updates(
                h.get(x, y),
                h.get(x, y + 1),
                hv.get(x, y),
                hv.get(x, y + 1),
                b.get(x, y),
                b.get(x, y + 1),
            );
            h_below.set(x, y, nu.h_left);
            h_above.set(x, y + 1, nu.h_right);
            hv_below.set(x, y, nu.hu_left);
            hv_above.set(x, y + 1, nu.hu_right);
            max_speed = max_speed.max(nu.max_wave_speed);
        }
    }
    max_speed
}

/// Parallel x-sweep over column bands.
///
/// Edge column `x` writes column `x` of the left-going fields and column
/// `x + 1` of the right-going fields; offsetting the right slices by one
/// column makes the zipped bands line up.
#[cfg(feature = "parallel")]
#[allow(clippy::too_many_arguments)]
fn x_sweep_parallel(
    solver: &(impl RiemannSolver + Sync),
    h: &Float2D,
    hu: &Float2D,
    b: &Float2D,
    h_left: &mut Float2D,
    h_right: &mut Float2D,
    hu_left: &mut Float2D,
    hu_right: &mut Float2D,
    nx: usize,
    ny: usize,
) -> f32 {
    use rayon::prelude::*;

    let rows = ny + 2;
    let left_span = (nx + 1) * rows;

    h_left.as_mut_slice()[..left_span]
        .par_chunks_mut(rows)
        .zip(h_right.as_mut_slice()[rows..].par_chunks_mut(rows))
        .zip(hu_left.as_mut_slice()[..left_span].par_chunks_mut(rows))
        .zip(hu_right.as_mut_slice()[rows..].par_chunks_mut(rows))
        .enumerate()
        .map(|(x, (((hl_col, hr_col), hul_col), hur_col))| {
            let mut speed = 0.0f32;
            for y in 1..=ny {
                let nu = solver.net_updates(
                    h.get(x, y),
                    h.get(x + 1, y),
                    hu.get(x, y),
                    hu.get(x + 1, y),
                    b.get(x, y),
                    b.get(x + 1, y),
                );
                hl_col[y] = nu.h_left;
                hr_col[y] = nu.h_right;
                hul_col[y] = nu.hu_left;
                hur_col[y] = nu.hu_right;
                speed = speed.max(nu.max_wave_speed);
            }
            speed
        })
        .reduce(|| 0.0, f32::max)
}

/// Parallel y-sweep; edge column `x` stays entirely in band `x`.
#[cfg(feature = "parallel")]
#[allow(clippy::too_many_arguments)]
fn y_sweep_parallel(
    solver: &(impl RiemannSolver + Sync),
    h: &Float2D,
    hv: &Float2D,
    b: &Float2D,
    h_below: &mut Float2D,
    h_above: &mut Float2D,
    hv_below: &mut Float2D,
    hv_above: &mut Float2D,
    nx: usize,
    ny: usize,
) -> f32 {
    use rayon::prelude::*;

    let rows = ny + 2;
    debug_assert_eq!(h_below.cols(), nx + 1);

    h_below.as_mut_slice()[rows..]
        .par_chunks_mut(rows)
        .zip(h_above.as_mut_slice()[rows..].par_chunks_mut(rows))
        .zip(hv_below.as_mut_slice()[rows..].par_chunks_mut(rows))
        .zip(hv_above.as_mut_slice()[rows..].par_chunks_mut(rows))
        .enumerate()
        .map(|(i, (((hb_col, ha_col), hvb_col), hva_col))| {
            let x = i + 1;
            let mut speed = 0.0f32;
            for y in 0..=ny {
                let nu = solver.net_updates(
                    h.get(x, y),
                    h.get(x, y + 1),
                    hv.get(x, y),
                    hv.get(x, y + 1),
                    b.get(x, y),
                    b.get(x, y + 1),
                );
                hb_col[y] = nu.h_left;
                ha_col[y + 1] = nu.h_right;
                hvb_col[y] = nu.hu_left;
                hva_col[y + 1] = nu.hu_right;
                speed = speed.max(nu.max_wave_speed);
            }
            speed
        })
        .reduce(|| 0.0, f32::max)
}
