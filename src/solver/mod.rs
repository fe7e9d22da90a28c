//! Riemann net-update kernels for the 1-D sweeps.
//!
//! The sweep driver treats the flux solver as an external collaborator
//! behind the narrow [`RiemannSolver`] trait: one pure call per edge, no
//! allocation, safe to invoke concurrently on disjoint cells. The default
//! implementation is the f-wave solver in [`fwave`].

mod fwave;

pub use fwave::FWaveSolver;

/// Net updates produced by one Riemann problem at a single edge.
///
/// `*_left` is the left-going contribution applied to the cell on the left
/// of the edge, `*_right` the right-going contribution applied to the cell
/// on the right. In the y-sweep the same fields carry the below/above-going
/// contributions and the momentum components refer to `hv`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetUpdates {
    /// Left-going height update.
    pub h_left: f32,
    /// Right-going height update.
    pub h_right: f32,
    /// Left-going momentum update.
    pub hu_left: f32,
    /// Right-going momentum update.
    pub hu_right: f32,
    /// Magnitude of the fastest wave at this edge.
    pub max_wave_speed: f32,
}

impl NetUpdates {
    /// All-zero updates (used for dry-dry edges).
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// A pure single-edge Riemann solver.
///
/// Given the left/right water heights, momenta and bathymetries of two
/// adjacent cells, produce the wave-decomposition updates to each side and
/// a wave speed estimate. Implementations must not allocate and must be
/// callable concurrently on disjoint edges.
pub trait RiemannSolver: Sync {
    /// Solve the Riemann problem at one edge.
    fn net_updates(&self, h_l: f32, h_r: f32, hu_l: f32, hu_r: f32, b_l: f32, b_r: f32)
    -> NetUpdates;
}
