//! Physical and numerical constants shared across the solver.

/// Gravitational acceleration in m/s².
pub const GRAVITY: f32 = 9.81;

/// Water depth below which a cell is treated as dry.
///
/// Dry cells do not contribute to the wave-speed reduction and are
/// handled by the Riemann kernel's reflecting-wall substitution.
pub const DRY_TOLERANCE: f32 = 0.01;

/// CFL number applied to the local time-step estimate.
///
/// Kept strictly below 0.5 to leave headroom for the directionally
/// combined first-order scheme.
pub const CFL_NUMBER: f32 = 0.4;

/// Tolerance for the agreement check between the reduced time step and
/// the block-local `max_timestep` in the unknown updater.
pub const DT_AGREEMENT_TOLERANCE: f32 = 1e-5;
