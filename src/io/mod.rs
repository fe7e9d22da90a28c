//! Checkpoint output.
//!
//! The coordinator hands the writer the raw fields (including ghost cells)
//! and the simulation time; writers strip the single-cell ghost border and
//! append a time slice to their backing store. The [`Writer`] trait keeps
//! the solver independent of the output format: tests use
//! [`MemoryWriter`], production runs the NetCDF writer behind the
//! `netcdf` feature.

mod writer;

#[cfg(feature = "netcdf")]
mod netcdf_writer;

pub use writer::{Frame, MemoryWriter, NullWriter, Writer, WriterError};

#[cfg(feature = "netcdf")]
pub use netcdf_writer::NetCdfWriter;
