//! The writer seam and the in-memory implementations.

use thiserror::Error;

use crate::grid::Float2D;

/// Error type for checkpoint output.
#[derive(Debug, Error)]
pub enum WriterError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Inconsistent field dimensions or non-finite data
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Sink for per-checkpoint time slices.
///
/// `h`, `hu`, `hv` are passed with their ghost halo; implementations strip
/// the one-cell border (boundary size `{1, 1, 1, 1}`) before storing.
pub trait Writer: Send {
    /// Append one time slice.
    fn write_time_step(
        &mut self,
        h: &Float2D,
        hu: &Float2D,
        hv: &Float2D,
        t: f32,
    ) -> Result<(), WriterError>;
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write_time_step(
        &mut self,
        h: &Float2D,
        hu: &Float2D,
        hv: &Float2D,
        t: f32,
    ) -> Result<(), WriterError> {
        (**self).write_time_step(h, hu, hv, t)
    }
}

/// Discards everything; for benchmarks and throwaway runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullWriter;

impl Writer for NullWriter {
    fn write_time_step(
        &mut self,
        _h: &Float2D,
        _hu: &Float2D,
        _hv: &Float2D,
        _t: f32,
    ) -> Result<(), WriterError> {
        Ok(())
    }
}

/// One stored time slice, ghost cells stripped, column-major `nx × ny`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Simulation time of this slice.
    pub t: f32,
    /// Interior water heights.
    pub h: Vec<f32>,
    /// Interior x-momenta.
    pub hu: Vec<f32>,
    /// Interior y-momenta.
    pub hv: Vec<f32>,
}

/// Collects stripped time slices in memory; the test writer.
#[derive(Clone, Debug, Default)]
pub struct MemoryWriter {
    /// All frames written so far, in write order.
    pub frames: Vec<Frame>,
}

impl MemoryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interior values of a field in column-major `nx × ny` order.
    fn strip_ghosts(field: &Float2D) -> Vec<f32> {
        let nx = field.cols() - 2;
        let ny = field.rows() - 2;
        let mut out = Vec::with_capacity(nx * ny);
        for x in 1..=nx {
            out.extend_from_slice(&field.column(x)[1..=ny]);
        }
        out
    }
}

impl Writer for MemoryWriter {
    fn write_time_step(
        &mut self,
        h: &Float2D,
        hu: &Float2D,
        hv: &Float2D,
        t: f32,
    ) -> Result<(), WriterError> {
        if h.cols() != hu.cols() || h.cols() != hv.cols() || h.rows() != hu.rows() {
            return Err(WriterError::InvalidData(
                "field dimensions disagree".to_string(),
            ));
        }
        self.frames.push(Frame {
            t,
            h: Self::strip_ghosts(h),
            hu: Self::strip_ghosts(hu),
            hv: Self::strip_ghosts(hv),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_writer_strips_ghosts() {
        let mut h = Float2D::new(4, 4);
        for x in 0..4 {
            for y in 0..4 {
                h.set(x, y, (10 * x + y) as f32);
            }
        }
        let hu = Float2D::new(4, 4);
        let hv = Float2D::new(4, 4);

        let mut writer = MemoryWriter::new();
        writer.write_time_step(&h, &hu, &hv, 1.5).unwrap();

        assert_eq!(writer.frames.len(), 1);
        let frame = &writer.frames[0];
        assert_eq!(frame.t, 1.5);
        // Interior is 2x2: columns 1..=2, rows 1..=2.
        assert_eq!(frame.h, vec![11.0, 12.0, 21.0, 22.0]);
    }

    #[test]
    fn test_memory_writer_rejects_mismatched_fields() {
        let h = Float2D::new(4, 4);
        let hu = Float2D::new(5, 4);
        let hv = Float2D::new(4, 4);

        let mut writer = MemoryWriter::new();
        assert!(writer.write_time_step(&h, &hu, &hv, 0.0).is_err());
    }

    #[test]
    fn test_null_writer_accepts_everything() {
        let f = Float2D::new(3, 3);
        let mut writer = NullWriter;
        writer.write_time_step(&f, &f, &f, 0.0).unwrap();
    }
}
