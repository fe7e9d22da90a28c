//! CF-style NetCDF output, one file per block.
//!
//! The file carries `x`/`y` cell-center coordinates and the static
//! bathymetry, plus `h`, `hu`, `hv` along an unlimited `time` dimension.
//! Ghost cells are stripped on the way out; the stored grid is the
//! `nx × ny` interior.

use chrono::Utc;

use super::writer::{Writer, WriterError};
use crate::grid::Float2D;

/// Appends time slices of one block to a NetCDF file.
pub struct NetCdfWriter {
    file: netcdf::FileMut,
    nx: usize,
    ny: usize,
    time_index: usize,
}

impl NetCdfWriter {
    /// Create the output file and write the static fields.
    ///
    /// `b` is the block's bathymetry including the ghost halo; the interior
    /// is stored once at creation. Cell centers are derived from the block
    /// geometry: `x_i = origin_x + (i + 0.5) * dx` for the stripped index
    /// `i ∈ [0, nx)`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        path: &str,
        b: &Float2D,
        nx: usize,
        ny: usize,
        dx: f32,
        dy: f32,
        origin_x: f32,
        origin_y: f32,
    ) -> Result<Self, WriterError> {
        if b.cols() != nx + 2 || b.rows() != ny + 2 {
            return Err(WriterError::InvalidData(format!(
                "bathymetry is {}x{}, expected {}x{}",
                b.cols(),
                b.rows(),
                nx + 2,
                ny + 2
            )));
        }

        let mut file = netcdf::create(path)?;

        file.add_unlimited_dimension("time")?;
        file.add_dimension("x", nx)?;
        file.add_dimension("y", ny)?;

        {
            let mut time_var = file.add_variable::<f32>("time", &["time"])?;
            time_var.put_attribute("long_name", "simulation time")?;
            time_var.put_attribute("units", "seconds since simulation start")?;
        }

        {
            let centers: Vec<f32> = (0..nx).map(|i| origin_x + (i as f32 + 0.5) * dx).collect();
            let mut x_var = file.add_variable::<f32>("x", &["x"])?;
            x_var.put_attribute("long_name", "cell center x coordinate")?;
            x_var.put_attribute("units", "m")?;
            x_var.put_values(&centers, ..)?;
        }

        {
            let centers: Vec<f32> = (0..ny).map(|j| origin_y + (j as f32 + 0.5) * dy).collect();
            let mut y_var = file.add_variable::<f32>("y", &["y"])?;
            y_var.put_attribute("long_name", "cell center y coordinate")?;
            y_var.put_attribute("units", "m")?;
            y_var.put_values(&centers, ..)?;
        }

        {
            let mut b_var = file.add_variable::<f32>("b", &["y", "x"])?;
            b_var.put_attribute("long_name", "bathymetry")?;
            b_var.put_attribute("units", "m")?;
            b_var.put_values(&strip_to_row_major(b), ..)?;
        }

        for (name, long_name) in [
            ("h", "water height"),
            ("hu", "x momentum"),
            ("hv", "y momentum"),
        ] {
            let mut var = file.add_variable::<f32>(name, &["time", "y", "x"])?;
            var.put_attribute("long_name", long_name)?;
            var.put_attribute(
                "units",
                if name == "h" { "m" } else { "m^2 s^-1" },
            )?;
        }

        let now = Utc::now();
        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute(
            "history",
            format!(
                "{}: created by swe-rs",
                now.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .as_str(),
        )?;

        Ok(Self {
            file,
            nx,
            ny,
            time_index: 0,
        })
    }

    fn append(&mut self, name: &str, field: &Float2D, t_idx: usize) -> Result<(), WriterError> {
        let mut var = self
            .file
            .variable_mut(name)
            .ok_or_else(|| WriterError::InvalidData(format!("missing variable {}", name)))?;
        var.put_values(&strip_to_row_major(field), (t_idx, .., ..))?;
        Ok(())
    }
}

impl Writer for NetCdfWriter {
    fn write_time_step(
        &mut self,
        h: &Float2D,
        hu: &Float2D,
        hv: &Float2D,
        t: f32,
    ) -> Result<(), WriterError> {
        for field in [h, hu, hv] {
            if field.cols() != self.nx + 2 || field.rows() != self.ny + 2 {
                return Err(WriterError::InvalidData(
                    "field dimensions disagree with the file grid".to_string(),
                ));
            }
        }

        let t_idx = self.time_index;
        {
            let mut time_var = self
                .file
                .variable_mut("time")
                .ok_or_else(|| WriterError::InvalidData("missing variable time".to_string()))?;
            time_var.put_value(t, [t_idx])?;
        }
        self.append("h", h, t_idx)?;
        self.append("hu", hu, t_idx)?;
        self.append("hv", hv, t_idx)?;

        self.time_index += 1;
        Ok(())
    }
}

/// Interior values in row-major `(y, x)` order, matching the variable
/// dimensions `["time", "y", "x"]`.
fn strip_to_row_major(field: &Float2D) -> Vec<f32> {
    let nx = field.cols() - 2;
    let ny = field.rows() - 2;
    let mut out = Vec::with_capacity(nx * ny);
    for y in 1..=ny {
        for x in 1..=nx {
            out.push(field.get(x, y));
        }
    }
    out
}
