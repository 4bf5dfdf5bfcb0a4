// src/trajectory.rs

//! Preparing simulator output for a 3-D scatter plot.
//!
//! The simulator writes one row per time step holding the `x, y, z` of every
//! body, i.e. a `(steps, 3n)` matrix. [`Trajectory`] views it as
//! `(steps, n, 3)`, and [`Trajectory::scatter`] thins it down to a point
//! budget spread evenly over the bodies.

use log::info;
use nalgebra::Vector3;
use serde::Serialize;

use crate::error::ShapeError;
use crate::matrix::Matrix;

pub const DEFAULT_MAX_POINTS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub max_points: usize,
    /// Draw every body with the same marker size, regardless of mass.
    pub same_size: bool,
    /// One flat colour per body instead of a gradient over time.
    pub solid_color: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            same_size: false,
            solid_color: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub body: usize,
    pub step: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub size: f64,
    pub color: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    steps: usize,
    bodies: usize,
    data: Vec<f64>,
}

impl Trajectory {
    pub fn from_matrix(matrix: Matrix) -> Result<Self, ShapeError> {
        let (steps, cols) = matrix.dims()?;
        if cols % 3 != 0 {
            return Err(ShapeError::NotThreePerBody { cols });
        }
        Ok(Self {
            steps,
            bodies: cols / 3,
            data: matrix.into_data(),
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn bodies(&self) -> usize {
        self.bodies
    }

    pub fn position(&self, step: usize, body: usize) -> Vector3<f64> {
        let start = (step * self.bodies + body) * 3;
        Vector3::from_column_slice(&self.data[start..start + 3])
    }

    /// Number of steps skipped between plotted points so each body gets at
    /// most `ceil(max_points / n)` of them.
    pub fn stride(&self, max_points: usize) -> usize {
        if self.bodies == 0 {
            return 1;
        }
        let points_per_body = max_points.max(1).div_ceil(self.bodies);
        self.steps.div_ceil(points_per_body).max(1)
    }

    /// Down-sampled points, body by body. `sizes` holds one marker size per body.
    pub fn scatter(&self, options: &PlotOptions, sizes: &[f64]) -> Vec<ScatterPoint> {
        let skip = self.stride(options.max_points);
        info!(
            "Plotting {} bodies over {} steps, every {} step(s)",
            self.bodies, self.steps, skip
        );

        (0..self.bodies)
            .flat_map(|body| {
                (0..self.steps).step_by(skip).map(move |step| {
                    let p = self.position(step, body);
                    ScatterPoint {
                        body,
                        step,
                        x: p.x,
                        y: p.y,
                        z: p.z,
                        size: sizes.get(body).copied().unwrap_or(1.0),
                        color: if options.solid_color {
                            body as f64
                        } else {
                            step as f64
                        },
                    }
                })
            })
            .collect()
    }
}

/// Marker size per body: `mass / mean_mass` from an initial-conditions matrix,
/// or 1 for every body when `same_size` is set or no masses are given.
pub fn marker_sizes(
    initial: Option<&Matrix>,
    bodies: usize,
    same_size: bool,
) -> Result<Vec<f64>, ShapeError> {
    let initial = match initial {
        Some(matrix) if !same_size => matrix,
        _ => return Ok(vec![1.0; bodies]),
    };

    let masses: Vec<f64> = initial.to_bodies()?.iter().map(|b| b.mass).collect();
    if masses.len() != bodies {
        return Err(ShapeError::Rows {
            expected: bodies,
            actual: masses.len(),
        });
    }
    // NaN fails this as well.
    if let Some((index, &mass)) = masses.iter().enumerate().find(|&(_, &m)| !(m > 0.0)) {
        return Err(ShapeError::NonPositiveMass { index, mass });
    }

    let mean = masses.iter().sum::<f64>() / bodies.max(1) as f64;
    Ok(masses.iter().map(|m| m / mean).collect())
}

/// Common `(lo, hi)` bounds for all three axes so the plot has aspect ratio 1.
pub fn cubic_limits(points: &[ScatterPoint]) -> Option<(f64, f64)> {
    points
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .fold(None, |limits, v| match limits {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}
