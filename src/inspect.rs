// src/inspect.rs

use std::fmt;

use nalgebra::Vector3;

use crate::body::Body;
use crate::error::ShapeError;
use crate::matrix::Matrix;

/// Summary of an initial-conditions matrix that meets the simulator's input
/// contract: 2-D, 7 columns, at least one body, every mass positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total_mass: f64,
    pub center_of_mass: Vector3<f64>,
    pub bounds_min: Vector3<f64>,
    pub bounds_max: Vector3<f64>,
    pub max_speed: f64,
}

pub fn inspect(matrix: &Matrix) -> Result<Summary, ShapeError> {
    let bodies = matrix.to_bodies()?;
    let first = bodies.first().ok_or(ShapeError::Empty)?;
    // Written so that NaN fails too.
    if let Some((index, body)) = bodies.iter().enumerate().find(|(_, b)| !(b.mass > 0.0)) {
        return Err(ShapeError::NonPositiveMass {
            index,
            mass: body.mass,
        });
    }

    let total_mass: f64 = bodies.iter().map(|b| b.mass).sum();
    let weighted: Vector3<f64> = bodies.iter().map(|b| b.mass * b.position).sum();

    let (bounds_min, bounds_max) = bodies.iter().fold(
        (first.position, first.position),
        |(lo, hi), b: &Body| (lo.inf(&b.position), hi.sup(&b.position)),
    );

    Ok(Summary {
        count: bodies.len(),
        total_mass,
        center_of_mass: weighted / total_mass,
        bounds_min,
        bounds_max,
        max_speed: bodies.iter().map(Body::speed).fold(0.0, f64::max),
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bodies: {}", self.count)?;
        writeln!(f, "total mass: {:.6e}", self.total_mass)?;
        writeln!(
            f,
            "center of mass: [{:.6e}, {:.6e}, {:.6e}]",
            self.center_of_mass.x, self.center_of_mass.y, self.center_of_mass.z
        )?;
        writeln!(
            f,
            "position bounds: [{:.6e}, {:.6e}, {:.6e}] .. [{:.6e}, {:.6e}, {:.6e}]",
            self.bounds_min.x,
            self.bounds_min.y,
            self.bounds_min.z,
            self.bounds_max.x,
            self.bounds_max.y,
            self.bounds_max.z
        )?;
        write!(f, "max speed: {:.6e}", self.max_speed)
    }
}
