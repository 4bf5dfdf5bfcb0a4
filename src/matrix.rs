// src/matrix.rs

//! Dense row-major `f64` arrays.
//!
//! [`Matrix`] is the in-memory form of everything the tools read and write:
//! the `(count, 7)` initial-conditions table and the `(steps, 3n)` trajectory
//! produced by the simulator. The shape is kept as a list so that 0-D and 1-D
//! arrays loaded from disk can still be compared shape-for-shape.

use nalgebra::Vector3;

use crate::body::Body;
use crate::error::ShapeError;

/// Columns of an initial-conditions row: mass, px, py, pz, vx, vy, vz.
pub const BODY_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, ShapeError> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(ShapeError::Length {
                len: data.len(),
                shape,
            });
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            shape: vec![rows, cols],
            data: vec![0.0; rows * cols],
        }
    }

    /// Packs bodies into rows of `[mass, px, py, pz, vx, vy, vz]`.
    pub fn from_bodies(bodies: &[Body]) -> Self {
        let data = bodies
            .iter()
            .flat_map(|body| {
                [
                    body.mass,
                    body.position.x,
                    body.position.y,
                    body.position.z,
                    body.velocity.x,
                    body.velocity.y,
                    body.velocity.z,
                ]
            })
            .collect();
        Self {
            shape: vec![bodies.len(), BODY_COLUMNS],
            data,
        }
    }

    /// Unpacks an initial-conditions matrix into bodies.
    pub fn to_bodies(&self) -> Result<Vec<Body>, ShapeError> {
        let (_, cols) = self.dims()?;
        if cols != BODY_COLUMNS {
            return Err(ShapeError::Columns {
                expected: BODY_COLUMNS,
                actual: cols,
            });
        }
        Ok(self
            .data
            .chunks_exact(BODY_COLUMNS)
            .map(|row| {
                Body::new(
                    row[0],
                    Vector3::new(row[1], row[2], row[3]),
                    Vector3::new(row[4], row[5], row[6]),
                )
            })
            .collect())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// `(rows, cols)` of a 2-D matrix.
    pub fn dims(&self) -> Result<(usize, usize), ShapeError> {
        match self.shape[..] {
            [rows, cols] => Ok((rows, cols)),
            _ => Err(ShapeError::NotTwoDimensional(self.shape.clone())),
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `i` of a 2-D matrix.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let (rows, cols) = self.dims().ok()?;
        (i < rows).then(|| &self.data[i * cols..(i + 1) * cols])
    }
}
