// src/body.rs

use nalgebra::Vector3;
use std::fmt;

/// One row of an initial-conditions matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Body {
    pub fn new(mass: f64, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Body {
            mass,
            position,
            velocity,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Body(m={:.2e}, p=[{:.2e}, {:.2e}, {:.2e}], v=[{:.2e}, {:.2e}, {:.2e}])",
            self.mass,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z
        )
    }
}
