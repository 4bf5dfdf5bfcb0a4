//! Tools around an external n-body simulator.
//!
//! - [`sampler`] synthesizes random initial conditions, one `(n, 7)` matrix of
//!   `[mass, px, py, pz, vx, vy, vz]` rows, after [`config`] validates the bounds.
//! - [`compare`] checks two saved results for (near) equality.
//! - [`trajectory`] thins simulator output down for a 3-D scatter plot.
//! - [`inspect`] checks an initial-conditions file against the simulator's
//!   input contract.
//!
//! All of them read and write NumPy `.npy` files through [`npy`].

pub mod body;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod matrix;
pub mod npy;
pub mod sampler;
pub mod trajectory;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod sampler_test;

pub use body::Body;
pub use compare::{compare, Comparison, Tolerance};
pub use config::{BoundsArgs, GenerationConfig, MassMode, PositionRange, VelocityMode};
pub use error::{ConfigError, Error, NpyError, Result, ShapeError};
pub use matrix::Matrix;
pub use sampler::{generate, generate_matrix};
