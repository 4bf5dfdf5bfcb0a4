// src/config.rs

//! Generation parameters and their validation.
//!
//! [`BoundsArgs`] is the flat form the operator writes, either as command-line
//! flags or as a JSON file:
//!
//! ```json
//! {
//!   "min_mass": 0.1,
//!   "max_mass": 1.0,
//!   "min_position": -1.0,
//!   "max_position": 1.0,
//!   "velocity": 0.5
//! }
//! ```
//!
//! Missing fields take the command-line defaults. The flat form resolves into
//! a [`GenerationConfig`], where fixed values and ranges are explicit
//! variants, and [`GenerationConfig::validate`] checks it before any sampling.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// How body masses are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassMode {
    Range { min: f64, max: f64 },
    Fixed { value: f64 },
}

/// How velocity magnitudes are assigned. Directions are always isotropic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityMode {
    Range { min: f64, max: f64 },
    Fixed { value: f64 },
    /// Every body is at rest; no direction is drawn.
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub count: usize,
    pub mass: MassMode,
    pub position: PositionRange,
    pub velocity: VelocityMode,
}

impl GenerationConfig {
    /// Checks every invariant, reporting the first one broken.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.check_finite()?;

        match self.mass {
            MassMode::Range { min, max } => {
                if min <= 0.0 {
                    return Err(ConfigError::MinMassNotPositive);
                }
                if max < min {
                    return Err(ConfigError::MaxMassBelowMin);
                }
            }
            MassMode::Fixed { value } => {
                if value <= 0.0 {
                    return Err(ConfigError::MassNotPositive);
                }
            }
        }

        if self.position.max <= self.position.min {
            return Err(ConfigError::PositionRangeEmpty);
        }

        match self.velocity {
            VelocityMode::Range { min, max } => {
                if min < 0.0 {
                    return Err(ConfigError::MinVelocityNegative);
                }
                if max < min {
                    return Err(ConfigError::MaxVelocityBelowMin);
                }
            }
            VelocityMode::Fixed { value } => {
                if value < 0.0 {
                    return Err(ConfigError::VelocityNegative);
                }
            }
            VelocityMode::Zero => {}
        }

        Ok(())
    }

    fn check_finite(&self) -> std::result::Result<(), ConfigError> {
        let mut fields = vec![
            ("min-position", self.position.min),
            ("max-position", self.position.max),
        ];
        match self.mass {
            MassMode::Range { min, max } => fields.extend([("min-mass", min), ("max-mass", max)]),
            MassMode::Fixed { value } => fields.push(("mass", value)),
        }
        match self.velocity {
            VelocityMode::Range { min, max } => {
                fields.extend([("min-velocity", min), ("max-velocity", max)])
            }
            VelocityMode::Fixed { value } => fields.push(("velocity", value)),
            VelocityMode::Zero => {}
        }

        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(ConfigError::NonFinite { field }),
            None => Ok(()),
        }
    }
}

/// Numeric bounds as accepted on the command line or in a config file.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsArgs {
    /// The minimum mass of a body in kg (must be >0)
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub min_mass: f64,

    /// The maximum mass of a body in kg (must be >=min-mass)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max_mass: f64,

    /// The fixed mass of all bodies in kg, overrides min-mass and max-mass (must be >0)
    ///
    /// When set, min-mass and max-mass are ignored and not validated, so
    /// e.g. `--mass 1 --min-mass 0` is accepted.
    #[arg(long, allow_negative_numbers = true)]
    pub mass: Option<f64>,

    /// The minimum position of a body in m
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub min_position: f64,

    /// The maximum position of a body in m (must be >min-position)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max_position: f64,

    /// The minimum velocity of a body in m/s (must be >=0)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min_velocity: f64,

    /// The maximum velocity of a body in m/s (must be >=min-velocity)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max_velocity: f64,

    /// The fixed velocity of all bodies in m/s, overrides min-velocity and max-velocity (must be >=0)
    ///
    /// When set, min-velocity and max-velocity are ignored and not validated,
    /// so e.g. `--velocity 0 --min-velocity -1` is accepted.
    #[arg(long, allow_negative_numbers = true)]
    pub velocity: Option<f64>,
}

impl Default for BoundsArgs {
    fn default() -> Self {
        Self {
            min_mass: 0.1,
            max_mass: 1.0,
            mass: None,
            min_position: -1.0,
            max_position: 1.0,
            min_velocity: 0.0,
            max_velocity: 1.0,
            velocity: None,
        }
    }
}

impl BoundsArgs {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolves the flat bounds into explicit modes for `count` bodies.
    pub fn resolve(&self, count: usize) -> GenerationConfig {
        let mass = match self.mass {
            Some(value) => MassMode::Fixed { value },
            None => MassMode::Range {
                min: self.min_mass,
                max: self.max_mass,
            },
        };

        let velocity = match self.velocity {
            Some(value) if value == 0.0 => VelocityMode::Zero,
            Some(value) => VelocityMode::Fixed { value },
            None if self.min_velocity == 0.0 && self.max_velocity == 0.0 => VelocityMode::Zero,
            None => VelocityMode::Range {
                min: self.min_velocity,
                max: self.max_velocity,
            },
        };

        GenerationConfig {
            count,
            mass,
            position: PositionRange {
                min: self.min_position,
                max: self.max_position,
            },
            velocity,
        }
    }
}
