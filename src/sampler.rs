// src/sampler.rs

use itertools::izip;
use log::{debug, info};
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{StandardNormal, Uniform};

use crate::body::Body;
use crate::config::{GenerationConfig, MassMode, VelocityMode};
use crate::matrix::Matrix;

/// Uniform draws over `[min, max)`, or the bound itself when the interval has
/// zero width.
enum Interval {
    Constant(f64),
    Uniform(Uniform<f64>),
    /// `max - min` overflows, so draw over the halved bounds and double.
    Doubled(Uniform<f64>),
}

impl Interval {
    fn new(min: f64, max: f64) -> Self {
        if min == max {
            return Interval::Constant(min);
        }
        let wide = !(max - min).is_finite();
        let (low, high) = if wide {
            (0.5 * min, 0.5 * max)
        } else {
            (min, max)
        };
        match Uniform::new(low, high) {
            Ok(range) if wide => Interval::Doubled(range),
            Ok(range) => Interval::Uniform(range),
            // Only reachable with an unvalidated empty or non-finite range.
            Err(_) => Interval::Constant(min),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Interval::Constant(value) => *value,
            Interval::Uniform(range) => rng.sample(range),
            Interval::Doubled(range) => 2.0 * rng.sample(range),
        }
    }

    fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// A direction drawn uniformly over the unit sphere.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    loop {
        let v = Vector3::new(
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
        );
        if let Some(unit) = v.try_normalize(0.0) {
            return unit;
        }
    }
}

fn sample_masses<R: Rng + ?Sized>(mode: MassMode, n: usize, rng: &mut R) -> Vec<f64> {
    match mode {
        MassMode::Range { min, max } => Interval::new(min, max).sample_n(rng, n),
        MassMode::Fixed { value } => vec![value; n],
    }
}

fn sample_velocities<R: Rng + ?Sized>(
    mode: VelocityMode,
    n: usize,
    rng: &mut R,
) -> Vec<Vector3<f64>> {
    let magnitude = match mode {
        VelocityMode::Zero => return vec![Vector3::zeros(); n],
        VelocityMode::Range { min, max } => Interval::new(min, max),
        VelocityMode::Fixed { value } => Interval::Constant(value),
    };

    // Directions for every body first, then magnitudes.
    let directions: Vec<Vector3<f64>> = (0..n).map(|_| random_direction(rng)).collect();
    let speeds = magnitude.sample_n(rng, n);

    directions
        .into_iter()
        .zip(speeds)
        .map(|(direction, speed)| speed * direction)
        .collect()
}

/// Draws `config.count` bodies. `config` must already have been validated.
///
/// Attributes are drawn in a fixed order (masses, positions, velocity
/// directions, velocity magnitudes), each for all bodies at once, so a seeded
/// generator always yields the same bodies.
pub fn generate<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Vec<Body> {
    let n = config.count;
    info!(
        "Generating {} bodies (mass: {:?}, velocity: {:?})",
        n, config.mass, config.velocity
    );

    let masses = sample_masses(config.mass, n, rng);

    let coordinate = Interval::new(config.position.min, config.position.max);
    let positions: Vec<Vector3<f64>> = (0..n)
        .map(|_| {
            Vector3::new(
                coordinate.sample(rng),
                coordinate.sample(rng),
                coordinate.sample(rng),
            )
        })
        .collect();

    let velocities = sample_velocities(config.velocity, n, rng);

    debug!("Total mass {:.6e}", masses.iter().sum::<f64>());

    let bodies: Vec<Body> = izip!(masses, positions, velocities)
        .map(|(m, p, v)| Body::new(m, p, v))
        .collect();
    if let Some(first) = bodies.first() {
        debug!("First body {first}");
    }
    bodies
}

/// Draws the bodies and packs them into a `(count, 7)` matrix.
pub fn generate_matrix<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Matrix {
    Matrix::from_bodies(&generate(config, rng))
}
