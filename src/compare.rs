// src/compare.rs

use std::fmt;

use log::{debug, info};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::matrix::Matrix;

/// NumPy's `allclose` defaults.
pub const DEFAULT_RTOL: f64 = 1e-5;
pub const DEFAULT_ATOL: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
        }
    }
}

impl Tolerance {
    /// `|a - b| <= atol + rtol * |b|`; equal infinities are close, NaN never is.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

/// Outcome of comparing two arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Equal,
    AllClose,
    Mismatch { max_abs: f64, max_rel: f64 },
    UnequalShapes { left: Vec<usize>, right: Vec<usize> },
}

impl Comparison {
    pub fn exit_code(&self) -> u8 {
        match self {
            Comparison::Equal | Comparison::AllClose => 0,
            Comparison::Mismatch { .. } => 1,
            Comparison::UnequalShapes { .. } => 2,
        }
    }

    pub fn is_match(&self) -> bool {
        self.exit_code() == 0
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Equal => write!(f, "equal"),
            Comparison::AllClose => write!(f, "allclose"),
            Comparison::Mismatch { max_abs, max_rel } => write!(
                f,
                "not equal/allclose\nmax absolute difference is {max_abs}\nmax relative difference is {max_rel}"
            ),
            Comparison::UnequalShapes { .. } => write!(f, "unequal shapes"),
        }
    }
}

/// Per-element facts, merged across the whole array.
#[derive(Debug, Clone, Copy)]
struct Summary {
    all_equal: bool,
    all_close: bool,
    max_abs: OrderedFloat<f64>,
    max_rel: OrderedFloat<f64>,
}

impl Summary {
    fn identity() -> Self {
        Self {
            all_equal: true,
            all_close: true,
            max_abs: OrderedFloat(0.0),
            max_rel: OrderedFloat(0.0),
        }
    }

    fn of(a: f64, b: f64, tolerance: &Tolerance) -> Self {
        let equal = a == b;
        let diff = if equal { 0.0 } else { (a - b).abs() };
        let rel = if diff == 0.0 { 0.0 } else { diff / b.abs() };
        Self {
            all_equal: equal,
            all_close: tolerance.is_close(a, b),
            max_abs: OrderedFloat(diff),
            max_rel: OrderedFloat(rel),
        }
    }

    // OrderedFloat sorts NaN above everything, so a NaN difference wins the max.
    fn merge(self, other: Self) -> Self {
        Self {
            all_equal: self.all_equal && other.all_equal,
            all_close: self.all_close && other.all_close,
            max_abs: self.max_abs.max(other.max_abs),
            max_rel: self.max_rel.max(other.max_rel),
        }
    }
}

/// Compares `a` against `b`, with `b` as the reference for relative differences.
///
/// With `exact`, only bit-for-bit IEEE equality counts as a match; otherwise
/// arrays within `tolerance` are reported as [`Comparison::AllClose`].
pub fn compare(a: &Matrix, b: &Matrix, exact: bool, tolerance: Tolerance) -> Comparison {
    if a.shape() != b.shape() {
        info!("Shapes differ: {:?} vs {:?}", a.shape(), b.shape());
        return Comparison::UnequalShapes {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
        };
    }

    let summary = a
        .data()
        .par_iter()
        .zip(b.data().par_iter())
        .map(|(&x, &y)| Summary::of(x, y, &tolerance))
        .reduce(Summary::identity, Summary::merge);
    debug!("Comparison summary {:?}", summary);

    if summary.all_equal {
        Comparison::Equal
    } else if !exact && summary.all_close {
        Comparison::AllClose
    } else {
        Comparison::Mismatch {
            max_abs: summary.max_abs.into_inner(),
            max_rel: summary.max_rel.into_inner(),
        }
    }
}
