//! Numeric helpers: means, composite W width, ordinary least squares.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::error::InsufficientDataError;

/// Minimum paired samples for a line fit.
pub const MIN_FIT_POINTS: usize = 2;

/// Below this x-variance a fit is treated as having no slope.
const VARIANCE_EPSILON: f64 = 1e-300;

/// Arithmetic mean, or `None` for an empty sequence.
///
/// `None` is the no-data marker: an empty cell is never reported as `0.0`,
/// which is a legitimate measured value.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.mean())
    }
}

/// Root-sum-of-squares combination of the left and right wing values.
///
/// Used both for the W width itself and for its propagated uncertainty.
pub fn composite_width(left: f64, right: f64) -> f64 {
    left.hypot(right)
}

/// A composite W width sample and its propagated uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WidthSample {
    pub width: f64,
    pub uncertainty: f64,
}

impl WidthSample {
    pub fn from_wings(left: f64, left_unc: f64, right: f64, right_unc: f64) -> Self {
        Self {
            width: composite_width(left, right),
            uncertainty: composite_width(left_unc, right_unc),
        }
    }
}

/// Result of an ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Squared Pearson correlation. The sign is dropped; read it from `slope`.
    pub r_squared: f64,
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `ys` against `xs` by ordinary least squares.
///
/// Fails with fewer than two paired points, unequal lengths, or identical
/// xs. When the ys are constant the correlation is undefined and
/// `r_squared` is reported as `0.0`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<LinearFit, InsufficientDataError> {
    if xs.len() != ys.len() {
        return Err(InsufficientDataError::Unpaired {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    let n = xs.len();
    if n < MIN_FIT_POINTS {
        return Err(InsufficientDataError::TooFewPoints {
            needed: MIN_FIT_POINTS,
            got: n,
        });
    }

    let mean_x = xs.mean();
    let mean_y = ys.mean();
    let var_x = xs.population_variance();
    let var_y = ys.population_variance();
    if var_x <= VARIANCE_EPSILON {
        return Err(InsufficientDataError::ZeroVariance);
    }
    let cov = xs.population_covariance(ys);

    let slope = cov / var_x;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if var_y <= VARIANCE_EPSILON {
        0.0
    } else {
        let r = cov / (var_x * var_y).sqrt();
        r * r
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        points: n,
    })
}
