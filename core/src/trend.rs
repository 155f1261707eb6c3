// core/src/trend.rs
// Straight-line trend fits on derived columns.
use log::{debug, info};

use crate::error::Result;
use crate::lsq::{FitResult, LeastSquaresSolver};
use crate::models::{Column, Track};
use crate::types::Thresholds;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const INITIAL_GUESS: [f64; 2] = [0.1, -1.0];
pub const EPS: [f64; 2] = [1e-6, 1e-6];

/// y = c0 + c1·x. Missing coefficients count as 0, so a one-element
/// vector fits a constant.
pub fn linear(x: f64, c: &[f64]) -> f64 {
    let c0 = c.first().copied().unwrap_or(0.0);
    let c1 = c.get(1).copied().unwrap_or(0.0);
    c0 + c1 * x
}

/// Straight-line fit with the default guess and tolerances.
pub fn dlsq_fit(x: &[f64], y: &[f64], max_iterations: usize) -> Result<FitResult> {
    let solver = LeastSquaresSolver::new(EPS.to_vec(), max_iterations);
    solver.fit(&linear, x, y, &INITIAL_GUESS)
}

/// Velocity-vs-grade trend line over the plottable samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub fit: FitResult,
    pub x_range: (f64, f64),
}

impl Trend {
    pub fn intercept(&self) -> f64 {
        self.fit.coefficients.first().copied().unwrap_or(0.0)
    }

    pub fn slope(&self) -> f64 {
        self.fit.coefficients.get(1).copied().unwrap_or(0.0)
    }

    /// Velocity change per 10 % of grade, mph.
    pub fn mph_per_10_pct(&self) -> f64 {
        self.slope() * 10.0
    }

    /// End points of the fitted line across the data range.
    pub fn line(&self) -> [(f64, f64); 2] {
        let (x0, x1) = self.x_range;
        [
            (x0, linear(x0, &self.fit.coefficients)),
            (x1, linear(x1, &self.fit.coefficients)),
        ]
    }
}

/// Fits velocity against grade over `Track::plot_mask`.
pub fn velocity_vs_grade(track: &Track, cfg: &Thresholds) -> Result<Trend> {
    let mask = track.plot_mask(cfg);
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (s, m) in track.samples.iter().zip(&mask) {
        if *m {
            x.push(s.get(Column::Grade));
            y.push(s.get(Column::Velocity));
        }
    }
    debug!("trend: fitting {} of {} samples", x.len(), track.len());

    let fit = dlsq_fit(&x, &y, DEFAULT_MAX_ITERATIONS)?;
    let x_range = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

    let trend = Trend { fit, x_range };
    info!(
        "velocity vs grade: {:.1} mph/10% (iterations={})",
        trend.mph_per_10_pct(),
        trend.fit.iterations
    );
    Ok(trend)
}
