// core/src/lsq.rs
//! Gauss–Newton least squares with a forward-difference Jacobian.
//!
//! Fits `y = model(x, c)` for any number of coefficients. A coefficient
//! whose tolerance is 0 is held fixed.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Parametric model evaluated at one abscissa.
pub trait FitModel {
    fn eval(&self, x: f64, c: &[f64]) -> f64;
}

impl<F> FitModel for F
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn eval(&self, x: f64, c: &[f64]) -> f64 {
        self(x, c)
    }
}

/// Outcome of a fit.
///
/// `iterations > 0`: converged in that many iterations.
/// `iterations < 0`: the cap was hit; `-iterations` is the cap and the
/// coefficients are the last, non-converged values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub iterations: i64,
    pub coefficients: Vec<f64>,
}

impl FitResult {
    pub fn converged(&self) -> bool {
        self.iterations > 0
    }
}

#[derive(Debug, Clone)]
pub struct LeastSquaresSolver {
    pub eps: Vec<f64>,
    pub max_iterations: usize,
}

impl LeastSquaresSolver {
    pub fn new(eps: Vec<f64>, max_iterations: usize) -> Self {
        Self { eps, max_iterations }
    }

    pub fn fit<M: FitModel + ?Sized>(
        &self,
        model: &M,
        x: &[f64],
        y: &[f64],
        initial: &[f64],
    ) -> Result<FitResult> {
        if x.len() != y.len() {
            return Err(CoreError::InvalidFit(format!(
                "x has {} values, y has {}",
                x.len(),
                y.len()
            )));
        }
        if initial.len() != self.eps.len() {
            return Err(CoreError::InvalidFit(format!(
                "{} coefficients but {} tolerances",
                initial.len(),
                self.eps.len()
            )));
        }

        // indices of the coefficients being fitted
        let free: Vec<usize> = (0..initial.len()).filter(|&k| self.eps[k] != 0.0).collect();
        if free.is_empty() {
            return Err(CoreError::InvalidFit("no free coefficients".into()));
        }
        let nz = free.len();
        let nx = x.len();

        let mut c = initial.to_vec();
        let mut niter = 0usize;

        loop {
            niter += 1;
            if niter > self.max_iterations {
                warn!("lsq: max no of iterations reached ({})", self.max_iterations);
                return Ok(FitResult {
                    iterations: -(self.max_iterations as i64),
                    coefficients: c,
                });
            }

            let yfit: Vec<f64> = x.iter().map(|&xi| model.eval(xi, &c)).collect();
            let efz: Vec<f64> = y.iter().zip(&yfit).map(|(yi, fi)| yi - fi).collect();

            // Jacobian columns, one per free coefficient
            let mut dfz = vec![vec![0.0; nx]; nz];
            let mut b = vec![0.0; nz];
            for (i, &k) in free.iter().enumerate() {
                let delta = self.eps[k] / 2.0;
                let mut cc = c.clone();
                cc[k] = if cc[k] == 0.0 { delta } else { cc[k] * (1.0 + delta) };
                let dck = cc[k] - c[k];

                for j in 0..nx {
                    dfz[i][j] = (model.eval(x[j], &cc) - yfit[j]) / dck;
                }
                b[i] = efz.iter().zip(&dfz[i]).map(|(e, d)| e * d).sum();
            }

            let mut a = vec![vec![0.0; nz]; nz];
            for j in 0..nz {
                for i in j..nz {
                    a[i][j] = dfz[i].iter().zip(&dfz[j]).map(|(p, q)| p * q).sum();
                    a[j][i] = a[i][j];
                }
            }

            let ainv = invert(a).ok_or(CoreError::SingularMatrix { iteration: niter })?;
            let dc: Vec<f64> = ainv
                .iter()
                .map(|row| row.iter().zip(&b).map(|(p, q)| p * q).sum())
                .collect();

            let mut n_converged = 0usize;
            for (i, &k) in free.iter().enumerate() {
                c[k] += dc[i];
                if dc[i].abs() < self.eps[k] * c[k].abs() {
                    n_converged += 1;
                }
            }
            debug!("lsq: iteration {niter}, {n_converged}/{nz} converged, c={c:?}");

            if n_converged == nz {
                return Ok(FitResult {
                    iterations: niter as i64,
                    coefficients: c,
                });
            }
        }
    }
}

// pivots below this fraction of the largest entry count as zero
const SINGULAR_RTOL: f64 = 1e-12;

/// Gauss–Jordan inverse with partial pivoting. `None` if singular.
pub fn invert(mut a: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |m, v| m.max(v.abs()));
    if !(scale > 0.0) || !scale.is_finite() {
        return None;
    }
    let tiny = scale * SINGULAR_RTOL;

    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&p, &q| a[p][col].abs().total_cmp(&a[q][col].abs()))?;
        if a[pivot_row][col].abs() <= tiny {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..n {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }
        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[r][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[r][j] -= factor * a[col][j];
                inv[r][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_2x2() {
        let inv = invert(vec![vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        assert!((inv[0][0] - 0.6).abs() < 1e-12);
        assert!((inv[0][1] + 0.7).abs() < 1e-12);
        assert!((inv[1][0] + 0.2).abs() < 1e-12);
        assert!((inv[1][1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn invert_singular_is_none() {
        assert!(invert(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).is_none());
        assert!(invert(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).is_none());
    }
}
