// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Correlation primitives for the objective.

Partial correlation regresses both series on the covariate columns by least
squares (no intercept column) and correlates the residuals. The projection
is done through an orthonormal basis of the covariate span, built once per
network and shared by every candidate of that network's seeds.
*/

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Columns whose remaining norm falls below this fraction of their original
/// norm are treated as linearly dependent and dropped from the basis
const DEPENDENCE_TOLERANCE: f64 = 1e-10;

/// Pearson correlation of two equal-length series
///
/// Returns NaN when either series has zero variance.
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return f64::NAN;
    }
    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// Least-squares residual operator for a fixed covariate matrix
#[derive(Debug, Clone)]
pub struct Residualizer {
    basis: Vec<Array1<f64>>,
    len: usize,
}

impl Residualizer {
    /// Build from a timepoints x k covariate matrix (k may be 0)
    pub fn new(covariates: ArrayView2<'_, f64>) -> Self {
        let len = covariates.nrows();
        let mut basis: Vec<Array1<f64>> = Vec::with_capacity(covariates.ncols());

        for column in covariates.axis_iter(Axis(1)) {
            let original = column.dot(&column).sqrt();
            if original == 0.0 || !original.is_finite() {
                continue;
            }
            let mut v = column.to_owned();
            // Two rounds of Gram-Schmidt keep the basis orthogonal in floating point
            for _ in 0..2 {
                for q in &basis {
                    let proj = q.dot(&v);
                    v.scaled_add(-proj, q);
                }
            }
            let norm = v.dot(&v).sqrt();
            if norm <= DEPENDENCE_TOLERANCE * original {
                continue;
            }
            v /= norm;
            basis.push(v);
        }

        Self { basis, len }
    }

    /// Number of independent covariate columns
    pub fn rank(&self) -> usize {
        self.basis.len()
    }

    /// `y` minus its least-squares fit on the covariates
    pub fn residual(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut r = y.to_owned();
        if r.len() != self.len {
            return r;
        }
        for q in &self.basis {
            let proj = q.dot(&r);
            r.scaled_add(-proj, q);
        }
        r
    }

    /// Pearson correlation of the residuals of `x` and `y`
    pub fn partial_correlation(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let rx = self.residual(x);
        let ry = self.residual(y);
        pearson(rx.view(), ry.view())
    }
}

/// Partial correlation of `x` and `y` controlling for the columns of `covariates`
pub fn partial_correlation(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
    covariates: ArrayView2<'_, f64>,
) -> f64 {
    Residualizer::new(covariates).partial_correlation(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    /// Residual via the normal equations (Z'Z) b = Z'y, solved by Gaussian elimination
    fn normal_equation_residual(z: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
        let k = z.ncols();
        let mut a = z.t().dot(z);
        let mut b = z.t().dot(y);
        for col in 0..k {
            let pivot = (col..k)
                .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
                .unwrap();
            for c in 0..k {
                a.swap([col, c], [pivot, c]);
            }
            b.swap(col, pivot);
            for row in (col + 1)..k {
                let factor = a[[row, col]] / a[[col, col]];
                for c in col..k {
                    a[[row, c]] -= factor * a[[col, c]];
                }
                b[row] -= factor * b[col];
            }
        }
        let mut beta = Array1::<f64>::zeros(k);
        for row in (0..k).rev() {
            let mut acc = b[row];
            for c in (row + 1)..k {
                acc -= a[[row, c]] * beta[c];
            }
            beta[row] = acc / a[[row, row]];
        }
        y - &z.dot(&beta)
    }

    #[test]
    fn test_pearson_basic() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![2.0, 4.0, 6.0, 8.0];
        assert!((pearson(x.view(), y.view()) - 1.0).abs() < 1e-12);

        let neg = array![4.0, 3.0, 2.0, 1.0];
        assert!((pearson(x.view(), neg.view()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_series_is_nan() {
        let x = array![1.0, 2.0, 3.0];
        let flat = array![5.0, 5.0, 5.0];
        assert!(pearson(x.view(), flat.view()).is_nan());
    }

    #[test]
    fn test_no_covariates_reduces_to_pearson() {
        let x = array![1.0, 3.0, 2.0, 5.0, 4.0];
        let y = array![2.0, 1.0, 4.0, 3.0, 6.0];
        let empty = Array2::<f64>::zeros((5, 0));
        let r = partial_correlation(x.view(), y.view(), empty.view());
        assert!((r - pearson(x.view(), y.view())).abs() < 1e-12);
    }

    #[test]
    fn test_dependent_columns_dropped() {
        let z = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        assert_eq!(Residualizer::new(z.view()).rank(), 1);
    }

    #[test]
    fn test_matches_normal_equations() {
        let z = array![
            [1.0, 0.5],
            [2.0, -1.0],
            [0.0, 3.0],
            [1.5, 1.0],
            [-1.0, 2.0],
            [3.0, 0.0]
        ];
        let x = array![0.3, 1.2, -0.7, 2.2, 0.1, -1.5];
        let y = array![1.0, -0.4, 2.5, 0.8, -2.0, 0.6];

        let residualizer = Residualizer::new(z.view());
        let expected_x = normal_equation_residual(&z, &x);
        let expected_y = normal_equation_residual(&z, &y);
        for (a, b) in residualizer.residual(x.view()).iter().zip(expected_x.iter()) {
            assert!((a - b).abs() < 1e-9);
        }

        let expected = pearson(expected_x.view(), expected_y.view());
        let actual = partial_correlation(x.view(), y.view(), z.view());
        assert!((expected - actual).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_residual_orthogonal_to_covariates(
            values in prop::collection::vec(-10.0f64..10.0, 24),
            y in prop::collection::vec(-10.0f64..10.0, 8),
        ) {
            let z = Array2::from_shape_vec((8, 3), values).unwrap();
            let y = Array1::from(y);
            let r = Residualizer::new(z.view()).residual(y.view());
            for column in z.axis_iter(Axis(1)) {
                let scale = 1.0 + column.dot(&column).sqrt() * y.dot(&y).sqrt();
                prop_assert!(column.dot(&r).abs() <= 1e-8 * scale);
            }
        }

        #[test]
        fn prop_partial_correlation_bounded(
            x in prop::collection::vec(-10.0f64..10.0, 10),
            y in prop::collection::vec(-10.0f64..10.0, 10),
            z in prop::collection::vec(-10.0f64..10.0, 20),
        ) {
            let z = Array2::from_shape_vec((10, 2), z).unwrap();
            let r = partial_correlation(
                Array1::from(x).view(),
                Array1::from(y).view(),
                z.view(),
            );
            prop_assert!(r.is_nan() || (-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
        }
    }
}
