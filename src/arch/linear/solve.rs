use ndarray::{Array1, Array2, ArrayView2};

use crate::{MlErr, Result};

/// Pivots smaller than this fraction of their diagonal entry are treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solves the regularized normal equations `(XᵗX + λI)·β = Xᵗy` through a Cholesky
/// factorization.
///
/// # Arguments
/// * `x` - The design matrix, shaped `(samples, features)`.
/// * `y` - The targets, shaped `(samples, 1)`.
/// * `lambda` - The ridge penalty, zero for ordinary least squares.
///
/// # Returns
/// The coefficients or `MlErr::Singular` if the system isn't positive definite.
pub(super) fn normal_equations(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    lambda: f64,
) -> Result<Array1<f64>> {
    if y.nrows() != x.nrows() {
        return Err(MlErr::SizeMismatch {
            a: "targets",
            b: "samples",
            got: y.nrows(),
            expected: x.nrows(),
        });
    }

    if y.ncols() != 1 {
        return Err(MlErr::SizeMismatch {
            a: "targets",
            b: "linear model outputs",
            got: y.ncols(),
            expected: 1,
        });
    }

    let mut a = x.t().dot(&x);
    a.diag_mut().mapv_inplace(|v| v + lambda);
    let b = x.t().dot(&y.column(0));

    let l = cholesky(&a)?;
    let n = b.len();

    // L·z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let s: f64 = (0..i).map(|k| l[[i, k]] * z[k]).sum();
        z[i] = (b[i] - s) / l[[i, i]];
    }

    // Lᵗ·β = z
    let mut beta = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let s: f64 = (i + 1..n).map(|k| l[[k, i]] * beta[k]).sum();
        beta[i] = (z[i] - s) / l[[i, i]];
    }

    Ok(beta)
}

/// Factors a symmetric positive definite matrix as `L·Lᵗ`, returning the lower triangle.
fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let s: f64 = (0..j).map(|k| l[[j, k]] * l[[j, k]]).sum();
        let pivot = a[[j, j]] - s;

        if !pivot.is_finite() || pivot <= PIVOT_TOLERANCE * a[[j, j]].abs() {
            return Err(MlErr::Singular);
        }

        let pivot = pivot.sqrt();
        l[[j, j]] = pivot;

        for i in j + 1..n {
            let s: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            l[[i, j]] = (a[[i, j]] - s) / pivot;
        }
    }

    Ok(l)
}
