//! Linear algebra for segmented regression

use nalgebra::{DMatrix, DVector};
use trend_core::{Error, Result};

/// Step function with `H(0) = 1`, the convention the breakpoint update
/// formula assumes
fn heaviside(v: f64) -> f64 {
    if v >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Design matrix for the linearized segmented model
///
/// Columns are `[1, x, U_1..U_k, V_1..V_k]` where `U_j` is the hinge
/// `(x - psi_j) * H(x - psi_j)` and `V_j` is the step `H(x - psi_j)`.
/// The `U` coefficients are the slope changes, the `V` coefficients the
/// first-order corrections that drive the breakpoint update.
pub(crate) fn design_matrix(xs: &[f64], breakpoints: &[f64]) -> DMatrix<f64> {
    let n = xs.len();
    let k = breakpoints.len();
    let mut design = DMatrix::zeros(n, 2 + 2 * k);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
        for (j, &psi) in breakpoints.iter().enumerate() {
            let step = heaviside(x - psi);
            design[(i, 2 + j)] = (x - psi) * step;
            design[(i, 2 + k + j)] = step;
        }
    }
    design
}

/// Solve the normal equations for the design matrix
///
/// Cholesky is attempted first; an ill-conditioned system falls back to
/// SVD with a relaxed tolerance.
pub(crate) fn solve_least_squares(design: &DMatrix<f64>, ys: &[f64]) -> Result<DVector<f64>> {
    let y = DVector::from_row_slice(ys);
    let xt = design.transpose();
    let xtx = &xt * design;
    let xty = &xt * &y;

    match xtx.clone().cholesky() {
        Some(chol) => Ok(chol.solve(&xty)),
        None => {
            let svd = xtx.svd(true, true);
            svd.solve(&xty, 1e-10)
                .map_err(|e| Error::Computation(format!("Failed to solve segmented system: {e}")))
        }
    }
}

/// Residual sum of squares of the model `design * coefficients`
pub(crate) fn residual_sum_of_squares(
    design: &DMatrix<f64>,
    ys: &[f64],
    coefficients: &DVector<f64>,
) -> f64 {
    let fitted = design * coefficients;
    ys.iter()
        .zip(fitted.iter())
        .map(|(&y, &f)| (y - f) * (y - f))
        .sum()
}
