//! Log-ratio transforms of compositional data.
//!
//! Compositions are strictly positive rows; all functions here operate
//! row-wise on sample-by-component matrices.
//!
//! * [closure] - rescale rows to sum to 1
//! * [clr] / [clr_inv] - centred log-ratio transform and its inverse
//! * [ilr] / [ilr_inv] - isometric log-ratio transform along a tree [Basis]
//! * [aitchison_inner] - inner product of the simplex

use crate::basis::{Basis, BasisError};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};

/// Rescales every row to sum to 1.
///
/// Entries must be non-negative with a positive row sum.
pub fn closure<S>(x: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let sums = x.sum_axis(Axis(1)).insert_axis(Axis(1));
    x.to_owned() / &sums
}

/// Centred log-ratio transform: `log(x) - mean(log(x))` per row.
///
/// Entries must be strictly positive.
pub fn clr<S>(x: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let logs = x.mapv(f64::ln);
    let means = logs
        .mean_axis(Axis(1))
        .unwrap_or_else(|| Array1::zeros(x.nrows()))
        .insert_axis(Axis(1));
    logs - &means
}

/// Inverse centred log-ratio transform: `exp(x) / sum(exp(x))` per row.
///
/// The row maximum is subtracted before exponentiation, so rows with large
/// coefficients do not overflow. Output rows are strictly positive (for
/// finite input) and sum to 1.
///
/// # Example
/// ```
/// use ndarray::array;
/// use phylobasis::composition::clr_inv;
///
/// let x = clr_inv(&array![[0.0, 0.0], [1000.0, 0.0]]);
/// assert_eq!(x[[0, 0]], 0.5);
/// assert!(x[[1, 0]] > 0.99 && x[[1, 1]] > 0.0);
/// ```
pub fn clr_inv<S>(x: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let mut out = x.to_owned();
    for mut row in out.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    out
}

/// Isometric log-ratio transform of compositions along `basis`.
///
/// Columns of `x` must follow [Basis::leaves]. Returns one column per
/// balance, parallel to [Basis::nodes].
///
/// # Errors
/// [BasisError::DimensionMismatch] if `x` does not have one column per leaf.
pub fn ilr<S>(x: &ArrayBase<S, Ix2>, basis: &Basis) -> Result<Array2<f64>, BasisError>
where
    S: Data<Elem = f64>,
{
    if x.ncols() != basis.num_leaves() {
        return Err(BasisError::DimensionMismatch {
            expected: basis.num_leaves(),
            found: x.ncols(),
        });
    }
    Ok(clr(x).dot(&basis.log_ratio().t()))
}

/// Inverse of [ilr]: maps balances back to closed compositions.
///
/// # Errors
/// [BasisError::DimensionMismatch] if `z` does not have one column per balance.
pub fn ilr_inv<S>(z: &ArrayBase<S, Ix2>, basis: &Basis) -> Result<Array2<f64>, BasisError>
where
    S: Data<Elem = f64>,
{
    if z.ncols() != basis.num_balances() {
        return Err(BasisError::DimensionMismatch {
            expected: basis.num_balances(),
            found: z.ncols(),
        });
    }
    Ok(clr_inv(&z.dot(basis.log_ratio())))
}

/// Aitchison inner product of two compositions of equal length.
///
/// # Errors
/// [BasisError::DimensionMismatch] if `y` does not have the length of `x`.
pub fn aitchison_inner<S, T>(x: &ArrayBase<S, Ix1>, y: &ArrayBase<T, Ix1>) -> Result<f64, BasisError>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    if x.len() != y.len() {
        return Err(BasisError::DimensionMismatch {
            expected: x.len(),
            found: y.len(),
        });
    }
    Ok(centred_logs(x).dot(&centred_logs(y)))
}

fn centred_logs<S>(x: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let logs = x.mapv(f64::ln);
    let mean = logs.mean().unwrap_or(0.0);
    logs - mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_closure_rows_sum_to_one() {
        let x = closure(&array![[1.0, 3.0], [2.0, 2.0]]);
        assert_abs_diff_eq!(x, array![[0.25, 0.75], [0.5, 0.5]], epsilon = 1e-12);
    }

    #[test]
    fn test_clr_rows_sum_to_zero() {
        let x = clr(&array![[1.0, 2.0, 4.0], [3.0, 3.0, 3.0]]);
        for row in x.rows() {
            assert_abs_diff_eq!(row.sum(), 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(x[[0, 2]], 2.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_clr_inv_inverts_clr_on_closed_rows() {
        let x = array![[0.1, 0.2, 0.7], [0.5, 0.25, 0.25]];
        assert_abs_diff_eq!(clr_inv(&clr(&x)), x, epsilon = 1e-12);
    }

    #[test]
    fn test_clr_inv_is_stable_for_large_values() {
        let x = clr_inv(&array![[800.0, 799.0, 790.0]]);
        assert!(x.iter().all(|v| v.is_finite() && *v > 0.0));
        assert_abs_diff_eq!(x.sum(), 1.0, epsilon = 1e-12);
        assert!(x[[0, 0]] > x[[0, 1]]);
    }

    #[test]
    fn test_aitchison_inner_of_uniform_is_zero() {
        let uniform = array![0.25, 0.25, 0.25, 0.25];
        let other = array![0.1, 0.2, 0.3, 0.4];
        assert_abs_diff_eq!(
            aitchison_inner(&uniform, &other).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_aitchison_inner_rejects_unequal_lengths() {
        let err = aitchison_inner(&array![0.5, 0.5], &array![0.2, 0.3, 0.5]).unwrap_err();
        assert_eq!(
            err,
            BasisError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
