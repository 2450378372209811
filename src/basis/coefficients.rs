//! Closed-form balance coefficients and assembly of the log-ratio basis.

use crate::basis::counts::CountMatrix;
use ndarray::{Array2, s};

/// Returns the coefficient pair `(a, b)` of a balance between a left group of
/// `left` leaves and a right group of `right` leaves:
///
/// ```text
/// a =  sqrt(left  / (right * (right + left)))
/// b = -sqrt(right / (left  * (right + left)))
/// ```
///
/// `a` weighs the right group and `b` the left group, so that
/// `right * a + left * b = 0` and `right * a² + left * b² = 1`.
/// Both counts must be positive.
///
/// # Example
/// ```
/// use phylobasis::basis::coefficients::balance_coefficients;
///
/// let (a, b) = balance_coefficients(1, 1);
/// assert!((a - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// assert!((b + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
pub fn balance_coefficients(left: usize, right: usize) -> (f64, f64) {
    let (l, r) = (left as f64, right as f64);
    let a = (l / (r * (r + l))).sqrt();
    let b = -(r / (l * (r + l))).sqrt();
    (a, b)
}

/// Assembles the basis in log-ratio (clr) coordinates.
///
/// Row `i` belongs to the `i`-th internal vertex in level order and reads
/// `leading` zeros, `right` copies of `a`, `left` copies of `b`, `trailing`
/// zeros. Rows are orthonormal and each sums to zero.
pub fn log_ratio_basis(counts: &CountMatrix) -> Array2<f64> {
    let mut basis = Array2::zeros((counts.num_balances(), counts.num_leaves()));

    for (mut row, split) in basis.rows_mut().into_iter().zip(counts.splits()) {
        let (a, b) = balance_coefficients(split.left, split.right);
        let right_end = split.leading + split.right;
        let left_end = right_end + split.left;
        row.slice_mut(s![split.leading..right_end]).fill(a);
        row.slice_mut(s![right_end..left_end]).fill(b);
    }

    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_coefficients_are_unit_contrast() {
        for (left, right) in [(1, 1), (2, 1), (1, 5), (7, 3)] {
            let (a, b) = balance_coefficients(left, right);
            assert!(a > 0.0 && b < 0.0);
            assert_abs_diff_eq!(right as f64 * a + left as f64 * b, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(
                right as f64 * a * a + left as f64 * b * b,
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_coefficients_are_not_symmetric() {
        let (a, b) = balance_coefficients(2, 1);
        assert_abs_diff_eq!(a, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(b, -(1.0f64 / 6.0).sqrt(), epsilon = 1e-12);
    }
}
