//! Pluggable significance tests comparing balances across groups.

use crate::balance::BalanceError;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Test statistic and p-value of a significance test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestStatistic {
    /// Value of the test statistic
    pub statistic: f64,
    /// p-value of the statistic under the null hypothesis
    pub p_value: f64,
}

// =#========================================================================#=
// SIGNIFICANCE TEST (trait)
// =#========================================================================T=
/// Test comparing two or more groups of scalar values.
///
/// Implemented for [OneWayAnova] and for any closure
/// `Fn(&[Vec<f64>]) -> (f64, f64)` returning `(statistic, p_value)`:
///
/// ```
/// use phylobasis::balance::{SignificanceTest, TestStatistic};
///
/// let difference_of_means = |groups: &[Vec<f64>]| {
///     let mean = |g: &Vec<f64>| g.iter().sum::<f64>() / g.len() as f64;
///     (mean(&groups[1]) - mean(&groups[0]), f64::NAN)
/// };
/// let result = difference_of_means.test(&[vec![1.0, 2.0], vec![4.0, 5.0]]).unwrap();
/// assert_eq!(result.statistic, 3.0);
/// ```
pub trait SignificanceTest {
    /// Tests the groups, each holding at least one value.
    fn test(&self, groups: &[Vec<f64>]) -> Result<TestStatistic, BalanceError>;
}

impl<F> SignificanceTest for F
where
    F: Fn(&[Vec<f64>]) -> (f64, f64),
{
    fn test(&self, groups: &[Vec<f64>]) -> Result<TestStatistic, BalanceError> {
        let (statistic, p_value) = self(groups);
        Ok(TestStatistic { statistic, p_value })
    }
}

// =#========================================================================#=
// ONE-WAY ANOVA
// =#========================================================================$=
/// One-way analysis of variance.
///
/// The statistic is `F = (SSB / (k - 1)) / (SSW / (n - k))` for `k` groups and
/// `n` values; the p-value is the upper tail of the F distribution with
/// `(k - 1, n - k)` degrees of freedom. Without within-group variance the
/// statistic is infinite (p-value 0), or NaN if all values coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneWayAnova;

impl SignificanceTest for OneWayAnova {
    fn test(&self, groups: &[Vec<f64>]) -> Result<TestStatistic, BalanceError> {
        let num_groups = groups.len();
        let num_values: usize = groups.iter().map(Vec::len).sum();
        if num_groups < 2 || num_values <= num_groups || groups.iter().any(Vec::is_empty) {
            return Err(BalanceError::Significance(format!(
                "one-way ANOVA needs at least two non-empty groups and more values than groups, \
                 got {num_groups} groups with {num_values} values"
            )));
        }

        let grand_mean = groups.iter().flatten().sum::<f64>() / num_values as f64;
        let mut between = 0.0;
        let mut within = 0.0;
        for group in groups {
            let mean = group.iter().sum::<f64>() / group.len() as f64;
            between += group.len() as f64 * (mean - grand_mean).powi(2);
            within += group.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        }

        let df_between = (num_groups - 1) as f64;
        let df_within = (num_values - num_groups) as f64;
        let statistic = (between / df_between) / (within / df_within);

        let p_value = if statistic.is_nan() {
            f64::NAN
        } else if statistic.is_infinite() {
            0.0
        } else {
            FisherSnedecor::new(df_between, df_within)
                .map_err(|e| BalanceError::Significance(e.to_string()))?
                .sf(statistic)
        };

        Ok(TestStatistic { statistic, p_value })
    }
}
