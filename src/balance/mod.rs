//! Group comparison of tree balances.
//!
//! [BalanceTest] projects a sample-by-feature table of strictly positive
//! values onto the [Basis] of a tree (one balance per internal vertex) and
//! compares each balance across sample groups with a [SignificanceTest].
//!
//! # Example
//! ```
//! use ndarray::array;
//! use phylobasis::balance::BalanceTest;
//! use phylobasis::parse_newick_str;
//!
//! let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
//! let table = array![
//!     [1.0, 2.0, 10.0],
//!     [1.5, 2.0, 11.0],
//!     [9.0, 2.0, 1.0],
//!     [8.0, 2.5, 1.5],
//! ];
//! let features = ["b", "c", "d"];
//! let grouping = ["x", "x", "y", "y"];
//!
//! let report = BalanceTest::new().run(&tree, &table, &features, &grouping).unwrap();
//! assert_eq!(report.results().len(), 2);
//! assert_eq!(report.balances().dim(), (4, 2));
//! ```

pub mod significance;

pub use significance::{OneWayAnova, SignificanceTest, TestStatistic};

use crate::basis::{Basis, BasisError};
use crate::composition::ilr;
use crate::model::{Tree, VertexIndex};
use log::{debug, warn};
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

// =#========================================================================#=
// BALANCE ERROR
// =#========================================================================€=
/// Errors raised by [BalanceTest].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalanceError {
    /// The tree does not admit a basis.
    #[error(transparent)]
    Basis(#[from] BasisError),

    /// Two inputs disagree in size.
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which input was checked
        what: &'static str,
        /// Size required
        expected: usize,
        /// Size found
        found: usize,
    },

    /// A table entry is zero, negative or not finite.
    #[error("Table entry at row {row}, column {column} is not strictly positive: {value}")]
    NonPositiveValue {
        /// Sample (row) index
        row: usize,
        /// Feature (column) index
        column: usize,
        /// Offending value
        value: f64,
    },

    /// A leaf label of the tree is not among the features.
    #[error("Leaf {0:?} has no matching feature in the table")]
    MissingFeature(String),

    /// A feature label occurs more than once.
    #[error("Feature {0:?} occurs more than once")]
    DuplicateFeature(String),

    /// Two leaves of the tree share a label, so columns cannot be matched.
    #[error("Leaf label {0:?} occurs more than once in the tree")]
    DuplicateLeaf(String),

    /// Every sample forms its own group, so there is no within-group variance.
    #[error("All values in the grouping are unique")]
    UniqueGrouping,

    /// All samples are in the same group, so there is no between-group variance.
    #[error("All values in the grouping are the same")]
    SingleGroup,

    /// The significance test failed.
    #[error("Significance test failed: {0}")]
    Significance(String),
}

// =#========================================================================#=
// REPORT
// =#========================================================================$=
/// Test result for the balance of one internal vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTest {
    /// Internal vertex of the balance
    pub node: VertexIndex,
    /// Test statistic
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
}

/// Outcome of a [BalanceTest] run.
#[derive(Debug, Clone)]
pub struct BalanceReport {
    basis: Basis,
    balances: Array2<f64>,
    results: Vec<NodeTest>,
}

impl BalanceReport {
    /// Basis the table was projected on.
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Balances, one row per sample and one column per [Basis::nodes] entry.
    pub fn balances(&self) -> &Array2<f64> {
        &self.balances
    }

    /// Test results in level order of the internal vertices.
    pub fn results(&self) -> &[NodeTest] {
        &self.results
    }

    /// Test result of the given internal vertex, if it has a balance.
    pub fn result_for(&self, node: VertexIndex) -> Option<&NodeTest> {
        self.results.iter().find(|r| r.node == node)
    }
}

// =#========================================================================#=
// BALANCE TEST
// =#========================================================================$=
/// Configurable group comparison of tree balances.
///
/// # Configuration
/// * [`with_significance_test(test)`](Self::with_significance_test)
///     - replaces the default [OneWayAnova] by any [SignificanceTest]
#[derive(Debug, Clone, Default)]
pub struct BalanceTest<T = OneWayAnova> {
    test: T,
}

impl BalanceTest<OneWayAnova> {
    /// Creates a [BalanceTest] using [OneWayAnova].
    pub fn new() -> Self {
        Self { test: OneWayAnova }
    }
}

impl<T: SignificanceTest> BalanceTest<T> {
    /// Replaces the significance test.
    pub fn with_significance_test<U: SignificanceTest>(self, test: U) -> BalanceTest<U> {
        BalanceTest { test }
    }

    /// Computes the balances of `table` along `tree` and tests every balance
    /// across the groups of `grouping`.
    ///
    /// # Arguments
    /// * `tree` - Strictly bifurcating tree whose leaves are the features
    /// * `table` - Strictly positive values, samples as rows, features as columns
    /// * `features` - Label of every table column; matched against leaf labels
    /// * `grouping` - Group of every table row
    ///
    /// Groups are passed to the test in sorted order of their labels.
    ///
    /// # Errors
    /// See [BalanceError]; inputs are validated before any balance is computed.
    pub fn run<S, F, G>(
        &self,
        tree: &Tree,
        table: &ArrayBase<S, Ix2>,
        features: &[F],
        grouping: &[G],
    ) -> Result<BalanceReport, BalanceError>
    where
        S: Data<Elem = f64>,
        F: AsRef<str>,
        G: Ord,
    {
        check_positive(table)?;
        check_len("features", table.ncols(), features.len())?;
        check_len("grouping", table.nrows(), grouping.len())?;

        let groups = group_rows(grouping)?;

        let basis = Basis::from_tree(tree)?;
        check_len("tree leaves", features.len(), basis.num_leaves())?;

        let columns = feature_columns(&basis.leaf_labels(tree), features)?;
        let aligned = table.select(Axis(1), &columns);
        let balances = ilr(&aligned, &basis)?;

        let mut results = Vec::with_capacity(basis.num_balances());
        for (&node, column) in basis.nodes().iter().zip(balances.columns()) {
            let values: Vec<Vec<f64>> = groups
                .iter()
                .map(|rows| rows.iter().map(|&row| column[row]).collect())
                .collect();
            let TestStatistic { statistic, p_value } = self.test.test(&values)?;
            if !statistic.is_finite() {
                warn!("balance of vertex {node} has non-finite test statistic {statistic}");
            }
            results.push(NodeTest {
                node,
                statistic,
                p_value,
            });
        }

        debug!(
            "tested {} balances over {} samples in {} groups",
            results.len(),
            table.nrows(),
            groups.len()
        );

        Ok(BalanceReport {
            basis,
            balances,
            results,
        })
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), BalanceError> {
    if expected != found {
        return Err(BalanceError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_positive<S>(table: &ArrayBase<S, Ix2>) -> Result<(), BalanceError>
where
    S: Data<Elem = f64>,
{
    match table
        .indexed_iter()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        Some(((row, column), &value)) => Err(BalanceError::NonPositiveValue { row, column, value }),
        None => Ok(()),
    }
}

/// Row indices of every group, groups in sorted order.
fn group_rows<G: Ord>(grouping: &[G]) -> Result<Vec<Vec<usize>>, BalanceError> {
    let mut groups: BTreeMap<&G, Vec<usize>> = BTreeMap::new();
    for (row, group) in grouping.iter().enumerate() {
        groups.entry(group).or_default().push(row);
    }

    if groups.len() == grouping.len() {
        return Err(BalanceError::UniqueGrouping);
    }
    if groups.len() == 1 {
        return Err(BalanceError::SingleGroup);
    }

    Ok(groups.into_values().collect())
}

/// Table column of every leaf label, in the given leaf order.
///
/// Leaf labels and features must both be unique.
fn feature_columns<F: AsRef<str>>(
    leaf_labels: &[&str],
    features: &[F],
) -> Result<Vec<usize>, BalanceError> {
    let mut lookup = HashMap::with_capacity(features.len());
    for (column, feature) in features.iter().enumerate() {
        if lookup.insert(feature.as_ref(), column).is_some() {
            return Err(BalanceError::DuplicateFeature(feature.as_ref().to_string()));
        }
    }

    let mut seen = HashSet::with_capacity(leaf_labels.len());
    leaf_labels
        .iter()
        .map(|&label| {
            if !seen.insert(label) {
                return Err(BalanceError::DuplicateLeaf(label.to_string()));
            }
            lookup
                .get(label)
                .copied()
                .ok_or_else(|| BalanceError::MissingFeature(label.to_string()))
        })
        .collect()
}
