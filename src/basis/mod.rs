//! Orthonormal bases of the Aitchison simplex aligned with a bifurcating tree.
//!
//! Every internal vertex of a strictly bifurcating tree splits its leaves in
//! two groups; the balance between these groups is one coordinate of an
//! isometric log-ratio (ilr) transform. [Basis] collects these balances:
//!
//! 1. [counts] derives the split counts of every internal vertex,
//! 2. [coefficients] turns them into rows of exact log-ratio coefficients,
//! 3. [clr_inv](crate::composition::clr_inv) maps each row into the simplex.
//!
//! # Orientation
//! Rows follow the level order of internal vertices (root first). Columns
//! follow the leaves in reverse left-to-right order ([Basis::leaves]). The
//! left child is `children[0]`; swapping children flips the sign of the
//! vertex's balance, so the child order of the input tree is significant.
//!
//! # Example
//! ```
//! use phylobasis::basis::Basis;
//! use phylobasis::parse_newick_str;
//!
//! let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
//! let basis = Basis::from_tree(&tree).unwrap();
//!
//! assert_eq!(basis.matrix().dim(), (2, 3));
//! assert_eq!(basis.leaf_labels(&tree), vec!["d", "c", "b"]);
//! assert!((basis.matrix()[[0, 0]] - 0.62985567).abs() < 1e-6);
//! ```

pub mod coefficients;
pub mod counts;

use crate::composition::clr_inv;
use crate::model::{Tree, VertexIndex};
use coefficients::log_ratio_basis;
use counts::{CountMatrix, column_order};
use log::debug;
use ndarray::Array2;
use thiserror::Error;

// =#========================================================================#=
// BASIS ERROR
// =#========================================================================€=
/// Errors raised while constructing or applying a [Basis].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasisError {
    /// An internal vertex does not have exactly two children.
    #[error("Not a strictly bifurcating tree: vertex {vertex} has {num_children} children")]
    NotBifurcating {
        /// Index of the offending vertex
        vertex: VertexIndex,
        /// Its number of children
        num_children: usize,
    },

    /// The tree has no root, i.e. its construction was not finished.
    #[error("Tree has no root")]
    RootNotSet,

    /// Data does not have one column per leaf (or one value per balance).
    #[error("Dimension mismatch: expected {expected} columns, found {found}")]
    DimensionMismatch {
        /// Number of columns required by the basis
        expected: usize,
        /// Number of columns supplied
        found: usize,
    },
}

// =#========================================================================#=
// BASIS
// =#========================================================================$=
/// Orthonormal basis of the simplex whose balances follow a bifurcating tree.
///
/// Holds the basis in simplex form (rows are compositions) and in log-ratio
/// form (the clr coordinates of those rows), together with the internal
/// vertex of every row and the leaf of every column.
#[derive(Debug, Clone)]
pub struct Basis {
    simplex: Array2<f64>,
    log_ratio: Array2<f64>,
    nodes: Vec<VertexIndex>,
    leaves: Vec<VertexIndex>,
}

impl Basis {
    /// Builds the basis of `tree`.
    ///
    /// A tree with `n` leaves yields `n - 1` rows and `n` columns; a single
    /// leaf yields an empty `0 x 1` basis.
    ///
    /// # Errors
    /// [BasisError::NotBifurcating] if any internal vertex does not have
    /// exactly two children, [BasisError::RootNotSet] for unfinished trees.
    /// No partial basis is returned.
    pub fn from_tree(tree: &Tree) -> Result<Self, BasisError> {
        let counts = CountMatrix::from_tree(tree)?;
        let log_ratio = log_ratio_basis(&counts);
        let simplex = clr_inv(&log_ratio);
        let leaves = column_order(tree);
        debug_assert_eq!(leaves.len(), counts.num_leaves());

        debug!(
            "built basis with {} balances over {} leaves",
            counts.num_balances(),
            counts.num_leaves()
        );

        Ok(Self {
            simplex,
            log_ratio,
            nodes: counts.into_nodes(),
            leaves,
        })
    }

    /// Basis in simplex form; every row is strictly positive and sums to 1.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.simplex
    }

    /// Basis in log-ratio form; every row sums to 0 and rows are orthonormal.
    pub fn log_ratio(&self) -> &Array2<f64> {
        &self.log_ratio
    }

    /// Internal vertex of every row, in level order.
    pub fn nodes(&self) -> &[VertexIndex] {
        &self.nodes
    }

    /// Leaf of every column.
    pub fn leaves(&self) -> &[VertexIndex] {
        &self.leaves
    }

    /// Labels of the leaves in column order.
    ///
    /// Unnamed leaves (e.g. `(,b);`) have the empty label `""`.
    /// `tree` must be the tree this basis was built from; for any other tree
    /// the labels do not describe the columns.
    ///
    /// # Panics
    /// Panics if a leaf index is out of bounds for `tree`.
    pub fn leaf_labels<'a>(&self, tree: &'a Tree) -> Vec<&'a str> {
        self.leaves
            .iter()
            .map(|&leaf| tree[leaf].label().unwrap_or_default())
            .collect()
    }

    /// Number of balances (rows).
    pub fn num_balances(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves (columns).
    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Consumes the basis and returns the simplex matrix with its row vertices.
    pub fn into_parts(self) -> (Array2<f64>, Vec<VertexIndex>) {
        (self.simplex, self.nodes)
    }
}

/// Computes the orthonormal simplex basis of a strictly bifurcating tree.
///
/// Convenience wrapper around [Basis::from_tree], returning the basis matrix
/// (one row per internal vertex in level order, one column per leaf in
/// [column order](counts::column_order)) and the internal vertex of each row.
///
/// # Example
/// ```
/// use phylobasis::{parse_newick_str, phylogenetic_basis};
///
/// let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
/// let (basis, nodes) = phylogenetic_basis(&tree).unwrap();
/// assert_eq!(basis.nrows(), 2);
/// assert_eq!(tree[nodes[1]].label(), Some("a"));
/// ```
pub fn phylogenetic_basis(tree: &Tree) -> Result<(Array2<f64>, Vec<VertexIndex>), BasisError> {
    Basis::from_tree(tree).map(Basis::into_parts)
}
