//! Phylobasis computes orthonormal bases of the Aitchison simplex that follow
//! the splits of a strictly bifurcating tree over the components of a
//! composition, e.g. taxa in a phylogeny.
//!
//! Each internal vertex of the tree splits its leaves into a left and a right
//! group; the log-ratio contrast between these groups (a *balance*) is one
//! coordinate of an isometric log-ratio (ilr) transform. The basis is the
//! foundation for balance-based analysis of compositional data that respects
//! a given hierarchy rather than an arbitrary one.
//!
//! Core functionality provided:
//! - Tree model: [Tree] in the arena pattern, with non-recursive post-order,
//!   pre-order and level-order traversals. See [crate::model].
//! - Newick input: parse single strings or files of trees. See [crate::newick].
//! - Basis: [Basis] and [phylogenetic_basis] build the orthonormal basis in
//!   log-ratio and simplex form. See [crate::basis].
//! - Compositions: closure, clr, clr-inverse, ilr and its inverse, Aitchison
//!   inner product. See [crate::composition].
//! - Balance tests: compare balances of a sample table across groups with a
//!   pluggable significance test. See [crate::balance].
//!
//! Limitations:
//! - Bases exist only for strictly bifurcating trees; other trees are
//!   parsed but rejected with [BasisError::NotBifurcating]
//! - Trees are read, never written
//!
//! # Example
//! ```
//! use phylobasis::{parse_newick_str, phylogenetic_basis};
//!
//! let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
//! let (basis, nodes) = phylogenetic_basis(&tree).unwrap();
//!
//! // One row per internal vertex (level order), one column per leaf
//! assert_eq!(basis.dim(), (2, 3));
//! assert_eq!(tree[nodes[0]].label(), Some("root"));
//! for row in basis.rows() {
//!     assert!((row.sum() - 1.0).abs() < 1e-12);
//! }
//! ```

pub mod balance;
pub mod basis;
pub mod composition;
pub mod model;
pub mod newick;
pub mod parser;

pub use crate::basis::{Basis, BasisError, phylogenetic_basis};
pub use crate::model::Tree;

use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse a file containing a semicolon-separated list of Newick strings
/// using default settings, returning all trees.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Vec<Tree>, ParsingError> {
    newick::parse_file(path)
}
