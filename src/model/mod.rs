//! Data model for rooted trees over the components of a composition.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either `Internal` or `Leaf`, referenced by
//! [VertexIndex]. Parent/child relations are index pairs, never references.
//!
//! Children are ordered and the order is part of the contract: `children[0]`
//! is the left child, `children[1]` the right child. The sign convention of
//! every balance in a [Basis](crate::basis::Basis) depends on it.
//!
//! # Building trees
//! Trees are typically constructed by the [Newick parser](crate::newick),
//! but can also be assembled bottom-up via [`Tree::add_leaf`],
//! [`Tree::add_internal`] and [`Tree::add_root`].

pub mod tree;
pub mod vertex;

pub use tree::Tree;
pub use tree::VertexIndex;
pub use vertex::BranchLength;
pub use vertex::Vertex;
