//! Vertex module for rooted tree representation.

use crate::model::tree::VertexIndex;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a rooted tree.
///
/// A vertex can be either:
/// - **Leaf**: Has no children, has a label and might have a branch length
/// - **Internal**: Has children (ordered), might have a label and a branch length
///
/// The root is whichever vertex the [Tree](crate::model::Tree) marks as root;
/// once construction is finished it is the only vertex without a parent.
///
/// # Invariants
/// - `index` is index in arena
/// - `branch_length` is non-negative (enforced); might not be set
/// - `parent` is `None` for the root and, during construction, for vertices
///   not yet attached
/// - `children` keeps input order: `children[0]` is the left child and
///   `children[1]` the right child. Any other arity is representable so that
///   consumers requiring bifurcation can reject it explicitly.
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Internal vertex (has children, optional label)
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex, if any
        parent: Option<VertexIndex>,
        /// Indices of the child vertices, in input order
        children: Vec<VertexIndex>,
        /// Optional name of this vertex
        label: Option<String>,
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex (has label, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex, if any
        parent: Option<VertexIndex>,
        /// Label of this leaf (taxon name)
        label: String,
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
}

impl Vertex {
    /// Creates a new internal vertex without parent.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Child indices, left first
    /// * `label` - Optional name of the vertex
    /// * `branch_length` - Distance to parent vertex (non-negative)
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: None,
            children,
            label,
            branch_length,
        }
    }

    /// Creates a new leaf vertex without parent.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `label` - Label of this leaf
    /// * `branch_length` - Distance to parent vertex (non-negative)
    pub fn new_leaf(index: VertexIndex, label: String, branch_length: Option<BranchLength>) -> Self {
        Vertex::Leaf {
            index,
            parent: None,
            label,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Internal { index, .. } | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns the label of this vertex, if it has one.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Internal { label, .. } => label.as_deref(),
            Vertex::Leaf { label, .. } => Some(label),
        }
    }

    /// Returns the branch length to the parent, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Internal { branch_length, .. } | Vertex::Leaf { branch_length, .. } => {
                *branch_length
            }
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length().is_some()
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex (including an internal root).
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns the children of this vertex; empty for leaves.
    pub fn children(&self) -> &[VertexIndex] {
        match self {
            Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Returns the number of children of this vertex.
    pub fn num_children(&self) -> usize {
        self.children().len()
    }

    /// Returns the `(left, right)` children if this vertex has exactly two, else `None`.
    pub fn bifurcation(&self) -> Option<(VertexIndex, VertexIndex)> {
        match self.children() {
            [left, right] => Some((*left, *right)),
            _ => None,
        }
    }

    /// Returns the index of the parent, if set.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => *parent,
        }
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Sets the parent of this vertex.
    pub(crate) fn set_parent(&mut self, new_parent: VertexIndex) {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                *parent = Some(new_parent)
            }
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(
            length >= 0.0,
            "Branch length must be non-negative, got {}",
            length
        );
        assert!(
            length.is_finite(),
            "Branch length must be finite, got {}",
            length
        );
        BranchLength(length)
    }

    /// Creates a new branch length, returning `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
