//! Structural counts of the two-way leaf split at every internal vertex.
//!
//! Two passes over a level-order arrangement of the tree:
//! 1. bottom-up (reverse level order): leaf counts below every vertex,
//!    failing on any internal vertex without exactly two children;
//! 2. top-down (level order): how many basis columns precede (`leading`)
//!    and follow (`trailing`) the leaves of each internal vertex.
//!
//! Both passes produce plain arrays indexed by [VertexIndex]; no per-vertex
//! state is shared or mutated across passes.
//!
//! # Column layout
//! Within the columns of a vertex, the leaves of its right child come first,
//! then those of its left child. Over the whole tree the columns are thus the
//! leaves in reverse left-to-right order; see [column_order].

use crate::basis::BasisError;
use crate::model::{Tree, Vertex, VertexIndex};
use log::trace;

// =#========================================================================#=
// SPLIT COUNTS
// =#========================================================================$=
/// Leaf counts describing the split at one internal vertex.
///
/// For every internal vertex `leading + left + right + trailing` equals the
/// number of leaves of the tree; the root has `leading = trailing = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitCounts {
    /// Leaves below this vertex (`left + right`)
    pub tips: usize,
    /// Leaves below the left child (`children[0]`)
    pub left: usize,
    /// Leaves below the right child (`children[1]`)
    pub right: usize,
    /// Columns before the leaves of this vertex
    pub leading: usize,
    /// Columns after the leaves of this vertex
    pub trailing: usize,
}

// =#========================================================================#=
// COUNT MATRIX
// =#========================================================================$=
/// Split counts of all internal vertices, in level order.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    nodes: Vec<VertexIndex>,
    splits: Vec<SplitCounts>,
    num_leaves: usize,
}

impl CountMatrix {
    /// Computes the split counts of every internal vertex of `tree`.
    ///
    /// # Errors
    /// * [BasisError::RootNotSet] if the tree has not been completed
    /// * [BasisError::NotBifurcating] for the first internal vertex (in reverse
    ///   level order) that does not have exactly two children
    ///
    /// # Example
    /// ```
    /// use phylobasis::basis::counts::{CountMatrix, SplitCounts};
    /// use phylobasis::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
    /// let counts = CountMatrix::from_tree(&tree).unwrap();
    /// assert_eq!(counts.num_leaves(), 3);
    /// assert_eq!(
    ///     counts.splits()[0],
    ///     SplitCounts { tips: 3, left: 2, right: 1, leading: 0, trailing: 0 }
    /// );
    /// ```
    pub fn from_tree(tree: &Tree) -> Result<Self, BasisError> {
        if !tree.is_root_set() {
            return Err(BasisError::RootNotSet);
        }

        let order: Vec<VertexIndex> = tree.level_order_iter().map(Vertex::index).collect();
        let tips = tip_counts(tree, &order)?;
        let offsets = offsets(tree, &order, &tips);
        let num_leaves = tips[tree.root_index()];

        let mut nodes = Vec::with_capacity(num_leaves.saturating_sub(1));
        let mut splits = Vec::with_capacity(num_leaves.saturating_sub(1));
        for &index in &order {
            let Some((left, right)) = tree[index].bifurcation() else {
                continue;
            };
            let (leading, trailing) = offsets[index];
            let split = SplitCounts {
                tips: tips[index],
                left: tips[left],
                right: tips[right],
                leading,
                trailing,
            };
            debug_assert_eq!(
                split.leading + split.left + split.right + split.trailing,
                num_leaves
            );
            trace!("vertex {index}: {split:?}");
            nodes.push(index);
            splits.push(split);
        }

        Ok(Self {
            nodes,
            splits,
            num_leaves,
        })
    }

    /// Internal vertices in level order (root first).
    pub fn nodes(&self) -> &[VertexIndex] {
        &self.nodes
    }

    /// Split counts parallel to [nodes](Self::nodes).
    pub fn splits(&self) -> &[SplitCounts] {
        &self.splits
    }

    /// Number of leaves of the tree, i.e. number of basis columns.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Number of internal vertices, i.e. number of basis rows.
    pub fn num_balances(&self) -> usize {
        self.nodes.len()
    }

    /// Consumes the matrix and returns the internal vertices in level order.
    pub fn into_nodes(self) -> Vec<VertexIndex> {
        self.nodes
    }
}

/// Bottom-up pass: number of leaves below every vertex, indexed by [VertexIndex].
fn tip_counts(tree: &Tree, order: &[VertexIndex]) -> Result<Vec<usize>, BasisError> {
    let mut tips = vec![0; tree.num_vertices()];
    for &index in order.iter().rev() {
        let vertex = &tree[index];
        tips[index] = if vertex.is_leaf() {
            1
        } else {
            let (left, right) = vertex
                .bifurcation()
                .ok_or(BasisError::NotBifurcating {
                    vertex: index,
                    num_children: vertex.num_children(),
                })?;
            tips[left] + tips[right]
        };
    }
    Ok(tips)
}

/// Top-down pass: `(leading, trailing)` column offsets, indexed by [VertexIndex].
///
/// A left child is preceded by its parent's right subtree, a right child is
/// followed by its parent's left subtree. Leaves are skipped.
fn offsets(tree: &Tree, order: &[VertexIndex], tips: &[usize]) -> Vec<(usize, usize)> {
    let mut offsets = vec![(0, 0); tree.num_vertices()];
    for &index in order {
        let vertex = &tree[index];
        if vertex.is_leaf() {
            continue;
        }
        let Some(parent) = vertex.parent() else {
            continue; // root
        };
        let Some((parent_left, parent_right)) = tree[parent].bifurcation() else {
            continue;
        };

        let (parent_leading, parent_trailing) = offsets[parent];
        offsets[index] = if index == parent_left {
            (parent_leading + tips[parent_right], parent_trailing)
        } else {
            (parent_leading, parent_trailing + tips[parent_left])
        };
    }
    offsets
}

/// Returns the leaves in basis column order.
///
/// Columns run over the leaves in reverse left-to-right order: for
/// `((b,c)a,d)root;` the order is `d, c, b`.
pub fn column_order(tree: &Tree) -> Vec<VertexIndex> {
    let mut leaves: Vec<VertexIndex> = tree.leaves_iter().map(Vertex::index).collect();
    leaves.reverse();
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    #[test]
    fn test_counts_of_worked_example() {
        let tree = parse_str("((b,c)a,d)root;").unwrap();
        let counts = CountMatrix::from_tree(&tree).unwrap();

        assert_eq!(counts.num_balances(), 2);
        assert_eq!(tree[counts.nodes()[0]].label(), Some("root"));
        assert_eq!(tree[counts.nodes()[1]].label(), Some("a"));
        assert_eq!(
            counts.splits()[1],
            SplitCounts {
                tips: 2,
                left: 1,
                right: 1,
                leading: 1,
                trailing: 0
            }
        );
    }

    #[test]
    fn test_right_child_offsets() {
        // Internal vertex as right child: followed by its parent's left subtree
        let tree = parse_str("(d,(b,c)a)root;").unwrap();
        let counts = CountMatrix::from_tree(&tree).unwrap();
        let a = counts.splits()[1];
        assert_eq!((a.leading, a.trailing), (0, 1));
    }

    #[test]
    fn test_offsets_partition_leaves() {
        let tree = parse_str("(((a,b),(c,(d,e))),((f,g),h));").unwrap();
        let counts = CountMatrix::from_tree(&tree).unwrap();
        assert_eq!(counts.num_balances(), 7);
        for split in counts.splits() {
            assert_eq!(split.tips, split.left + split.right);
            assert_eq!(
                split.leading + split.left + split.right + split.trailing,
                8
            );
        }
    }

    #[test]
    fn test_single_leaf_has_no_splits() {
        let tree = parse_str("a;").unwrap();
        let counts = CountMatrix::from_tree(&tree).unwrap();
        assert_eq!(counts.num_balances(), 0);
        assert_eq!(counts.num_leaves(), 1);
    }

    #[test]
    fn test_multifurcation_rejected() {
        let tree = parse_str("((a,b,c)x,d);").unwrap();
        let err = CountMatrix::from_tree(&tree).unwrap_err();
        assert!(matches!(
            err,
            BasisError::NotBifurcating {
                num_children: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_column_order_is_reversed_tip_order() {
        let tree = parse_str("((b,c)a,d)root;").unwrap();
        let labels: Vec<_> = column_order(&tree)
            .into_iter()
            .map(|i| tree[i].label().unwrap())
            .collect();
        assert_eq!(labels, vec!["d", "c", "b"]);
    }
}
