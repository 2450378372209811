//! Provides the arena-based tree representation.
//!
//! Provides core data structures for representing rooted trees:
//! * [Tree] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * Non-recursive traversal iterators (post-order, pre-order, level order, leaves)

use crate::model::vertex::{BranchLength, Vertex};
use std::collections::VecDeque;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
///   (e.g. leaves must not be first `n` indices)
/// - Children are ordered; `children[0]` is the left child. For a single-leaf
///   tree the root is that leaf.
/// - Arity is not restricted, so non-bifurcating input can be represented
///   and rejected by consumers such as [Basis](crate::basis::Basis).
///
/// # Construction
/// To construct a tree, specify its size based on the number of leaves,
/// then add vertices one by one bottom-up and finish with
/// [`add_root`](Self::add_root) (or [`set_root`](Self::set_root) for a
/// single leaf). Test validity with [`Tree::is_valid()`].
///
/// # Example
/// ```
/// use phylobasis::model::Tree;
///
/// // ((b,c)a,d)root;
/// let mut tree = Tree::new(3);
/// let b = tree.add_leaf("b".to_string(), None);
/// let c = tree.add_leaf("c".to_string(), None);
/// let a = tree.add_internal(vec![b, c], Some("a".to_string()), None);
/// let d = tree.add_leaf("d".to_string(), None);
/// tree.add_root(vec![a, d], Some("root".to_string()), None);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.num_internal(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// ============================================================================
// New, Construction (pub)
// ============================================================================
impl Tree {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// The capacity is only a hint; trees with more vertices can still be built.
    ///
    /// # Arguments
    /// `num_leaves` - expected number of leaves of the new tree
    pub fn new(num_leaves: usize) -> Self {
        let capacity = (2 * num_leaves).saturating_sub(1);
        Tree {
            vertices: Vec::with_capacity(capacity),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `label` - Label of the leaf
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    pub fn add_leaf(&mut self, label: String, branch_length: Option<BranchLength>) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, label, branch_length));
        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices, left first; parents of children get set
    /// * `label` - Optional name of the vertex
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices.push(Vertex::new_internal(
            index,
            children,
            label,
            branch_length,
        ));

        index
    }

    /// Adds an internal root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices, left first
    /// * `label` - Optional name of the root
    /// * `branch_length` - Optional length of incoming edge (rare, but allowed in Newick)
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.add_internal(children, label, branch_length);
        self.root_index = index;
        index
    }

    /// Marks an existing vertex as root, e.g. the only leaf of a single-leaf tree.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_root(&mut self, index: VertexIndex) {
        assert!(index < self.vertices.len(), "Root index {index} out of bounds");
        self.root_index = index;
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl Tree {
    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (root included) in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether every internal vertex has exactly two children.
    pub fn is_bifurcating(&self) -> bool {
        self.vertices
            .iter()
            .filter(|v| v.is_internal())
            .all(|v| v.num_children() == 2)
    }

    /// Returns the index of the first leaf (in arena order) with the given label.
    pub fn find_leaf(&self, label: &str) -> Option<VertexIndex> {
        self.vertices
            .iter()
            .find(|v| v.is_leaf() && v.label() == Some(label))
            .map(Vertex::index)
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set and valid, root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All non-root vertices have a parent that lists them as child
    /// - All vertices are reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.vertices.len() {
            return false;
        }

        if self.root().has_parent() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Check children point back to this vertex as parent
            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            // Check parent references
            if index != self.root_index {
                match vertex.parent() {
                    None => return false,
                    Some(parent) => {
                        if parent >= self.vertices.len()
                            || !self.vertices[parent].children().contains(&index)
                        {
                            return false;
                        }
                    }
                }
            }
        }

        // Every vertex must hang below the root
        self.pre_order_iter().count() == self.vertices.len()
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for aggregating data from leaves upward.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children,
    /// children from left to right.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the tree in level order (breadth-first, root first).
    ///
    /// Within a level, vertices appear in the order of their parents, and
    /// siblings in child order.
    ///
    /// # Example
    /// ```
    /// use phylobasis::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((b,c)a,d)root;").unwrap();
    /// let labels: Vec<_> = tree
    ///     .level_order_iter()
    ///     .map(|v| v.label().unwrap_or_default())
    ///     .collect();
    /// assert_eq!(labels, vec!["root", "a", "d", "b", "c"]);
    /// ```
    pub fn level_order_iter(&self) -> LevelOrderIter<'_> {
        LevelOrderIter::new(self)
    }

    /// Returns an iterator over the leaves from left to right (tip order).
    pub fn leaves_iter(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.pre_order_iter().filter(|v| v.is_leaf())
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));

            // Push children in reverse, so left-most is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children in reverse, so left-most is processed first
        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}

/// Iterator for level-order traversal (breadth-first, root first).
///
/// Uses a queue; each vertex is visited after all vertices of smaller depth.
pub struct LevelOrderIter<'a> {
    tree: &'a Tree,
    queue: VecDeque<VertexIndex>,
}

impl<'a> LevelOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut queue = VecDeque::with_capacity(tree.num_vertices());
        if tree.is_root_set() {
            queue.push_back(tree.root_index);
        }
        LevelOrderIter { tree, queue }
    }
}

impl<'a> Iterator for LevelOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let vertex = &self.tree[index];
        self.queue.extend(vertex.children());
        Some(vertex)
    }
}
