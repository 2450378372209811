use phylobasis::model::Tree;
use phylobasis::model::vertex::BranchLength;
use phylobasis::parse_newick_str;

#[test]
fn test_building_tree() {
    let mut tree = Tree::new(3);
    let index_l1 = tree.add_leaf("l1".to_string(), Some(BranchLength::new(1.0)));
    let index_l2 = tree.add_leaf("l2".to_string(), Some(BranchLength::new(1.0)));
    let index_l3 = tree.add_leaf("l3".to_string(), Some(BranchLength::new(0.5)));
    let index_i1 = tree.add_internal(
        vec![index_l1, index_l2],
        None,
        Some(BranchLength::new(1.5)),
    );
    let index_root = tree.add_root(vec![index_l3, index_i1], Some("root".to_string()), None);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());
    assert!(tree.is_bifurcating());

    // Root
    let root = tree.root();
    assert_eq!(root.index(), index_root);
    assert_eq!(tree.root_index(), index_root);
    assert!(!root.has_parent());
    assert_eq!(root.bifurcation(), Some((index_l3, index_i1)));

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.index(), index_l2);
    assert_eq!(l2.label(), Some("l2"));
    assert_eq!(l2.parent(), Some(index_i1));
    assert!(l2.children().is_empty());

    // Internal
    let inti = &tree[index_i1];
    assert!(inti.is_internal());
    assert_eq!(inti.index(), index_i1);
    assert_eq!(inti.branch_length().unwrap(), BranchLength::new(1.5));
    assert_eq!(inti.label(), None);
    assert_eq!(inti.parent(), Some(index_root));
}

#[test]
fn test_unfinished_tree_is_invalid() {
    let mut tree = Tree::new(2);
    let a = tree.add_leaf("a".to_string(), None);
    let b = tree.add_leaf("b".to_string(), None);
    tree.add_internal(vec![a, b], None, None);

    assert!(!tree.is_root_set());
    assert!(!tree.is_valid());
    assert_eq!(tree.post_order_iter().count(), 0);
}

#[test]
fn test_unreachable_vertex_is_invalid() {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf("a".to_string(), None);
    let b = tree.add_leaf("b".to_string(), None);
    tree.add_leaf("stray".to_string(), None);
    tree.add_root(vec![a, b], None, None);

    assert!(!tree.is_valid());
}

#[test]
fn test_single_leaf_root() {
    let mut tree = Tree::new(1);
    let a = tree.add_leaf("a".to_string(), None);
    tree.set_root(a);

    assert!(tree.is_valid());
    assert!(tree.root().is_leaf());
    assert!(tree.is_bifurcating());
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new(2);
    tree.root(); // Should panic
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new(2);
    let _ = &tree[55];
}

// ============= Traversal Tests =============
fn labels<'a>(iter: impl Iterator<Item = &'a phylobasis::model::Vertex>) -> Vec<&'a str> {
    iter.map(|v| v.label().unwrap_or("-")).collect()
}

#[test]
fn test_traversal_orders() {
    let tree = parse_newick_str("((b,c)a,(e,f)d)root;").unwrap();

    assert_eq!(
        labels(tree.level_order_iter()),
        vec!["root", "a", "d", "b", "c", "e", "f"]
    );
    assert_eq!(
        labels(tree.pre_order_iter()),
        vec!["root", "a", "b", "c", "d", "e", "f"]
    );
    assert_eq!(
        labels(tree.post_order_iter()),
        vec!["b", "c", "a", "e", "f", "d", "root"]
    );
    assert_eq!(labels(tree.leaves_iter()), vec!["b", "c", "e", "f"]);
}

#[test]
fn test_level_order_on_caterpillar() {
    let tree = parse_newick_str("(((a,b)x,c)y,d)z;").unwrap();
    assert_eq!(
        labels(tree.level_order_iter()),
        vec!["z", "y", "d", "x", "c", "a", "b"]
    );
}

#[test]
fn test_traversals_visit_multifurcations() {
    let tree = parse_newick_str("(a,b,(c,d,e)x)r;").unwrap();
    assert_eq!(tree.pre_order_iter().count(), tree.num_vertices());
    assert_eq!(tree.level_order_iter().count(), tree.num_vertices());
    assert_eq!(
        labels(tree.post_order_iter()),
        vec!["a", "b", "c", "d", "e", "x", "r"]
    );
}
