use phylobasis::newick::{NewickParser, parse_file, parse_str};
use phylobasis::parser::ParsingErrorType;
use phylobasis::parser::byte_parser::ByteParser;
use std::path::Path;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5;";
    let mut parser = ByteParser::for_str(newick);
    let tree = NewickParser::new()
        .with_num_leaves(3)
        .parse_str(&mut parser)
        .unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let root_index = root.index();
    let (root_left, root_right) = root.bifurcation().unwrap();
    assert_eq!(*root.branch_length().unwrap(), 0.5);

    // - Internal vertex has children (A, B)
    let internal = tree.vertex(root_left);
    assert!(internal.is_internal());
    assert_eq!(*internal.branch_length().unwrap(), 3.0);
    let (internal_left, internal_right) = internal.bifurcation().unwrap();

    // - Three leaves, left to right
    let leaf_a = tree.vertex(internal_left);
    let leaf_b = tree.vertex(internal_right);
    let leaf_c = tree.vertex(root_right);
    assert_eq!(leaf_a.label(), Some("A"));
    assert_eq!(leaf_b.label(), Some("B"));
    assert_eq!(leaf_c.label(), Some("C"));
    assert_eq!(*leaf_b.branch_length().unwrap(), 2.0);

    // - Parent relationships
    assert_eq!(internal.parent(), Some(root_index));
    assert_eq!(leaf_a.parent(), Some(root_left));
    assert_eq!(leaf_b.parent(), Some(root_left));
    assert_eq!(leaf_c.parent(), Some(root_index));
    assert!(!root.has_parent());
}

#[test]
fn test_internal_labels() {
    let tree = parse_str("((b,c)a,d)root;").unwrap();

    assert_eq!(tree.root().label(), Some("root"));
    let (a, d) = tree.root().bifurcation().unwrap();
    assert_eq!(tree[a].label(), Some("a"));
    assert!(tree[a].is_internal());
    assert_eq!(tree[d].label(), Some("d"));
    assert!(tree[d].is_leaf());
}

#[test]
fn test_unlabelled_internal_vertices() {
    let tree = parse_str("((b,c),d);").unwrap();
    assert_eq!(tree.root().label(), None);
    assert!(
        tree.post_order_iter()
            .filter(|v| v.is_internal())
            .all(|v| v.label().is_none())
    );
}

#[test]
fn test_tree_with_quoted_labels() {
    let newick = "(('Taxon one':1.5,'Second''s taxon':2.5)'inner (x)':3.0,'3rd Taxon':4.0):0.0;";
    let tree = parse_str(newick).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert!(tree.find_leaf("Taxon one").is_some());
    assert!(tree.find_leaf("Second's taxon").is_some());
    assert!(tree.find_leaf("3rd Taxon").is_some());

    let (inner, _) = tree.root().bifurcation().unwrap();
    assert_eq!(tree[inner].label(), Some("inner (x)"));
}

#[test]
fn test_tree_with_scientific_notation() {
    let newick = "((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10):0.0;";
    let tree = parse_str(newick).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    let a = tree.find_leaf("A").unwrap();
    assert_eq!(*tree[a].branch_length().unwrap(), 1e-5);
}

#[test]
fn test_optional_branch_length() {
    let tree = parse_str("((A:1.0,B),C:4.0);").unwrap();
    let b = tree.find_leaf("B").unwrap();
    assert!(!tree[b].has_branch_length());
    assert!(!tree.root().has_branch_length());
}

#[test]
fn test_multifurcation_is_parsed() {
    let tree = parse_str("(A,B,(C,D,E)x);").unwrap();

    assert_eq!(tree.num_leaves(), 5);
    assert_eq!(tree.root().num_children(), 3);
    assert!(tree.root().bifurcation().is_none());
    assert!(!tree.is_bifurcating());
    assert!(tree.is_valid());
}

#[test]
fn test_unary_vertex_is_parsed() {
    let tree = parse_str("((A)x,B);").unwrap();
    let (x, _) = tree.root().bifurcation().unwrap();
    assert_eq!(tree[x].num_children(), 1);
    assert!(!tree.is_bifurcating());
}

#[test]
fn test_single_leaf_tree() {
    let tree = parse_str("A;").unwrap();
    assert_eq!(tree.num_leaves(), 1);
    assert_eq!(tree.num_internal(), 0);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().label(), Some("A"));
}

#[test]
fn test_newick_with_comments() {
    let newick = "[A tree of] ([Shags!] C:[King Commentoran] 2.2, (A[Great Commentoran]:0.33, B[Pied Commentoran]:0.33):1.87):0.0[The end.];";
    let tree = parse_str(newick);

    if tree.is_err() {
        eprintln!(
            "Error parsing tree with comments: {:?}",
            tree.as_ref().err()
        );
    }

    assert_eq!(tree.unwrap().num_leaves(), 3);
}

#[test]
fn test_deeply_nested_caterpillar() {
    // ((((t0,t1),t2),t3),...,t{n-1}); nests n - 1 levels deep
    let n = 50_000;
    let mut newick = "(".repeat(n - 1);
    newick.push_str("t0,t1)");
    for i in 2..n {
        newick.push_str(&format!(",t{i})"));
    }
    newick.push(';');

    let tree = parse_str(&newick).unwrap();
    assert_eq!(tree.num_leaves(), n);
    assert_eq!(tree.num_internal(), n - 1);
    assert!(tree.is_valid());
    assert!(tree.is_bifurcating());
    assert_eq!(tree.pre_order_iter().count(), tree.num_vertices());

    let (left, right) = tree.root().bifurcation().unwrap();
    assert!(tree[left].is_internal());
    assert_eq!(tree[right].label(), Some(format!("t{}", n - 1).as_str()));
}

// --- TESTS DEALING WITH CORRUPT NEWICK STRINGS ---
#[test]
fn test_missing_semicolon() {
    let err = parse_str("((A:1.0,B:2.0):3.0,C:4.0):0.5").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
}

#[test]
fn test_missing_comma() {
    assert!(parse_str("((A:1.0 B:2.0):3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_unmatched_parentheses() {
    assert!(parse_str("((A:1.0,B:2.0:3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_invalid_branch_length() {
    assert!(parse_str("((A:1.0,B:abc):3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_negative_branch_length() {
    let err = parse_str("((A:1.0,B:-2.0):3.0,C:4.0);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
}

#[test]
fn test_unclosed_comment() {
    let err = parse_str("((A,B)[never closed,C);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
}

#[test]
fn test_unclosed_quote() {
    let err = parse_str("(('A,B),C);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
}

#[test]
fn test_truncated_input() {
    let err = parse_str("((A,B),").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
}

// --- TESTS PARSING MULTIPLE TREES ---
#[test]
fn test_parse_all() {
    let parser = ByteParser::for_str("(A,B);\n[between] (C,(D,E));\n");
    let trees = NewickParser::new().parse_all(parser).unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].num_leaves(), 2);
    assert_eq!(trees[1].num_leaves(), 3);
}

#[test]
fn test_iterator_stops_after_error() {
    let parser = ByteParser::for_str("(A,B); (C,D; (E,F);");
    let results: Vec<_> = NewickParser::new().into_iter(parser).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

// --- TESTS PARSING WHOLE FILE ---
#[test]
fn test_parsing_newick_file() {
    let path = Path::new("tests")
        .join("fixtures")
        .join("newick_t3_n5.nwk");
    let trees = parse_file(path).unwrap();

    assert_eq!(trees.len(), 3);
    for tree in &trees {
        assert_eq!(tree.num_leaves(), 5);
        assert!(tree.is_valid());
        assert!(tree.is_bifurcating());
    }
    assert_eq!(trees[1].root().label(), Some("root"));
}

#[test]
fn test_parsing_missing_file() {
    let err = parse_file("tests/fixtures/does_not_exist.nwk").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}
