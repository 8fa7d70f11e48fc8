//! Integration tests for the uniform description aggregation.

use rstest::rstest;

use treereg::util::testing::init_test_setup;
use treereg::{ComponentArena, HierarchyError, NodeData};

#[test]
fn given_single_leaf_when_describing_then_its_label_is_returned() {
    init_test_setup();
    let mut arena = ComponentArena::new();
    let leaf = arena.insert_leaf(NodeData::new("Leaf"));

    assert_eq!(arena.describe(leaf).unwrap(), "Leaf");
    // Describing is read-only, so a second call yields the same text.
    assert_eq!(arena.describe(leaf).unwrap(), "Leaf");
}

#[test]
fn given_three_children_when_describing_then_labels_join_in_attachment_order() {
    let mut arena = ComponentArena::new();
    let branch = arena.insert_composite(NodeData::new("branch"));
    for label in ["first", "second", "third"] {
        let leaf = arena.insert_leaf(NodeData::new(label));
        arena.attach(branch, leaf).unwrap();
    }

    assert_eq!(
        arena.describe(branch).unwrap(),
        "Branch(first+second+third)"
    );
}

#[test]
fn given_nested_composites_when_describing_then_subtrees_aggregate_recursively() {
    // Arrange: root -> [branchA -> [Leaf, Leaf], branchB -> [Leaf]]
    let mut arena = ComponentArena::new();
    let root = arena.insert_composite(NodeData::new("root"));
    let branch_a = arena.insert_composite(NodeData::new("branchA"));
    let branch_b = arena.insert_composite(NodeData::new("branchB"));
    let leaves: Vec<_> = (0..3)
        .map(|_| arena.insert_leaf(NodeData::new("Leaf")))
        .collect();
    arena.attach(branch_a, leaves[0]).unwrap();
    arena.attach(branch_a, leaves[1]).unwrap();
    arena.attach(branch_b, leaves[2]).unwrap();
    arena.attach(root, branch_a).unwrap();
    arena.attach(root, branch_b).unwrap();

    // Act
    let description = arena.describe(root).unwrap();

    // Assert
    assert_eq!(description, "Branch(Branch(Leaf+Leaf)+Branch(Leaf))");
}

#[test]
fn given_childless_composite_when_describing_then_wrapper_is_empty() {
    let mut arena = ComponentArena::new();
    let branch = arena.insert_composite(NodeData::new("branch"));

    assert_eq!(arena.describe(branch).unwrap(), "Branch()");
}

#[test]
fn given_deep_chain_when_describing_then_wrappers_nest_once_per_level() {
    let mut arena = ComponentArena::new();
    let outer = arena.insert_composite(NodeData::new("outer"));
    let middle = arena.insert_composite(NodeData::new("middle"));
    let inner = arena.insert_composite(NodeData::new("inner"));
    let leaf = arena.insert_leaf(NodeData::new("L"));
    arena.attach(inner, leaf).unwrap();
    arena.attach(middle, inner).unwrap();
    arena.attach(outer, middle).unwrap();

    assert_eq!(arena.describe(outer).unwrap(), "Branch(Branch(Branch(L)))");
}

#[test]
fn given_detached_child_when_describing_then_it_no_longer_appears() {
    let mut arena = ComponentArena::new();
    let branch = arena.insert_composite(NodeData::new("branch"));
    let first = arena.insert_leaf(NodeData::new("a"));
    let second = arena.insert_leaf(NodeData::new("b"));
    arena.attach(branch, first).unwrap();
    arena.attach(branch, second).unwrap();
    assert_eq!(arena.describe(branch).unwrap(), "Branch(a+b)");

    arena.detach(branch, first).unwrap();

    assert_eq!(arena.describe(branch).unwrap(), "Branch(b)");
    // The detached leaf still describes itself on its own.
    assert_eq!(arena.describe(first).unwrap(), "a");
}

#[test]
fn given_stale_handle_when_describing_then_node_not_found_error() {
    let mut arena = ComponentArena::new();
    let leaf = arena.insert_leaf(NodeData::new("gone"));
    arena.remove_subtree(leaf).unwrap();

    let result = arena.describe(leaf);

    assert!(matches!(result, Err(HierarchyError::NodeNotFound(_))));
}

#[rstest]
#[case::single(&["solo"], "Branch(solo)")]
#[case::pair(&["a", "b"], "Branch(a+b)")]
#[case::many(&["w", "x", "y", "z"], "Branch(w+x+y+z)")]
fn given_leaf_labels_when_describing_composite_then_separator_is_fixed(
    #[case] labels: &[&str],
    #[case] expected: &str,
) {
    let mut arena = ComponentArena::new();
    let branch = arena.insert_composite(NodeData::new("branch"));
    for label in labels {
        let leaf = arena.insert_leaf(NodeData::new(*label));
        arena.attach(branch, leaf).unwrap();
    }

    assert_eq!(arena.describe(branch).unwrap(), expected);
}
