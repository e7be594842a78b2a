//! Unit tests for the syntax forest.

use crate::ast::ast::{NodeKind, SyntaxForest};

#[test]
fn test_alloc_and_link() {
    let mut forest = SyntaxForest::new();
    let assign = forest.alloc(NodeKind::Operator, ":=");
    let target = forest.alloc(NodeKind::LValue, "x");
    let value = forest.alloc(NodeKind::RValue, "5");

    forest.set_left(assign, target);
    forest.set_right(assign, value);
    forest.push_root(assign);

    assert_eq!(forest.roots(), &[assign]);
    assert_eq!(forest.node(assign).left, Some(target));
    assert_eq!(forest.node(assign).right, Some(value));
    assert_eq!(forest.node(target).parent, Some(assign));
    assert_eq!(forest.node(value).parent, Some(assign));
}

#[test]
fn test_saturation() {
    let mut forest = SyntaxForest::new();
    let op = forest.alloc(NodeKind::Operator, "+");
    let left = forest.alloc(NodeKind::RValue, "a");

    assert!(!forest.is_saturated(op));

    forest.set_left(op, left);
    assert!(!forest.is_saturated(op));

    let right = forest.alloc(NodeKind::RValue, "b");
    forest.set_right(op, right);
    assert!(forest.is_saturated(op));
}

#[test]
fn test_roots_preserve_statement_order() {
    let mut forest = SyntaxForest::new();
    let first = forest.alloc(NodeKind::Read, "a,b");
    let second = forest.alloc(NodeKind::Write, "a");
    forest.push_root(first);
    forest.push_root(second);

    assert_eq!(forest.roots(), &[first, second]);
    assert_eq!(forest.last_root(), Some(second));
}

#[test]
fn test_node_text_can_be_rewritten() {
    let mut forest = SyntaxForest::new();
    let value = forest.alloc(NodeKind::RValue, "5");

    let node = forest.node_mut(value);
    node.kind = NodeKind::Temporary;
    node.text = "$T1".to_string();

    assert_eq!(forest.node(value).kind, NodeKind::Temporary);
    assert_eq!(forest.node(value).text, "$T1");
}
