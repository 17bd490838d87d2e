//! Pre-order traversal of expression trees

use crate::expression::{Expr, ExprNode, NodeTest, Step, StepKind};

/// Callbacks invoked by [`walk`]. All hooks default to doing nothing, so
/// implementors only override what they care about.
pub trait Visitor {
    /// Called for every expression node, parents before children.
    fn visit_expression(&mut self, _expr: &ExprNode) {}

    /// Called for every location step.
    fn visit_step(&mut self, _step: &Step) {}

    /// Called for every node test.
    fn visit_node_test(&mut self, _test: &NodeTest, _step: &Step) {}

    /// Called for every predicate expression, before its subtree.
    fn visit_predicate(&mut self, _predicate: &ExprNode) {}
}

/// Walk an expression tree in pre-order, invoking the visitor's hooks.
///
/// Step predicates and binding sequences are visited as ordinary child
/// expressions; predicates additionally get `visit_predicate`.
pub fn walk<V: Visitor>(visitor: &mut V, node: &ExprNode) {
    visitor.visit_expression(node);
    match &node.expr {
        Expr::Path(path) => {
            for step in &path.steps {
                walk_step(visitor, step);
            }
        }
        Expr::Filter {
            primary,
            predicates,
        } => {
            walk(visitor, primary);
            for predicate in predicates {
                visitor.visit_predicate(predicate);
                walk(visitor, predicate);
            }
        }
        _ => {
            for child in node.child_expressions() {
                walk(visitor, child);
            }
        }
    }
}

fn walk_step<V: Visitor>(visitor: &mut V, step: &Step) {
    visitor.visit_step(step);
    match &step.kind {
        StepKind::Axis { test, .. } => visitor.visit_node_test(test, step),
        StepKind::Primary(primary) => walk(visitor, primary),
        StepKind::Current | StepKind::Parent => {}
    }
    for predicate in &step.predicates {
        visitor.visit_predicate(predicate);
        walk(visitor, predicate);
    }
}
