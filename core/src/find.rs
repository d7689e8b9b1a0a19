//! First-match search over expression trees.
//!
//! Searches run in pre-order: a node is tested before any of its children,
//! and siblings are tested in the order [`walk_children`] yields them.

use crate::view::{View, to_view};
use crate::visitor::walk_children;
use core::ops::ControlFlow;
use deconstruct_tree::Expr;

/// Return the first node for which `pred` holds, or `None`.
///
/// # Example
///
/// ```
/// use deconstruct_core::find;
/// use deconstruct_tree::{Expr, NodeKind, Type};
///
/// let x = Expr::parameter(Type::i32(), "x");
/// let e = Expr::add(x, Expr::constant(10));
///
/// let ten = find(&e, |e| e.kind() == NodeKind::Constant).unwrap();
/// assert_eq!(ten.to_string(), "10");
/// ```
pub fn find(expr: &Expr, mut pred: impl FnMut(&Expr) -> bool) -> Option<Expr> {
    match search(expr, &mut pred) {
        ControlFlow::Break(found) => Some(found),
        ControlFlow::Continue(()) => None,
    }
}

fn search<F>(expr: &Expr, pred: &mut F) -> ControlFlow<Expr>
where
    F: FnMut(&Expr) -> bool,
{
    if pred(expr) {
        return ControlFlow::Break(expr.clone());
    }
    walk_children(expr, &mut |child: &Expr| search(child, pred))
}

/// [`find`] with each node wrapped in its typed view.
///
/// The matching view is returned as the predicate saw it, so children it
/// already resolved stay cached.
pub fn find_ex(expr: &Expr, mut pred: impl FnMut(&View) -> bool) -> Option<View> {
    let mut found = None;
    find(expr, |e| {
        let view = to_view(e);
        if pred(&view) {
            found = Some(view);
            true
        } else {
            false
        }
    });
    found
}

/// Return the node of `expr` that is the very instance `target`, if any.
pub fn find_node(expr: &Expr, target: &Expr) -> Option<Expr> {
    find(expr, |e| e.ptr_eq(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use deconstruct_tree::{NodeKind, Type, Value};
    use pretty_assertions::assert_eq;

    /// `i => i * 0 + 0 + i + 10 * (i * 0 + 2)`
    fn folding_sample() -> Expr {
        let i = Expr::parameter(Type::i32(), "i");
        let c = Expr::constant;
        let body = Expr::add(
            Expr::add(
                Expr::add(Expr::multiply(i.clone(), c(0)), c(0)),
                i.clone(),
            ),
            Expr::multiply(c(10), Expr::add(Expr::multiply(i.clone(), c(0)), c(2))),
        );
        Expr::lambda(body, [i]).unwrap()
    }

    #[test]
    fn test_find_constant() {
        init_test_logging();
        let f = folding_sample();
        let found = find(&f, |e| {
            e.as_constant()
                .is_some_and(|c| c.value == Value::I32(10))
        })
        .unwrap();
        assert_eq!(found.to_string(), "10");
        assert_eq!(found.kind(), NodeKind::Constant);
    }

    #[test]
    fn test_find_is_pre_order() {
        let f = folding_sample();
        let mut tested = Vec::new();
        let found = find(&f, |e| {
            tested.push(e.kind());
            e.kind() == NodeKind::Multiply
        })
        .unwrap();

        // The outer adds are tested before the leftmost multiply.
        assert_eq!(
            tested,
            [
                NodeKind::Lambda,
                NodeKind::Add,
                NodeKind::Add,
                NodeKind::Add,
                NodeKind::Multiply,
            ]
        );
        assert_eq!(found.to_string(), "(i * 0)");
    }

    #[test]
    fn test_find_without_match() {
        let f = folding_sample();
        assert!(find(&f, |e| e.kind() == NodeKind::Call).is_none());
        assert!(find_ex(&f, |v| matches!(v, View::Call(_))).is_none());
    }

    #[test]
    fn test_find_ex_returns_the_matching_view() {
        let f = folding_sample();
        let found = find_ex(&f, |v| match v {
            View::Multiply(m) => matches!(m.left(), View::Constant(_)),
            _ => false,
        })
        .unwrap();
        assert_eq!(found.to_string(), "(10 * ((i * 0) + 2))");
        let View::Multiply(m) = found else {
            panic!("expected a multiply view");
        };
        assert_eq!(m.left().to_string(), "10");
    }

    #[test]
    fn test_find_node_by_identity() {
        let i = Expr::parameter(Type::i32(), "i");
        let one = Expr::constant(1);
        let twin = Expr::constant(1);
        let e = Expr::add(i, one.clone());

        assert!(find_node(&e, &one).is_some_and(|n| n.ptr_eq(&one)));
        // An equal-looking but distinct node is not found.
        assert!(find_node(&e, &twin).is_none());
        assert!(find_node(&e, &e).is_some());
    }
}
