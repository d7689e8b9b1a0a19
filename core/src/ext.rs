//! Method-call syntax for the engine's entry points.

use crate::equality;
use crate::find;
use crate::options::EqualityOptions;
use crate::transform;
use crate::view::{self, View};
use crate::visitor;
use deconstruct_tree::Expr;

/// Extension methods on [`Expr`].
///
/// Each method forwards to the free function of the same name.
///
/// # Example
///
/// ```
/// use deconstruct_core::{ExprExt, View};
/// use deconstruct_tree::{Expr, NodeKind, Type};
///
/// let x = Expr::parameter(Type::i32(), "x");
/// let e = Expr::add(x.clone(), Expr::constant(1));
///
/// assert!(matches!(e.to_view(), View::Add(_)));
/// assert!(e.find(|e| e.kind() == NodeKind::Constant).is_some());
/// assert!(e.transform(Expr::clone).ptr_eq(&e));
/// ```
pub trait ExprExt {
    fn to_view(&self) -> View;

    fn visit(&self, f: impl FnMut(&Expr));

    fn visit_while(&self, f: impl FnMut(&Expr) -> bool);

    fn visit_ex(&self, f: impl FnMut(&View));

    fn find(&self, pred: impl FnMut(&Expr) -> bool) -> Option<Expr>;

    fn find_ex(&self, pred: impl FnMut(&View) -> bool) -> Option<View>;

    fn find_node(&self, target: &Expr) -> Option<Expr>;

    fn transform(&self, f: impl FnMut(&Expr) -> Expr) -> Expr;

    fn transform_ex<R: Into<Expr>>(&self, f: impl FnMut(View) -> R) -> Expr;

    /// Structural equality with default options.
    fn equals_to(&self, other: &Expr) -> bool;

    fn equals_to_with(&self, other: &Expr, options: &EqualityOptions) -> bool;
}

impl ExprExt for Expr {
    fn to_view(&self) -> View {
        view::to_view(self)
    }

    fn visit(&self, f: impl FnMut(&Expr)) {
        visitor::visit(self, f)
    }

    fn visit_while(&self, f: impl FnMut(&Expr) -> bool) {
        visitor::visit_while(self, f)
    }

    fn visit_ex(&self, f: impl FnMut(&View)) {
        visitor::visit_ex(self, f)
    }

    fn find(&self, pred: impl FnMut(&Expr) -> bool) -> Option<Expr> {
        find::find(self, pred)
    }

    fn find_ex(&self, pred: impl FnMut(&View) -> bool) -> Option<View> {
        find::find_ex(self, pred)
    }

    fn find_node(&self, target: &Expr) -> Option<Expr> {
        find::find_node(self, target)
    }

    fn transform(&self, f: impl FnMut(&Expr) -> Expr) -> Expr {
        transform::transform(self, f)
    }

    fn transform_ex<R: Into<Expr>>(&self, f: impl FnMut(View) -> R) -> Expr {
        transform::transform_ex(self, f)
    }

    fn equals_to(&self, other: &Expr) -> bool {
        equality::equals(self, other)
    }

    fn equals_to_with(&self, other: &Expr, options: &EqualityOptions) -> bool {
        equality::equals_with(self, other, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconstruct_tree::{NodeKind, Type};

    #[test]
    fn test_methods_forward_to_free_functions() {
        let x = Expr::parameter(Type::i32(), "x");
        let e = Expr::multiply(x.clone(), Expr::constant(3));

        let mut kinds = alloc::vec::Vec::new();
        e.visit(|e| kinds.push(e.kind()));
        assert_eq!(kinds, [NodeKind::Parameter, NodeKind::Constant, NodeKind::Multiply]);

        assert!(e.find_node(&x).is_some_and(|found| found.ptr_eq(&x)));
        assert!(e.find_ex(|v| matches!(v, View::Constant(_))).is_some());

        let doubled = e.transform_ex(|v| match v {
            View::Constant(_) => Expr::constant(6),
            other => other.into_expr(),
        });
        assert!(doubled.equals_to(&Expr::multiply(x, Expr::constant(6))));
        assert!(!doubled.equals_to(&e));
    }
}
