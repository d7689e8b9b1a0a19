//! Read-only traversal of expression trees.
//!
//! Every walk in this crate enumerates a node's children through
//! [`walk_children`], so visiting, searching and reconstruction agree on one
//! fixed order per family:
//!
//! - binary: left, conversion, right
//! - call: receiver, arguments
//! - lambda: body, parameters
//! - block: variables, expressions
//! - list init: new expression, then each initializer's arguments
//! - member init: new expression, then bindings depth-first
//! - switch: value, each case's test values and body, default body
//! - try: body, each handler's variable, filter and body, finally, fault
//! - reducible extension: its reduction
//!
//! The remaining families list their children in declaration order.

use crate::view::{View, to_view};
use core::convert::Infallible;
use core::ops::ControlFlow;
use deconstruct_tree::{ElementInit, Expr, ExprData, MemberBinding, MemberBindingData};

/// Call `f` on each direct child of `expr`, stopping at the first `Break`.
///
/// Absent optional children are skipped.
pub fn walk_children<B, F>(expr: &Expr, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Expr) -> ControlFlow<B>,
{
    match expr.data() {
        ExprData::Binary(b) => {
            f(&b.left)?;
            each_opt(b.conversion.as_ref(), f)?;
            f(&b.right)
        }
        ExprData::Unary(u) => each_opt(u.operand.as_ref(), f),
        ExprData::Call(c) => {
            each_opt(c.object.as_ref(), f)?;
            each(&c.arguments, f)
        }
        ExprData::Conditional(c) => {
            f(&c.test)?;
            f(&c.if_true)?;
            f(&c.if_false)
        }
        ExprData::Invoke(i) => {
            f(&i.expression)?;
            each(&i.arguments, f)
        }
        ExprData::Lambda(l) => {
            f(&l.body)?;
            each(&l.parameters, f)
        }
        ExprData::ListInit(l) => {
            f(&l.new_expression)?;
            each_init(&l.initializers, f)
        }
        ExprData::MemberAccess(m) => each_opt(m.expression.as_ref(), f),
        ExprData::MemberInit(m) => {
            f(&m.new_expression)?;
            each_binding(&m.bindings, f)
        }
        ExprData::New(n) => each(&n.arguments, f),
        ExprData::NewArray(n) => each(&n.expressions, f),
        ExprData::TypeBinary(t) => f(&t.expression),
        ExprData::Block(b) => {
            each(&b.variables, f)?;
            each(&b.expressions, f)
        }
        ExprData::Dynamic(d) => each(&d.arguments, f),
        ExprData::Goto(g) => each_opt(g.value.as_ref(), f),
        ExprData::Index(i) => {
            f(&i.object)?;
            each(&i.arguments, f)
        }
        ExprData::Label(l) => each_opt(l.default_value.as_ref(), f),
        ExprData::RuntimeVariables(r) => each(&r.variables, f),
        ExprData::Loop(l) => f(&l.body),
        ExprData::Switch(s) => {
            f(&s.switch_value)?;
            for case in s.cases.iter() {
                each(case.test_values(), f)?;
                f(case.body())?;
            }
            each_opt(s.default_body.as_ref(), f)
        }
        ExprData::Try(t) => {
            f(&t.body)?;
            for handler in t.handlers.iter() {
                each_opt(handler.variable(), f)?;
                each_opt(handler.filter(), f)?;
                f(handler.body())?;
            }
            each_opt(t.finally.as_ref(), f)?;
            each_opt(t.fault.as_ref(), f)
        }
        ExprData::Extension(node) => match node.reduce() {
            Some(reduced) => f(&reduced),
            None => ControlFlow::Continue(()),
        },
        ExprData::DebugInfo(_)
        | ExprData::Parameter(_)
        | ExprData::Constant(_)
        | ExprData::Default => ControlFlow::Continue(()),
    }
}

fn each<B, F>(exprs: &[Expr], f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Expr) -> ControlFlow<B>,
{
    for expr in exprs {
        f(expr)?;
    }
    ControlFlow::Continue(())
}

fn each_opt<B, F>(expr: Option<&Expr>, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Expr) -> ControlFlow<B>,
{
    match expr {
        Some(expr) => f(expr),
        None => ControlFlow::Continue(()),
    }
}

fn each_init<B, F>(inits: &[ElementInit], f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Expr) -> ControlFlow<B>,
{
    for init in inits {
        each(init.arguments(), f)?;
    }
    ControlFlow::Continue(())
}

fn each_binding<B, F>(bindings: &[MemberBinding], f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Expr) -> ControlFlow<B>,
{
    for binding in bindings {
        match binding.data() {
            MemberBindingData::Assignment { expression, .. } => f(expression)?,
            MemberBindingData::ListBinding { initializers, .. } => each_init(initializers, f)?,
            MemberBindingData::MemberBinding { bindings, .. } => each_binding(bindings, f)?,
        }
    }
    ControlFlow::Continue(())
}

/// Trait for visiting expression trees.
///
/// The default implementation recurses into every child automatically.
///
/// # Example
///
/// ```
/// use deconstruct_core::ExprVisitor;
/// use deconstruct_tree::{Expr, Type};
///
/// struct DepthCalculator {
///     max_depth: usize,
///     current_depth: usize,
/// }
///
/// impl ExprVisitor for DepthCalculator {
///     fn visit_expr(&mut self, expr: &Expr) {
///         self.current_depth += 1;
///         self.max_depth = self.max_depth.max(self.current_depth);
///
///         self.super_visit_expr(expr);
///
///         self.current_depth -= 1;
///     }
/// }
///
/// let x = Expr::parameter(Type::i32(), "x");
/// let e = Expr::negate(Expr::add(x.clone(), x));
///
/// let mut calc = DepthCalculator { max_depth: 0, current_depth: 0 };
/// calc.visit_expr(&e);
/// assert_eq!(calc.max_depth, 3); // Negate -> Add -> x
/// ```
pub trait ExprVisitor {
    /// Visit a node.
    ///
    /// Override this to customize behavior for all nodes.
    /// Call `super_visit_expr` to recurse into children.
    fn visit_expr(&mut self, expr: &Expr) {
        self.super_visit_expr(expr)
    }

    /// Default recursion into children.
    ///
    /// Override `visit_expr` instead of this method.
    fn super_visit_expr(&mut self, expr: &Expr) {
        let _ = walk_children(expr, &mut |child: &Expr| -> ControlFlow<Infallible> {
            self.visit_expr(child);
            ControlFlow::Continue(())
        });
    }
}

struct PostOrder<F>(F);

impl<F: FnMut(&Expr)> ExprVisitor for PostOrder<F> {
    fn visit_expr(&mut self, expr: &Expr) {
        self.super_visit_expr(expr);
        (self.0)(expr);
    }
}

/// Call `f` on every node, children before their parent.
pub fn visit(expr: &Expr, f: impl FnMut(&Expr)) {
    PostOrder(f).visit_expr(expr)
}

struct Pruning<F>(F);

impl<F: FnMut(&Expr) -> bool> ExprVisitor for Pruning<F> {
    fn visit_expr(&mut self, expr: &Expr) {
        if (self.0)(expr) {
            self.super_visit_expr(expr);
        }
    }
}

/// Call `f` on every node, parents before their children. When `f`
/// returns `false` the node's subtree is skipped.
pub fn visit_while(expr: &Expr, f: impl FnMut(&Expr) -> bool) {
    Pruning(f).visit_expr(expr)
}

/// [`visit`] with each node wrapped in its typed view.
pub fn visit_ex(expr: &Expr, mut f: impl FnMut(&View)) {
    visit(expr, |e| f(&to_view(e)))
}

/// [`visit_while`] with each node wrapped in its typed view.
pub fn visit_ex_while(expr: &Expr, mut f: impl FnMut(&View) -> bool) {
    visit_while(expr, |e| f(&to_view(e)))
}
