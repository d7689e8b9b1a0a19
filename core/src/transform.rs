//! Rebuilding expression trees.
//!
//! A transform calls a rewrite function on every node and rebuilds the
//! ancestors of whatever it replaced. Subtrees the function leaves alone are
//! shared with the input: a node whose children all come back as the same
//! instances is itself returned unchanged, so an identity rewrite returns
//! the input root.

use crate::options::{Direction, TransformOptions};
use crate::view::{View, to_view};
use alloc::sync::Arc;
use alloc::vec::Vec;
use deconstruct_tree::{
    BinaryExpr, BlockExpr, CallExpr, CatchBlock, ConditionalExpr, DynamicExpr, ElementInit, Expr,
    ExprData, ExprList, GotoExpr, IndexExpr, InvokeExpr, LabelExpr, LambdaExpr, ListInitExpr,
    LoopExpr, MemberAccessExpr, MemberBinding, MemberBindingData, MemberInitExpr, NewArrayExpr,
    NewExpr, RuntimeVariablesExpr, SwitchCase, SwitchExpr, TryExpr, TypeBinaryExpr, UnaryExpr,
};

/// Trait for rebuilding expression trees.
///
/// The default implementation folds every child and rebuilds the node only
/// when a child changed.
///
/// # Example
///
/// ```
/// use deconstruct_core::ExprFolder;
/// use deconstruct_tree::{Expr, Type};
///
/// // Replace every `x` with `y`.
/// struct Rename {
///     from: Expr,
///     to: Expr,
/// }
///
/// impl ExprFolder for Rename {
///     fn fold_expr(&mut self, expr: &Expr) -> Expr {
///         if expr.ptr_eq(&self.from) {
///             self.to.clone()
///         } else {
///             self.super_fold_expr(expr)
///         }
///     }
/// }
///
/// let x = Expr::parameter(Type::i32(), "x");
/// let y = Expr::parameter(Type::i32(), "y");
/// let e = Expr::add(x.clone(), Expr::constant(1));
///
/// let mut rename = Rename { from: x, to: y };
/// assert_eq!(rename.fold_expr(&e).to_string(), "(y + 1)");
/// ```
pub trait ExprFolder {
    /// Transform a node.
    ///
    /// Override this to customize behavior for all nodes.
    /// Call `super_fold_expr` to recurse into children.
    fn fold_expr(&mut self, expr: &Expr) -> Expr {
        self.super_fold_expr(expr)
    }

    /// Default recursion into children.
    ///
    /// Children are folded in the same order the visitor walks them. Leaves
    /// and extensions are returned as-is.
    ///
    /// Override `fold_expr` instead of this method.
    fn super_fold_expr(&mut self, expr: &Expr) -> Expr {
        let data = match expr.data() {
            ExprData::Binary(b) => {
                let left = self.fold_expr(&b.left);
                let conversion = fold_opt(self, b.conversion.as_ref());
                let right = self.fold_expr(&b.right);
                ExprData::Binary(BinaryExpr {
                    left,
                    right,
                    method: b.method.clone(),
                    conversion,
                    lifted_to_null: b.lifted_to_null,
                })
            }
            ExprData::Unary(u) => ExprData::Unary(UnaryExpr {
                operand: fold_opt(self, u.operand.as_ref()),
                method: u.method.clone(),
            }),
            ExprData::Call(c) => {
                let object = fold_opt(self, c.object.as_ref());
                ExprData::Call(CallExpr {
                    method: c.method.clone(),
                    object,
                    arguments: fold_list(self, &c.arguments),
                })
            }
            ExprData::Conditional(c) => {
                let test = self.fold_expr(&c.test);
                let if_true = self.fold_expr(&c.if_true);
                let if_false = self.fold_expr(&c.if_false);
                ExprData::Conditional(ConditionalExpr {
                    test,
                    if_true,
                    if_false,
                })
            }
            ExprData::Invoke(i) => {
                let expression = self.fold_expr(&i.expression);
                ExprData::Invoke(InvokeExpr {
                    expression,
                    arguments: fold_list(self, &i.arguments),
                })
            }
            ExprData::Lambda(l) => {
                let body = self.fold_expr(&l.body);
                ExprData::Lambda(LambdaExpr {
                    name: l.name.clone(),
                    body,
                    parameters: fold_list(self, &l.parameters),
                    tail_call: l.tail_call,
                })
            }
            ExprData::ListInit(l) => {
                let new_expression = self.fold_expr(&l.new_expression);
                ExprData::ListInit(ListInitExpr {
                    new_expression,
                    initializers: fold_inits(self, &l.initializers),
                })
            }
            ExprData::MemberAccess(m) => ExprData::MemberAccess(MemberAccessExpr {
                expression: fold_opt(self, m.expression.as_ref()),
                member: m.member.clone(),
            }),
            ExprData::MemberInit(m) => {
                let new_expression = self.fold_expr(&m.new_expression);
                ExprData::MemberInit(MemberInitExpr {
                    new_expression,
                    bindings: fold_bindings(self, &m.bindings),
                })
            }
            ExprData::New(n) => ExprData::New(NewExpr {
                constructor: n.constructor.clone(),
                arguments: fold_list(self, &n.arguments),
                members: n.members.clone(),
            }),
            ExprData::NewArray(n) => ExprData::NewArray(NewArrayExpr {
                expressions: fold_list(self, &n.expressions),
            }),
            ExprData::TypeBinary(t) => ExprData::TypeBinary(TypeBinaryExpr {
                expression: self.fold_expr(&t.expression),
                type_operand: t.type_operand.clone(),
            }),
            ExprData::Block(b) => {
                let variables = fold_list(self, &b.variables);
                ExprData::Block(BlockExpr {
                    variables,
                    expressions: fold_list(self, &b.expressions),
                })
            }
            ExprData::Dynamic(d) => ExprData::Dynamic(DynamicExpr {
                binder: d.binder.clone(),
                delegate_type: d.delegate_type.clone(),
                arguments: fold_list(self, &d.arguments),
            }),
            ExprData::Goto(g) => ExprData::Goto(GotoExpr {
                kind: g.kind,
                target: g.target.clone(),
                value: fold_opt(self, g.value.as_ref()),
            }),
            ExprData::Index(i) => {
                let object = self.fold_expr(&i.object);
                ExprData::Index(IndexExpr {
                    object,
                    indexer: i.indexer.clone(),
                    arguments: fold_list(self, &i.arguments),
                })
            }
            ExprData::Label(l) => ExprData::Label(LabelExpr {
                target: l.target.clone(),
                default_value: fold_opt(self, l.default_value.as_ref()),
            }),
            ExprData::RuntimeVariables(r) => ExprData::RuntimeVariables(RuntimeVariablesExpr {
                variables: fold_list(self, &r.variables),
            }),
            ExprData::Loop(l) => ExprData::Loop(LoopExpr {
                body: self.fold_expr(&l.body),
                break_label: l.break_label.clone(),
                continue_label: l.continue_label.clone(),
            }),
            ExprData::Switch(s) => {
                let switch_value = self.fold_expr(&s.switch_value);
                let cases = fold_cases(self, &s.cases);
                let default_body = fold_opt(self, s.default_body.as_ref());
                ExprData::Switch(SwitchExpr {
                    switch_value,
                    cases,
                    default_body,
                    comparison: s.comparison.clone(),
                })
            }
            ExprData::Try(t) => {
                let body = self.fold_expr(&t.body);
                let handlers = fold_handlers(self, &t.handlers);
                let finally = fold_opt(self, t.finally.as_ref());
                let fault = fold_opt(self, t.fault.as_ref());
                ExprData::Try(TryExpr {
                    body,
                    handlers,
                    finally,
                    fault,
                })
            }
            ExprData::Extension(_)
            | ExprData::DebugInfo(_)
            | ExprData::Parameter(_)
            | ExprData::Constant(_)
            | ExprData::Default => return expr.clone(),
        };
        expr.update(data)
    }
}

fn fold_opt<F: ExprFolder + ?Sized>(folder: &mut F, expr: Option<&Expr>) -> Option<Expr> {
    expr.map(|e| folder.fold_expr(e))
}

/// Fold every element; the input list is returned when nothing changed.
fn fold_list<F: ExprFolder + ?Sized>(folder: &mut F, exprs: &ExprList) -> ExprList {
    rebuild(exprs, |e| folder.fold_expr(e), Expr::ptr_eq)
}

fn fold_inits<F: ExprFolder + ?Sized>(
    folder: &mut F,
    inits: &Arc<[ElementInit]>,
) -> Arc<[ElementInit]> {
    rebuild(
        inits,
        |init| init.update(fold_list(folder, init.arguments())),
        ElementInit::ptr_eq,
    )
}

fn fold_bindings<F: ExprFolder + ?Sized>(
    folder: &mut F,
    bindings: &Arc<[MemberBinding]>,
) -> Arc<[MemberBinding]> {
    rebuild(
        bindings,
        |binding| {
            let data = match binding.data() {
                MemberBindingData::Assignment { member, expression } => {
                    MemberBindingData::Assignment {
                        member: member.clone(),
                        expression: folder.fold_expr(expression),
                    }
                }
                MemberBindingData::ListBinding {
                    member,
                    initializers,
                } => MemberBindingData::ListBinding {
                    member: member.clone(),
                    initializers: fold_inits(folder, initializers),
                },
                MemberBindingData::MemberBinding { member, bindings } => {
                    MemberBindingData::MemberBinding {
                        member: member.clone(),
                        bindings: fold_bindings(folder, bindings),
                    }
                }
            };
            binding.update(data)
        },
        MemberBinding::ptr_eq,
    )
}

fn fold_cases<F: ExprFolder + ?Sized>(
    folder: &mut F,
    cases: &Arc<[SwitchCase]>,
) -> Arc<[SwitchCase]> {
    rebuild(
        cases,
        |case| {
            let test_values = fold_list(folder, case.test_values());
            let body = folder.fold_expr(case.body());
            case.update(test_values, body)
        },
        SwitchCase::ptr_eq,
    )
}

fn fold_handlers<F: ExprFolder + ?Sized>(
    folder: &mut F,
    handlers: &Arc<[CatchBlock]>,
) -> Arc<[CatchBlock]> {
    rebuild(
        handlers,
        |handler| {
            let variable = fold_opt(folder, handler.variable());
            let filter = fold_opt(folder, handler.filter());
            let body = folder.fold_expr(handler.body());
            handler.update(variable, filter, body)
        },
        CatchBlock::ptr_eq,
    )
}

fn rebuild<T: Clone>(
    items: &Arc<[T]>,
    mut fold: impl FnMut(&T) -> T,
    same: impl Fn(&T, &T) -> bool,
) -> Arc<[T]> {
    let folded: Vec<T> = items.iter().map(&mut fold).collect();
    if folded.iter().zip(items.iter()).all(|(new, old)| same(new, old)) {
        items.clone()
    } else {
        folded.into()
    }
}

/// Adapts a rewrite closure to [`ExprFolder`].
struct Rewrite<F> {
    f: F,
    direction: Direction,
}

impl<F: FnMut(&Expr) -> Expr> ExprFolder for Rewrite<F> {
    fn fold_expr(&mut self, expr: &Expr) -> Expr {
        match self.direction {
            Direction::Backward => {
                let rebuilt = self.super_fold_expr(expr);
                (self.f)(&rebuilt)
            }
            Direction::Forward => {
                let replaced = (self.f)(expr);
                if replaced.ptr_eq(expr) {
                    self.super_fold_expr(expr)
                } else {
                    replaced
                }
            }
        }
    }
}

/// Rewrite `expr` bottom-up: `f` sees each node after its children were
/// rewritten, and returns the node itself to keep it.
///
/// # Example
///
/// ```
/// use deconstruct_core::transform;
/// use deconstruct_tree::{Expr, NodeKind, Type};
///
/// let x = Expr::parameter(Type::i32(), "x");
/// let e = Expr::add(x.clone(), Expr::constant(0));
///
/// // x + 0 => x
/// let simplified = transform(&e, |e| match e.as_binary() {
///     Some(b) if e.kind() == NodeKind::Add && b.right.to_string() == "0" => b.left.clone(),
///     _ => e.clone(),
/// });
/// assert!(simplified.ptr_eq(&x));
/// ```
pub fn transform(expr: &Expr, f: impl FnMut(&Expr) -> Expr) -> Expr {
    transform_with(expr, f, &TransformOptions::default())
}

/// [`transform`] with an explicit traversal direction.
pub fn transform_with(
    expr: &Expr,
    f: impl FnMut(&Expr) -> Expr,
    options: &TransformOptions,
) -> Expr {
    tracing::debug!(direction = ?options.direction, root = %expr.kind(), "Transforming tree");
    Rewrite {
        f,
        direction: options.direction,
    }
    .fold_expr(expr)
}

/// [`transform`] with each node wrapped in its typed view.
///
/// `f` may return either a view or a node; returning the view it was given
/// keeps the node.
pub fn transform_ex<R: Into<Expr>>(expr: &Expr, f: impl FnMut(View) -> R) -> Expr {
    transform_ex_with(expr, f, &TransformOptions::default())
}

/// [`transform_ex`] with an explicit traversal direction.
pub fn transform_ex_with<R: Into<Expr>>(
    expr: &Expr,
    mut f: impl FnMut(View) -> R,
    options: &TransformOptions,
) -> Expr {
    transform_with(expr, |e| f(to_view(e)).into(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_logging, sample};
    use alloc::string::ToString;
    use alloc::vec;
    use deconstruct_tree::{Constructor, Member, Method, NodeKind, Type, Value};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::parameter(Type::i32(), "x")
    }

    #[test]
    fn test_identity_transform_returns_the_input() {
        init_test_logging();
        let x = x();
        let e = Expr::conditional(
            Expr::greater_than(x.clone(), Expr::constant(0)),
            Expr::negate(x.clone()),
            Expr::new_array_init(Type::i32(), [x.clone(), Expr::constant(1)]),
        );
        assert!(transform(&e, Expr::clone).ptr_eq(&e));

        let forward = TransformOptions {
            direction: Direction::Forward,
        };
        assert!(transform_with(&e, Expr::clone, &forward).ptr_eq(&e));
        assert!(transform_ex(&e, |v| v).ptr_eq(&e));
    }

    #[test]
    fn test_identity_transform_keeps_every_kind() {
        let forward = TransformOptions {
            direction: Direction::Forward,
        };
        for &kind in NodeKind::ALL {
            let e = sample(kind);
            assert!(transform(&e, Expr::clone).ptr_eq(&e), "backward rebuilt {kind}");
            assert!(
                transform_with(&e, Expr::clone, &forward).ptr_eq(&e),
                "forward rebuilt {kind}"
            );
            assert!(transform_ex(&e, |v| v).ptr_eq(&e), "view rewrite rebuilt {kind}");
        }
    }

    #[test]
    fn test_unchanged_siblings_are_shared() {
        let x = x();
        let left = Expr::multiply(x.clone(), Expr::constant(2));
        let right = Expr::add(x.clone(), Expr::constant(3));
        let e = Expr::subtract(left.clone(), right.clone());

        let three = |e: &Expr| {
            if e.as_constant().is_some_and(|c| c.value == Value::I32(3)) {
                Expr::constant(4)
            } else {
                e.clone()
            }
        };
        let out = transform(&e, three);

        assert!(!out.ptr_eq(&e));
        assert_eq!(out.to_string(), "((x * 2) - (x + 4))");
        let b = out.as_binary().unwrap();
        assert!(b.left.ptr_eq(&left));
        assert!(!b.right.ptr_eq(&right));
        assert!(b.right.as_binary().unwrap().left.ptr_eq(&x));
    }

    #[test]
    fn test_backward_sees_rewritten_children() {
        // (x * 0) * 5: folding the inner product first lets the outer one fold too.
        let e = Expr::multiply(Expr::multiply(x(), Expr::constant(0)), Expr::constant(5));
        let mut seen = vec![];
        let out = transform(&e, |e| {
            seen.push(e.to_string());
            match e.as_binary() {
                Some(b)
                    if e.kind() == NodeKind::Multiply
                        && (b.left.to_string() == "0" || b.right.to_string() == "0") =>
                {
                    Expr::constant(0)
                }
                _ => e.clone(),
            }
        });
        assert_eq!(out.to_string(), "0");
        assert_eq!(seen, ["x", "0", "(x * 0)", "5", "(0 * 5)"]);
    }

    #[test]
    fn test_forward_does_not_revisit_replacements() {
        let e = Expr::negate(Expr::negate(x()));
        let mut calls = 0;
        let forward = TransformOptions {
            direction: Direction::Forward,
        };
        // Strips one negation at the root; the replacement is not walked.
        let out = transform_with(
            &e,
            |e| {
                calls += 1;
                match e.as_unary().and_then(|u| u.operand.as_ref()) {
                    Some(inner) if e.kind() == NodeKind::Negate => inner.clone(),
                    _ => e.clone(),
                }
            },
            &forward,
        );
        assert_eq!(out.to_string(), "-x");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_nested_structures_are_rebuilt() {
        let point = Type::named("Point");
        let list = Type::generic("List", [Type::i32()]);
        let add = Method::instance(list.clone(), "Add", [Type::i32()], Type::void());
        let untouched = ElementInit::new(add.clone(), [Expr::constant(5)]);
        let e = Expr::member_init(
            Expr::new(Constructor::new(point.clone(), []), []).unwrap(),
            [MemberBinding::list(
                Member::property(point, "Tags", list),
                [untouched.clone(), ElementInit::new(add, [Expr::constant(1)])],
            )],
        )
        .unwrap();

        let out = transform(&e, |e| match e.as_constant().and_then(|c| c.value.as_i32()) {
            Some(1) => Expr::constant(2),
            _ => e.clone(),
        });
        assert_eq!(out.to_string(), "new Point() {Tags = {Add(5), Add(2)}}");

        let ExprData::MemberInit(init) = out.data() else {
            panic!("expected member init data");
        };
        let MemberBindingData::ListBinding { initializers, .. } = init.bindings[0].data() else {
            panic!("expected a list binding");
        };
        assert!(initializers[0].ptr_eq(&untouched));
    }

    #[test]
    fn test_switch_and_try_are_rebuilt() {
        let x = x();
        let switch = Expr::switch(
            x.clone(),
            [SwitchCase::new([Expr::constant(1)], Expr::constant(10))],
            Some(Expr::constant(0)),
            None,
        );
        let e = Expr::make_try(
            switch,
            [CatchBlock::catch(Type::named("Exception"), None, Expr::constant(-1))],
            None,
            None,
        );
        let out = transform(&e, |e| match e.as_constant().and_then(|c| c.value.as_i32()) {
            Some(n) => Expr::constant(n * 2),
            None => e.clone(),
        });

        let mut constants = vec![];
        crate::visit(&out, |e| {
            if let Some(c) = e.as_constant() {
                constants.push(c.value.as_i32().unwrap());
            }
        });
        assert_eq!(constants, [2, 20, 0, -2]);
    }

    #[test]
    fn test_transform_ex_accepts_views() {
        let e = Expr::add(x(), Expr::constant(1));
        let out = transform_ex(&e, |v| match v {
            View::Parameter(p) if p.name() == Some("x") => Expr::parameter(Type::i32(), "y"),
            other => other.into_expr(),
        });
        assert_eq!(out.to_string(), "(y + 1)");
    }
}
