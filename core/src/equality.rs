//! Structural equality of expression trees.
//!
//! Two trees are structurally equal when they have the same shape, node
//! kinds, static types and handles, with a few relaxations:
//!
//! - parameters match by name, so two lambdas written separately compare
//!   equal when their parameters are spelled the same;
//! - label targets match by type and name;
//! - constants compare by value when their type is directly comparable,
//!   through the embedded tree for nested queries, elementwise for
//!   sequences, and by the configured policy otherwise;
//! - default, extension and debug info nodes always match.

use crate::options::EqualityOptions;
use deconstruct_tree::{
    CatchBlock, ElementInit, Expr, ExprData, LabelTarget, MemberBinding, MemberBindingData,
    SwitchCase, Value,
};
use hashbrown::HashSet;

/// A failed comparison; the cause is traced where it is detected.
struct Mismatch;

type Compared = Result<(), Mismatch>;

fn ensure(condition: bool, what: &'static str) -> Compared {
    if condition {
        Ok(())
    } else {
        tracing::trace!(what, "Trees differ");
        Err(Mismatch)
    }
}

/// Reusable structural comparer.
///
/// Tracks the pairs of nested query roots currently being compared, which
/// keeps a query embedding itself from recursing forever. A pair leaves the
/// set once its comparison finishes, so a query shared within one tree is
/// still compared structurally at every occurrence.
///
/// # Example
///
/// ```
/// use deconstruct_core::{EqualityOptions, ExprComparer};
/// use deconstruct_tree::{Expr, Type};
///
/// let a = Expr::add(Expr::parameter(Type::i32(), "x"), Expr::constant(1));
/// let b = Expr::add(Expr::parameter(Type::i32(), "x"), Expr::constant(1));
///
/// let mut comparer = ExprComparer::new(&EqualityOptions::default());
/// assert!(comparer.equals(&a, &b));
/// ```
#[derive(Debug)]
pub struct ExprComparer {
    by_reference: bool,
    entered: HashSet<(Expr, Expr)>,
}

impl ExprComparer {
    pub fn new(options: &EqualityOptions) -> Self {
        Self {
            by_reference: options.compare_constants_by_reference,
            entered: HashSet::new(),
        }
    }

    /// Check if `a` and `b` are structurally equal.
    pub fn equals(&mut self, a: &Expr, b: &Expr) -> bool {
        self.entered.clear();
        self.compare(a, b).is_ok()
    }

    fn compare(&mut self, a: &Expr, b: &Expr) -> Compared {
        if a.ptr_eq(b) {
            return Ok(());
        }
        ensure(a.kind() == b.kind(), "node kind")?;
        ensure(a.ty() == b.ty(), "static type")?;

        match (a.data(), b.data()) {
            (ExprData::Binary(x), ExprData::Binary(y)) => {
                ensure(x.method == y.method, "operator method")?;
                ensure(x.lifted_to_null == y.lifted_to_null, "lifting")?;
                self.compare(&x.left, &y.left)?;
                self.compare_opt(x.conversion.as_ref(), y.conversion.as_ref())?;
                self.compare(&x.right, &y.right)
            }
            (ExprData::Unary(x), ExprData::Unary(y)) => {
                ensure(x.method == y.method, "operator method")?;
                self.compare_opt(x.operand.as_ref(), y.operand.as_ref())
            }
            (ExprData::Call(x), ExprData::Call(y)) => {
                ensure(x.arguments.len() == y.arguments.len(), "argument count")?;
                ensure(x.method == y.method, "method")?;
                self.compare_opt(x.object.as_ref(), y.object.as_ref())?;
                self.compare_list(&x.arguments, &y.arguments)
            }
            (ExprData::Conditional(x), ExprData::Conditional(y)) => {
                self.compare(&x.test, &y.test)?;
                self.compare(&x.if_true, &y.if_true)?;
                self.compare(&x.if_false, &y.if_false)
            }
            (ExprData::Invoke(x), ExprData::Invoke(y)) => {
                ensure(x.arguments.len() == y.arguments.len(), "argument count")?;
                self.compare(&x.expression, &y.expression)?;
                self.compare_list(&x.arguments, &y.arguments)
            }
            (ExprData::Lambda(x), ExprData::Lambda(y)) => {
                ensure(x.parameters.len() == y.parameters.len(), "parameter count")?;
                self.compare_list(&x.parameters, &y.parameters)?;
                self.compare(&x.body, &y.body)
            }
            (ExprData::ListInit(x), ExprData::ListInit(y)) => {
                ensure(x.initializers.len() == y.initializers.len(), "initializer count")?;
                self.compare(&x.new_expression, &y.new_expression)?;
                self.compare_inits(&x.initializers, &y.initializers)
            }
            (ExprData::MemberAccess(x), ExprData::MemberAccess(y)) => {
                ensure(x.member == y.member, "member")?;
                self.compare_opt(x.expression.as_ref(), y.expression.as_ref())
            }
            (ExprData::MemberInit(x), ExprData::MemberInit(y)) => {
                ensure(x.bindings.len() == y.bindings.len(), "binding count")?;
                self.compare(&x.new_expression, &y.new_expression)?;
                self.compare_bindings(&x.bindings, &y.bindings)
            }
            (ExprData::New(x), ExprData::New(y)) => {
                ensure(x.arguments.len() == y.arguments.len(), "argument count")?;
                ensure(x.constructor == y.constructor, "constructor")?;
                ensure(x.members == y.members, "initialized members")?;
                self.compare_list(&x.arguments, &y.arguments)
            }
            (ExprData::NewArray(x), ExprData::NewArray(y)) => {
                ensure(x.expressions.len() == y.expressions.len(), "element count")?;
                self.compare_list(&x.expressions, &y.expressions)
            }
            (ExprData::TypeBinary(x), ExprData::TypeBinary(y)) => {
                ensure(x.type_operand == y.type_operand, "type operand")?;
                self.compare(&x.expression, &y.expression)
            }
            (ExprData::Block(x), ExprData::Block(y)) => {
                ensure(x.variables.len() == y.variables.len(), "variable count")?;
                ensure(x.expressions.len() == y.expressions.len(), "expression count")?;
                self.compare_list(&x.variables, &y.variables)?;
                self.compare_list(&x.expressions, &y.expressions)
            }
            (ExprData::Dynamic(x), ExprData::Dynamic(y)) => {
                ensure(x.arguments.len() == y.arguments.len(), "argument count")?;
                ensure(x.binder == y.binder, "binder")?;
                ensure(x.delegate_type == y.delegate_type, "delegate type")?;
                self.compare_list(&x.arguments, &y.arguments)
            }
            (ExprData::Goto(x), ExprData::Goto(y)) => {
                ensure(x.kind == y.kind, "goto kind")?;
                ensure(same_label(&x.target, &y.target), "label")?;
                self.compare_opt(x.value.as_ref(), y.value.as_ref())
            }
            (ExprData::Index(x), ExprData::Index(y)) => {
                ensure(x.arguments.len() == y.arguments.len(), "argument count")?;
                ensure(x.indexer == y.indexer, "indexer")?;
                self.compare(&x.object, &y.object)?;
                self.compare_list(&x.arguments, &y.arguments)
            }
            (ExprData::Label(x), ExprData::Label(y)) => {
                ensure(same_label(&x.target, &y.target), "label")?;
                self.compare_opt(x.default_value.as_ref(), y.default_value.as_ref())
            }
            (ExprData::RuntimeVariables(x), ExprData::RuntimeVariables(y)) => {
                ensure(x.variables.len() == y.variables.len(), "variable count")?;
                self.compare_list(&x.variables, &y.variables)
            }
            (ExprData::Loop(x), ExprData::Loop(y)) => {
                ensure(
                    same_opt_label(x.break_label.as_ref(), y.break_label.as_ref()),
                    "break label",
                )?;
                ensure(
                    same_opt_label(x.continue_label.as_ref(), y.continue_label.as_ref()),
                    "continue label",
                )?;
                self.compare(&x.body, &y.body)
            }
            (ExprData::Switch(x), ExprData::Switch(y)) => {
                ensure(x.cases.len() == y.cases.len(), "case count")?;
                ensure(x.comparison == y.comparison, "comparison method")?;
                self.compare(&x.switch_value, &y.switch_value)?;
                self.compare_cases(&x.cases, &y.cases)?;
                self.compare_opt(x.default_body.as_ref(), y.default_body.as_ref())
            }
            (ExprData::Try(x), ExprData::Try(y)) => {
                ensure(x.handlers.len() == y.handlers.len(), "handler count")?;
                self.compare(&x.body, &y.body)?;
                self.compare_handlers(&x.handlers, &y.handlers)?;
                self.compare_opt(x.finally.as_ref(), y.finally.as_ref())?;
                self.compare_opt(x.fault.as_ref(), y.fault.as_ref())
            }
            (ExprData::Parameter(x), ExprData::Parameter(y)) => {
                ensure(x.name == y.name, "parameter name")
            }
            (ExprData::Constant(x), ExprData::Constant(y)) => {
                self.compare_constants(a, &x.value, &y.value)
            }
            (ExprData::Extension(_), ExprData::Extension(_))
            | (ExprData::DebugInfo(_), ExprData::DebugInfo(_))
            | (ExprData::Default, ExprData::Default) => Ok(()),
            _ => unsupported(a, b),
        }
    }

    fn compare_constants(&mut self, node: &Expr, a: &Value, b: &Value) -> Compared {
        if node.ty().is_directly_comparable() {
            return ensure(a == b, "constant value");
        }
        self.compare_values(a, b)
    }

    /// Payloads of constants whose static type is not directly comparable,
    /// and the items of sequences.
    fn compare_values(&mut self, a: &Value, b: &Value) -> Compared {
        match (a, b) {
            (Value::Query(x), Value::Query(y)) => {
                let pair = (x.root().clone(), y.root().clone());
                if !self.entered.insert(pair.clone()) {
                    // Same pair already open further up: a query embedding itself.
                    return self.by_policy(a, b);
                }
                tracing::trace!(root = %x.root(), "Entering nested query");
                let compared = self.compare(x.root(), y.root());
                self.entered.remove(&pair);
                compared
            }
            (Value::Sequence(x), Value::Sequence(y)) => {
                ensure(x.len() == y.len(), "sequence length")?;
                x.iter()
                    .zip(y.iter())
                    .try_for_each(|(x, y)| self.compare_values(x, y))
            }
            (Value::Sequence(_) | Value::Query(_) | Value::Object(_), _) => self.by_policy(a, b),
            _ => ensure(a == b, "constant value"),
        }
    }

    fn by_policy(&self, a: &Value, b: &Value) -> Compared {
        if self.by_reference {
            ensure(a.same_instance(b), "constant instance")
        } else {
            ensure(a == b, "constant value")
        }
    }

    fn compare_opt(&mut self, a: Option<&Expr>, b: Option<&Expr>) -> Compared {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (None, None) => Ok(()),
            _ => ensure(false, "optional child"),
        }
    }

    /// Lengths are checked by the caller.
    fn compare_list(&mut self, a: &[Expr], b: &[Expr]) -> Compared {
        a.iter().zip(b).try_for_each(|(a, b)| self.compare(a, b))
    }

    fn compare_inits(&mut self, a: &[ElementInit], b: &[ElementInit]) -> Compared {
        a.iter().zip(b).try_for_each(|(a, b)| {
            ensure(a.add_method() == b.add_method(), "add method")?;
            ensure(a.arguments().len() == b.arguments().len(), "argument count")?;
            self.compare_list(a.arguments(), b.arguments())
        })
    }

    fn compare_bindings(&mut self, a: &[MemberBinding], b: &[MemberBinding]) -> Compared {
        a.iter().zip(b).try_for_each(|(a, b)| {
            ensure(a.member() == b.member(), "bound member")?;
            match (a.data(), b.data()) {
                (
                    MemberBindingData::Assignment { expression: x, .. },
                    MemberBindingData::Assignment { expression: y, .. },
                ) => self.compare(x, y),
                (
                    MemberBindingData::ListBinding { initializers: x, .. },
                    MemberBindingData::ListBinding { initializers: y, .. },
                ) => {
                    ensure(x.len() == y.len(), "initializer count")?;
                    self.compare_inits(x, y)
                }
                (
                    MemberBindingData::MemberBinding { bindings: x, .. },
                    MemberBindingData::MemberBinding { bindings: y, .. },
                ) => {
                    ensure(x.len() == y.len(), "binding count")?;
                    self.compare_bindings(x, y)
                }
                _ => ensure(false, "binding kind"),
            }
        })
    }

    fn compare_cases(&mut self, a: &[SwitchCase], b: &[SwitchCase]) -> Compared {
        a.iter().zip(b).try_for_each(|(a, b)| {
            ensure(a.test_values().len() == b.test_values().len(), "test value count")?;
            self.compare_list(a.test_values(), b.test_values())?;
            self.compare(a.body(), b.body())
        })
    }

    fn compare_handlers(&mut self, a: &[CatchBlock], b: &[CatchBlock]) -> Compared {
        a.iter().zip(b).try_for_each(|(a, b)| {
            ensure(a.test() == b.test(), "caught type")?;
            self.compare_opt(a.variable(), b.variable())?;
            self.compare_opt(a.filter(), b.filter())?;
            self.compare(a.body(), b.body())
        })
    }
}

fn same_label(a: &LabelTarget, b: &LabelTarget) -> bool {
    a.ty() == b.ty() && a.name() == b.name()
}

fn same_opt_label(a: Option<&LabelTarget>, b: Option<&LabelTarget>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_label(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cold]
fn unsupported(a: &Expr, b: &Expr) -> ! {
    tracing::error!(kind = %a.kind(), "node data does not match its kind");
    panic!(
        "cannot compare {} nodes: {:?} and {:?} data",
        a.kind(),
        a.family(),
        b.data().family()
    )
}

/// Check if `a` and `b` are structurally equal, comparing opaque constants
/// by value.
///
/// # Example
///
/// ```
/// use deconstruct_core::equals;
/// use deconstruct_tree::{Expr, Type};
///
/// let f = |name: &str| {
///     let p = Expr::parameter(Type::i32(), name);
///     Expr::lambda(Expr::add(p.clone(), Expr::constant(20)), [p]).unwrap()
/// };
/// assert!(equals(&f("i"), &f("i")));
/// assert!(!equals(&f("i"), &f("j")));
/// ```
pub fn equals(a: &Expr, b: &Expr) -> bool {
    equals_with(a, b, &EqualityOptions::default())
}

/// [`equals`] with an explicit constant comparison policy.
pub fn equals_with(a: &Expr, b: &Expr, options: &EqualityOptions) -> bool {
    ExprComparer::new(options).equals(a, b)
}

/// [`equals`] over optional nodes: two absent nodes are equal, an absent
/// and a present one are not.
pub fn equals_opt(a: Option<&Expr>, b: Option<&Expr>, options: &EqualityOptions) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => equals_with(a, b, options),
        (None, None) => true,
        _ => false,
    }
}
