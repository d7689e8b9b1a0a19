//! Deconstruction engine for expression trees.
//!
//! Wraps the raw nodes of [`deconstruct_tree`] in typed, pattern-matchable
//! views and provides the generic algorithms that walk them: visiting,
//! searching, rewriting with structural sharing, and structural equality.
//!
//! # Example
//!
//! ```
//! use deconstruct_core::{View, equals, transform_ex};
//! use deconstruct_tree::{Expr, Type, Value};
//!
//! let x = Expr::parameter(Type::i32(), "x");
//! let e = Expr::add(x.clone(), Expr::multiply(x.clone(), Expr::constant(0)));
//!
//! // x * 0 => 0, then x + 0 => x
//! let simplified = transform_ex(&e, |view| match &view {
//!     View::Multiply(m) => match m.deconstruct() {
//!         (_, View::Constant(c)) if c.value() == &Value::I32(0) => Expr::constant(0),
//!         _ => view.expr().clone(),
//!     },
//!     View::Add(a) => match a.deconstruct() {
//!         (left, View::Constant(c)) if c.value() == &Value::I32(0) => left.expr().clone(),
//!         _ => view.expr().clone(),
//!     },
//!     _ => view.expr().clone(),
//! });
//! assert!(equals(&simplified, &x));
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod equality;
pub mod error;
pub mod ext;
pub mod find;
pub mod options;
pub mod transform;
pub mod view;
pub mod visitor;

pub use equality::{ExprComparer, equals, equals_opt, equals_with};
pub use error::Error;
pub use ext::ExprExt;
pub use find::{find, find_ex, find_node};
pub use options::{Direction, EqualityOptions, TransformOptions};
pub use transform::{ExprFolder, transform, transform_ex, transform_ex_with, transform_with};
pub use view::*;
pub use visitor::{ExprVisitor, visit, visit_ex, visit_ex_while, visit_while, walk_children};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_transform() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    use deconstruct_tree::{
        CatchBlock, Constructor, ElementInit, Expr, ExtensionNode, Family, GotoKind, LabelTarget,
        Member, MemberBinding, Method, NodeKind, SwitchCase, SymbolDocument, Type,
    };

    /// Reducible extension standing for `x + x`.
    #[derive(Debug)]
    pub struct Doubled(pub Expr);

    impl ExtensionNode for Doubled {
        fn ty(&self) -> Type {
            self.0.ty().clone()
        }

        fn reduce(&self) -> Option<Expr> {
            Some(Expr::add(self.0.clone(), self.0.clone()))
        }
    }

    /// A small, freshly built node of the given kind.
    ///
    /// Every call builds new instances, so two samples of one kind are
    /// structurally equal but never the same node.
    pub fn sample(kind: NodeKind) -> Expr {
        let x = Expr::parameter(Type::i32(), "x");
        let y = Expr::parameter(Type::i32(), "y");
        let point = Type::named("Point");
        let list = Type::generic("List", [Type::i32()]);
        let add = Method::instance(list.clone(), "Add", [Type::i32()], Type::void());
        let end = LabelTarget::new(Type::i32(), Some("end"));

        match kind.family() {
            Family::Binary => Expr::make_binary(kind, x, y).unwrap(),
            Family::Unary => Expr::make_unary(kind, Some(x), Type::i32(), None).unwrap(),
            Family::TypeBinary if kind == NodeKind::TypeIs => Expr::type_is(x, Type::i64()),
            Family::TypeBinary => Expr::type_equal(x, Type::i64()),
            Family::NewArray if kind == NodeKind::NewArrayInit => {
                Expr::new_array_init(Type::i32(), [x, y])
            }
            Family::NewArray => Expr::new_array_bounds(Type::i32(), [x]),
            Family::Call => {
                let math = Type::named("Math");
                let abs = Method::new_static(math, "Abs", [Type::i32()], Type::i32());
                Expr::call(None, abs, [x]).unwrap()
            }
            Family::Conditional => {
                Expr::conditional(Expr::greater_than(x.clone(), y.clone()), x, y)
            }
            Family::Invoke => {
                let f = Expr::lambda(Expr::negate(x.clone()), [x]).unwrap();
                Expr::invoke(f, [y])
            }
            Family::Lambda => Expr::lambda(Expr::multiply(x.clone(), y.clone()), [x, y]).unwrap(),
            Family::ListInit => Expr::list_init(
                Expr::new(Constructor::new(list, []), []).unwrap(),
                [ElementInit::new(add, [x])],
            )
            .unwrap(),
            Family::MemberAccess => Expr::member_access(
                Some(Expr::parameter(point.clone(), "p")),
                Member::field(point, "X", Type::i32()),
            ),
            Family::MemberInit => Expr::member_init(
                Expr::new(Constructor::new(point.clone(), []), []).unwrap(),
                [
                    MemberBinding::assignment(Member::field(point.clone(), "X", Type::i32()), x),
                    MemberBinding::list(
                        Member::property(point.clone(), "Tags", list),
                        [ElementInit::new(add, [y])],
                    ),
                ],
            )
            .unwrap(),
            Family::New => {
                Expr::new(Constructor::new(point, [Type::i32(), Type::i32()]), [x, y]).unwrap()
            }
            Family::Block => {
                let t = Expr::parameter(Type::i32(), "t");
                Expr::block(
                    [t.clone()],
                    [Expr::assign(t.clone(), Expr::add(x, y)), t],
                )
                .unwrap()
            }
            Family::Dynamic => {
                let delegate = Type::function([Type::i32(), Type::i32()], Type::i32());
                Expr::dynamic("add", delegate, [x, y])
            }
            Family::Goto => Expr::make_goto(GotoKind::Return, end, Some(x)),
            Family::Index => Expr::index(
                Expr::parameter(Type::named("Grid"), "grid"),
                Some(Member::property(Type::named("Grid"), "Item", Type::i32())),
                [x, y],
            ),
            Family::Label => Expr::label(end, Some(x)),
            Family::RuntimeVariables => Expr::runtime_variables([x, y]).unwrap(),
            Family::Loop => {
                let body = Expr::make_goto(GotoKind::Break, end.clone(), Some(x));
                Expr::loop_expr(body, Some(end), None)
            }
            Family::Switch => Expr::switch(
                x,
                [SwitchCase::new([Expr::constant(1)], y)],
                Some(Expr::constant(0)),
                None,
            ),
            Family::Try => {
                let ex = Expr::parameter(Type::named("Exception"), "ex");
                Expr::make_try(
                    x,
                    [CatchBlock::catch(Type::named("Exception"), Some(ex), y)],
                    None,
                    Some(Expr::empty()),
                )
            }
            Family::Extension => Expr::extension(Doubled(x)),
            Family::DebugInfo => Expr::debug_info(SymbolDocument::new("query.cs"), 1, 1, 1, 10),
            Family::Parameter => x,
            Family::Constant => Expr::constant(42),
            Family::Default => Expr::default_value(Type::i32()),
        }
    }
}
