//! Deconstruct - pattern matching and rewriting for expression trees
//!
//! # Overview
//!
//! Deconstruct lets code take expression trees apart with ordinary `match`
//! expressions instead of kind checks and downcasts, and put them back
//! together with only the touched paths rebuilt. Common use cases include:
//!
//! - Query providers translating trees to another language
//! - Constant folding and other local simplifications
//! - Rewriting calls into equivalent constructs
//! - Comparing trees built at different times for caching
//!
//! # Quick Start
//!
//! ```
//! use deconstruct::{Expr, ExprExt, Type, Value, View};
//!
//! // "dog,cat".Split(',')
//! let split = deconstruct::Method::instance(
//!     Type::string(),
//!     "Split",
//!     [Type::char()],
//!     Type::array(Type::string()),
//! );
//! let e = Expr::call(Some(Expr::constant("dog,cat")), split, [Expr::constant(',')]).unwrap();
//!
//! // Replace the call with the array it evaluates to.
//! let rewritten = e.transform_ex(|view| match &view {
//!     View::Call(call) => match call.deconstruct() {
//!         (Some(View::Constant(s)), m, [View::Constant(sep)]) if m.name() == "Split" => {
//!             let (Value::Str(s), Value::Char(sep)) = (s.value(), sep.value()) else {
//!                 return view.expr().clone();
//!             };
//!             Expr::new_array_init(Type::string(), s.split(*sep).map(Expr::constant))
//!         }
//!         _ => view.expr().clone(),
//!     },
//!     _ => view.expr().clone(),
//! });
//!
//! assert_eq!(rewritten.to_string(), r#"new string[] {"dog", "cat"}"#);
//! ```
//!
//! # Crates
//!
//! 1. [`tree`]: the raw node model, node kinds, types and factories
//! 2. [`engine`]: typed views and the visit, find, transform and equality
//!    algorithms
//!
//! The most used items of both are re-exported at the root.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub use deconstruct_core as engine;
pub use deconstruct_tree as tree;

pub use deconstruct_core::{
    Direction, EqualityOptions, ExprComparer, ExprExt, ExprFolder, ExprVisitor,
    MemberBindingParts, TransformOptions, View, equals, equals_opt, equals_with, find, find_ex,
    find_node, to_view, to_view_opt, transform, transform_ex, transform_ex_with, transform_with,
    visit, visit_ex, visit_ex_while, visit_while, walk_children,
};
pub use deconstruct_tree::{
    CatchBlock, Constructor, ElementInit, Expr, ExprData, ExtensionNode, Family, GotoKind,
    LabelTarget, Member, MemberBinding, Method, NodeKind, Query, SwitchCase, Type, Value,
};
