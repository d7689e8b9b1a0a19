//! Expression tree data model.
//!
//! This crate provides the raw, immutable expression tree that the
//! deconstruction engine walks: node kinds grouped into families, static
//! types, reflection handles, constant payloads, and shared nodes with
//! per-family reconstruction.
//!
//! # Example
//!
//! ```
//! use deconstruct_tree::{Expr, Type};
//!
//! let i = Expr::parameter(Type::i32(), "i");
//! let body = Expr::multiply(i.clone(), Expr::constant(2));
//! let f = Expr::lambda(body, [i]).unwrap();
//!
//! assert_eq!(f.to_string(), "i => (i * 2)");
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod builder;
pub mod display;
pub mod error;
pub mod kind;
pub mod member;
pub mod node;
pub mod primitive;
pub mod ty;
pub mod value;

pub use error::Error;
pub use kind::{Family, NodeKind};
pub use member::{Constructor, GotoKind, LabelTarget, Member, MemberKind, Method, SymbolDocument};
pub use node::{
    BinaryExpr, BlockExpr, CallExpr, CatchBlock, ConditionalExpr, ConstantExpr, DebugInfoExpr,
    DynamicExpr, ElementInit, Expr, ExprData, ExprList, ExtensionNode, GotoExpr, IndexExpr,
    InvokeExpr, LabelExpr, LambdaExpr, ListInitExpr, LoopExpr, MemberAccessExpr, MemberBinding,
    MemberBindingData, MemberInitExpr, NewArrayExpr, NewExpr, ParameterExpr, RuntimeVariablesExpr,
    SwitchCase, SwitchExpr, TryExpr, TypeBinaryExpr, UnaryExpr,
};
pub use primitive::Primitive;
pub use ty::{Type, TypeData};
pub use value::{Opaque, Query, Value};

static_assertions::assert_impl_all!(Expr: Send, Sync, Clone);
static_assertions::assert_impl_all!(Type: Send, Sync, Clone);
