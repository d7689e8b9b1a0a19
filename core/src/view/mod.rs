//! Typed views over raw nodes.
//!
//! [`to_view`] wraps a node in the [`View`] variant named after its kind.
//! Each variant carries a family view that exposes the node's scalar fields
//! directly and its children as views, resolved on first access and cached
//! for the lifetime of the view.
//!
//! # Example
//!
//! ```
//! use deconstruct_core::{View, to_view};
//! use deconstruct_tree::{Expr, Type, Value};
//!
//! let x = Expr::parameter(Type::i32(), "x");
//! let e = Expr::multiply(x, Expr::constant(0));
//!
//! let is_times_zero = match to_view(&e) {
//!     View::Multiply(m) => match m.deconstruct() {
//!         (_, View::Constant(c)) => c.value() == &Value::I32(0),
//!         _ => false,
//!     },
//!     _ => false,
//! };
//! assert!(is_times_zero);
//! ```

mod family;
mod nested;

#[cfg(test)]
mod tests;

pub use family::{
    BinaryView, BlockView, CallView, ConditionalView, ConstantView, DebugInfoView, DefaultView,
    DynamicView, ExtensionView, GotoView, IndexView, InvokeView, LabelView, LambdaView,
    ListInitView, LoopView, MemberInitView, MemberView, NewArrayView, NewView, ParameterView,
    RuntimeVariablesView, SwitchView, TryView, TypeBinaryView, UnaryView,
};
pub use nested::{
    CatchBlockView, ElementInitView, MemberBindingParts, MemberBindingView, SwitchCaseView,
};

use crate::Error;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use deconstruct_tree::{Expr, Family, NodeKind, Type};
use once_cell::unsync::OnceCell;

fn memo<'a>(cell: &'a OnceCell<Box<View>>, expr: &Expr) -> &'a View {
    cell.get_or_init(|| Box::new(to_view(expr)))
}

fn memo_opt<'a>(cell: &'a OnceCell<Option<Box<View>>>, expr: Option<&Expr>) -> Option<&'a View> {
    cell.get_or_init(|| expr.map(|e| Box::new(to_view(e)))).as_deref()
}

fn memo_list<'a>(cell: &'a OnceCell<Vec<View>>, exprs: &[Expr]) -> &'a [View] {
    cell.get_or_init(|| exprs.iter().map(to_view).collect())
}

fn memo_nested<'a, T, V>(
    cell: &'a OnceCell<Vec<V>>,
    items: &[T],
    f: impl Fn(&T) -> V,
) -> &'a [V] {
    cell.get_or_init(|| items.iter().map(f).collect())
}

/// Generates the `View` enum and the exhaustive kind dispatch.
macro_rules! views {
    ($($view:ident => [$($kind:ident),* $(,)?]),* $(,)?) => {
        /// A node wrapped in the typed view of its kind.
        ///
        /// Two views are equal when they wrap the same node.
        #[derive(Clone, PartialEq, Eq)]
        pub enum View {
            $($($kind($view),)*)*
        }

        impl View {
            /// The wrapped node.
            pub fn expr(&self) -> &Expr {
                match self {
                    $($(View::$kind(v))|* => v.expr(),)*
                }
            }

            pub fn into_expr(self) -> Expr {
                match self {
                    $($(View::$kind(v))|* => v.into(),)*
                }
            }
        }

        /// Wrap a node in the view matching its kind.
        ///
        /// # Panics
        ///
        /// Panics if the node's data does not belong to its kind's family.
        /// Nodes built through the tree crate's factories never do.
        pub fn to_view(expr: &Expr) -> View {
            match expr.kind() {
                $($(NodeKind::$kind => View::$kind(dispatch(expr)),)*)*
            }
        }
    };
}

views! {
    BinaryView => [
        Add, AddChecked, And, AndAlso, ArrayIndex, Assign, Coalesce, Divide, Equal,
        ExclusiveOr, GreaterThan, GreaterThanOrEqual, LeftShift, LessThan, LessThanOrEqual,
        Modulo, Multiply, MultiplyChecked, NotEqual, Or, OrElse, Power, RightShift,
        Subtract, SubtractChecked, AddAssign, AndAssign, DivideAssign, ExclusiveOrAssign,
        LeftShiftAssign, ModuloAssign, MultiplyAssign, OrAssign, PowerAssign,
        RightShiftAssign, SubtractAssign, AddAssignChecked, MultiplyAssignChecked,
        SubtractAssignChecked,
    ],
    UnaryView => [
        ArrayLength, Convert, ConvertChecked, Negate, NegateChecked, Not, Quote, TypeAs,
        UnaryPlus, Decrement, Increment, IsFalse, IsTrue, Throw, Unbox, PreIncrementAssign,
        PreDecrementAssign, PostIncrementAssign, PostDecrementAssign, OnesComplement,
    ],
    CallView => [Call],
    ConditionalView => [Conditional],
    InvokeView => [Invoke],
    LambdaView => [Lambda],
    ListInitView => [ListInit],
    MemberView => [MemberAccess],
    MemberInitView => [MemberInit],
    NewView => [New],
    NewArrayView => [NewArrayBounds, NewArrayInit],
    TypeBinaryView => [TypeEqual, TypeIs],
    BlockView => [Block],
    DynamicView => [Dynamic],
    GotoView => [Goto],
    IndexView => [Index],
    LabelView => [Label],
    RuntimeVariablesView => [RuntimeVariables],
    LoopView => [Loop],
    SwitchView => [Switch],
    TryView => [Try],
    ExtensionView => [Extension],
    DebugInfoView => [DebugInfo],
    ParameterView => [Parameter],
    ConstantView => [Constant],
    DefaultView => [Default],
}

fn dispatch<V>(expr: &Expr) -> V
where
    V: for<'a> TryFrom<&'a Expr, Error = Error>,
{
    match V::try_from(expr) {
        Ok(view) => view,
        Err(err) => unsupported(expr, err),
    }
}

#[cold]
fn unsupported(expr: &Expr, err: Error) -> ! {
    tracing::error!(kind = %expr.kind(), error = %err, "node data does not match its kind");
    panic!("cannot dispatch {} node: {}", expr.kind(), err)
}

/// Wrap an optional node; absent stays absent.
pub fn to_view_opt(expr: Option<&Expr>) -> Option<View> {
    expr.map(to_view)
}

impl View {
    pub fn kind(&self) -> NodeKind {
        self.expr().kind()
    }

    pub fn family(&self) -> Family {
        self.kind().family()
    }

    pub fn ty(&self) -> &Type {
        self.expr().ty()
    }
}

impl From<View> for Expr {
    fn from(view: View) -> Expr {
        view.into_expr()
    }
}

impl From<&Expr> for View {
    fn from(expr: &Expr) -> View {
        to_view(expr)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.expr())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.expr(), f)
    }
}
