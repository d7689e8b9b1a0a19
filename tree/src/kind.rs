//! Node kinds and the families that group them.
//!
//! Every node carries exactly one [`NodeKind`]. Kinds sharing the same shape
//! of children belong to one [`Family`]; the family decides which branch of
//! a generic algorithm applies to a node.

use core::fmt;

/// The shape of a node's children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// Left, right and an optional conversion lambda.
    Binary,
    /// A single (sometimes absent) operand.
    Unary,
    Call,
    Conditional,
    Invoke,
    Lambda,
    ListInit,
    MemberAccess,
    MemberInit,
    New,
    /// Both `NewArrayBounds` and `NewArrayInit`.
    NewArray,
    /// Both `TypeEqual` and `TypeIs`.
    TypeBinary,
    Block,
    Dynamic,
    Goto,
    Index,
    Label,
    RuntimeVariables,
    Loop,
    Switch,
    Try,
    Extension,
    DebugInfo,
    Parameter,
    Constant,
    Default,
}

macro_rules! node_kinds {
    ($($family:ident => [$($kind:ident),+ $(,)?]),+ $(,)?) => {
        /// Every kind of node the tree can hold.
        ///
        /// The set is closed: adding a kind is a breaking change that every
        /// exhaustive `match` in the engine will flag at compile time.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum NodeKind {
            $($($kind,)+)+
        }

        impl NodeKind {
            /// All kinds, grouped by family.
            pub const ALL: &'static [NodeKind] = &[$($(NodeKind::$kind,)+)+];

            /// The family this kind belongs to.
            pub const fn family(self) -> Family {
                match self {
                    $($(NodeKind::$kind)|+ => Family::$family,)+
                }
            }

            /// The kind's name, as used in diagnostics.
            pub const fn name(self) -> &'static str {
                match self {
                    $($(NodeKind::$kind => stringify!($kind),)+)+
                }
            }
        }
    };
}

node_kinds! {
    Binary => [
        Add, AddChecked, And, AndAlso, ArrayIndex, Assign, Coalesce, Divide, Equal,
        ExclusiveOr, GreaterThan, GreaterThanOrEqual, LeftShift, LessThan, LessThanOrEqual,
        Modulo, Multiply, MultiplyChecked, NotEqual, Or, OrElse, Power, RightShift,
        Subtract, SubtractChecked, AddAssign, AndAssign, DivideAssign, ExclusiveOrAssign,
        LeftShiftAssign, ModuloAssign, MultiplyAssign, OrAssign, PowerAssign,
        RightShiftAssign, SubtractAssign, AddAssignChecked, MultiplyAssignChecked,
        SubtractAssignChecked,
    ],
    Unary => [
        ArrayLength, Convert, ConvertChecked, Negate, NegateChecked, Not, Quote, TypeAs,
        UnaryPlus, Decrement, Increment, IsFalse, IsTrue, Throw, Unbox, PreIncrementAssign,
        PreDecrementAssign, PostIncrementAssign, PostDecrementAssign, OnesComplement,
    ],
    Call => [Call],
    Conditional => [Conditional],
    Invoke => [Invoke],
    Lambda => [Lambda],
    ListInit => [ListInit],
    MemberAccess => [MemberAccess],
    MemberInit => [MemberInit],
    New => [New],
    NewArray => [NewArrayBounds, NewArrayInit],
    TypeBinary => [TypeEqual, TypeIs],
    Block => [Block],
    Dynamic => [Dynamic],
    Goto => [Goto],
    Index => [Index],
    Label => [Label],
    RuntimeVariables => [RuntimeVariables],
    Loop => [Loop],
    Switch => [Switch],
    Try => [Try],
    Extension => [Extension],
    DebugInfo => [DebugInfo],
    Parameter => [Parameter],
    Constant => [Constant],
    Default => [Default],
}

impl NodeKind {
    /// Returns true for binary kinds whose result is always `bool`.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            NodeKind::Equal
                | NodeKind::NotEqual
                | NodeKind::GreaterThan
                | NodeKind::GreaterThanOrEqual
                | NodeKind::LessThan
                | NodeKind::LessThanOrEqual
        )
    }

    /// Returns true for kinds that write back to their left operand.
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            NodeKind::Assign
                | NodeKind::AddAssign
                | NodeKind::AndAssign
                | NodeKind::DivideAssign
                | NodeKind::ExclusiveOrAssign
                | NodeKind::LeftShiftAssign
                | NodeKind::ModuloAssign
                | NodeKind::MultiplyAssign
                | NodeKind::OrAssign
                | NodeKind::PowerAssign
                | NodeKind::RightShiftAssign
                | NodeKind::SubtractAssign
                | NodeKind::AddAssignChecked
                | NodeKind::MultiplyAssignChecked
                | NodeKind::SubtractAssignChecked
                | NodeKind::PreIncrementAssign
                | NodeKind::PreDecrementAssign
                | NodeKind::PostIncrementAssign
                | NodeKind::PostDecrementAssign
        )
    }
}

impl Family {
    /// Iterate over the kinds belonging to this family.
    pub fn kinds(self) -> impl Iterator<Item = NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.family() == self)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(NodeKind::ALL.len(), 85);
        assert_eq!(Family::Binary.kinds().count(), 39);
        assert_eq!(Family::Unary.kinds().count(), 20);
        assert_eq!(Family::NewArray.kinds().count(), 2);
        assert_eq!(Family::TypeBinary.kinds().count(), 2);
    }

    #[test]
    fn test_every_kind_has_distinct_name() {
        let mut names: Vec<&str> = NodeKind::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_family_of_node_specific_kinds() {
        assert_eq!(NodeKind::MemberAccess.family(), Family::MemberAccess);
        assert_eq!(NodeKind::NewArrayBounds.family(), Family::NewArray);
        assert_eq!(NodeKind::TypeIs.family(), Family::TypeBinary);
        assert_eq!(NodeKind::Default.family(), Family::Default);
        assert_eq!(NodeKind::Throw.family(), Family::Unary);
        assert_eq!(NodeKind::Coalesce.family(), Family::Binary);
    }

    #[test]
    fn test_comparison_kinds() {
        assert!(NodeKind::LessThan.is_comparison());
        assert!(!NodeKind::Add.is_comparison());
        assert!(NodeKind::AddAssign.is_assignment());
        assert!(!NodeKind::Negate.is_assignment());
    }
}
