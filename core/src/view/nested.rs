//! Views over the structures nested inside initializer, switch and try nodes.

use super::{View, memo, memo_list, memo_nested, memo_opt};
use deconstruct_tree::{
    CatchBlock, ElementInit, Member, MemberBinding, MemberBindingData, Method, SwitchCase, Type,
};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use once_cell::unsync::OnceCell;

/// One `Add(...)` call of a collection initializer.
pub struct ElementInitView {
    init: ElementInit,
    arguments: OnceCell<Vec<View>>,
}

impl ElementInitView {
    pub(crate) fn new(init: &ElementInit) -> Self {
        Self {
            init: init.clone(),
            arguments: OnceCell::new(),
        }
    }

    pub fn init(&self) -> &ElementInit {
        &self.init
    }

    pub fn add_method(&self) -> &Method {
        self.init.add_method()
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, self.init.arguments())
    }

    pub fn deconstruct(&self) -> (&Method, &[View]) {
        (self.add_method(), self.arguments())
    }
}

/// Destructured member binding, as returned by [`MemberBindingView::deconstruct`].
#[derive(Debug, Clone, Copy)]
pub enum MemberBindingParts<'a> {
    Assignment {
        member: &'a Member,
        expression: &'a View,
    },
    ListBinding {
        member: &'a Member,
        initializers: &'a [ElementInitView],
    },
    MemberBinding {
        member: &'a Member,
        bindings: &'a [MemberBindingView],
    },
}

/// One binding of a member initializer; nested bindings are views too.
pub struct MemberBindingView {
    binding: MemberBinding,
    expression: OnceCell<Box<View>>,
    initializers: OnceCell<Vec<ElementInitView>>,
    bindings: OnceCell<Vec<MemberBindingView>>,
}

impl MemberBindingView {
    pub(crate) fn new(binding: &MemberBinding) -> Self {
        Self {
            binding: binding.clone(),
            expression: OnceCell::new(),
            initializers: OnceCell::new(),
            bindings: OnceCell::new(),
        }
    }

    pub fn binding(&self) -> &MemberBinding {
        &self.binding
    }

    pub fn member(&self) -> &Member {
        self.binding.member()
    }

    pub fn deconstruct(&self) -> MemberBindingParts<'_> {
        match self.binding.data() {
            MemberBindingData::Assignment { member, expression } => {
                MemberBindingParts::Assignment {
                    member,
                    expression: memo(&self.expression, expression),
                }
            }
            MemberBindingData::ListBinding {
                member,
                initializers,
            } => MemberBindingParts::ListBinding {
                member,
                initializers: memo_nested(&self.initializers, initializers, ElementInitView::new),
            },
            MemberBindingData::MemberBinding { member, bindings } => {
                MemberBindingParts::MemberBinding {
                    member,
                    bindings: memo_nested(&self.bindings, bindings, MemberBindingView::new),
                }
            }
        }
    }
}

/// One `case` of a switch.
pub struct SwitchCaseView {
    case: SwitchCase,
    test_values: OnceCell<Vec<View>>,
    body: OnceCell<Box<View>>,
}

impl SwitchCaseView {
    pub(crate) fn new(case: &SwitchCase) -> Self {
        Self {
            case: case.clone(),
            test_values: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    pub fn case(&self) -> &SwitchCase {
        &self.case
    }

    pub fn test_values(&self) -> &[View] {
        memo_list(&self.test_values, self.case.test_values())
    }

    pub fn body(&self) -> &View {
        memo(&self.body, self.case.body())
    }

    pub fn deconstruct(&self) -> (&[View], &View) {
        (self.test_values(), self.body())
    }
}

/// One handler of a try node.
pub struct CatchBlockView {
    handler: CatchBlock,
    variable: OnceCell<Option<Box<View>>>,
    filter: OnceCell<Option<Box<View>>>,
    body: OnceCell<Box<View>>,
}

impl CatchBlockView {
    pub(crate) fn new(handler: &CatchBlock) -> Self {
        Self {
            handler: handler.clone(),
            variable: OnceCell::new(),
            filter: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    pub fn handler(&self) -> &CatchBlock {
        &self.handler
    }

    /// The exception type caught.
    pub fn test(&self) -> &Type {
        self.handler.test()
    }

    pub fn variable(&self) -> Option<&View> {
        memo_opt(&self.variable, self.handler.variable())
    }

    pub fn filter(&self) -> Option<&View> {
        memo_opt(&self.filter, self.handler.filter())
    }

    pub fn body(&self) -> &View {
        memo(&self.body, self.handler.body())
    }

    pub fn deconstruct(&self) -> (&Type, Option<&View>, Option<&View>, &View) {
        (self.test(), self.variable(), self.filter(), self.body())
    }
}

macro_rules! nested_view_impls {
    ($($view:ident($field:ident)),* $(,)?) => {
        $(
            impl Clone for $view {
                fn clone(&self) -> Self {
                    Self::new(&self.$field)
                }
            }

            impl PartialEq for $view {
                fn eq(&self, other: &Self) -> bool {
                    self.$field.ptr_eq(&other.$field)
                }
            }

            impl Eq for $view {}

            impl fmt::Debug for $view {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({:?})", stringify!($view), self.$field)
                }
            }
        )*
    };
}

nested_view_impls! {
    ElementInitView(init),
    MemberBindingView(binding),
    SwitchCaseView(case),
    CatchBlockView(handler),
}

impl fmt::Display for ElementInitView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.init, f)
    }
}

impl fmt::Display for MemberBindingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.binding, f)
    }
}
