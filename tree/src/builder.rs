//! Node factories.
//!
//! Factories infer each node's static type from its operands. Factories
//! that can be handed inconsistent input validate it and return
//! [`Error`]; the rest are infallible.

use crate::node::{
    BinaryExpr, BlockExpr, CallExpr, ConditionalExpr, ConstantExpr, DebugInfoExpr, DynamicExpr,
    ExprData, GotoExpr, IndexExpr, InvokeExpr, LabelExpr, LambdaExpr, ListInitExpr, LoopExpr,
    MemberAccessExpr, MemberInitExpr, NewArrayExpr, NewExpr, ParameterExpr,
    RuntimeVariablesExpr, SwitchExpr, TryExpr, TypeBinaryExpr, UnaryExpr,
};
use crate::{
    CatchBlock, Constructor, ElementInit, Error, Expr, ExprList, ExtensionNode, Family, GotoKind,
    LabelTarget, Member, MemberBinding, MemberBindingData, Method, NodeKind, SymbolDocument,
    SwitchCase, Type, Value,
};
use alloc::sync::Arc;

fn list(items: impl IntoIterator<Item = Expr>) -> ExprList {
    items.into_iter().collect()
}

fn expect_family(kind: NodeKind, expected: Family) -> Result<(), Error> {
    if kind.family() == expected {
        Ok(())
    } else {
        Err(Error::KindMismatch { kind, expected })
    }
}

fn expect_count(expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ArgumentCount { expected, found })
    }
}

fn expect_parameters(parameters: &ExprList) -> Result<(), Error> {
    match parameters.iter().find(|p| p.kind() != NodeKind::Parameter) {
        Some(p) => Err(Error::NotAParameter(p.kind())),
        None => Ok(()),
    }
}

// ============================================================================
// Leaves
// ============================================================================

impl Expr {
    pub fn parameter(ty: Type, name: impl AsRef<str>) -> Expr {
        Self::make_parameter(ty, Some(name.as_ref()), false)
    }

    /// A parameter passed by reference.
    pub fn by_ref_parameter(ty: Type, name: impl AsRef<str>) -> Expr {
        Self::make_parameter(ty, Some(name.as_ref()), true)
    }

    pub fn make_parameter(ty: Type, name: Option<&str>, by_ref: bool) -> Expr {
        Expr::from_parts(
            NodeKind::Parameter,
            ty,
            ExprData::Parameter(ParameterExpr {
                name: name.map(Arc::from),
                by_ref,
            }),
        )
    }

    /// A constant typed after its value.
    pub fn constant(value: impl Into<Value>) -> Expr {
        let value = value.into();
        let ty = value.natural_type();
        Self::constant_typed(value, ty)
    }

    pub fn constant_typed(value: impl Into<Value>, ty: Type) -> Expr {
        Expr::from_parts(
            NodeKind::Constant,
            ty,
            ExprData::Constant(ConstantExpr {
                value: value.into(),
            }),
        )
    }

    /// The default value of `ty`.
    pub fn default_value(ty: Type) -> Expr {
        Expr::from_parts(NodeKind::Default, ty, ExprData::Default)
    }

    /// A void default, used as an empty statement.
    pub fn empty() -> Expr {
        Self::default_value(Type::void())
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! binary_shortcuts {
    ($($name:ident => $kind:ident),* $(,)?) => {
        #[allow(clippy::should_implement_trait)]
        impl Expr {
            $(
                pub fn $name(left: Expr, right: Expr) -> Expr {
                    Self::binary_node(NodeKind::$kind, left, right, false, None, None)
                }
            )*
        }
    };
}

binary_shortcuts! {
    add => Add,
    subtract => Subtract,
    multiply => Multiply,
    divide => Divide,
    modulo => Modulo,
    power => Power,
    equal => Equal,
    not_equal => NotEqual,
    less_than => LessThan,
    less_than_or_equal => LessThanOrEqual,
    greater_than => GreaterThan,
    greater_than_or_equal => GreaterThanOrEqual,
    and_also => AndAlso,
    or_else => OrElse,
    assign => Assign,
    coalesce => Coalesce,
    array_index => ArrayIndex,
}

impl Expr {
    /// Binary node of any kind in the binary family.
    pub fn make_binary(kind: NodeKind, left: Expr, right: Expr) -> Result<Expr, Error> {
        Self::make_binary_full(kind, left, right, false, None, None)
    }

    pub fn make_binary_full(
        kind: NodeKind,
        left: Expr,
        right: Expr,
        lifted_to_null: bool,
        method: Option<Method>,
        conversion: Option<Expr>,
    ) -> Result<Expr, Error> {
        expect_family(kind, Family::Binary)?;
        Ok(Self::binary_node(
            kind,
            left,
            right,
            lifted_to_null,
            method,
            conversion,
        ))
    }

    fn binary_node(
        kind: NodeKind,
        left: Expr,
        right: Expr,
        lifted_to_null: bool,
        method: Option<Method>,
        conversion: Option<Expr>,
    ) -> Expr {
        let ty = if kind.is_comparison() {
            if lifted_to_null {
                Type::nullable(Type::bool())
            } else {
                Type::bool()
            }
        } else if let Some(method) = &method {
            method.return_type().clone()
        } else {
            match kind {
                NodeKind::ArrayIndex => left.ty().element().cloned().unwrap_or_else(Type::object),
                NodeKind::Coalesce => right.ty().clone(),
                _ => left.ty().clone(),
            }
        };
        Expr::from_parts(
            kind,
            ty,
            ExprData::Binary(BinaryExpr {
                left,
                right,
                method,
                conversion,
                lifted_to_null,
            }),
        )
    }

    /// Unary node of any kind in the unary family.
    ///
    /// `operand` may only be absent for a rethrowing `Throw`.
    pub fn make_unary(
        kind: NodeKind,
        operand: Option<Expr>,
        ty: Type,
        method: Option<Method>,
    ) -> Result<Expr, Error> {
        expect_family(kind, Family::Unary)?;
        Ok(Self::unary_node(kind, operand, ty, method))
    }

    fn unary_node(kind: NodeKind, operand: Option<Expr>, ty: Type, method: Option<Method>) -> Expr {
        Expr::from_parts(kind, ty, ExprData::Unary(UnaryExpr { operand, method }))
    }

    pub fn negate(operand: Expr) -> Expr {
        let ty = operand.ty().clone();
        Self::unary_node(NodeKind::Negate, Some(operand), ty, None)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Expr {
        let ty = operand.ty().clone();
        Self::unary_node(NodeKind::Not, Some(operand), ty, None)
    }

    pub fn convert(operand: Expr, ty: Type) -> Expr {
        Self::unary_node(NodeKind::Convert, Some(operand), ty, None)
    }

    pub fn type_as(operand: Expr, ty: Type) -> Expr {
        Self::unary_node(NodeKind::TypeAs, Some(operand), ty, None)
    }

    /// Quote a lambda so that it is passed around as a tree.
    pub fn quote(lambda: Expr) -> Expr {
        let ty = Type::generic("Expression", [lambda.ty().clone()]);
        Self::unary_node(NodeKind::Quote, Some(lambda), ty, None)
    }

    pub fn array_length(array: Expr) -> Expr {
        Self::unary_node(NodeKind::ArrayLength, Some(array), Type::i32(), None)
    }

    pub fn throw(exception: Expr) -> Expr {
        Self::unary_node(NodeKind::Throw, Some(exception), Type::void(), None)
    }

    /// `throw;` inside a catch block.
    pub fn rethrow() -> Expr {
        Self::unary_node(NodeKind::Throw, None, Type::void(), None)
    }

    pub fn type_is(expression: Expr, type_operand: Type) -> Expr {
        Self::type_binary(NodeKind::TypeIs, expression, type_operand)
    }

    pub fn type_equal(expression: Expr, type_operand: Type) -> Expr {
        Self::type_binary(NodeKind::TypeEqual, expression, type_operand)
    }

    fn type_binary(kind: NodeKind, expression: Expr, type_operand: Type) -> Expr {
        Expr::from_parts(
            kind,
            Type::bool(),
            ExprData::TypeBinary(TypeBinaryExpr {
                expression,
                type_operand,
            }),
        )
    }
}

// ============================================================================
// Calls, functions and control flow
// ============================================================================

impl Expr {
    /// Method call; `object` is `None` for static methods.
    pub fn call(
        object: Option<Expr>,
        method: Method,
        arguments: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, Error> {
        let arguments = list(arguments);
        expect_count(method.parameters().len(), arguments.len())?;
        Ok(Expr::from_parts(
            NodeKind::Call,
            method.return_type().clone(),
            ExprData::Call(CallExpr {
                method,
                object,
                arguments,
            }),
        ))
    }

    pub fn conditional(test: Expr, if_true: Expr, if_false: Expr) -> Expr {
        let ty = if_true.ty().clone();
        Self::conditional_typed(test, if_true, if_false, ty)
    }

    pub fn conditional_typed(test: Expr, if_true: Expr, if_false: Expr, ty: Type) -> Expr {
        Expr::from_parts(
            NodeKind::Conditional,
            ty,
            ExprData::Conditional(ConditionalExpr {
                test,
                if_true,
                if_false,
            }),
        )
    }

    /// Apply a delegate or lambda to arguments.
    pub fn invoke(expression: Expr, arguments: impl IntoIterator<Item = Expr>) -> Expr {
        let ty = expression
            .ty()
            .return_type()
            .cloned()
            .unwrap_or_else(Type::object);
        Expr::from_parts(
            NodeKind::Invoke,
            ty,
            ExprData::Invoke(InvokeExpr {
                expression,
                arguments: list(arguments),
            }),
        )
    }

    pub fn lambda(body: Expr, parameters: impl IntoIterator<Item = Expr>) -> Result<Expr, Error> {
        Self::make_lambda(None, body, parameters, false)
    }

    pub fn make_lambda(
        name: Option<&str>,
        body: Expr,
        parameters: impl IntoIterator<Item = Expr>,
        tail_call: bool,
    ) -> Result<Expr, Error> {
        let parameters = list(parameters);
        expect_parameters(&parameters)?;
        let ty = Type::function(
            parameters.iter().map(|p| p.ty().clone()),
            body.ty().clone(),
        );
        Ok(Expr::from_parts(
            NodeKind::Lambda,
            ty,
            ExprData::Lambda(LambdaExpr {
                name: name.map(Arc::from),
                body,
                parameters,
                tail_call,
            }),
        ))
    }

    /// Sequence of expressions with scoped variables; typed after the last
    /// expression.
    pub fn block(
        variables: impl IntoIterator<Item = Expr>,
        expressions: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, Error> {
        let variables = list(variables);
        let expressions = list(expressions);
        expect_parameters(&variables)?;
        let ty = match expressions.last() {
            Some(last) => last.ty().clone(),
            None => return Err(Error::EmptyBlock),
        };
        Ok(Expr::from_parts(
            NodeKind::Block,
            ty,
            ExprData::Block(BlockExpr {
                variables,
                expressions,
            }),
        ))
    }

    pub fn make_goto(kind: GotoKind, target: LabelTarget, value: Option<Expr>) -> Expr {
        Expr::from_parts(
            NodeKind::Goto,
            Type::void(),
            ExprData::Goto(GotoExpr {
                kind,
                target,
                value,
            }),
        )
    }

    pub fn label(target: LabelTarget, default_value: Option<Expr>) -> Expr {
        let ty = target.ty().clone();
        Expr::from_parts(
            NodeKind::Label,
            ty,
            ExprData::Label(LabelExpr {
                target,
                default_value,
            }),
        )
    }

    /// Infinite loop; typed after the break label.
    pub fn loop_expr(
        body: Expr,
        break_label: Option<LabelTarget>,
        continue_label: Option<LabelTarget>,
    ) -> Expr {
        let ty = break_label
            .as_ref()
            .map(|label| label.ty().clone())
            .unwrap_or_else(Type::void);
        Expr::from_parts(
            NodeKind::Loop,
            ty,
            ExprData::Loop(LoopExpr {
                body,
                break_label,
                continue_label,
            }),
        )
    }

    pub fn switch(
        switch_value: Expr,
        cases: impl IntoIterator<Item = SwitchCase>,
        default_body: Option<Expr>,
        comparison: Option<Method>,
    ) -> Expr {
        let cases: Arc<[SwitchCase]> = cases.into_iter().collect();
        let ty = cases
            .first()
            .map(|case| case.body().ty().clone())
            .or_else(|| default_body.as_ref().map(|body| body.ty().clone()))
            .unwrap_or_else(Type::void);
        Expr::from_parts(
            NodeKind::Switch,
            ty,
            ExprData::Switch(SwitchExpr {
                switch_value,
                cases,
                default_body,
                comparison,
            }),
        )
    }

    pub fn make_try(
        body: Expr,
        handlers: impl IntoIterator<Item = CatchBlock>,
        finally: Option<Expr>,
        fault: Option<Expr>,
    ) -> Expr {
        let ty = body.ty().clone();
        Expr::from_parts(
            NodeKind::Try,
            ty,
            ExprData::Try(TryExpr {
                body,
                handlers: handlers.into_iter().collect(),
                finally,
                fault,
            }),
        )
    }

    /// Late-bound operation dispatched through `binder`.
    pub fn dynamic(
        binder: impl AsRef<str>,
        delegate_type: Type,
        arguments: impl IntoIterator<Item = Expr>,
    ) -> Expr {
        let ty = delegate_type
            .return_type()
            .cloned()
            .unwrap_or_else(Type::object);
        Expr::from_parts(
            NodeKind::Dynamic,
            ty,
            ExprData::Dynamic(DynamicExpr {
                binder: Arc::from(binder.as_ref()),
                delegate_type,
                arguments: list(arguments),
            }),
        )
    }

    pub fn runtime_variables(variables: impl IntoIterator<Item = Expr>) -> Result<Expr, Error> {
        let variables = list(variables);
        expect_parameters(&variables)?;
        Ok(Expr::from_parts(
            NodeKind::RuntimeVariables,
            Type::named("RuntimeVariables"),
            ExprData::RuntimeVariables(RuntimeVariablesExpr { variables }),
        ))
    }

    pub fn extension(node: impl ExtensionNode + 'static) -> Expr {
        let ty = node.ty();
        Expr::from_parts(NodeKind::Extension, ty, ExprData::Extension(Arc::new(node)))
    }

    pub fn debug_info(
        document: SymbolDocument,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Expr {
        Expr::from_parts(
            NodeKind::DebugInfo,
            Type::void(),
            ExprData::DebugInfo(DebugInfoExpr {
                document,
                start_line,
                start_column,
                end_line,
                end_column,
            }),
        )
    }

    /// Sequence point that clears any active debug info.
    pub fn clear_debug_info(document: SymbolDocument) -> Expr {
        let line = DebugInfoExpr::CLEAR_LINE;
        Self::debug_info(document, line, 0, line, 0)
    }
}

// ============================================================================
// Members, objects and arrays
// ============================================================================

impl Expr {
    /// Field or property read; `expression` is `None` for static members.
    pub fn member_access(expression: Option<Expr>, member: Member) -> Expr {
        let ty = member.member_type().clone();
        Expr::from_parts(
            NodeKind::MemberAccess,
            ty,
            ExprData::MemberAccess(MemberAccessExpr { expression, member }),
        )
    }

    /// Indexed access; an absent indexer means multi-dimensional array access.
    pub fn index(
        object: Expr,
        indexer: Option<Member>,
        arguments: impl IntoIterator<Item = Expr>,
    ) -> Expr {
        let ty = match &indexer {
            Some(indexer) => indexer.member_type().clone(),
            None => object.ty().element().cloned().unwrap_or_else(Type::object),
        };
        Expr::from_parts(
            NodeKind::Index,
            ty,
            ExprData::Index(IndexExpr {
                object,
                indexer,
                arguments: list(arguments),
            }),
        )
    }

    pub fn new(
        constructor: Constructor,
        arguments: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, Error> {
        let arguments = list(arguments);
        expect_count(constructor.parameters().len(), arguments.len())?;
        Ok(Self::new_node(
            constructor.declaring_type().clone(),
            Some(constructor),
            arguments,
            None,
        ))
    }

    /// Constructor call whose arguments initialize `members`, as produced by
    /// anonymous types.
    pub fn new_with_members(
        constructor: Constructor,
        arguments: impl IntoIterator<Item = Expr>,
        members: impl IntoIterator<Item = Member>,
    ) -> Result<Expr, Error> {
        let arguments = list(arguments);
        let members: Arc<[Member]> = members.into_iter().collect();
        expect_count(constructor.parameters().len(), arguments.len())?;
        expect_count(arguments.len(), members.len())?;
        Ok(Self::new_node(
            constructor.declaring_type().clone(),
            Some(constructor),
            arguments,
            Some(members),
        ))
    }

    /// Zero-initialized value type, created without a constructor.
    pub fn new_value(ty: Type) -> Expr {
        Self::new_node(ty, None, list([]), None)
    }

    fn new_node(
        ty: Type,
        constructor: Option<Constructor>,
        arguments: ExprList,
        members: Option<Arc<[Member]>>,
    ) -> Expr {
        Expr::from_parts(
            NodeKind::New,
            ty,
            ExprData::New(NewExpr {
                constructor,
                arguments,
                members,
            }),
        )
    }

    pub fn list_init(
        new_expression: Expr,
        initializers: impl IntoIterator<Item = ElementInit>,
    ) -> Result<Expr, Error> {
        if new_expression.kind() != NodeKind::New {
            return Err(Error::NotANewExpression(new_expression.kind()));
        }
        let ty = new_expression.ty().clone();
        Ok(Expr::from_parts(
            NodeKind::ListInit,
            ty,
            ExprData::ListInit(ListInitExpr {
                new_expression,
                initializers: initializers.into_iter().collect(),
            }),
        ))
    }

    pub fn member_init(
        new_expression: Expr,
        bindings: impl IntoIterator<Item = MemberBinding>,
    ) -> Result<Expr, Error> {
        if new_expression.kind() != NodeKind::New {
            return Err(Error::NotANewExpression(new_expression.kind()));
        }
        let ty = new_expression.ty().clone();
        Ok(Expr::from_parts(
            NodeKind::MemberInit,
            ty,
            ExprData::MemberInit(MemberInitExpr {
                new_expression,
                bindings: bindings.into_iter().collect(),
            }),
        ))
    }

    /// One-dimensional array filled with `elements`.
    pub fn new_array_init(element_type: Type, elements: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::from_parts(
            NodeKind::NewArrayInit,
            Type::array(element_type),
            ExprData::NewArray(NewArrayExpr {
                expressions: list(elements),
            }),
        )
    }

    /// Array with one dimension per bound.
    pub fn new_array_bounds(element_type: Type, bounds: impl IntoIterator<Item = Expr>) -> Expr {
        let expressions = list(bounds);
        let rank = u8::try_from(expressions.len()).unwrap_or(u8::MAX);
        Expr::from_parts(
            NodeKind::NewArrayBounds,
            Type::array_of_rank(element_type, rank),
            ExprData::NewArray(NewArrayExpr { expressions }),
        )
    }
}

impl MemberBinding {
    /// `member = expression`
    pub fn assignment(member: Member, expression: Expr) -> Self {
        Self::new(MemberBindingData::Assignment { member, expression })
    }

    /// `member = { Add(...), ... }`
    pub fn list(member: Member, initializers: impl IntoIterator<Item = ElementInit>) -> Self {
        Self::new(MemberBindingData::ListBinding {
            member,
            initializers: initializers.into_iter().collect(),
        })
    }

    /// `member = { nested bindings }`
    pub fn nested(member: Member, bindings: impl IntoIterator<Item = MemberBinding>) -> Self {
        Self::new(MemberBindingData::MemberBinding {
            member,
            bindings: bindings.into_iter().collect(),
        })
    }
}

impl CatchBlock {
    /// Handler for exceptions of type `test`, bound to `variable` if given.
    pub fn catch(test: Type, variable: Option<Expr>, body: Expr) -> Self {
        Self::new(test, variable, None, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, TypeData};

    #[test]
    fn test_binary_types() {
        let a = Expr::parameter(Type::i32(), "a");
        let b = Expr::parameter(Type::i32(), "b");
        assert_eq!(Expr::add(a.clone(), b.clone()).ty(), &Type::i32());
        assert_eq!(Expr::less_than(a.clone(), b.clone()).ty(), &Type::bool());

        let lifted =
            Expr::make_binary_full(NodeKind::Equal, a.clone(), b.clone(), true, None, None)
                .unwrap();
        assert_eq!(lifted.ty(), &Type::nullable(Type::bool()));

        let arr = Expr::parameter(Type::array(Type::string()), "arr");
        assert_eq!(Expr::array_index(arr, a).ty(), &Type::string());
    }

    #[test]
    fn test_make_binary_rejects_other_families() {
        let a = Expr::constant(1);
        let err = Expr::make_binary(NodeKind::Negate, a.clone(), a).unwrap_err();
        assert_eq!(
            err,
            Error::KindMismatch {
                kind: NodeKind::Negate,
                expected: Family::Binary
            }
        );
    }

    #[test]
    fn test_lambda_type_and_parameters() {
        let x = Expr::parameter(Type::i64(), "x");
        let f = Expr::lambda(Expr::negate(x.clone()), [x]).unwrap();
        match f.ty().data() {
            TypeData::Function { params, ret } => {
                assert_eq!(params.as_ref(), &[Type::i64()]);
                assert_eq!(ret, &Type::i64());
            }
            other => panic!("unexpected type {:?}", other),
        }

        let err = Expr::lambda(Expr::constant(1), [Expr::constant(2)]).unwrap_err();
        assert_eq!(err, Error::NotAParameter(NodeKind::Constant));
    }

    #[test]
    fn test_call_checks_argument_count() {
        let split = Method::instance(
            Type::string(),
            "Split",
            [Type::array(Type::char())],
            Type::array(Type::string()),
        );
        let s = Expr::constant("a,b");
        let err = Expr::call(Some(s.clone()), split.clone(), []).unwrap_err();
        assert_eq!(
            err,
            Error::ArgumentCount {
                expected: 1,
                found: 0
            }
        );

        let sep = Expr::new_array_init(Type::char(), [Expr::constant(',')]);
        let call = Expr::call(Some(s), split, [sep]).unwrap();
        assert_eq!(call.ty(), &Type::array(Type::string()));
    }

    #[test]
    fn test_initializers_require_new() {
        let list_ty = Type::generic("List", [Type::i32()]);
        let add = Method::instance(list_ty.clone(), "Add", [Type::i32()], Type::void());
        let init = ElementInit::new(add, [Expr::constant(1)]);

        let err = Expr::list_init(Expr::default_value(list_ty.clone()), [init.clone()]);
        assert_eq!(err.unwrap_err(), Error::NotANewExpression(NodeKind::Default));

        let new = Expr::new(Constructor::new(list_ty.clone(), []), []).unwrap();
        let list = Expr::list_init(new, [init]).unwrap();
        assert_eq!(list.ty(), &list_ty);
    }

    #[test]
    fn test_block_needs_expressions() {
        assert_eq!(Expr::block([], []).unwrap_err(), Error::EmptyBlock);
        let v = Expr::parameter(Type::f64(), "v");
        let block = Expr::block([v.clone()], [Expr::assign(v.clone(), Expr::constant(1.5)), v])
            .unwrap();
        assert_eq!(block.ty(), &Type::f64());
    }

    #[test]
    fn test_new_array_bounds_rank() {
        let arr = Expr::new_array_bounds(
            Type::primitive(Primitive::U8),
            [Expr::constant(2), Expr::constant(3)],
        );
        assert_eq!(arr.kind(), NodeKind::NewArrayBounds);
        assert_eq!(
            arr.ty(),
            &Type::array_of_rank(Type::primitive(Primitive::U8), 2)
        );
    }

    #[test]
    fn test_clear_debug_info() {
        let doc = SymbolDocument::new("query.cs");
        let info = Expr::clear_debug_info(doc);
        match info.data() {
            ExprData::DebugInfo(data) => assert!(data.is_clear()),
            _ => panic!("expected debug info"),
        }
    }
}
