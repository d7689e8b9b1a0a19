//! One view type per node family.

use super::{
    CatchBlockView, ElementInitView, MemberBindingView, SwitchCaseView, View, memo, memo_list,
    memo_nested, memo_opt,
};
use crate::Error;
use deconstruct_tree::{
    BinaryExpr, BlockExpr, CallExpr, ConditionalExpr, ConstantExpr, Constructor, DebugInfoExpr,
    DynamicExpr, Expr, ExprData, ExtensionNode, Family, GotoExpr, GotoKind, IndexExpr,
    InvokeExpr, LabelExpr, LabelTarget, LambdaExpr, ListInitExpr, LoopExpr, Member,
    MemberAccessExpr, MemberInitExpr, Method, NewArrayExpr, NewExpr, NodeKind, ParameterExpr,
    RuntimeVariablesExpr, SwitchExpr, SymbolDocument, TryExpr, Type, TypeBinaryExpr, UnaryExpr,
    Value,
};
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use once_cell::unsync::OnceCell;

type Child = OnceCell<Box<View>>;
type OptChild = OnceCell<Option<Box<View>>>;
type Children = OnceCell<Vec<View>>;

/// Declares a family view: the wrapped node and one memo cell per child
/// accessor. Family data is read through the node itself.
macro_rules! family_view {
    (
        $(#[$meta:meta])*
        $view:ident($family:ident: $raw:ty) { $($cell:ident: $cell_ty:ty),* $(,)? }
    ) => {
        family_view! {
            $(#[$meta])*
            $view { $($cell: $cell_ty),* }
        }

        impl $view {
            fn raw(&self) -> &$raw {
                match self.expr.data() {
                    ExprData::$family(raw) => raw,
                    _ => unreachable!("views are only built over matching data"),
                }
            }
        }

        impl TryFrom<&Expr> for $view {
            type Error = Error;

            fn try_from(expr: &Expr) -> Result<Self, Error> {
                match expr.data() {
                    ExprData::$family(_) => Ok(Self::new(expr)),
                    _ => Err(Error::UnexpectedKind {
                        expected: Family::$family,
                        found: expr.kind(),
                    }),
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $view:ident { $($cell:ident: $cell_ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        pub struct $view {
            expr: Expr,
            $($cell: $cell_ty,)*
        }

        impl $view {
            fn new(expr: &Expr) -> Self {
                Self {
                    expr: expr.clone(),
                    $($cell: Default::default(),)*
                }
            }

            /// The wrapped node.
            pub fn expr(&self) -> &Expr {
                &self.expr
            }

            pub fn kind(&self) -> NodeKind {
                self.expr.kind()
            }

            pub fn ty(&self) -> &Type {
                self.expr.ty()
            }
        }

        /// A fresh view over the same node.
        impl Clone for $view {
            fn clone(&self) -> Self {
                Self::new(&self.expr)
            }
        }

        impl PartialEq for $view {
            fn eq(&self, other: &Self) -> bool {
                self.expr == other.expr
            }
        }

        impl Eq for $view {}

        impl fmt::Debug for $view {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", self.kind(), self.expr)
            }
        }

        impl fmt::Display for $view {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.expr, f)
            }
        }

        impl From<$view> for Expr {
            fn from(view: $view) -> Expr {
                view.expr
            }
        }
    };
}

impl TryFrom<&Expr> for DefaultView {
    type Error = Error;

    fn try_from(expr: &Expr) -> Result<Self, Error> {
        match expr.data() {
            ExprData::Default => Ok(Self::new(expr)),
            _ => Err(Error::UnexpectedKind {
                expected: Family::Default,
                found: expr.kind(),
            }),
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

family_view! {
    /// Arithmetic, logical, comparison, assignment and array index nodes.
    BinaryView(Binary: BinaryExpr) {
        left: Child,
        right: Child,
        conversion: OptChild,
    }
}

impl BinaryView {
    pub fn left(&self) -> &View {
        memo(&self.left, &self.raw().left)
    }

    pub fn right(&self) -> &View {
        memo(&self.right, &self.raw().right)
    }

    /// Conversion lambda of coalescing and compound assignment nodes.
    pub fn conversion(&self) -> Option<&View> {
        memo_opt(&self.conversion, self.raw().conversion.as_ref())
    }

    pub fn method(&self) -> Option<&Method> {
        self.raw().method.as_ref()
    }

    pub fn is_lifted_to_null(&self) -> bool {
        self.raw().lifted_to_null
    }

    pub fn deconstruct(&self) -> (&View, &View) {
        (self.left(), self.right())
    }
}

family_view! {
    UnaryView(Unary: UnaryExpr) {
        operand: OptChild,
    }
}

impl UnaryView {
    /// Absent only for a rethrow.
    pub fn operand(&self) -> Option<&View> {
        memo_opt(&self.operand, self.raw().operand.as_ref())
    }

    pub fn method(&self) -> Option<&Method> {
        self.raw().method.as_ref()
    }

    pub fn deconstruct(&self) -> (Option<&View>, &Type) {
        (self.operand(), self.ty())
    }
}

family_view! {
    TypeBinaryView(TypeBinary: TypeBinaryExpr) {
        expression: Child,
    }
}

impl TypeBinaryView {
    pub fn expression(&self) -> &View {
        memo(&self.expression, &self.raw().expression)
    }

    pub fn type_operand(&self) -> &Type {
        &self.raw().type_operand
    }

    pub fn deconstruct(&self) -> (&View, &Type) {
        (self.expression(), self.type_operand())
    }
}

// ============================================================================
// Calls and functions
// ============================================================================

family_view! {
    CallView(Call: CallExpr) {
        object: OptChild,
        arguments: Children,
    }
}

impl CallView {
    /// Receiver; absent for static methods.
    pub fn object(&self) -> Option<&View> {
        memo_opt(&self.object, self.raw().object.as_ref())
    }

    pub fn method(&self) -> &Method {
        &self.raw().method
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, &self.raw().arguments)
    }

    pub fn deconstruct(&self) -> (Option<&View>, &Method, &[View]) {
        (self.object(), self.method(), self.arguments())
    }
}

family_view! {
    ConditionalView(Conditional: ConditionalExpr) {
        test: Child,
        if_true: Child,
        if_false: Child,
    }
}

impl ConditionalView {
    pub fn test(&self) -> &View {
        memo(&self.test, &self.raw().test)
    }

    pub fn if_true(&self) -> &View {
        memo(&self.if_true, &self.raw().if_true)
    }

    pub fn if_false(&self) -> &View {
        memo(&self.if_false, &self.raw().if_false)
    }

    pub fn deconstruct(&self) -> (&View, &View, &View) {
        (self.test(), self.if_true(), self.if_false())
    }
}

family_view! {
    InvokeView(Invoke: InvokeExpr) {
        expression: Child,
        arguments: Children,
    }
}

impl InvokeView {
    pub fn expression(&self) -> &View {
        memo(&self.expression, &self.raw().expression)
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, &self.raw().arguments)
    }

    pub fn deconstruct(&self) -> (&View, &[View]) {
        (self.expression(), self.arguments())
    }
}

family_view! {
    LambdaView(Lambda: LambdaExpr) {
        body: Child,
        parameters: Children,
    }
}

impl LambdaView {
    pub fn body(&self) -> &View {
        memo(&self.body, &self.raw().body)
    }

    /// Parameter views, in declaration order.
    pub fn parameters(&self) -> &[View] {
        memo_list(&self.parameters, &self.raw().parameters)
    }

    pub fn name(&self) -> Option<&str> {
        self.raw().name.as_deref()
    }

    pub fn is_tail_call(&self) -> bool {
        self.raw().tail_call
    }

    pub fn deconstruct(&self) -> (&[View], &View) {
        (self.parameters(), self.body())
    }
}

family_view! {
    DynamicView(Dynamic: DynamicExpr) {
        arguments: Children,
    }
}

impl DynamicView {
    pub fn binder(&self) -> &str {
        &self.raw().binder
    }

    pub fn delegate_type(&self) -> &Type {
        &self.raw().delegate_type
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, &self.raw().arguments)
    }

    pub fn deconstruct(&self) -> (&str, &[View]) {
        (self.binder(), self.arguments())
    }
}

// ============================================================================
// Objects, members and arrays
// ============================================================================

family_view! {
    /// Field or property access.
    MemberView(MemberAccess: MemberAccessExpr) {
        expression: OptChild,
    }
}

impl MemberView {
    /// Instance; absent for static members.
    pub fn expression(&self) -> Option<&View> {
        memo_opt(&self.expression, self.raw().expression.as_ref())
    }

    pub fn member(&self) -> &Member {
        &self.raw().member
    }

    pub fn deconstruct(&self) -> (Option<&View>, &Member) {
        (self.expression(), self.member())
    }
}

family_view! {
    NewView(New: NewExpr) {
        arguments: Children,
    }
}

impl NewView {
    pub fn constructor(&self) -> Option<&Constructor> {
        self.raw().constructor.as_ref()
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, &self.raw().arguments)
    }

    /// Members initialized by each argument, parallel to `arguments`.
    pub fn members(&self) -> Option<&[Member]> {
        self.raw().members.as_deref()
    }

    pub fn deconstruct(&self) -> (Option<&Constructor>, &[View]) {
        (self.constructor(), self.arguments())
    }
}

family_view! {
    ListInitView(ListInit: ListInitExpr) {
        new_expression: Child,
        initializers: OnceCell<Vec<ElementInitView>>,
    }
}

impl ListInitView {
    /// Always a [`View::New`].
    pub fn new_expression(&self) -> &View {
        memo(&self.new_expression, &self.raw().new_expression)
    }

    pub fn initializers(&self) -> &[ElementInitView] {
        memo_nested(&self.initializers, &self.raw().initializers, ElementInitView::new)
    }

    pub fn deconstruct(&self) -> (&View, &[ElementInitView]) {
        (self.new_expression(), self.initializers())
    }
}

family_view! {
    MemberInitView(MemberInit: MemberInitExpr) {
        new_expression: Child,
        bindings: OnceCell<Vec<MemberBindingView>>,
    }
}

impl MemberInitView {
    /// Always a [`View::New`].
    pub fn new_expression(&self) -> &View {
        memo(&self.new_expression, &self.raw().new_expression)
    }

    pub fn bindings(&self) -> &[MemberBindingView] {
        memo_nested(&self.bindings, &self.raw().bindings, MemberBindingView::new)
    }

    pub fn deconstruct(&self) -> (&View, &[MemberBindingView]) {
        (self.new_expression(), self.bindings())
    }
}

family_view! {
    /// `NewArrayInit` (elements) and `NewArrayBounds` (dimension sizes).
    NewArrayView(NewArray: NewArrayExpr) {
        expressions: Children,
    }
}

impl NewArrayView {
    pub fn expressions(&self) -> &[View] {
        memo_list(&self.expressions, &self.raw().expressions)
    }

    pub fn element_type(&self) -> Option<&Type> {
        self.ty().element()
    }

    /// Elements or dimension sizes, then the array type.
    pub fn deconstruct(&self) -> (&[View], &Type) {
        (self.expressions(), self.ty())
    }
}

family_view! {
    IndexView(Index: IndexExpr) {
        object: Child,
        arguments: Children,
    }
}

impl IndexView {
    pub fn object(&self) -> &View {
        memo(&self.object, &self.raw().object)
    }

    pub fn indexer(&self) -> Option<&Member> {
        self.raw().indexer.as_ref()
    }

    pub fn arguments(&self) -> &[View] {
        memo_list(&self.arguments, &self.raw().arguments)
    }

    pub fn deconstruct(&self) -> (&View, Option<&Member>, &[View]) {
        (self.object(), self.indexer(), self.arguments())
    }
}

family_view! {
    RuntimeVariablesView(RuntimeVariables: RuntimeVariablesExpr) {
        variables: Children,
    }
}

impl RuntimeVariablesView {
    pub fn variables(&self) -> &[View] {
        memo_list(&self.variables, &self.raw().variables)
    }

    pub fn deconstruct(&self) -> (&[View], &Type) {
        (self.variables(), self.ty())
    }
}

// ============================================================================
// Statements
// ============================================================================

family_view! {
    BlockView(Block: BlockExpr) {
        variables: Children,
        expressions: Children,
    }
}

impl BlockView {
    pub fn variables(&self) -> &[View] {
        memo_list(&self.variables, &self.raw().variables)
    }

    pub fn expressions(&self) -> &[View] {
        memo_list(&self.expressions, &self.raw().expressions)
    }

    /// The last expression, whose value the block produces.
    pub fn result(&self) -> Option<&View> {
        self.expressions().last()
    }

    pub fn deconstruct(&self) -> (&[View], &[View]) {
        (self.variables(), self.expressions())
    }
}

family_view! {
    GotoView(Goto: GotoExpr) {
        value: OptChild,
    }
}

impl GotoView {
    pub fn goto_kind(&self) -> GotoKind {
        self.raw().kind
    }

    pub fn target(&self) -> &LabelTarget {
        &self.raw().target
    }

    pub fn value(&self) -> Option<&View> {
        memo_opt(&self.value, self.raw().value.as_ref())
    }

    pub fn deconstruct(&self) -> (GotoKind, &LabelTarget, Option<&View>) {
        (self.goto_kind(), self.target(), self.value())
    }
}

family_view! {
    LabelView(Label: LabelExpr) {
        default_value: OptChild,
    }
}

impl LabelView {
    pub fn target(&self) -> &LabelTarget {
        &self.raw().target
    }

    pub fn default_value(&self) -> Option<&View> {
        memo_opt(&self.default_value, self.raw().default_value.as_ref())
    }

    pub fn deconstruct(&self) -> (&LabelTarget, Option<&View>) {
        (self.target(), self.default_value())
    }
}

family_view! {
    LoopView(Loop: LoopExpr) {
        body: Child,
    }
}

impl LoopView {
    pub fn body(&self) -> &View {
        memo(&self.body, &self.raw().body)
    }

    pub fn break_label(&self) -> Option<&LabelTarget> {
        self.raw().break_label.as_ref()
    }

    pub fn continue_label(&self) -> Option<&LabelTarget> {
        self.raw().continue_label.as_ref()
    }

    pub fn deconstruct(&self) -> (&View, Option<&LabelTarget>, Option<&LabelTarget>) {
        (self.body(), self.break_label(), self.continue_label())
    }
}

family_view! {
    SwitchView(Switch: SwitchExpr) {
        switch_value: Child,
        cases: OnceCell<Vec<SwitchCaseView>>,
        default_body: OptChild,
    }
}

impl SwitchView {
    pub fn switch_value(&self) -> &View {
        memo(&self.switch_value, &self.raw().switch_value)
    }

    pub fn cases(&self) -> &[SwitchCaseView] {
        memo_nested(&self.cases, &self.raw().cases, SwitchCaseView::new)
    }

    pub fn default_body(&self) -> Option<&View> {
        memo_opt(&self.default_body, self.raw().default_body.as_ref())
    }

    /// Equality method used to match case values, if not the default one.
    pub fn comparison(&self) -> Option<&Method> {
        self.raw().comparison.as_ref()
    }

    pub fn deconstruct(&self) -> (&View, &[SwitchCaseView], Option<&View>) {
        (self.switch_value(), self.cases(), self.default_body())
    }
}

family_view! {
    TryView(Try: TryExpr) {
        body: Child,
        handlers: OnceCell<Vec<CatchBlockView>>,
        finally: OptChild,
        fault: OptChild,
    }
}

impl TryView {
    pub fn body(&self) -> &View {
        memo(&self.body, &self.raw().body)
    }

    pub fn handlers(&self) -> &[CatchBlockView] {
        memo_nested(&self.handlers, &self.raw().handlers, CatchBlockView::new)
    }

    pub fn finally(&self) -> Option<&View> {
        memo_opt(&self.finally, self.raw().finally.as_ref())
    }

    pub fn fault(&self) -> Option<&View> {
        memo_opt(&self.fault, self.raw().fault.as_ref())
    }

    pub fn deconstruct(&self) -> (&View, &[CatchBlockView], Option<&View>, Option<&View>) {
        (self.body(), self.handlers(), self.finally(), self.fault())
    }
}

// ============================================================================
// Leaves
// ============================================================================

family_view! {
    ExtensionView(Extension: Arc<dyn ExtensionNode>) {
        reduced: OptChild,
    }
}

impl ExtensionView {
    pub fn node(&self) -> &dyn ExtensionNode {
        self.raw().as_ref()
    }

    /// View of the lowered node; `None` for irreducible extensions.
    pub fn reduced(&self) -> Option<&View> {
        self.reduced
            .get_or_init(|| self.raw().reduce().map(|e| Box::new(super::to_view(&e))))
            .as_deref()
    }

    pub fn deconstruct(&self) -> (&dyn ExtensionNode, Option<&View>) {
        (self.node(), self.reduced())
    }
}

family_view! {
    DebugInfoView(DebugInfo: DebugInfoExpr) {}
}

impl DebugInfoView {
    pub fn document(&self) -> &SymbolDocument {
        &self.raw().document
    }

    pub fn start_line(&self) -> u32 {
        self.raw().start_line
    }

    pub fn start_column(&self) -> u32 {
        self.raw().start_column
    }

    pub fn end_line(&self) -> u32 {
        self.raw().end_line
    }

    pub fn end_column(&self) -> u32 {
        self.raw().end_column
    }

    pub fn is_clear(&self) -> bool {
        self.raw().is_clear()
    }

    pub fn deconstruct(&self) -> (&SymbolDocument, &Type) {
        (self.document(), self.ty())
    }
}

family_view! {
    ParameterView(Parameter: ParameterExpr) {}
}

impl ParameterView {
    pub fn name(&self) -> Option<&str> {
        self.raw().name.as_deref()
    }

    pub fn is_by_ref(&self) -> bool {
        self.raw().by_ref
    }

    pub fn deconstruct(&self) -> (Option<&str>, &Type) {
        (self.name(), self.ty())
    }
}

family_view! {
    ConstantView(Constant: ConstantExpr) {}
}

impl ConstantView {
    pub fn value(&self) -> &Value {
        &self.raw().value
    }

    pub fn deconstruct(&self) -> (&Value, &Type) {
        (self.value(), self.ty())
    }
}

family_view! {
    /// The default value of the node's type.
    DefaultView {}
}

impl DefaultView {
    pub fn deconstruct(&self) -> (&Type,) {
        (self.ty(),)
    }
}
