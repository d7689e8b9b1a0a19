//! Raw expression nodes.
//!
//! A node is a kind, a static type and family-specific data. Nodes are
//! immutable and shared through [`Expr`] handles; rewriting a tree means
//! building new nodes with [`Expr::update`], which hands back the original
//! instance when nothing changed.

use crate::{
    Constructor, Family, GotoKind, LabelTarget, Member, Method, NodeKind, SymbolDocument, Type,
    Value,
};
use alloc::sync::Arc;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Ordered list of child expressions.
pub type ExprList = Arc<[Expr]>;

struct Node {
    kind: NodeKind,
    ty: Type,
    data: ExprData,
}

/// Shared handle to an immutable node.
///
/// Equality and hashing are by identity: two handles are equal only when
/// they point at the same node. Structural comparison is a separate,
/// engine-level operation.
#[derive(Clone)]
pub struct Expr {
    node: Arc<Node>,
}

impl Expr {
    /// Allocate a node. Callers guarantee that `data` matches `kind`'s family.
    pub(crate) fn from_parts(kind: NodeKind, ty: Type, data: ExprData) -> Self {
        debug_assert_eq!(kind.family(), data.family());
        Self {
            node: Arc::new(Node { kind, ty, data }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn family(&self) -> Family {
        self.node.kind.family()
    }

    /// The static type of the value this node produces.
    pub fn ty(&self) -> &Type {
        &self.node.ty
    }

    pub fn data(&self) -> &ExprData {
        &self.node.data
    }

    /// Check if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Rebuild this node from new family data, keeping kind and static type.
    ///
    /// Returns this very instance when every child and field in `data` is
    /// identical to the current ones.
    ///
    /// # Panics
    ///
    /// Panics if `data` belongs to a different family than this node.
    pub fn update(&self, data: ExprData) -> Expr {
        if data.family() != self.family() {
            panic!(
                "cannot rebuild a {} node from {} data",
                self.kind(),
                data.family()
            );
        }
        if data.is_identical(self.data()) {
            return self.clone();
        }
        Expr::from_parts(self.kind(), self.ty().clone(), data)
    }

    pub fn as_binary(&self) -> Option<&BinaryExpr> {
        match self.data() {
            ExprData::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    pub fn as_unary(&self) -> Option<&UnaryExpr> {
        match self.data() {
            ExprData::Unary(unary) => Some(unary),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaExpr> {
        match self.data() {
            ExprData::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterExpr> {
        match self.data() {
            ExprData::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantExpr> {
        match self.data() {
            ExprData::Constant(constant) => Some(constant),
            _ => None,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(Arc::as_ptr(&self.node), state)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self)
    }
}

/// Family-specific node data.
#[derive(Debug, Clone)]
pub enum ExprData {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Conditional(ConditionalExpr),
    Invoke(InvokeExpr),
    Lambda(LambdaExpr),
    ListInit(ListInitExpr),
    MemberAccess(MemberAccessExpr),
    MemberInit(MemberInitExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    TypeBinary(TypeBinaryExpr),
    Block(BlockExpr),
    Dynamic(DynamicExpr),
    Goto(GotoExpr),
    Index(IndexExpr),
    Label(LabelExpr),
    RuntimeVariables(RuntimeVariablesExpr),
    Loop(LoopExpr),
    Switch(SwitchExpr),
    Try(TryExpr),
    Extension(Arc<dyn ExtensionNode>),
    DebugInfo(DebugInfoExpr),
    Parameter(ParameterExpr),
    Constant(ConstantExpr),
    Default,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Expr,
    pub right: Expr,
    /// Operator overload, if any.
    pub method: Option<Method>,
    /// Conversion lambda applied by coalescing and compound assignments.
    pub conversion: Option<Expr>,
    pub lifted_to_null: bool,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    /// Absent only for a rethrowing `Throw`.
    pub operand: Option<Expr>,
    pub method: Option<Method>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub method: Method,
    /// Receiver; absent for static methods.
    pub object: Option<Expr>,
    pub arguments: ExprList,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub test: Expr,
    pub if_true: Expr,
    pub if_false: Expr,
}

#[derive(Debug, Clone)]
pub struct InvokeExpr {
    pub expression: Expr,
    pub arguments: ExprList,
}

#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub name: Option<Arc<str>>,
    pub body: Expr,
    /// Parameter nodes.
    pub parameters: ExprList,
    pub tail_call: bool,
}

#[derive(Debug, Clone)]
pub struct ListInitExpr {
    /// Always a `New` node.
    pub new_expression: Expr,
    pub initializers: Arc<[ElementInit]>,
}

#[derive(Debug, Clone)]
pub struct MemberAccessExpr {
    /// Instance; absent for static members.
    pub expression: Option<Expr>,
    pub member: Member,
}

#[derive(Debug, Clone)]
pub struct MemberInitExpr {
    /// Always a `New` node.
    pub new_expression: Expr,
    pub bindings: Arc<[MemberBinding]>,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    /// Absent for value types created without a constructor.
    pub constructor: Option<Constructor>,
    pub arguments: ExprList,
    /// Members initialized by each argument, parallel to `arguments`.
    pub members: Option<Arc<[Member]>>,
}

#[derive(Debug, Clone)]
pub struct NewArrayExpr {
    /// Bounds for `NewArrayBounds`, elements for `NewArrayInit`.
    pub expressions: ExprList,
}

#[derive(Debug, Clone)]
pub struct TypeBinaryExpr {
    pub expression: Expr,
    pub type_operand: Type,
}

#[derive(Debug, Clone)]
pub struct BlockExpr {
    /// Parameter nodes scoped to the block.
    pub variables: ExprList,
    pub expressions: ExprList,
}

#[derive(Debug, Clone)]
pub struct DynamicExpr {
    pub binder: Arc<str>,
    pub delegate_type: Type,
    pub arguments: ExprList,
}

#[derive(Debug, Clone)]
pub struct GotoExpr {
    pub kind: GotoKind,
    pub target: LabelTarget,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub object: Expr,
    /// Indexer property; absent for multi-dimensional array access.
    pub indexer: Option<Member>,
    pub arguments: ExprList,
}

#[derive(Debug, Clone)]
pub struct LabelExpr {
    pub target: LabelTarget,
    pub default_value: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct RuntimeVariablesExpr {
    pub variables: ExprList,
}

#[derive(Debug, Clone)]
pub struct LoopExpr {
    pub body: Expr,
    pub break_label: Option<LabelTarget>,
    pub continue_label: Option<LabelTarget>,
}

#[derive(Debug, Clone)]
pub struct SwitchExpr {
    pub switch_value: Expr,
    pub cases: Arc<[SwitchCase]>,
    pub default_body: Option<Expr>,
    pub comparison: Option<Method>,
}

#[derive(Debug, Clone)]
pub struct TryExpr {
    pub body: Expr,
    pub handlers: Arc<[CatchBlock]>,
    pub finally: Option<Expr>,
    pub fault: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct DebugInfoExpr {
    pub document: SymbolDocument,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl DebugInfoExpr {
    /// Line number marking a sequence point that clears debug info.
    pub const CLEAR_LINE: u32 = 0x00fe_efee;

    pub fn is_clear(&self) -> bool {
        self.start_line == Self::CLEAR_LINE
    }
}

#[derive(Debug, Clone)]
pub struct ParameterExpr {
    pub name: Option<Arc<str>>,
    pub by_ref: bool,
}

#[derive(Debug, Clone)]
pub struct ConstantExpr {
    pub value: Value,
}

/// Opaque node kinds defined outside the tree.
///
/// The engine never looks inside an extension. A reducible extension can be
/// lowered to ordinary nodes, which traversals walk in its place.
pub trait ExtensionNode: fmt::Debug + Send + Sync {
    /// Static type of the value the extension produces.
    fn ty(&self) -> Type;

    /// Lower to ordinary nodes; `None` for irreducible extensions.
    fn reduce(&self) -> Option<Expr> {
        None
    }
}

// ============================================================================
// Nested structures
// ============================================================================

#[derive(Debug)]
struct ElementInitData {
    add_method: Method,
    arguments: ExprList,
}

/// One `Add(...)` call of a collection initializer.
#[derive(Debug, Clone)]
pub struct ElementInit {
    data: Arc<ElementInitData>,
}

impl ElementInit {
    pub fn new(add_method: Method, arguments: impl IntoIterator<Item = Expr>) -> Self {
        Self::from_list(add_method, arguments.into_iter().collect())
    }

    fn from_list(add_method: Method, arguments: ExprList) -> Self {
        Self {
            data: Arc::new(ElementInitData {
                add_method,
                arguments,
            }),
        }
    }

    pub fn add_method(&self) -> &Method {
        &self.data.add_method
    }

    pub fn arguments(&self) -> &ExprList {
        &self.data.arguments
    }

    pub fn ptr_eq(&self, other: &ElementInit) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Same instance when the arguments are unchanged.
    pub fn update(&self, arguments: ExprList) -> ElementInit {
        if same_list(&arguments, self.arguments()) {
            return self.clone();
        }
        Self::from_list(self.add_method().clone(), arguments)
    }
}

/// Shape of a member binding inside a member initializer.
#[derive(Debug, Clone)]
pub enum MemberBindingData {
    /// `member = expression`
    Assignment { member: Member, expression: Expr },
    /// `member = { Add(...), ... }`
    ListBinding {
        member: Member,
        initializers: Arc<[ElementInit]>,
    },
    /// `member = { nested bindings }`
    MemberBinding {
        member: Member,
        bindings: Arc<[MemberBinding]>,
    },
}

impl MemberBindingData {
    pub fn member(&self) -> &Member {
        match self {
            MemberBindingData::Assignment { member, .. }
            | MemberBindingData::ListBinding { member, .. }
            | MemberBindingData::MemberBinding { member, .. } => member,
        }
    }

    fn is_identical(&self, other: &MemberBindingData) -> bool {
        match (self, other) {
            (
                MemberBindingData::Assignment { member, expression },
                MemberBindingData::Assignment {
                    member: member2,
                    expression: expression2,
                },
            ) => member == member2 && expression.ptr_eq(expression2),
            (
                MemberBindingData::ListBinding {
                    member,
                    initializers,
                },
                MemberBindingData::ListBinding {
                    member: member2,
                    initializers: initializers2,
                },
            ) => member == member2 && same_inits(initializers, initializers2),
            (
                MemberBindingData::MemberBinding { member, bindings },
                MemberBindingData::MemberBinding {
                    member: member2,
                    bindings: bindings2,
                },
            ) => member == member2 && same_bindings(bindings, bindings2),
            _ => false,
        }
    }
}

/// Handle to a member binding.
#[derive(Debug, Clone)]
pub struct MemberBinding {
    data: Arc<MemberBindingData>,
}

impl MemberBinding {
    pub fn new(data: MemberBindingData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn data(&self) -> &MemberBindingData {
        &self.data
    }

    pub fn member(&self) -> &Member {
        self.data.member()
    }

    pub fn ptr_eq(&self, other: &MemberBinding) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Same instance when `data` is identical to the current data.
    pub fn update(&self, data: MemberBindingData) -> MemberBinding {
        if data.is_identical(self.data()) {
            return self.clone();
        }
        Self::new(data)
    }
}

#[derive(Debug)]
struct SwitchCaseData {
    test_values: ExprList,
    body: Expr,
}

/// One `case` of a switch: the values that select it and its body.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    data: Arc<SwitchCaseData>,
}

impl SwitchCase {
    pub fn new(test_values: impl IntoIterator<Item = Expr>, body: Expr) -> Self {
        Self::from_list(test_values.into_iter().collect(), body)
    }

    fn from_list(test_values: ExprList, body: Expr) -> Self {
        Self {
            data: Arc::new(SwitchCaseData { test_values, body }),
        }
    }

    pub fn test_values(&self) -> &ExprList {
        &self.data.test_values
    }

    pub fn body(&self) -> &Expr {
        &self.data.body
    }

    pub fn ptr_eq(&self, other: &SwitchCase) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Same instance when test values and body are unchanged.
    pub fn update(&self, test_values: ExprList, body: Expr) -> SwitchCase {
        if same_list(&test_values, self.test_values()) && body.ptr_eq(self.body()) {
            return self.clone();
        }
        Self::from_list(test_values, body)
    }
}

#[derive(Debug)]
struct CatchBlockData {
    test: Type,
    variable: Option<Expr>,
    filter: Option<Expr>,
    body: Expr,
}

/// One handler of a try node.
#[derive(Debug, Clone)]
pub struct CatchBlock {
    data: Arc<CatchBlockData>,
}

impl CatchBlock {
    pub fn new(test: Type, variable: Option<Expr>, filter: Option<Expr>, body: Expr) -> Self {
        Self {
            data: Arc::new(CatchBlockData {
                test,
                variable,
                filter,
                body,
            }),
        }
    }

    /// The exception type this handler catches.
    pub fn test(&self) -> &Type {
        &self.data.test
    }

    /// Parameter node receiving the caught exception.
    pub fn variable(&self) -> Option<&Expr> {
        self.data.variable.as_ref()
    }

    pub fn filter(&self) -> Option<&Expr> {
        self.data.filter.as_ref()
    }

    pub fn body(&self) -> &Expr {
        &self.data.body
    }

    pub fn ptr_eq(&self, other: &CatchBlock) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Same instance when variable, filter and body are unchanged.
    pub fn update(&self, variable: Option<Expr>, filter: Option<Expr>, body: Expr) -> CatchBlock {
        if same_opt(variable.as_ref(), self.variable())
            && same_opt(filter.as_ref(), self.filter())
            && body.ptr_eq(self.body())
        {
            return self.clone();
        }
        Self::new(self.test().clone(), variable, filter, body)
    }
}

// ============================================================================
// Identity checks used by `update`
// ============================================================================

fn same_opt(a: Option<&Expr>, b: Option<&Expr>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    }
}

fn same_items<T>(a: &[T], b: &[T], same: impl Fn(&T, &T) -> bool) -> bool {
    core::ptr::eq(a, b) || (a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y)))
}

fn same_list(a: &ExprList, b: &ExprList) -> bool {
    same_items(a, b, Expr::ptr_eq)
}

fn same_inits(a: &Arc<[ElementInit]>, b: &Arc<[ElementInit]>) -> bool {
    same_items(a, b, ElementInit::ptr_eq)
}

fn same_bindings(a: &Arc<[MemberBinding]>, b: &Arc<[MemberBinding]>) -> bool {
    same_items(a, b, MemberBinding::ptr_eq)
}

fn same_cases(a: &Arc<[SwitchCase]>, b: &Arc<[SwitchCase]>) -> bool {
    same_items(a, b, SwitchCase::ptr_eq)
}

fn same_handlers(a: &Arc<[CatchBlock]>, b: &Arc<[CatchBlock]>) -> bool {
    same_items(a, b, CatchBlock::ptr_eq)
}

impl ExprData {
    pub fn family(&self) -> Family {
        match self {
            ExprData::Binary(_) => Family::Binary,
            ExprData::Unary(_) => Family::Unary,
            ExprData::Call(_) => Family::Call,
            ExprData::Conditional(_) => Family::Conditional,
            ExprData::Invoke(_) => Family::Invoke,
            ExprData::Lambda(_) => Family::Lambda,
            ExprData::ListInit(_) => Family::ListInit,
            ExprData::MemberAccess(_) => Family::MemberAccess,
            ExprData::MemberInit(_) => Family::MemberInit,
            ExprData::New(_) => Family::New,
            ExprData::NewArray(_) => Family::NewArray,
            ExprData::TypeBinary(_) => Family::TypeBinary,
            ExprData::Block(_) => Family::Block,
            ExprData::Dynamic(_) => Family::Dynamic,
            ExprData::Goto(_) => Family::Goto,
            ExprData::Index(_) => Family::Index,
            ExprData::Label(_) => Family::Label,
            ExprData::RuntimeVariables(_) => Family::RuntimeVariables,
            ExprData::Loop(_) => Family::Loop,
            ExprData::Switch(_) => Family::Switch,
            ExprData::Try(_) => Family::Try,
            ExprData::Extension(_) => Family::Extension,
            ExprData::DebugInfo(_) => Family::DebugInfo,
            ExprData::Parameter(_) => Family::Parameter,
            ExprData::Constant(_) => Family::Constant,
            ExprData::Default => Family::Default,
        }
    }

    /// Children are compared by identity, scalar fields by value.
    fn is_identical(&self, other: &ExprData) -> bool {
        match (self, other) {
            (ExprData::Binary(a), ExprData::Binary(b)) => {
                a.left.ptr_eq(&b.left)
                    && a.right.ptr_eq(&b.right)
                    && same_opt(a.conversion.as_ref(), b.conversion.as_ref())
                    && a.method == b.method
                    && a.lifted_to_null == b.lifted_to_null
            }
            (ExprData::Unary(a), ExprData::Unary(b)) => {
                same_opt(a.operand.as_ref(), b.operand.as_ref()) && a.method == b.method
            }
            (ExprData::Call(a), ExprData::Call(b)) => {
                same_opt(a.object.as_ref(), b.object.as_ref())
                    && same_list(&a.arguments, &b.arguments)
                    && a.method == b.method
            }
            (ExprData::Conditional(a), ExprData::Conditional(b)) => {
                a.test.ptr_eq(&b.test)
                    && a.if_true.ptr_eq(&b.if_true)
                    && a.if_false.ptr_eq(&b.if_false)
            }
            (ExprData::Invoke(a), ExprData::Invoke(b)) => {
                a.expression.ptr_eq(&b.expression) && same_list(&a.arguments, &b.arguments)
            }
            (ExprData::Lambda(a), ExprData::Lambda(b)) => {
                a.body.ptr_eq(&b.body)
                    && same_list(&a.parameters, &b.parameters)
                    && a.name == b.name
                    && a.tail_call == b.tail_call
            }
            (ExprData::ListInit(a), ExprData::ListInit(b)) => {
                a.new_expression.ptr_eq(&b.new_expression)
                    && same_inits(&a.initializers, &b.initializers)
            }
            (ExprData::MemberAccess(a), ExprData::MemberAccess(b)) => {
                same_opt(a.expression.as_ref(), b.expression.as_ref()) && a.member == b.member
            }
            (ExprData::MemberInit(a), ExprData::MemberInit(b)) => {
                a.new_expression.ptr_eq(&b.new_expression)
                    && same_bindings(&a.bindings, &b.bindings)
            }
            (ExprData::New(a), ExprData::New(b)) => {
                same_list(&a.arguments, &b.arguments)
                    && a.constructor == b.constructor
                    && a.members == b.members
            }
            (ExprData::NewArray(a), ExprData::NewArray(b)) => {
                same_list(&a.expressions, &b.expressions)
            }
            (ExprData::TypeBinary(a), ExprData::TypeBinary(b)) => {
                a.expression.ptr_eq(&b.expression) && a.type_operand == b.type_operand
            }
            (ExprData::Block(a), ExprData::Block(b)) => {
                same_list(&a.variables, &b.variables) && same_list(&a.expressions, &b.expressions)
            }
            (ExprData::Dynamic(a), ExprData::Dynamic(b)) => {
                same_list(&a.arguments, &b.arguments)
                    && a.binder == b.binder
                    && a.delegate_type == b.delegate_type
            }
            (ExprData::Goto(a), ExprData::Goto(b)) => {
                same_opt(a.value.as_ref(), b.value.as_ref())
                    && a.kind == b.kind
                    && a.target == b.target
            }
            (ExprData::Index(a), ExprData::Index(b)) => {
                a.object.ptr_eq(&b.object)
                    && same_list(&a.arguments, &b.arguments)
                    && a.indexer == b.indexer
            }
            (ExprData::Label(a), ExprData::Label(b)) => {
                same_opt(a.default_value.as_ref(), b.default_value.as_ref())
                    && a.target == b.target
            }
            (ExprData::RuntimeVariables(a), ExprData::RuntimeVariables(b)) => {
                same_list(&a.variables, &b.variables)
            }
            (ExprData::Loop(a), ExprData::Loop(b)) => {
                a.body.ptr_eq(&b.body)
                    && a.break_label == b.break_label
                    && a.continue_label == b.continue_label
            }
            (ExprData::Switch(a), ExprData::Switch(b)) => {
                a.switch_value.ptr_eq(&b.switch_value)
                    && same_cases(&a.cases, &b.cases)
                    && same_opt(a.default_body.as_ref(), b.default_body.as_ref())
                    && a.comparison == b.comparison
            }
            (ExprData::Try(a), ExprData::Try(b)) => {
                a.body.ptr_eq(&b.body)
                    && same_handlers(&a.handlers, &b.handlers)
                    && same_opt(a.finally.as_ref(), b.finally.as_ref())
                    && same_opt(a.fault.as_ref(), b.fault.as_ref())
            }
            (ExprData::Extension(a), ExprData::Extension(b)) => Arc::ptr_eq(a, b),
            (ExprData::DebugInfo(a), ExprData::DebugInfo(b)) => {
                a.document == b.document
                    && a.start_line == b.start_line
                    && a.start_column == b.start_column
                    && a.end_line == b.end_line
                    && a.end_column == b.end_column
            }
            (ExprData::Parameter(a), ExprData::Parameter(b)) => {
                a.name == b.name && a.by_ref == b.by_ref
            }
            (ExprData::Constant(a), ExprData::Constant(b)) => a.value.same_instance(&b.value),
            (ExprData::Default, ExprData::Default) => true,
            _ => false,
        }
    }
}
