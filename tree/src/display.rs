//! Human-readable rendering of trees, types and values.
//!
//! The output is meant for diagnostics and test assertions; it is not
//! parsed back.

use crate::{
    ElementInit, Expr, ExprData, GotoKind, LabelTarget, MemberBinding, MemberBindingData, Method,
    NodeKind, Type, TypeData, Value,
};
use core::fmt::{self, Display, Formatter};

fn comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.data() {
            TypeData::Void => write!(f, "void"),
            TypeData::Primitive(p) => write!(f, "{}", p),
            TypeData::Enum { name, .. } => write!(f, "{}", name),
            TypeData::Nullable(inner) => write!(f, "{}?", inner),
            TypeData::Array { element, rank } => {
                write!(f, "{}[", element)?;
                for _ in 1..*rank {
                    write!(f, ",")?;
                }
                write!(f, "]")
            }
            TypeData::Function { params, ret } => {
                write!(f, "fn(")?;
                comma_separated(f, params)?;
                write!(f, ") -> {}", ret)
            }
            TypeData::Named { name, args, .. } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    comma_separated(f, args)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type(), self.name())?;
        comma_separated(f, self.parameters())?;
        write!(f, ")")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::I8(n) => write!(f, "{}", n),
            Value::U8(n) => write!(f, "{}", n),
            Value::I16(n) => write!(f, "{}", n),
            Value::U16(n) => write!(f, "{}", n),
            Value::I32(n) => write!(f, "{}", n),
            Value::U32(n) => write!(f, "{}", n),
            Value::I64(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::F32(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Enum(n) => write!(f, "{}", n),
            Value::Sequence(items) => {
                write!(f, "[")?;
                comma_separated(f, items)?;
                write!(f, "]")
            }
            Value::Query(query) => write!(f, "value(Queryable<{}>)", query.element_type()),
            Value::Object(object) => write!(f, "value({:?})", object),
        }
    }
}

impl Display for LabelTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().unwrap_or("UnnamedLabel"))
    }
}

impl Display for ElementInit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.add_method().name())?;
        comma_separated(f, self.arguments())?;
        write!(f, ")")
    }
}

impl Display for MemberBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.data() {
            MemberBindingData::Assignment { member, expression } => {
                write!(f, "{} = {}", member.name(), expression)
            }
            MemberBindingData::ListBinding {
                member,
                initializers,
            } => {
                write!(f, "{} = {{", member.name())?;
                comma_separated(f, initializers)?;
                write!(f, "}}")
            }
            MemberBindingData::MemberBinding { member, bindings } => {
                write!(f, "{} = {{", member.name())?;
                comma_separated(f, bindings)?;
                write!(f, "}}")
            }
        }
    }
}

fn binary_operator(kind: NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        Add | AddChecked => "+",
        Subtract | SubtractChecked => "-",
        Multiply | MultiplyChecked => "*",
        Divide => "/",
        Modulo => "%",
        Power => "**",
        And => "&",
        AndAlso => "&&",
        Or => "|",
        OrElse => "||",
        ExclusiveOr => "^",
        LeftShift => "<<",
        RightShift => ">>",
        Equal => "==",
        NotEqual => "!=",
        LessThan => "<",
        LessThanOrEqual => "<=",
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
        Coalesce => "??",
        Assign => "=",
        AddAssign | AddAssignChecked => "+=",
        SubtractAssign | SubtractAssignChecked => "-=",
        MultiplyAssign | MultiplyAssignChecked => "*=",
        DivideAssign => "/=",
        ModuloAssign => "%=",
        PowerAssign => "**=",
        AndAssign => "&=",
        OrAssign => "|=",
        ExclusiveOrAssign => "^=",
        LeftShiftAssign => "<<=",
        RightShiftAssign => ">>=",
        _ => kind.name(),
    }
}

fn fmt_unary(f: &mut Formatter<'_>, kind: NodeKind, operand: &Expr, ty: &Type) -> fmt::Result {
    use NodeKind::*;
    match kind {
        Negate | NegateChecked => write!(f, "-{}", operand),
        UnaryPlus => write!(f, "+{}", operand),
        Not => write!(f, "!{}", operand),
        OnesComplement => write!(f, "~{}", operand),
        PreIncrementAssign => write!(f, "++{}", operand),
        PreDecrementAssign => write!(f, "--{}", operand),
        PostIncrementAssign => write!(f, "{}++", operand),
        PostDecrementAssign => write!(f, "{}--", operand),
        Convert | ConvertChecked => write!(f, "{}({}, {})", kind, operand, ty),
        TypeAs => write!(f, "({} as {})", operand, ty),
        Quote => write!(f, "{}", operand),
        _ => write!(f, "{}({})", kind, operand),
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.data() {
            ExprData::Binary(b) => match self.kind() {
                NodeKind::ArrayIndex => write!(f, "{}[{}]", b.left, b.right),
                kind => write!(f, "({} {} {})", b.left, binary_operator(kind), b.right),
            },
            ExprData::Unary(u) => match &u.operand {
                Some(operand) => fmt_unary(f, self.kind(), operand, self.ty()),
                None => write!(f, "rethrow"),
            },
            ExprData::Call(c) => {
                match &c.object {
                    Some(object) => write!(f, "{}.{}(", object, c.method.name())?,
                    None => write!(f, "{}.{}(", c.method.declaring_type(), c.method.name())?,
                }
                comma_separated(f, &c.arguments)?;
                write!(f, ")")
            }
            ExprData::Conditional(c) => {
                write!(f, "IIF({}, {}, {})", c.test, c.if_true, c.if_false)
            }
            ExprData::Invoke(i) => {
                write!(f, "Invoke({}", i.expression)?;
                for arg in i.arguments.iter() {
                    write!(f, ", {}", arg)?;
                }
                write!(f, ")")
            }
            ExprData::Lambda(l) => {
                if l.parameters.len() == 1 {
                    write!(f, "{}", l.parameters[0])?;
                } else {
                    write!(f, "(")?;
                    comma_separated(f, &l.parameters)?;
                    write!(f, ")")?;
                }
                write!(f, " => {}", l.body)
            }
            ExprData::ListInit(l) => {
                write!(f, "{} {{", l.new_expression)?;
                comma_separated(f, &l.initializers)?;
                write!(f, "}}")
            }
            ExprData::MemberAccess(m) => match &m.expression {
                Some(expression) => write!(f, "{}.{}", expression, m.member.name()),
                None => write!(f, "{}.{}", m.member.declaring_type(), m.member.name()),
            },
            ExprData::MemberInit(m) => {
                write!(f, "{} {{", m.new_expression)?;
                comma_separated(f, &m.bindings)?;
                write!(f, "}}")
            }
            ExprData::New(n) => {
                write!(f, "new {}(", self.ty())?;
                comma_separated(f, &n.arguments)?;
                write!(f, ")")
            }
            ExprData::NewArray(n) => {
                let element = self.ty().element().cloned().unwrap_or_else(Type::object);
                if self.kind() == NodeKind::NewArrayInit {
                    write!(f, "new {}[] {{", element)?;
                    comma_separated(f, &n.expressions)?;
                    write!(f, "}}")
                } else {
                    write!(f, "new {}[", element)?;
                    comma_separated(f, &n.expressions)?;
                    write!(f, "]")
                }
            }
            ExprData::TypeBinary(t) => match self.kind() {
                NodeKind::TypeIs => write!(f, "({} is {})", t.expression, t.type_operand),
                _ => write!(f, "({} TypeEqual {})", t.expression, t.type_operand),
            },
            ExprData::Block(b) => {
                write!(f, "{{ ")?;
                if !b.variables.is_empty() {
                    write!(f, "var ")?;
                    comma_separated(f, &b.variables)?;
                    write!(f, "; ")?;
                }
                for expression in b.expressions.iter() {
                    write!(f, "{}; ", expression)?;
                }
                write!(f, "}}")
            }
            ExprData::Dynamic(d) => {
                write!(f, "{}(", d.binder)?;
                comma_separated(f, &d.arguments)?;
                write!(f, ")")
            }
            ExprData::Goto(g) => {
                let keyword = match g.kind {
                    GotoKind::Goto => "goto",
                    GotoKind::Return => "return",
                    GotoKind::Break => "break",
                    GotoKind::Continue => "continue",
                };
                write!(f, "{} {}", keyword, g.target)?;
                if let Some(value) = &g.value {
                    write!(f, " ({})", value)?;
                }
                Ok(())
            }
            ExprData::Index(i) => {
                write!(f, "{}[", i.object)?;
                comma_separated(f, &i.arguments)?;
                write!(f, "]")
            }
            ExprData::Label(l) => write!(f, "{}:", l.target),
            ExprData::RuntimeVariables(r) => {
                write!(f, "(")?;
                comma_separated(f, &r.variables)?;
                write!(f, ")")
            }
            ExprData::Loop(l) => write!(f, "loop {{ {} }}", l.body),
            ExprData::Switch(s) => {
                write!(f, "switch ({}) {{ ", s.switch_value)?;
                for case in s.cases.iter() {
                    write!(f, "case ")?;
                    comma_separated(f, case.test_values())?;
                    write!(f, ": {}; ", case.body())?;
                }
                if let Some(default) = &s.default_body {
                    write!(f, "default: {}; ", default)?;
                }
                write!(f, "}}")
            }
            ExprData::Try(t) => {
                write!(f, "try {{ {} }}", t.body)?;
                for handler in t.handlers.iter() {
                    write!(f, " catch ({}) {{ {} }}", handler.test(), handler.body())?;
                }
                if let Some(finally) = &t.finally {
                    write!(f, " finally {{ {} }}", finally)?;
                }
                if let Some(fault) = &t.fault {
                    write!(f, " fault {{ {} }}", fault)?;
                }
                Ok(())
            }
            ExprData::Extension(node) => write!(f, "[{:?}]", node),
            ExprData::DebugInfo(d) => {
                if d.is_clear() {
                    write!(f, "<DebugInfo({}: clear)>", d.document.file_name())
                } else {
                    write!(
                        f,
                        "<DebugInfo({}: {}, {} - {}, {})>",
                        d.document.file_name(),
                        d.start_line,
                        d.start_column,
                        d.end_line,
                        d.end_column
                    )
                }
            }
            ExprData::Parameter(p) => write!(f, "{}", p.name.as_deref().unwrap_or("<param>")),
            ExprData::Constant(c) => write!(f, "{}", c.value),
            ExprData::Default => write!(f, "default({})", self.ty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Constructor, ElementInit, Expr, Member, MemberBinding, Method, Type, Value};

    #[test]
    fn test_lambda_display() {
        let i = Expr::parameter(Type::i32(), "i");
        let body = Expr::add(i.clone(), Expr::multiply(Expr::constant(10), Expr::constant(2)));
        let f = Expr::lambda(body, [i]).unwrap();
        assert_eq!(f.to_string(), "i => (i + (10 * 2))");

        let a = Expr::parameter(Type::i32(), "a");
        let b = Expr::parameter(Type::i32(), "b");
        let g = Expr::lambda(Expr::less_than(a.clone(), b.clone()), [a, b]).unwrap();
        assert_eq!(g.to_string(), "(a, b) => (a < b)");
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::array_of_rank(Type::i32(), 2).to_string(), "i32[,]");
        assert_eq!(Type::nullable(Type::f64()).to_string(), "f64?");
        assert_eq!(
            Type::function([Type::i32()], Type::bool()).to_string(),
            "fn(i32) -> bool"
        );
        assert_eq!(
            Type::generic("Dictionary", [Type::string(), Type::i32()]).to_string(),
            "Dictionary<string, i32>"
        );
    }

    #[test]
    fn test_object_creation_display() {
        let point = Type::named("Point");
        let new = Expr::new(Constructor::new(point.clone(), []), []).unwrap();
        let init = Expr::member_init(
            new,
            [MemberBinding::assignment(
                Member::property(point, "X", Type::i32()),
                Expr::constant(1),
            )],
        )
        .unwrap();
        assert_eq!(init.to_string(), "new Point() {X = 1}");

        let list = Type::generic("List", [Type::string()]);
        let add = Method::instance(list.clone(), "Add", [Type::string()], Type::void());
        let new = Expr::new(Constructor::new(list, []), []).unwrap();
        let init = Expr::list_init(new, [ElementInit::new(add, [Expr::constant("a")])]).unwrap();
        assert_eq!(init.to_string(), "new List<string>() {Add(\"a\")}");

        let arr = Expr::new_array_init(
            Type::string(),
            [Expr::constant("dog"), Expr::constant("cat")],
        );
        assert_eq!(arr.to_string(), "new string[] {\"dog\", \"cat\"}");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from('x').to_string(), "'x'");
        assert_eq!(
            Value::sequence([Value::from(1), Value::from(2)]).to_string(),
            "[1, 2]"
        );
    }
}
