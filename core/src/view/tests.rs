use super::*;
use crate::test_utils::{Doubled, init_test_logging, sample};
use alloc::string::ToString;
use deconstruct_tree::{
    CatchBlock, Constructor, ElementInit, Member, MemberBinding, Method, SwitchCase,
    SymbolDocument, Value,
};
use hashbrown::HashSet;
use pretty_assertions::assert_eq;

fn point() -> Type {
    Type::named("Point")
}

#[test]
fn test_every_kind_gets_its_variant() {
    init_test_logging();
    let mut variants = HashSet::new();
    for &kind in NodeKind::ALL {
        let expr = sample(kind);
        let view = to_view(&expr);
        assert_eq!(view.kind(), kind);
        assert_eq!(view.family(), kind.family());
        assert!(view.expr().ptr_eq(&expr));
        variants.insert(core::mem::discriminant(&view));

        let again = to_view(&expr);
        assert_eq!(again, view);
        assert_eq!(again.to_string(), view.to_string());
        assert_eq!(view.to_string(), expr.to_string());
        assert!(Expr::from(again).ptr_eq(&expr));
    }
    assert_eq!(variants.len(), NodeKind::ALL.len());
}

#[test]
fn test_leaf_and_array_deconstruct() {
    let View::NewArrayBounds(bounds) = to_view(&sample(NodeKind::NewArrayBounds)) else {
        panic!("expected a bounds view");
    };
    let (sizes, ty) = bounds.deconstruct();
    assert!(matches!(sizes, [View::Parameter(p)] if p.name() == Some("x")));
    assert_eq!(ty, bounds.ty());
    assert_eq!(bounds.element_type(), Some(&Type::i32()));

    let View::RuntimeVariables(vars) = to_view(&sample(NodeKind::RuntimeVariables)) else {
        panic!("expected a runtime variables view");
    };
    let (variables, _) = vars.deconstruct();
    let names: alloc::vec::Vec<_> = variables
        .iter()
        .filter_map(|v| match v {
            View::Parameter(p) => p.name(),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["x", "y"]);

    let View::Parameter(p) = to_view(&Expr::parameter(Type::string(), "s")) else {
        panic!("expected a parameter view");
    };
    assert_eq!(p.deconstruct(), (Some("s"), &Type::string()));

    let View::Default(d) = to_view(&Expr::default_value(Type::bool())) else {
        panic!("expected a default view");
    };
    assert_eq!(d.deconstruct(), (&Type::bool(),));

    let document = SymbolDocument::new("query.cs");
    let View::DebugInfo(info) = to_view(&Expr::debug_info(document.clone(), 3, 1, 3, 9)) else {
        panic!("expected a debug info view");
    };
    assert_eq!(info.deconstruct(), (&document, &Type::void()));
    assert_eq!((info.start_line(), info.end_column()), (3, 9));
    assert!(!info.is_clear());
}

#[test]
fn test_extension_deconstruct() {
    let x = Expr::parameter(Type::i32(), "x");
    let View::Extension(ext) = to_view(&Expr::extension(Doubled(x.clone()))) else {
        panic!("expected an extension view");
    };
    let (node, reduced) = ext.deconstruct();
    assert_eq!(node.ty(), Type::i32());
    let Some(View::Add(add)) = reduced else {
        panic!("expected the reduction to be an add");
    };
    assert!(add.left().expr().ptr_eq(&x));
    assert!(add.right().expr().ptr_eq(&x));
}

#[test]
fn test_binary_deconstruct() {
    let x = Expr::parameter(Type::i32(), "x");
    let e = Expr::multiply(x.clone(), Expr::constant(0));

    let View::Multiply(m) = to_view(&e) else {
        panic!("expected a multiply view");
    };
    let (left, right) = m.deconstruct();
    assert!(matches!(left, View::Parameter(p) if p.name() == Some("x")));
    assert!(matches!(right, View::Constant(c) if c.value() == &Value::I32(0)));
    assert!(m.method().is_none());
    assert!(!m.is_lifted_to_null());
}

#[test]
fn test_child_views_are_memoized() {
    let x = Expr::parameter(Type::i32(), "x");
    let e = Expr::add(x, Expr::constant(1));

    let View::Add(add) = to_view(&e) else {
        panic!("expected an add view");
    };
    let first: *const View = add.left();
    let second: *const View = add.left();
    assert!(core::ptr::eq(first, second));

    // A clone starts with empty caches but still wraps the same node.
    let copy = add.clone();
    assert_eq!(copy, add);
    assert!(!core::ptr::eq(copy.left(), add.left()));
    assert_eq!(copy.left(), add.left());
}

#[test]
fn test_try_from_rejects_other_families() {
    let e = Expr::constant(1);
    let err = BinaryView::try_from(&e).unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedKind {
            expected: Family::Binary,
            found: NodeKind::Constant,
        }
    );
    assert_eq!(err.to_string(), "expected a Binary node, found Constant");

    assert!(DefaultView::try_from(&e).is_err());
    assert!(ConstantView::try_from(&e).is_ok());
}

#[test]
fn test_absent_children_stay_absent() {
    assert_eq!(to_view_opt(None), None);

    let rethrow = Expr::rethrow();
    let View::Throw(t) = to_view(&rethrow) else {
        panic!("expected a throw view");
    };
    assert!(t.operand().is_none());

    let x = Expr::parameter(Type::i32(), "x");
    let some = to_view_opt(Some(&x));
    assert_eq!(some.map(View::into_expr), Some(x));
}

#[test]
fn test_call_view() {
    let s = Expr::parameter(Type::string(), "s");
    let split = Method::instance(
        Type::string(),
        "Split",
        [Type::char()],
        Type::array(Type::string()),
    );
    let e = Expr::call(Some(s.clone()), split.clone(), [Expr::constant(',')]).unwrap();

    let View::Call(call) = to_view(&e) else {
        panic!("expected a call view");
    };
    let (object, method, arguments) = call.deconstruct();
    assert_eq!(object.map(View::expr), Some(&s));
    assert_eq!(method, &split);
    assert_eq!(arguments.len(), 1);
    assert_eq!(call.ty(), &Type::array(Type::string()));
}

#[test]
fn test_member_init_bindings() {
    let add = Method::instance(
        Type::generic("List", [Type::i32()]),
        "Add",
        [Type::i32()],
        Type::void(),
    );
    let new_point = Expr::new(Constructor::new(point(), []), []).unwrap();
    let e = Expr::member_init(
        new_point,
        [
            MemberBinding::assignment(
                Member::field(point(), "X", Type::i32()),
                Expr::constant(1),
            ),
            MemberBinding::list(
                Member::property(point(), "Tags", Type::generic("List", [Type::i32()])),
                [ElementInit::new(add, [Expr::constant(2)])],
            ),
            MemberBinding::nested(
                Member::property(point(), "Origin", point()),
                [MemberBinding::assignment(
                    Member::field(point(), "Y", Type::i32()),
                    Expr::constant(3),
                )],
            ),
        ],
    )
    .unwrap();

    let View::MemberInit(init) = to_view(&e) else {
        panic!("expected a member init view");
    };
    let (new, bindings) = init.deconstruct();
    assert!(matches!(new, View::New(_)));
    assert_eq!(bindings.len(), 3);

    match bindings[0].deconstruct() {
        MemberBindingParts::Assignment { member, expression } => {
            assert_eq!(member.name(), "X");
            assert_eq!(expression.to_string(), "1");
        }
        other => panic!("unexpected binding {other:?}"),
    }
    match bindings[1].deconstruct() {
        MemberBindingParts::ListBinding {
            member,
            initializers,
        } => {
            assert_eq!(member.name(), "Tags");
            assert_eq!(initializers[0].add_method().name(), "Add");
            assert_eq!(initializers[0].arguments()[0].to_string(), "2");
        }
        other => panic!("unexpected binding {other:?}"),
    }
    match bindings[2].deconstruct() {
        MemberBindingParts::MemberBinding { member, bindings } => {
            assert_eq!(member.name(), "Origin");
            assert_eq!(bindings[0].member().name(), "Y");
        }
        other => panic!("unexpected binding {other:?}"),
    }
}

#[test]
fn test_switch_and_try_views() {
    let x = Expr::parameter(Type::i32(), "x");
    let ex = Expr::parameter(Type::named("Exception"), "ex");
    let switch = Expr::switch(
        x.clone(),
        [SwitchCase::new([Expr::constant(1)], Expr::constant("one"))],
        None,
        None,
    );
    let e = Expr::make_try(
        switch,
        [CatchBlock::catch(Type::named("Exception"), Some(ex.clone()), Expr::constant("err"))],
        None,
        None,
    );

    let View::Try(t) = to_view(&e) else {
        panic!("expected a try view");
    };
    let (body, handlers, finally, fault) = t.deconstruct();
    assert!(finally.is_none() && fault.is_none());

    let (test, variable, filter, handler_body) = handlers[0].deconstruct();
    assert_eq!(test, &Type::named("Exception"));
    assert_eq!(variable.map(View::expr), Some(&ex));
    assert!(filter.is_none());
    assert_eq!(handler_body.to_string(), "\"err\"");

    let View::Switch(s) = body else {
        panic!("expected a switch view");
    };
    assert_eq!(s.switch_value().expr(), &x);
    assert!(s.default_body().is_none());
    let (values, case_body) = s.cases()[0].deconstruct();
    assert_eq!(values[0].to_string(), "1");
    assert_eq!(case_body.to_string(), "\"one\"");
}

#[test]
fn test_lambda_view() {
    let a = Expr::parameter(Type::i32(), "a");
    let b = Expr::parameter(Type::i32(), "b");
    let e = Expr::lambda(Expr::add(a.clone(), b.clone()), [a, b]).unwrap();

    let View::Lambda(l) = to_view(&e) else {
        panic!("expected a lambda view");
    };
    let (parameters, body) = l.deconstruct();
    let names: alloc::vec::Vec<_> = parameters
        .iter()
        .map(|p| match p {
            View::Parameter(p) => p.name().unwrap_or_default(),
            _ => "",
        })
        .collect();
    assert_eq!(names, ["a", "b"]);
    assert!(matches!(body, View::Add(_)));
    assert_eq!(l.ty(), &Type::function([Type::i32(), Type::i32()], Type::i32()));
}
