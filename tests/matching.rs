//! Destructuring trees through views.

use deconstruct::{
    Constructor, ElementInit, Expr, ExprExt, Member, MemberBindingParts, Method, NodeKind, Type,
    Value, View,
};
use pretty_assertions::assert_eq;

fn point() -> Type {
    Type::named("Point")
}

#[test]
fn test_match_binary_with_constant_operand() {
    let x = Expr::parameter(Type::i32(), "x");
    let e = Expr::multiply(x.clone(), Expr::constant(0));

    let matched = match e.to_view() {
        View::Multiply(m) => match m.deconstruct() {
            (View::Parameter(p), View::Constant(c)) => {
                Some((p.name().map(str::to_owned), c.value().clone()))
            }
            _ => None,
        },
        _ => None,
    };
    assert_eq!(matched, Some((Some("x".to_owned()), Value::I32(0))));
}

#[test]
fn test_match_conditional() {
    let x = Expr::parameter(Type::i32(), "x");
    let e = Expr::conditional(
        Expr::greater_than(x.clone(), Expr::constant(0)),
        x.clone(),
        Expr::negate(x.clone()),
    );

    let View::Conditional(c) = e.to_view() else {
        panic!("expected a conditional view");
    };
    let (test, if_true, if_false) = c.deconstruct();
    assert_eq!(test.kind(), NodeKind::GreaterThan);
    assert!(matches!(if_true, View::Parameter(_)));
    assert!(matches!(if_false, View::Negate(n) if n.operand().map(View::expr) == Some(&x)));
    assert_eq!(c.ty(), &Type::i32());
}

#[test]
fn test_match_new() {
    let ctor = Constructor::new(point(), [Type::i32(), Type::i32()]);
    let e = Expr::new(ctor.clone(), [Expr::constant(1), Expr::constant(2)]).unwrap();

    let View::New(n) = e.to_view() else {
        panic!("expected a new view");
    };
    match n.deconstruct() {
        (Some(c), [View::Constant(a), View::Constant(b)]) => {
            assert_eq!(c, &ctor);
            assert_eq!((a.value(), b.value()), (&Value::I32(1), &Value::I32(2)));
        }
        other => panic!("unexpected shape {other:?}"),
    }
    assert!(n.members().is_none());
}

#[test]
fn test_match_new_array_init() {
    let e = Expr::new_array_init(Type::string(), [Expr::constant("dog"), Expr::constant("cat")]);

    let View::NewArrayInit(array) = e.to_view() else {
        panic!("expected an array view");
    };
    let words: Vec<_> = array
        .expressions()
        .iter()
        .filter_map(|v| match v {
            View::Constant(c) => c.value().as_str().map(str::to_owned),
            _ => None,
        })
        .collect();
    assert_eq!(words, ["dog", "cat"]);
    assert_eq!(array.element_type(), Some(&Type::string()));
}

#[test]
fn test_match_list_init() {
    let list = Type::generic("List", [Type::i32()]);
    let add = Method::instance(list.clone(), "Add", [Type::i32()], Type::void());
    let e = Expr::list_init(
        Expr::new(Constructor::new(list, []), []).unwrap(),
        [
            ElementInit::new(add.clone(), [Expr::constant(1)]),
            ElementInit::new(add, [Expr::constant(2)]),
        ],
    )
    .unwrap();

    let View::ListInit(l) = e.to_view() else {
        panic!("expected a list init view");
    };
    let (new, inits) = l.deconstruct();
    assert!(matches!(new, View::New(_)));
    let values: Vec<_> = inits
        .iter()
        .map(|init| match init.deconstruct() {
            (m, [View::Constant(c)]) if m.name() == "Add" => c.value().as_i32(),
            _ => None,
        })
        .collect();
    assert_eq!(values, [Some(1), Some(2)]);
    assert_eq!(e.to_string(), "new List<i32>() {Add(1), Add(2)}");
}

#[test]
fn test_match_member_init() {
    let e = Expr::member_init(
        Expr::new(Constructor::new(point(), [Type::i32()]), [Expr::constant(1)]).unwrap(),
        [deconstruct::MemberBinding::assignment(
            Member::property(point(), "Y", Type::i32()),
            Expr::constant(2),
        )],
    )
    .unwrap();

    let View::MemberInit(init) = e.to_view() else {
        panic!("expected a member init view");
    };
    let (_, bindings) = init.deconstruct();
    let MemberBindingParts::Assignment { member, expression } = bindings[0].deconstruct() else {
        panic!("expected an assignment");
    };
    assert_eq!(member.name(), "Y");
    assert!(matches!(expression, View::Constant(c) if c.value() == &Value::I32(2)));
}

#[test]
fn test_views_compare_and_print_like_their_nodes() {
    let x = Expr::parameter(Type::i32(), "x");
    let e = Expr::lambda(Expr::add(x.clone(), Expr::constant(1)), [x]).unwrap();

    let first = e.to_view();
    let second = e.to_view();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.to_string(), "x => (x + 1)");
    assert_eq!(Expr::from(first), e);
}
