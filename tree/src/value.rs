//! Constant payloads.

use crate::{Expr, Type};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

/// Opaque host object stored in a constant.
///
/// `equals` is the by-value comparison used by the structural comparer; the
/// default falls back to identity, matching objects that define no equality.
pub trait Opaque: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn equals(&self, other: &dyn Opaque) -> bool {
        core::ptr::addr_eq(self, other)
    }
}

/// A nested query: a constant whose payload carries a whole expression tree.
#[derive(Debug, Clone)]
pub struct Query {
    root: Expr,
    element_type: Type,
}

impl Query {
    pub fn new(root: Expr, element_type: Type) -> Self {
        Self { root, element_type }
    }

    /// The expression the query was built from.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }
}

/// Constant payload.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(Arc<str>),
    /// Enumeration discriminant; the enum type lives on the node.
    Enum(i64),
    /// Enumerable contents.
    Sequence(Arc<[Value]>),
    Query(Query),
    Object(Arc<dyn Opaque>),
}

impl Value {
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    pub fn sequence(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Sequence(items.into_iter().collect())
    }

    pub fn object(object: impl Opaque) -> Self {
        Value::Object(Arc::new(object))
    }

    /// The static type a constant holding this value gets by default.
    pub fn natural_type(&self) -> Type {
        match self {
            Value::Bool(_) => Type::bool(),
            Value::Char(_) => Type::char(),
            Value::I8(_) => Type::primitive(crate::Primitive::I8),
            Value::U8(_) => Type::primitive(crate::Primitive::U8),
            Value::I16(_) => Type::primitive(crate::Primitive::I16),
            Value::U16(_) => Type::primitive(crate::Primitive::U16),
            Value::I32(_) => Type::i32(),
            Value::U32(_) => Type::primitive(crate::Primitive::U32),
            Value::I64(_) => Type::i64(),
            Value::U64(_) => Type::primitive(crate::Primitive::U64),
            Value::F32(_) => Type::primitive(crate::Primitive::F32),
            Value::F64(_) => Type::f64(),
            Value::Str(_) => Type::string(),
            Value::Enum(_) => Type::i64(),
            Value::Sequence(_) => Type::array(Type::object()),
            Value::Query(query) => Type::generic("Queryable", [query.element_type().clone()]),
            Value::Null | Value::Object(_) => Type::object(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Value::Query(query) => Some(query),
            _ => None,
        }
    }

    /// Reference comparison: shared payloads must be the same allocation.
    ///
    /// Inline scalars have no identity of their own and compare by value.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Sequence(a), Value::Sequence(b)) => Arc::ptr_eq(a, b),
            (Value::Query(a), Value::Query(b)) => a.root().ptr_eq(b.root()),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            // A query has no value semantics beyond the tree it was built from.
            (Value::Query(a), Value::Query(b)) => a.root().ptr_eq(b.root()),
            (Value::Object(a), Value::Object(b)) => a.equals(b.as_ref()),
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<Query> for Value {
    fn from(value: Query) -> Self {
        Value::Query(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point(i32, i32);

    impl Opaque for Point {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn equals(&self, other: &dyn Opaque) -> bool {
            other
                .as_any()
                .downcast_ref::<Point>()
                .is_some_and(|p| p.0 == self.0 && p.1 == self.1)
        }
    }

    #[derive(Debug)]
    struct Handle;

    impl Opaque for Handle {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_scalars_compare_by_value() {
        assert_eq!(Value::from(3), Value::I32(3));
        assert_ne!(Value::from(3), Value::from(3i64));
        assert_eq!(Value::from("dog"), Value::str("dog"));
    }

    #[test]
    fn test_opaque_equality_policies() {
        let a = Value::object(Point(1, 2));
        let b = Value::object(Point(1, 2));
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
        assert!(a.same_instance(&a.clone()));

        let h1 = Value::object(Handle);
        let h2 = Value::object(Handle);
        assert_ne!(h1, h2);
        assert_eq!(h1, h1.clone());
    }

    #[test]
    fn test_sequence_identity() {
        let a = Value::sequence([Value::from(1), Value::from(2)]);
        let b = Value::sequence([Value::from(1), Value::from(2)]);
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
    }
}
