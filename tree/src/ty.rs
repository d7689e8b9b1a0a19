use crate::Primitive;
use alloc::sync::Arc;
use core::fmt;

/// Logical structure of a static type.
///
/// Types are compared structurally: two independently built `Array[i32]`
/// types are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// The type of nodes that produce no value.
    Void,

    /// Primitive types (bool, integers, floats, string).
    Primitive(Primitive),

    /// Enumeration backed by an integer primitive.
    Enum { name: Arc<str>, underlying: Primitive },

    /// A value type that may also hold null.
    Nullable(Type),

    /// Array with element type and rank.
    Array { element: Type, rank: u8 },

    /// Delegate/function type with parameters and return type.
    Function { params: Arc<[Type]>, ret: Type },

    /// Any other named type, optionally generic.
    Named {
        name: Arc<str>,
        args: Arc<[Type]>,
        value_type: bool,
    },
}

/// Handle to a static type.
///
/// This is a lightweight wrapper around shared type data. It can be
/// cloned cheaply and sent across threads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type {
    data: Arc<TypeData>,
}

impl Type {
    /// Create a new type from its data.
    pub fn new(data: TypeData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Get the type structure.
    pub fn data(&self) -> &TypeData {
        &self.data
    }

    pub fn void() -> Self {
        Self::new(TypeData::Void)
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(TypeData::Primitive(primitive))
    }

    pub fn bool() -> Self {
        Self::primitive(Primitive::Bool)
    }

    pub fn char() -> Self {
        Self::primitive(Primitive::Char)
    }

    pub fn i32() -> Self {
        Self::primitive(Primitive::I32)
    }

    pub fn i64() -> Self {
        Self::primitive(Primitive::I64)
    }

    pub fn f64() -> Self {
        Self::primitive(Primitive::F64)
    }

    pub fn string() -> Self {
        Self::primitive(Primitive::String)
    }

    /// The root reference type.
    pub fn object() -> Self {
        Self::named("object")
    }

    pub fn enumeration(name: impl AsRef<str>, underlying: Primitive) -> Self {
        Self::new(TypeData::Enum {
            name: Arc::from(name.as_ref()),
            underlying,
        })
    }

    pub fn nullable(inner: Type) -> Self {
        Self::new(TypeData::Nullable(inner))
    }

    /// Single-dimensional array.
    pub fn array(element: Type) -> Self {
        Self::array_of_rank(element, 1)
    }

    pub fn array_of_rank(element: Type, rank: u8) -> Self {
        Self::new(TypeData::Array { element, rank })
    }

    pub fn function(params: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Self::new(TypeData::Function {
            params: params.into_iter().collect(),
            ret,
        })
    }

    /// Non-generic reference type.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::generic(name, [])
    }

    /// Generic reference type such as `List<string>`.
    pub fn generic(name: impl AsRef<str>, args: impl IntoIterator<Item = Type>) -> Self {
        Self::new(TypeData::Named {
            name: Arc::from(name.as_ref()),
            args: args.into_iter().collect(),
            value_type: false,
        })
    }

    /// Non-primitive value type (a struct).
    pub fn value_type(name: impl AsRef<str>) -> Self {
        Self::new(TypeData::Named {
            name: Arc::from(name.as_ref()),
            args: Arc::from([]),
            value_type: true,
        })
    }

    /// Get the primitive, if this is a primitive type.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self.data() {
            TypeData::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Element type of an array, if this is an array type.
    pub fn element(&self) -> Option<&Type> {
        match self.data() {
            TypeData::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Return type of a function type, if this is a function type.
    pub fn return_type(&self) -> Option<&Type> {
        match self.data() {
            TypeData::Function { ret, .. } => Some(ret),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.data(), TypeData::Void)
    }

    /// Check if values of this type are copied rather than shared.
    pub fn is_value_type(&self) -> bool {
        match self.data() {
            TypeData::Primitive(p) => *p != Primitive::String,
            TypeData::Enum { .. } | TypeData::Nullable(_) => true,
            TypeData::Named { value_type, .. } => *value_type,
            TypeData::Void | TypeData::Array { .. } | TypeData::Function { .. } => false,
        }
    }

    /// Check if constants of this type are always compared by value.
    ///
    /// Holds for primitives, enums and nullable wrappers around either.
    pub fn is_directly_comparable(&self) -> bool {
        match self.data() {
            TypeData::Primitive(_) | TypeData::Enum { .. } => true,
            TypeData::Nullable(inner) => inner.is_directly_comparable(),
            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::array(Type::i32()), Type::array(Type::i32()));
        assert_ne!(Type::array(Type::i32()), Type::array(Type::i64()));
        assert_eq!(
            Type::generic("List", [Type::string()]),
            Type::generic("List", [Type::string()])
        );
    }

    #[test]
    fn test_directly_comparable() {
        assert!(Type::i32().is_directly_comparable());
        assert!(Type::string().is_directly_comparable());
        assert!(Type::enumeration("Color", Primitive::I32).is_directly_comparable());
        assert!(Type::nullable(Type::f64()).is_directly_comparable());
        assert!(!Type::nullable(Type::value_type("Point")).is_directly_comparable());
        assert!(!Type::object().is_directly_comparable());
        assert!(!Type::array(Type::i32()).is_directly_comparable());
    }

    #[test]
    fn test_value_types() {
        assert!(Type::i32().is_value_type());
        assert!(!Type::string().is_value_type());
        assert!(Type::value_type("Point").is_value_type());
        assert!(!Type::object().is_value_type());
    }
}
