//! Reflection handles carried by nodes.
//!
//! The tree never interprets these: methods, constructors and members are
//! passed through views untouched and compared with `==` by the structural
//! comparer.

use crate::Type;
use alloc::sync::Arc;

/// A method: operator overloads, call targets, initializer `Add` methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    name: Arc<str>,
    declaring_type: Type,
    parameters: Arc<[Type]>,
    return_type: Type,
    is_static: bool,
}

impl Method {
    /// A method invoked on an instance of `declaring_type`.
    pub fn instance(
        declaring_type: Type,
        name: impl AsRef<str>,
        parameters: impl IntoIterator<Item = Type>,
        return_type: Type,
    ) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            declaring_type,
            parameters: parameters.into_iter().collect(),
            return_type,
            is_static: false,
        }
    }

    /// A method invoked without a receiver.
    pub fn new_static(
        declaring_type: Type,
        name: impl AsRef<str>,
        parameters: impl IntoIterator<Item = Type>,
        return_type: Type,
    ) -> Self {
        Self {
            is_static: true,
            ..Self::instance(declaring_type, name, parameters, return_type)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    pub fn parameters(&self) -> &[Type] {
        &self.parameters
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// A constructor of `declaring_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constructor {
    declaring_type: Type,
    parameters: Arc<[Type]>,
}

impl Constructor {
    pub fn new(declaring_type: Type, parameters: impl IntoIterator<Item = Type>) -> Self {
        Self {
            declaring_type,
            parameters: parameters.into_iter().collect(),
        }
    }

    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    pub fn parameters(&self) -> &[Type] {
        &self.parameters
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Method,
}

/// A field, property or method, as used by member access and bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    name: Arc<str>,
    declaring_type: Type,
    member_type: Type,
    kind: MemberKind,
}

impl Member {
    pub fn field(declaring_type: Type, name: impl AsRef<str>, member_type: Type) -> Self {
        Self::new(declaring_type, name, member_type, MemberKind::Field)
    }

    pub fn property(declaring_type: Type, name: impl AsRef<str>, member_type: Type) -> Self {
        Self::new(declaring_type, name, member_type, MemberKind::Property)
    }

    pub fn new(
        declaring_type: Type,
        name: impl AsRef<str>,
        member_type: Type,
        kind: MemberKind,
    ) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            declaring_type,
            member_type,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    /// The type a read of this member produces.
    pub fn member_type(&self) -> &Type {
        &self.member_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }
}

#[derive(Debug)]
struct LabelData {
    name: Option<Arc<str>>,
    ty: Type,
}

/// Target of goto, label and loop nodes.
///
/// Two targets are `==` only if they are the same instance; the structural
/// comparer matches targets by type and name instead.
#[derive(Debug, Clone)]
pub struct LabelTarget {
    data: Arc<LabelData>,
}

impl LabelTarget {
    pub fn new(ty: Type, name: Option<&str>) -> Self {
        Self {
            data: Arc::new(LabelData {
                name: name.map(Arc::from),
                ty,
            }),
        }
    }

    /// An unnamed target of type void.
    pub fn void() -> Self {
        Self::new(Type::void(), None)
    }

    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.data.ty
    }

    /// Check if both handles point at the same target instance.
    pub fn ptr_eq(&self, other: &LabelTarget) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for LabelTarget {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for LabelTarget {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

/// Source document referenced by debug info nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolDocument {
    file_name: Arc<str>,
}

impl SymbolDocument {
    pub fn new(file_name: impl AsRef<str>) -> Self {
        Self {
            file_name: Arc::from(file_name.as_ref()),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
