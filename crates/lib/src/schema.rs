//! The schema oracle: type definitions queried during construction.
//!
//! The core treats the schema as a read-only oracle answering "what fields
//! or members does this type have, and what representation strategy applies".
//! Type definitions are built programmatically; parsing schema source text
//! is out of scope for this crate.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::Kind;
use crate::errors::LarkError;

/// The schema-level shape of a typed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    Struct,
    Union,
    Map,
    List,
    Scalar,
    Enum,
}

impl TypeKind {
    /// Returns the typekind name as a lowercase string
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Union => "union",
            TypeKind::Map => "map",
            TypeKind::List => "list",
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
        }
    }
}

/// One declared field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructField {
    pub name: String,
    pub type_name: String,
    pub optional: bool,
}

impl StructField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            optional,
        }
    }
}

/// One member of a union type.
///
/// Members are addressed by their type name. Keyed representations may
/// additionally carry discriminant labels in a full schema system; label
/// namespaces are not modeled here and construction matches member names
/// only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnionMember {
    pub name: String,
    pub type_name: String,
}

impl UnionMember {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Representation strategy for a struct type.
///
/// `Map` is the default field-per-key encoding. `Stringjoin` encodes the
/// whole struct as its field values joined by a separator, which lets a
/// compact textual form be parsed back into a structured value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StructRepr {
    Map,
    Stringjoin { join: String },
}

/// Representation strategy for a union type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnionRepr {
    Keyed,
}

/// A single type definition within a [`TypeSystem`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TypeDef {
    Scalar {
        kind: Kind,
    },
    Struct {
        fields: Vec<StructField>,
        repr: StructRepr,
    },
    Union {
        members: Vec<UnionMember>,
        repr: UnionRepr,
    },
    Map {
        key: String,
        value: String,
    },
    List {
        elem: String,
    },
    Enum {
        members: Vec<String>,
    },
}

impl TypeDef {
    /// Returns the typekind of this definition
    pub fn type_kind(&self) -> TypeKind {
        match self {
            TypeDef::Scalar { .. } => TypeKind::Scalar,
            TypeDef::Struct { .. } => TypeKind::Struct,
            TypeDef::Union { .. } => TypeKind::Union,
            TypeDef::Map { .. } => TypeKind::Map,
            TypeDef::List { .. } => TypeKind::List,
            TypeDef::Enum { .. } => TypeKind::Enum,
        }
    }
}

/// A named collection of type definitions.
///
/// Built once, then shared read-only (via `Arc`) by builders and
/// constructor prototypes for the duration of a script run.
///
/// # Examples
///
/// ```
/// use larkdata::schema::{StructField, StructRepr, TypeSystem};
/// use larkdata::Kind;
///
/// let mut ts = TypeSystem::new();
/// ts.add_scalar("String", Kind::String);
/// ts.add_struct(
///     "FooBar",
///     vec![
///         StructField::new("foo", "String", false),
///         StructField::new("bar", "String", false),
///     ],
///     StructRepr::Map,
/// );
/// assert!(ts.type_def("FooBar").is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeSystem {
    types: BTreeMap<String, TypeDef>,
}

impl TypeSystem {
    /// Creates an empty type system
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a named scalar type over a primitive kind
    pub fn add_scalar(&mut self, name: impl Into<String>, kind: Kind) {
        self.types.insert(name.into(), TypeDef::Scalar { kind });
    }

    /// Declares a struct type with its fields in declaration order
    pub fn add_struct(
        &mut self,
        name: impl Into<String>,
        fields: Vec<StructField>,
        repr: StructRepr,
    ) {
        self.types.insert(name.into(), TypeDef::Struct { fields, repr });
    }

    /// Declares a union type with its members in declaration order
    pub fn add_union(
        &mut self,
        name: impl Into<String>,
        members: Vec<UnionMember>,
        repr: UnionRepr,
    ) {
        self.types
            .insert(name.into(), TypeDef::Union { members, repr });
    }

    /// Declares a typed map from a key type to a value type
    pub fn add_map(
        &mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.types.insert(
            name.into(),
            TypeDef::Map {
                key: key.into(),
                value: value.into(),
            },
        );
    }

    /// Declares a typed list of an element type
    pub fn add_list(&mut self, name: impl Into<String>, elem: impl Into<String>) {
        self.types.insert(name.into(), TypeDef::List { elem: elem.into() });
    }

    /// Declares an enum type. Enum values are not constructable; the
    /// conversion layer reports them as unsupported.
    pub fn add_enum(&mut self, name: impl Into<String>, members: Vec<String>) {
        self.types.insert(name.into(), TypeDef::Enum { members });
    }

    /// Looks up a type definition by name
    pub fn type_def(&self, name: &str) -> Result<&TypeDef, LarkError> {
        self.types.get(name).ok_or_else(|| LarkError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Looks up the typekind of a named type
    pub fn type_kind(&self, name: &str) -> Result<TypeKind, LarkError> {
        Ok(self.type_def(name)?.type_kind())
    }

    /// Returns the declared type names in deterministic (sorted) order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Wraps this type system for shared read-only access
    pub fn into_shared(self) -> Arc<TypeSystem> {
        Arc::new(self)
    }
}
