//!
//! Larkdata: schema-typed structured data, legible to and constructable
//! from a dynamic scripting host.
//!
//! ## Core Concepts
//!
//! * **Nodes (`data::Node`)**: The immutable, kind-tagged trees at the
//!   heart of the data model. A node may carry a schema type tag.
//! * **Schema (`schema::TypeSystem`)**: The read-only oracle of type
//!   definitions (structs, unions, typed maps and lists, scalars) that
//!   directs construction.
//! * **Builders (`data::NodeBuilder`)**: Single-use assemblers that
//!   produce nodes bottom-up, validating typed shapes as they go.
//! * **Conversion (`convert`)**: The bidirectional bridge between dynamic
//!   host values and nodes.
//! * **Wrappers (`value::Value`)**: Host-facing façades over nodes. Lists
//!   and maps layer copy-on-write mutation buffers over their immutable
//!   base ([`list::ListValue`], [`map::MapValue`]).
//! * **Prototypes (`prototype::Prototype`)**: Callable constructors a
//!   host script invokes as `FooBar(foo="one", bar="two")`, with
//!   positional/keyword/restructuring argument reconciliation and
//!   strategy fallback between type-level and representation-level
//!   construction.

pub mod convert;
pub mod data;
pub mod env;
pub mod errors;
pub mod list;
pub mod map;
pub mod prototype;
pub mod schema;
pub mod value;

pub use convert::{HostValue, assemble_from, to_host_value};
pub use data::{Kind, Node, NodeBuilder, TypeTag};
pub use errors::LarkError;
pub use list::ListValue;
pub use map::MapValue;
pub use prototype::{Mode, ProtoTarget, Prototype, RESTRUCTURE_KEY};
pub use schema::{StructField, StructRepr, TypeDef, TypeKind, TypeSystem, UnionMember, UnionRepr};
pub use value::{ScalarValue, StructValue, UnionValue, Value};

/// Result type used throughout the larkdata library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the larkdata library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured data-model, conversion, and constructor errors
    #[error(transparent)]
    Lark(LarkError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is a conversion failure at a leaf value
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, Error::Lark(e) if e.is_conversion_error())
    }

    /// Check if this error is an arity or call-shape failure
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::Lark(e) if e.is_shape_error())
    }

    /// Check if this error is a key, index, or attribute lookup miss
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, Error::Lark(e) if e.is_not_found_error())
    }

    /// Check if this error is a schema/kind mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::Lark(e) if e.is_type_error())
    }
}
