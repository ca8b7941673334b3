//! Bidirectional conversion between dynamic host values and nodes.
//!
//! The inbound direction ([`assemble_from`]) walks a [`HostValue`] and
//! feeds it into a single-use builder, so the same code path serves both
//! untyped coercion and schema-directed construction. The outbound
//! direction ([`to_host_value`]) wraps a finished node in the façade type
//! matching its typekind.

use crate::data::{Node, NodeBuilder};
use crate::errors::LarkError;
use crate::list::ListValue;
use crate::map::MapValue;
use crate::schema::TypeKind;
use crate::value::{ScalarValue, StructValue, UnionValue, Value};

/// A dynamic value as presented by the scripting host.
///
/// Hosts hand these to the conversion layer and constructor prototypes;
/// tests build them directly via the `From` impls.
#[derive(Debug, Clone)]
pub enum HostValue {
    /// An already-converted wrapper flowing back in
    Wrapper(Value),
    Bool(bool),
    /// Host integers may exceed the data model's 64-bit range; the range
    /// check happens at assembly time.
    Int(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Mapping in host iteration order
    Dict(Vec<(HostValue, HostValue)>),
    List(Vec<HostValue>),
    /// Any host type the data model has no counterpart for
    Opaque { type_name: String },
}

impl HostValue {
    /// The host-level kind name, used in error messages
    pub fn kind_name(&self) -> String {
        match self {
            HostValue::Wrapper(v) => v.type_name(),
            HostValue::Bool(_) => "bool".to_string(),
            HostValue::Int(_) => "int".to_string(),
            HostValue::Float(_) => "float".to_string(),
            HostValue::Str(_) => "string".to_string(),
            HostValue::Bytes(_) => "bytes".to_string(),
            HostValue::Dict(_) => "dict".to_string(),
            HostValue::List(_) => "list".to_string(),
            HostValue::Opaque { type_name } => type_name.clone(),
        }
    }
}

impl std::fmt::Display for HostValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostValue::Wrapper(v) => write!(f, "{v}"),
            HostValue::Bool(b) => write!(f, "{b}"),
            HostValue::Int(n) => write!(f, "{n}"),
            HostValue::Float(x) => write!(f, "{x}"),
            HostValue::Str(s) => write!(f, "\"{s}\""),
            HostValue::Bytes(b) => write!(f, "{}", hex::encode(b)),
            HostValue::Dict(_) => write!(f, "dict"),
            HostValue::List(_) => write!(f, "list"),
            HostValue::Opaque { type_name } => write!(f, "<{type_name}>"),
        }
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(value as i128)
    }
}

impl From<i128> for HostValue {
    fn from(value: i128) -> Self {
        HostValue::Int(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Str(value)
    }
}

impl From<Value> for HostValue {
    fn from(value: Value) -> Self {
        HostValue::Wrapper(value)
    }
}

/// Assembles a host value through a builder, producing the finished node.
///
/// The builder carries the target (untyped, type-level, or
/// representation-level); this function only dispatches on the host
/// value's dynamic kind and recurses through composites.
pub fn assemble_from(builder: NodeBuilder, value: &HostValue) -> Result<Node, LarkError> {
    match value {
        HostValue::Wrapper(v) => builder.assign_node(v.to_node()),
        HostValue::Bool(b) => builder.assign_bool(*b),
        HostValue::Int(n) => {
            let n = i64::try_from(*n).map_err(|_| LarkError::IntOutOfRange {
                value: n.to_string(),
            })?;
            builder.assign_int(n)
        }
        HostValue::Float(x) => builder.assign_float(*x),
        HostValue::Str(s) => builder.assign_string(s.clone()),
        HostValue::Bytes(b) => builder.assign_bytes(b.clone()),
        HostValue::Dict(entries) => {
            let mut ma = builder.begin_map(entries.len() as i64)?;
            for (k, v) in entries {
                let key = assemble_from(ma.key_builder(), k)?;
                let vb = ma.value_builder(&key)?;
                let value = assemble_from(vb, v)?;
                ma.put(key, value)?;
            }
            ma.finish()
        }
        HostValue::List(items) => {
            let mut la = builder.begin_list(items.len() as i64)?;
            for item in items {
                let elem = assemble_from(la.value_builder(), item)?;
                la.push(elem);
            }
            la.finish()
        }
        HostValue::Opaque { type_name } => Err(LarkError::CannotCoerce {
            value: value.to_string(),
            kind: type_name.clone(),
        }),
    }
}

/// Wraps a finished node in the host-facing façade matching its typekind.
pub fn to_host_value(node: Node) -> Result<Value, LarkError> {
    match node.type_tag().map(|t| t.kind) {
        Some(TypeKind::Struct) => Ok(Value::Struct(StructValue::new(node))),
        Some(TypeKind::Union) => Ok(Value::Union(UnionValue::new(node))),
        Some(TypeKind::Enum) => Err(LarkError::Unsupported {
            kind: "enum".to_string(),
        }),
        _ => match node.kind() {
            crate::data::Kind::Map => Ok(Value::Map(MapValue::new(node))),
            crate::data::Kind::List => Ok(Value::List(ListValue::new(node))),
            _ => Ok(Value::Scalar(ScalarValue::new(node))),
        },
    }
}
