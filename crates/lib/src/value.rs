//! Host-facing wrappers around nodes.
//!
//! [`Value`] is the sum of all wrapper kinds a host interacts with.
//! Scalars, structs, and unions wrap their node directly and are
//! immutable; lists and maps layer copy-on-write mutation buffers over
//! theirs (see [`crate::list`] and [`crate::map`]).

use std::fmt;

use crate::data::{Kind, Node};
use crate::errors::LarkError;
use crate::list::ListValue;
use crate::map::MapValue;

/// Any node wrapped for host consumption.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(ScalarValue),
    List(ListValue),
    Map(MapValue),
    Struct(StructValue),
    Union(UnionValue),
}

impl Value {
    pub fn new_null() -> Self {
        Value::Scalar(ScalarValue::new(Node::null()))
    }

    pub fn new_bool(b: bool) -> Self {
        Value::Scalar(ScalarValue::new(Node::bool(b)))
    }

    pub fn new_int(n: i64) -> Self {
        Value::Scalar(ScalarValue::new(Node::int(n)))
    }

    pub fn new_float(f: f64) -> Self {
        Value::Scalar(ScalarValue::new(Node::float(f)))
    }

    pub fn new_string(s: impl Into<String>) -> Self {
        Value::Scalar(ScalarValue::new(Node::string(s)))
    }

    pub fn new_bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Scalar(ScalarValue::new(Node::bytes(b)))
    }

    pub fn new_link(target: impl Into<String>) -> Self {
        Value::Scalar(ScalarValue::new(Node::link(target)))
    }

    /// The current node view, merging any pending façade mutations
    /// without materializing them.
    pub fn to_node(&self) -> Node {
        match self {
            Value::Scalar(v) => v.node.clone(),
            Value::List(v) => v.to_node(),
            Value::Map(v) => v.to_node(),
            Value::Struct(v) => v.node.clone(),
            Value::Union(v) => v.node.clone(),
        }
    }

    /// Materializes pending mutations and returns the backing node.
    pub fn node(&mut self) -> &Node {
        match self {
            Value::Scalar(v) => &v.node,
            Value::List(v) => v.node(),
            Value::Map(v) => v.node(),
            Value::Struct(v) => &v.node,
            Value::Union(v) => &v.node,
        }
    }

    /// The data-model kind of the wrapped node
    pub fn kind(&self) -> Kind {
        match self {
            Value::Scalar(v) => v.node.kind(),
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Struct(_) | Value::Union(_) => Kind::Map,
        }
    }

    /// The host-visible type name, e.g. `larkdata.string` for plain
    /// scalars and `larkdata.Struct<FooBar>` for typed values.
    pub fn type_name(&self) -> String {
        let tag = match self {
            Value::Scalar(v) => v.node.type_tag(),
            Value::List(v) => v.base_type_tag(),
            Value::Map(v) => v.base_type_tag(),
            Value::Struct(v) => v.node.type_tag(),
            Value::Union(v) => v.node.type_tag(),
        };
        match tag {
            Some(tag) => {
                let mut kind_word = tag.kind.name().to_string();
                if let Some(first) = kind_word.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                format!("larkdata.{}<{}>", kind_word, tag.name)
            }
            None => format!("larkdata.{}", self.kind()),
        }
    }

    /// Host truthiness: null and zero/empty scalars are false, composites
    /// are always true.
    pub fn truth(&self) -> bool {
        match self {
            Value::Scalar(v) => match v.node.kind() {
                Kind::Null => false,
                Kind::Bool => v.node.as_bool().unwrap_or(false),
                Kind::Int => v.node.as_int().is_some_and(|n| n != 0),
                Kind::Float => v.node.as_float().is_some_and(|f| f != 0.0),
                Kind::String => v.node.as_str().is_some_and(|s| !s.is_empty()),
                Kind::Bytes => v.node.as_bytes().is_some_and(|b| !b.is_empty()),
                _ => true,
            },
            _ => true,
        }
    }
}

// Wrapper equality is structural over the merged node views.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.to_node() == other.to_node()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_node())
    }
}

/// A wrapped scalar node (including null and links).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarValue {
    node: Node,
}

impl ScalarValue {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

/// A wrapped struct node. Field access is by attribute name.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    node: Node,
}

impl StructValue {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Looks up a field by name. Unset optional fields come back as a
    /// scalar wrapper that renders `absent`.
    pub fn attr(&self, name: &str) -> Result<Value, LarkError> {
        let field = self
            .node
            .lookup_key(name)
            .ok_or_else(|| LarkError::AttrNotFound {
                name: name.to_string(),
            })?;
        if field.is_absent() {
            return Ok(Value::Scalar(ScalarValue::new(field.clone())));
        }
        crate::convert::to_host_value(field.clone())
    }

    /// Field names in declaration order
    pub fn attr_names(&self) -> Vec<String> {
        self.node
            .as_entries()
            .unwrap_or(&[])
            .iter()
            .filter_map(|(k, _)| k.as_str().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

/// A wrapped union node: exactly one member key and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    node: Node,
}

impl UnionValue {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The name of the inhabited member
    pub fn member_name(&self) -> Option<&str> {
        self.node
            .as_entries()
            .and_then(|entries| entries.first())
            .and_then(|(k, _)| k.as_str())
    }

    /// The inhabited member's value
    pub fn inner(&self) -> Result<Value, LarkError> {
        let (_, v) = self
            .node
            .as_entries()
            .and_then(|entries| entries.first())
            .ok_or(LarkError::UnionKeyCount)?;
        crate::convert::to_host_value(v.clone())
    }
}

impl fmt::Display for UnionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}
