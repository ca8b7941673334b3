//! The immutable, kind-tagged node tree at the heart of the data model.
//!
//! Nodes are built once (by a [`NodeBuilder`](super::builder::NodeBuilder))
//! and are read-only thereafter. A node may additionally be *typed*: tagged
//! with a schema type name and typekind, in which case it exposes both the
//! type-level view (fields as declared) and renders with its type name.

use std::fmt;

use crate::schema::TypeKind;

/// The data-model kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    List,
    Map,
    Link,
}

impl Kind {
    /// Returns the kind name as a lowercase string
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Link => "link",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Schema type tag carried by a typed node.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeTag {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeTag {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The payload of a node. Kept private so nodes can only be produced by
/// the constructors below and by builders.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum Repr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Node>),
    // Insertion order is significant; keys are nodes so typed maps with
    // compound (e.g. struct) keys can be represented.
    Map(Vec<(Node, Node)>),
    Link(String),
    // An unset optional struct field. Renders as `absent`.
    Absent,
}

/// Immutable, kind-tagged structured value.
///
/// Equality is deep structural comparison over payload and type tag.
///
/// # Examples
///
/// ```
/// use larkdata::Node;
///
/// let n = Node::string("yo");
/// assert_eq!(n.to_string(), "string{\"yo\"}");
/// assert_eq!(n.as_str(), Some("yo"));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    repr: Repr,
    type_tag: Option<TypeTag>,
}

impl Node {
    fn untyped(repr: Repr) -> Self {
        Self {
            repr,
            type_tag: None,
        }
    }

    /// Constructs a null node
    pub fn null() -> Self {
        Self::untyped(Repr::Null)
    }

    /// Constructs a bool node
    pub fn bool(b: bool) -> Self {
        Self::untyped(Repr::Bool(b))
    }

    /// Constructs an int node
    pub fn int(n: i64) -> Self {
        Self::untyped(Repr::Int(n))
    }

    /// Constructs a float node
    pub fn float(f: f64) -> Self {
        Self::untyped(Repr::Float(f))
    }

    /// Constructs a string node
    pub fn string(s: impl Into<String>) -> Self {
        Self::untyped(Repr::String(s.into()))
    }

    /// Constructs a bytes node
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::untyped(Repr::Bytes(b.into()))
    }

    /// Constructs a list node from elements in order
    pub fn list(items: Vec<Node>) -> Self {
        Self::untyped(Repr::List(items))
    }

    /// Constructs a map node from key/value entries in order
    pub fn map(entries: Vec<(Node, Node)>) -> Self {
        Self::untyped(Repr::Map(entries))
    }

    /// Constructs a link node
    pub fn link(target: impl Into<String>) -> Self {
        Self::untyped(Repr::Link(target.into()))
    }

    /// Constructs the absent marker used for unset optional struct fields
    pub fn absent() -> Self {
        Self::untyped(Repr::Absent)
    }

    /// Attaches a schema type tag, consuming the node
    pub fn with_type(mut self, tag: TypeTag) -> Self {
        self.type_tag = Some(tag);
        self
    }

    /// Returns the schema type tag, if this node is typed
    pub fn type_tag(&self) -> Option<&TypeTag> {
        self.type_tag.as_ref()
    }

    /// Returns the data-model kind of this node.
    ///
    /// The absent marker reports `Kind::Null`; use [`Node::is_absent`] to
    /// distinguish it.
    pub fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Null | Repr::Absent => Kind::Null,
            Repr::Bool(_) => Kind::Bool,
            Repr::Int(_) => Kind::Int,
            Repr::Float(_) => Kind::Float,
            Repr::String(_) => Kind::String,
            Repr::Bytes(_) => Kind::Bytes,
            Repr::List(_) => Kind::List,
            Repr::Map(_) => Kind::Map,
            Repr::Link(_) => Kind::Link,
        }
    }

    /// Returns true for the absent marker
    pub fn is_absent(&self) -> bool {
        matches!(self.repr, Repr::Absent)
    }

    /// Returns true for null (but not absent)
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    /// Attempts to read this node as a bool
    pub fn as_bool(&self) -> Option<bool> {
        match &self.repr {
            Repr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to read this node as an int
    pub fn as_int(&self) -> Option<i64> {
        match &self.repr {
            Repr::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to read this node as a float
    pub fn as_float(&self) -> Option<f64> {
        match &self.repr {
            Repr::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to read this node as a string
    pub fn as_str(&self) -> Option<&str> {
        match &self.repr {
            Repr::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to read this node as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.repr {
            Repr::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to read this node as a link target
    pub fn as_link(&self) -> Option<&str> {
        match &self.repr {
            Repr::Link(l) => Some(l),
            _ => None,
        }
    }

    /// Attempts to read this node's list elements
    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.repr {
            Repr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to read this node's map entries in order
    pub fn as_entries(&self) -> Option<&[(Node, Node)]> {
        match &self.repr {
            Repr::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Consumes the node, returning its map entries (empty if not a map)
    pub fn into_entries(self) -> Vec<(Node, Node)> {
        match self.repr {
            Repr::Map(entries) => entries,
            _ => Vec::new(),
        }
    }

    /// Consumes the node, returning its list elements (empty if not a list)
    pub fn into_items(self) -> Vec<Node> {
        match self.repr {
            Repr::List(items) => items,
            _ => Vec::new(),
        }
    }

    /// Number of entries for composite nodes, 0 for scalars
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::List(items) => items.len(),
            Repr::Map(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Returns true if this is an empty composite (or any scalar)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a list element by index
    pub fn lookup_index(&self, index: usize) -> Option<&Node> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Looks up a map value by string key.
    ///
    /// Compound (non-string) keys never match a string lookup.
    pub fn lookup_key(&self, key: &str) -> Option<&Node> {
        self.as_entries().and_then(|entries| {
            entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v)
        })
    }

    /// Converts to a JSON string for human-readable output.
    ///
    /// This is display-oriented and lossy: absent fields become `null`,
    /// bytes become lowercase hex strings, and compound map keys are
    /// flattened to their canonical one-line rendering. For the canonical
    /// textual form use `Display` instead.
    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    fn to_json_value(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match &self.repr {
            Repr::Null | Repr::Absent => Json::Null,
            Repr::Bool(b) => Json::Bool(*b),
            Repr::Int(n) => Json::Number((*n).into()),
            Repr::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Repr::String(s) => Json::String(s.clone()),
            Repr::Bytes(b) => Json::String(hex::encode(b)),
            Repr::Link(l) => Json::String(l.clone()),
            Repr::List(items) => Json::Array(items.iter().map(Node::to_json_value).collect()),
            Repr::Map(entries) => {
                let mut obj = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = match k.as_str() {
                        Some(s) => s.to_string(),
                        None => super::printer::print_inline(k),
                    };
                    obj.insert(key, v.to_json_value());
                }
                Json::Object(obj)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::printer::print(self))
    }
}

// Convenient From implementations for common types
impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::int(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::float(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}
