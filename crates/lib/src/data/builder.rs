//! Single-use builders that assemble nodes bottom-up.
//!
//! A [`NodeBuilder`] is created against a target: the plain data model, a
//! single basic kind, a schema type's *type-level* view, or its
//! *representation-level* view. Every terminal operation consumes the
//! builder, so a builder can never be reused after it has produced a node.
//!
//! Composite assembly goes through [`MapAssembler`] / [`ListAssembler`],
//! which are append-only and validate the typed shape on `finish`:
//! struct required fields, union single-member, typed map/list element
//! types.

use std::sync::Arc;

use crate::errors::LarkError;
use crate::schema::{StructField, StructRepr, TypeDef, TypeKind, TypeSystem, UnionMember};

use super::node::{Kind, Node, TypeTag};

/// What a builder is building towards.
#[derive(Debug, Clone)]
enum Expect {
    /// Any data-model value
    Any,
    /// A single basic scalar kind
    Basic(Kind),
    /// An untyped list
    BasicList,
    /// An untyped map
    BasicMap,
    /// The type-level view of a schema type
    Type { ts: Arc<TypeSystem>, name: String },
    /// The representation-level view of a schema type
    Repr { ts: Arc<TypeSystem>, name: String },
}

impl Expect {
    fn describe(&self) -> String {
        match self {
            Expect::Any => "any".to_string(),
            Expect::Basic(k) => k.to_string(),
            Expect::BasicList => "list".to_string(),
            Expect::BasicMap => "map".to_string(),
            Expect::Type { name, .. } | Expect::Repr { name, .. } => name.clone(),
        }
    }
}

/// Single-use assembler producing exactly one [`Node`].
///
/// # Examples
///
/// ```
/// use larkdata::NodeBuilder;
///
/// let node = NodeBuilder::basic().assign_string("yo").unwrap();
/// assert_eq!(node.to_string(), "string{\"yo\"}");
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    expect: Expect,
}

impl NodeBuilder {
    /// Builder for any plain data-model value
    pub fn basic() -> Self {
        Self { expect: Expect::Any }
    }

    /// Builder restricted to one basic scalar kind
    pub fn basic_kind(kind: Kind) -> Self {
        Self {
            expect: Expect::Basic(kind),
        }
    }

    /// Builder for an untyped list
    pub fn basic_list() -> Self {
        Self {
            expect: Expect::BasicList,
        }
    }

    /// Builder for an untyped map
    pub fn basic_map() -> Self {
        Self {
            expect: Expect::BasicMap,
        }
    }

    /// Builder for the type-level view of a named schema type
    pub fn for_type(ts: &Arc<TypeSystem>, name: &str) -> Result<Self, LarkError> {
        ts.type_def(name)?;
        Ok(Self {
            expect: Expect::Type {
                ts: Arc::clone(ts),
                name: name.to_string(),
            },
        })
    }

    /// Builder for the representation-level view of a named schema type
    pub fn for_repr(ts: &Arc<TypeSystem>, name: &str) -> Result<Self, LarkError> {
        ts.type_def(name)?;
        Ok(Self {
            expect: Expect::Repr {
                ts: Arc::clone(ts),
                name: name.to_string(),
            },
        })
    }

    /// Assigns null, producing the finished node
    pub fn assign_null(self) -> Result<Node, LarkError> {
        self.assign_scalar(Node::null())
    }

    /// Assigns a bool, producing the finished node
    pub fn assign_bool(self, b: bool) -> Result<Node, LarkError> {
        self.assign_scalar(Node::bool(b))
    }

    /// Assigns an int, producing the finished node
    pub fn assign_int(self, n: i64) -> Result<Node, LarkError> {
        self.assign_scalar(Node::int(n))
    }

    /// Assigns a float, producing the finished node
    pub fn assign_float(self, f: f64) -> Result<Node, LarkError> {
        self.assign_scalar(Node::float(f))
    }

    /// Assigns a string, producing the finished node.
    ///
    /// For a representation-level builder over a stringjoin struct this
    /// parses the compact textual form back into the declared fields.
    pub fn assign_string(self, s: impl Into<String>) -> Result<Node, LarkError> {
        self.assign_scalar(Node::string(s))
    }

    /// Assigns bytes, producing the finished node
    pub fn assign_bytes(self, b: impl Into<Vec<u8>>) -> Result<Node, LarkError> {
        self.assign_scalar(Node::bytes(b))
    }

    /// Assigns a link, producing the finished node
    pub fn assign_link(self, target: impl Into<String>) -> Result<Node, LarkError> {
        self.assign_scalar(Node::link(target))
    }

    fn assign_scalar(self, node: Node) -> Result<Node, LarkError> {
        let kind = node.kind();
        match self.expect {
            Expect::Any => Ok(node),
            Expect::Basic(want) if want == kind => Ok(node),
            Expect::Basic(want) => Err(LarkError::TypeMismatch {
                expected: want.to_string(),
                actual: kind.to_string(),
            }),
            e @ (Expect::BasicList | Expect::BasicMap) => Err(LarkError::TypeMismatch {
                expected: e.describe(),
                actual: kind.to_string(),
            }),
            Expect::Type { ts, name } => assign_scalar_typed(&ts, &name, node, false),
            Expect::Repr { ts, name } => assign_scalar_typed(&ts, &name, node, true),
        }
    }

    /// Assigns an already-built node directly (structural reuse).
    ///
    /// Typed targets accept a node whose type tag already matches; an
    /// untyped node is accepted when its shape is compatible with the
    /// declared type, and is re-validated and tagged along the way.
    pub fn assign_node(self, node: Node) -> Result<Node, LarkError> {
        match &self.expect {
            Expect::Any => Ok(node),
            Expect::Basic(want) => {
                if node.kind() == *want && node.type_tag().is_none() {
                    Ok(node)
                } else {
                    Err(LarkError::TypeMismatch {
                        expected: want.to_string(),
                        actual: describe_node(&node),
                    })
                }
            }
            Expect::BasicList | Expect::BasicMap => {
                let want = if matches!(self.expect, Expect::BasicList) {
                    Kind::List
                } else {
                    Kind::Map
                };
                if node.kind() == want && node.type_tag().is_none() {
                    Ok(node)
                } else {
                    Err(LarkError::TypeMismatch {
                        expected: want.to_string(),
                        actual: describe_node(&node),
                    })
                }
            }
            Expect::Type { name, .. } | Expect::Repr { name, .. } => {
                if node.type_tag().is_some_and(|t| t.name == *name) {
                    return Ok(node);
                }
                if node.type_tag().is_some() {
                    return Err(LarkError::TypeMismatch {
                        expected: name.clone(),
                        actual: describe_node(&node),
                    });
                }
                self.adopt_untyped(node)
            }
        }
    }

    /// Re-validates an untyped node against this builder's typed target.
    fn adopt_untyped(self, node: Node) -> Result<Node, LarkError> {
        let (ts, name) = match &self.expect {
            Expect::Type { ts, name } | Expect::Repr { ts, name } => (Arc::clone(ts), name.clone()),
            _ => unreachable!("adopt_untyped is only called for typed targets"),
        };
        match (ts.type_def(&name)?, node.kind()) {
            (TypeDef::Scalar { kind }, actual) if *kind == actual => {
                Ok(node.with_type(TypeTag::new(name, TypeKind::Scalar)))
            }
            (TypeDef::Struct { .. } | TypeDef::Map { .. } | TypeDef::Union { .. }, Kind::Map) => {
                let entries = node.into_entries();
                let mut ma = self.begin_map(entries.len() as i64)?;
                for (k, v) in entries {
                    let vb = ma.value_builder(&k)?;
                    let value = vb.assign_node(v)?;
                    ma.put(k, value)?;
                }
                ma.finish()
            }
            (TypeDef::List { .. }, Kind::List) => {
                let items = node.into_items();
                let mut la = self.begin_list(items.len() as i64)?;
                for item in items {
                    let elem = la.value_builder().assign_node(item)?;
                    la.push(elem);
                }
                la.finish()
            }
            (_, actual) => Err(LarkError::TypeMismatch {
                expected: name,
                actual: actual.to_string(),
            }),
        }
    }

    /// Begins map assembly, consuming the builder.
    ///
    /// `size_hint` is the expected entry count, or -1 when unknown.
    pub fn begin_map(self, size_hint: i64) -> Result<MapAssembler, LarkError> {
        let capacity = if size_hint >= 0 { size_hint as usize } else { 0 };
        let target = match self.expect {
            Expect::Any | Expect::BasicMap => MapTarget::Basic,
            Expect::Basic(kind) => {
                return Err(LarkError::TypeMismatch {
                    expected: kind.to_string(),
                    actual: "map".to_string(),
                });
            }
            Expect::BasicList => {
                return Err(LarkError::TypeMismatch {
                    expected: "list".to_string(),
                    actual: "map".to_string(),
                });
            }
            Expect::Type { ts, name } => map_target(&ts, &name, false)?,
            Expect::Repr { ts, name } => map_target(&ts, &name, true)?,
        };
        Ok(MapAssembler {
            target,
            entries: Vec::with_capacity(capacity),
        })
    }

    /// Begins list assembly, consuming the builder.
    ///
    /// `size_hint` is the expected element count, or -1 when unknown.
    pub fn begin_list(self, size_hint: i64) -> Result<ListAssembler, LarkError> {
        let capacity = if size_hint >= 0 { size_hint as usize } else { 0 };
        let target = match self.expect {
            Expect::Any | Expect::BasicList => ListTarget::Basic,
            Expect::Type { ts, name } | Expect::Repr { ts, name } => {
                match ts.type_def(&name)? {
                    TypeDef::List { elem } => {
                        let elem = elem.clone();
                        ListTarget::Typed {
                            ts: Arc::clone(&ts),
                            name: name.clone(),
                            elem,
                        }
                    }
                    other => {
                        return Err(LarkError::TypeMismatch {
                            expected: other.type_kind().name().to_string(),
                            actual: "list".to_string(),
                        });
                    }
                }
            }
            other => {
                return Err(LarkError::TypeMismatch {
                    expected: other.describe(),
                    actual: "list".to_string(),
                });
            }
        };
        Ok(ListAssembler {
            target,
            items: Vec::with_capacity(capacity),
        })
    }
}

fn describe_node(node: &Node) -> String {
    match node.type_tag() {
        Some(tag) => tag.name.clone(),
        None => node.kind().to_string(),
    }
}

/// Scalar assignment against a typed target. For representation-level
/// stringjoin structs, a string assignment parses the joined form.
fn assign_scalar_typed(
    ts: &Arc<TypeSystem>,
    name: &str,
    node: Node,
    repr_level: bool,
) -> Result<Node, LarkError> {
    let kind = node.kind();
    match ts.type_def(name)? {
        TypeDef::Scalar { kind: want } if *want == kind => {
            Ok(node.with_type(TypeTag::new(name, TypeKind::Scalar)))
        }
        TypeDef::Struct {
            fields,
            repr: StructRepr::Stringjoin { join },
        } if repr_level && kind == Kind::String => {
            let text = node.as_str().unwrap_or_default();
            parse_stringjoin(ts, name, fields, join, text)
        }
        other => Err(LarkError::TypeMismatch {
            expected: format!("{} ({})", name, other.type_kind().name()),
            actual: kind.to_string(),
        }),
    }
}

/// Splits a stringjoin representation into its declared fields.
fn parse_stringjoin(
    ts: &Arc<TypeSystem>,
    name: &str,
    fields: &[StructField],
    join: &str,
    text: &str,
) -> Result<Node, LarkError> {
    let parts: Vec<&str> = if fields.len() <= 1 {
        vec![text]
    } else {
        text.splitn(fields.len(), join).collect()
    };
    if parts.len() != fields.len() {
        let field_list: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        return Err(LarkError::FieldMismatch {
            expected: fields.len(),
            fields: field_list.join(","),
            got: parts.len(),
        });
    }
    let mut entries = Vec::with_capacity(fields.len());
    for (field, part) in fields.iter().zip(parts) {
        let value = NodeBuilder::for_repr(ts, &field.type_name)?.assign_string(part)?;
        entries.push((Node::string(field.name.clone()), value));
    }
    Ok(Node::map(entries).with_type(TypeTag::new(name, TypeKind::Struct)))
}

fn map_target(ts: &Arc<TypeSystem>, name: &str, repr_level: bool) -> Result<MapTarget, LarkError> {
    match ts.type_def(name)? {
        TypeDef::Struct { fields, repr } => {
            if repr_level && !matches!(repr, StructRepr::Map) {
                return Err(LarkError::TypeMismatch {
                    expected: format!("{name} (string representation)"),
                    actual: "map".to_string(),
                });
            }
            Ok(MapTarget::Struct {
                ts: Arc::clone(ts),
                name: name.to_string(),
                fields: fields.clone(),
            })
        }
        TypeDef::Map { key, value } => Ok(MapTarget::TypedMap {
            ts: Arc::clone(ts),
            name: name.to_string(),
            key: key.clone(),
            value: value.clone(),
        }),
        TypeDef::Union { members, .. } => Ok(MapTarget::Union {
            ts: Arc::clone(ts),
            name: name.to_string(),
            members: members.clone(),
        }),
        other => Err(LarkError::TypeMismatch {
            expected: other.type_kind().name().to_string(),
            actual: "map".to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
enum MapTarget {
    Basic,
    Struct {
        ts: Arc<TypeSystem>,
        name: String,
        fields: Vec<StructField>,
    },
    TypedMap {
        ts: Arc<TypeSystem>,
        name: String,
        key: String,
        value: String,
    },
    Union {
        ts: Arc<TypeSystem>,
        name: String,
        members: Vec<UnionMember>,
    },
}

/// Append-only assembler for one map-shaped node.
#[derive(Debug)]
pub struct MapAssembler {
    target: MapTarget,
    entries: Vec<(Node, Node)>,
}

impl MapAssembler {
    /// Builder for the next key.
    ///
    /// Typed map keys assemble at the representation level, so a string
    /// key can parse through a stringjoin key type.
    pub fn key_builder(&self) -> NodeBuilder {
        match &self.target {
            MapTarget::Basic => NodeBuilder::basic(),
            MapTarget::Struct { .. } | MapTarget::Union { .. } => {
                NodeBuilder::basic_kind(Kind::String)
            }
            MapTarget::TypedMap { ts, key, .. } => NodeBuilder {
                expect: Expect::Repr {
                    ts: Arc::clone(ts),
                    name: key.clone(),
                },
            },
        }
    }

    /// Builder for the value belonging to an assembled key.
    ///
    /// For structs this resolves the field's declared type; for unions the
    /// member's type; for typed maps the value type.
    pub fn value_builder(&self, key: &Node) -> Result<NodeBuilder, LarkError> {
        match &self.target {
            MapTarget::Basic => Ok(NodeBuilder::basic()),
            MapTarget::Struct { ts, name, fields } => {
                let key_name = key.as_str().unwrap_or_default();
                let field = fields
                    .iter()
                    .find(|f| f.name == key_name)
                    .ok_or_else(|| LarkError::UnknownField {
                        type_name: name.clone(),
                        field: key_name.to_string(),
                    })?;
                NodeBuilder::for_type(ts, &field.type_name)
            }
            MapTarget::TypedMap { ts, value, .. } => NodeBuilder::for_type(ts, value),
            MapTarget::Union { ts, name, members } => {
                let key_name = key.as_str().unwrap_or_default();
                let member = members
                    .iter()
                    .find(|m| m.name == key_name)
                    .ok_or_else(|| LarkError::UnknownField {
                        type_name: name.clone(),
                        field: key_name.to_string(),
                    })?;
                NodeBuilder::for_type(ts, &member.type_name)
            }
        }
    }

    /// Representation-level builder for the value belonging to a key, used
    /// as the per-value fallback when direct assembly fails. Returns None
    /// for untyped targets, which have no representation view.
    pub fn value_repr_builder(&self, key: &Node) -> Result<Option<NodeBuilder>, LarkError> {
        match &self.target {
            MapTarget::Basic => Ok(None),
            MapTarget::Struct { ts, name, fields } => {
                let key_name = key.as_str().unwrap_or_default();
                let field = fields
                    .iter()
                    .find(|f| f.name == key_name)
                    .ok_or_else(|| LarkError::UnknownField {
                        type_name: name.clone(),
                        field: key_name.to_string(),
                    })?;
                Ok(Some(NodeBuilder::for_repr(ts, &field.type_name)?))
            }
            MapTarget::TypedMap { ts, value, .. } => {
                Ok(Some(NodeBuilder::for_repr(ts, value)?))
            }
            MapTarget::Union { ts, name, members } => {
                let key_name = key.as_str().unwrap_or_default();
                let member = members
                    .iter()
                    .find(|m| m.name == key_name)
                    .ok_or_else(|| LarkError::UnknownField {
                        type_name: name.clone(),
                        field: key_name.to_string(),
                    })?;
                Ok(Some(NodeBuilder::for_repr(ts, &member.type_name)?))
            }
        }
    }

    /// Appends one assembled entry. Keys and values are expected to have
    /// come from this assembler's own key/value builders.
    pub fn put(&mut self, key: Node, value: Node) -> Result<(), LarkError> {
        self.entries.push((key, value));
        Ok(())
    }

    /// Finishes assembly, validating the typed shape and producing the node.
    pub fn finish(self) -> Result<Node, LarkError> {
        match self.target {
            MapTarget::Basic => Ok(Node::map(self.entries)),
            MapTarget::Struct { name, fields, .. } => {
                finish_struct(&name, &fields, self.entries)
            }
            MapTarget::TypedMap { name, .. } => {
                Ok(Node::map(self.entries).with_type(TypeTag::new(name, TypeKind::Map)))
            }
            MapTarget::Union { name, .. } => {
                if self.entries.len() != 1 {
                    return Err(LarkError::UnionKeyCount);
                }
                Ok(Node::map(self.entries).with_type(TypeTag::new(name, TypeKind::Union)))
            }
        }
    }
}

/// Orders assembled struct entries into declaration order, filling unset
/// optional fields with the absent marker.
fn finish_struct(
    name: &str,
    fields: &[StructField],
    entries: Vec<(Node, Node)>,
) -> Result<Node, LarkError> {
    let mut ordered = Vec::with_capacity(fields.len());
    for field in fields {
        let assigned = entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(field.name.as_str()))
            .map(|(_, v)| v.clone());
        match assigned {
            Some(value) => ordered.push((Node::string(field.name.clone()), value)),
            None if field.optional => {
                ordered.push((Node::string(field.name.clone()), Node::absent()))
            }
            None => {
                return Err(LarkError::MissingField {
                    type_name: name.to_string(),
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(Node::map(ordered).with_type(TypeTag::new(name, TypeKind::Struct)))
}

#[derive(Debug, Clone)]
enum ListTarget {
    Basic,
    Typed {
        ts: Arc<TypeSystem>,
        name: String,
        elem: String,
    },
}

/// Append-only assembler for one list-shaped node.
#[derive(Debug)]
pub struct ListAssembler {
    target: ListTarget,
    items: Vec<Node>,
}

impl ListAssembler {
    /// Builder for the next element
    pub fn value_builder(&self) -> NodeBuilder {
        match &self.target {
            ListTarget::Basic => NodeBuilder::basic(),
            ListTarget::Typed { ts, elem, .. } => NodeBuilder {
                expect: Expect::Type {
                    ts: Arc::clone(ts),
                    name: elem.clone(),
                },
            },
        }
    }

    /// Appends one assembled element
    pub fn push(&mut self, value: Node) {
        self.items.push(value);
    }

    /// Finishes assembly, producing the node
    pub fn finish(self) -> Result<Node, LarkError> {
        match self.target {
            ListTarget::Basic => Ok(Node::list(self.items)),
            ListTarget::Typed { name, .. } => {
                Ok(Node::list(self.items).with_type(TypeTag::new(name, TypeKind::List)))
            }
        }
    }
}
