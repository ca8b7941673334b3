//! Callable constructor prototypes exposed to the scripting host.
//!
//! A [`Prototype`] is the object a host script calls as `String("x")` or
//! `FooBar(foo="one", bar="two")`. Calls go through argument
//! reconciliation (positional vs keyword vs the `_` restructuring
//! sentinel) and then one of three construction strategies, tried in
//! order under the prototype's [`Mode`]:
//!
//! 1. a single string argument parsed via the type's string
//!    representation,
//! 2. type-level field assembly,
//! 3. representation-level field assembly.
//!
//! `Mode::Typed` and `Mode::Repr` restrict the strategies to their level;
//! the restricted clones are exposed as the `Typed` and `Repr` attributes
//! of every typed prototype.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::convert::{HostValue, assemble_from, to_host_value};
use crate::data::{Kind, NodeBuilder};
use crate::errors::LarkError;
use crate::schema::{StructField, TypeDef, TypeSystem, UnionMember};
use crate::value::Value;

/// Keyword name that triggers restructuring: the single `_` keyword's
/// value is unpacked as the real argument list or mapping.
pub const RESTRUCTURE_KEY: &str = "_";

/// Which construction strategies a prototype may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Try string representation, then type-level, then representation-level
    #[default]
    Any,
    /// Type-level field assembly only
    Typed,
    /// Representation-level assembly only
    Repr,
}

/// What a prototype constructs.
#[derive(Debug, Clone)]
pub enum ProtoTarget {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Map,
    Typed { ts: Arc<TypeSystem>, name: String },
}

impl ProtoTarget {
    fn scalar_kind(&self) -> Option<Kind> {
        match self {
            ProtoTarget::Bool => Some(Kind::Bool),
            ProtoTarget::Int => Some(Kind::Int),
            ProtoTarget::Float => Some(Kind::Float),
            ProtoTarget::Str => Some(Kind::String),
            ProtoTarget::Bytes => Some(Kind::Bytes),
            _ => None,
        }
    }
}

/// A callable constructor bound to a target and mode.
#[derive(Debug, Clone)]
pub struct Prototype {
    name: String,
    target: ProtoTarget,
    mode: Mode,
}

/// Normalized call arguments.
#[derive(Debug, Default)]
struct ArgSeq {
    vals: Vec<HostValue>,
    /// Keyword names in call order; None for a purely positional call
    names: Option<Vec<String>>,
    /// The raw key values, preserved for typed-map construction where
    /// keys need not be strings
    ckeys: Option<Vec<HostValue>>,
    /// True when the call was a single positional argument
    scalar: bool,
}

impl ArgSeq {
    fn is_single_string(&self) -> Option<&str> {
        if self.names.is_none()
            && self.vals.len() == 1
            && let HostValue::Str(s) = &self.vals[0]
        {
            Some(s)
        } else {
            None
        }
    }
}

fn host_key_string(key: &HostValue) -> Result<String, LarkError> {
    match key {
        HostValue::Str(s) => Ok(s.clone()),
        other => Err(LarkError::CannotCoerce {
            value: other.to_string(),
            kind: other.kind_name(),
        }),
    }
}

/// Normalizes positional/keyword/restructured arguments into one shape.
fn build_arg_seq(args: &[HostValue], kwargs: &[(String, HostValue)]) -> Result<ArgSeq, LarkError> {
    if !args.is_empty() && !kwargs.is_empty() {
        return Err(LarkError::MixedArguments);
    }
    if !args.is_empty() {
        return Ok(ArgSeq {
            scalar: args.len() == 1,
            vals: args.to_vec(),
            names: None,
            ckeys: None,
        });
    }
    if kwargs.len() == 1 && kwargs[0].0 == RESTRUCTURE_KEY {
        return match &kwargs[0].1 {
            HostValue::List(items) => Ok(ArgSeq {
                scalar: items.len() == 1,
                vals: items.clone(),
                names: None,
                ckeys: None,
            }),
            HostValue::Dict(entries) => {
                let mut names = Vec::with_capacity(entries.len());
                let mut ckeys = Vec::with_capacity(entries.len());
                let mut vals = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    names.push(host_key_string(k)?);
                    ckeys.push(k.clone());
                    vals.push(v.clone());
                }
                Ok(ArgSeq {
                    vals,
                    names: Some(names),
                    ckeys: Some(ckeys),
                    scalar: false,
                })
            }
            _ => Err(LarkError::BadRestructuring),
        };
    }
    let mut names = Vec::with_capacity(kwargs.len());
    let mut ckeys = Vec::with_capacity(kwargs.len());
    let mut vals = Vec::with_capacity(kwargs.len());
    for (name, value) in kwargs {
        names.push(name.clone());
        ckeys.push(HostValue::Str(name.clone()));
        vals.push(value.clone());
    }
    Ok(ArgSeq {
        vals,
        names: Some(names),
        ckeys: Some(ckeys),
        scalar: false,
    })
}

/// The dynamic type name used for union member inference: the type tag
/// name for typed wrappers, the lowercase kind name otherwise.
fn dynamic_type_name(value: &HostValue) -> String {
    match value {
        HostValue::Wrapper(v) => {
            let node = v.to_node();
            match node.type_tag() {
                Some(tag) => tag.name.clone(),
                None => node.kind().to_string(),
            }
        }
        other => other.kind_name(),
    }
}

impl Prototype {
    /// Prototype for an untyped primitive constructor
    pub fn new(name: impl Into<String>, target: ProtoTarget) -> Self {
        Self {
            name: name.into(),
            target,
            mode: Mode::Any,
        }
    }

    /// Prototype for a named schema type
    pub fn typed(ts: &Arc<TypeSystem>, name: &str) -> Result<Self, LarkError> {
        ts.type_def(name)?;
        Ok(Self {
            name: name.to_string(),
            target: ProtoTarget::Typed {
                ts: Arc::clone(ts),
                name: name.to_string(),
            },
            mode: Mode::Any,
        })
    }

    /// The constructor's host-visible name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The strategy restriction this prototype carries
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Attribute access: `Typed` and `Repr` yield mode-restricted clones
    pub fn attr(&self, name: &str) -> Result<Prototype, LarkError> {
        let mode = match name {
            "Typed" => Mode::Typed,
            "Repr" => Mode::Repr,
            _ => {
                return Err(LarkError::AttrNotFound {
                    name: name.to_string(),
                });
            }
        };
        Ok(Prototype {
            name: self.name.clone(),
            target: self.target.clone(),
            mode,
        })
    }

    /// Names of the attributes exposed on this prototype
    pub fn attr_names(&self) -> Vec<&'static str> {
        vec!["Repr", "Typed"]
    }

    /// Invokes the constructor with host-call arguments.
    pub fn call(
        &self,
        args: &[HostValue],
        kwargs: &[(String, HostValue)],
    ) -> Result<Value, LarkError> {
        let argseq = build_arg_seq(args, kwargs)?;
        match &self.target {
            ProtoTarget::Typed { ts, name } => self.construct_typed(ts, name, &argseq),
            _ => self.construct_basic(&argseq),
        }
    }

    fn construct_typed(
        &self,
        ts: &Arc<TypeSystem>,
        type_name: &str,
        argseq: &ArgSeq,
    ) -> Result<Value, LarkError> {
        match ts.type_def(type_name)? {
            TypeDef::Scalar { .. } => {
                if !argseq.scalar {
                    return Err(LarkError::ScalarArguments);
                }
                let node = assemble_from(NodeBuilder::for_type(ts, type_name)?, &argseq.vals[0])?;
                return to_host_value(node);
            }
            TypeDef::List { .. } => {
                if argseq.names.is_some() {
                    return Err(LarkError::MissingNames);
                }
                let mut la = NodeBuilder::for_type(ts, type_name)?
                    .begin_list(argseq.vals.len() as i64)?;
                for value in &argseq.vals {
                    let elem = assemble_from(la.value_builder(), value)?;
                    la.push(elem);
                }
                return to_host_value(la.finish()?);
            }
            TypeDef::Enum { .. } => {
                return Err(LarkError::Unsupported {
                    kind: "enum".to_string(),
                });
            }
            _ => {}
        }

        // Field identity resolution can itself fail (e.g. an unknown
        // keyword); that failure only surfaces if no earlier strategy
        // succeeds without needing the identities.
        let idents_res = resolve_field_idents(ts, type_name, argseq);

        if self.mode != Mode::Typed
            && let Some(s) = argseq.is_single_string()
        {
            match construct_from_string_repr(ts, type_name, s) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(
                        type_name,
                        %err,
                        "string representation strategy failed, falling through"
                    );
                }
            }
        }

        let field_idents = idents_res?;

        if self.mode != Mode::Repr {
            let builder = NodeBuilder::for_type(ts, type_name)?;
            match construct_using_fields(builder, &field_idents, argseq, self.mode != Mode::Typed) {
                Ok(value) => return Ok(value),
                Err(err) if self.mode == Mode::Typed => return Err(err),
                Err(err) => {
                    debug!(
                        type_name,
                        %err,
                        "type-level strategy failed, falling through"
                    );
                }
            }
        }

        let builder = NodeBuilder::for_repr(ts, type_name)?;
        construct_using_fields(builder, &field_idents, argseq, true)
    }

    fn construct_basic(&self, argseq: &ArgSeq) -> Result<Value, LarkError> {
        match &self.target {
            ProtoTarget::List => {
                let mut la = NodeBuilder::basic_list().begin_list(argseq.vals.len() as i64)?;
                for value in &argseq.vals {
                    let elem = assemble_from(la.value_builder(), value)?;
                    la.push(elem);
                }
                to_host_value(la.finish()?)
            }
            ProtoTarget::Map => {
                let names = argseq.names.as_ref().ok_or(LarkError::MissingNames)?;
                let mut ma = NodeBuilder::basic_map().begin_map(names.len() as i64)?;
                for (name, value) in names.iter().zip(&argseq.vals) {
                    let key = ma.key_builder().assign_string(name.clone())?;
                    let vb = ma.value_builder(&key)?;
                    let val = assemble_from(vb, value)?;
                    ma.put(key, val)?;
                }
                to_host_value(ma.finish()?)
            }
            scalar => {
                if !argseq.scalar {
                    return Err(LarkError::ScalarArguments);
                }
                let kind = scalar
                    .scalar_kind()
                    .ok_or(LarkError::ScalarArguments)?;
                let value = &argseq.vals[0];
                let node = assemble_from(NodeBuilder::basic_kind(kind), value).map_err(|_| {
                    LarkError::CannotCreate {
                        type_name: self.name.clone(),
                        value: value.to_string(),
                        kind: value.kind_name(),
                    }
                })?;
                to_host_value(node)
            }
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in function {}>", self.name)
    }
}

/// The per-entry key identities a field-assembly strategy will use.
fn resolve_field_idents(
    ts: &Arc<TypeSystem>,
    type_name: &str,
    argseq: &ArgSeq,
) -> Result<Vec<HostValue>, LarkError> {
    match ts.type_def(type_name)? {
        TypeDef::Map { .. } => Ok(argseq.ckeys.clone().unwrap_or_default()),
        TypeDef::Union { members, .. } => {
            resolve_union_ident(type_name, members, argseq).map(|name| match name {
                Some(n) => vec![HostValue::Str(n)],
                None => vec![],
            })
        }
        TypeDef::Struct { fields, .. } => resolve_struct_idents(type_name, fields, argseq),
        _ => Ok(vec![]),
    }
}

/// Struct calls: keyword names validated against declared fields, bare
/// positional calls mapped onto the full declared field list.
fn resolve_struct_idents(
    type_name: &str,
    fields: &[StructField],
    argseq: &ArgSeq,
) -> Result<Vec<HostValue>, LarkError> {
    match &argseq.names {
        Some(names) => {
            for name in names {
                if !fields.iter().any(|f| &f.name == name) {
                    return Err(LarkError::UnknownField {
                        type_name: type_name.to_string(),
                        field: name.clone(),
                    });
                }
            }
            let missing_required = fields
                .iter()
                .any(|f| !f.optional && !names.contains(&f.name));
            if missing_required {
                let declared: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                return Err(LarkError::FieldMismatch {
                    expected: fields.len(),
                    fields: declared.join(","),
                    got: names.len(),
                });
            }
            Ok(names.iter().cloned().map(HostValue::Str).collect())
        }
        None => {
            if argseq.vals.is_empty() {
                // an empty call is valid when every field is optional;
                // struct finishing enforces that
                return Ok(vec![]);
            }
            if argseq.vals.len() != fields.len() {
                let declared: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                return Err(LarkError::FieldMismatch {
                    expected: fields.len(),
                    fields: declared.join(","),
                    got: argseq.vals.len(),
                });
            }
            Ok(fields
                .iter()
                .map(|f| HostValue::Str(f.name.clone()))
                .collect())
        }
    }
}

/// Union calls: one keyword names the member outright; one bare positional
/// value infers the member from its dynamic type name.
fn resolve_union_ident(
    type_name: &str,
    members: &[UnionMember],
    argseq: &ArgSeq,
) -> Result<Option<String>, LarkError> {
    match &argseq.names {
        Some(names) if names.len() == 1 => Ok(Some(names[0].clone())),
        Some(_) => Err(LarkError::UnionKeyCount),
        None => {
            if argseq.vals.len() != 1 {
                return Err(LarkError::UnionKeyCount);
            }
            let dyn_name = dynamic_type_name(&argseq.vals[0]).to_lowercase();
            let member = members
                .iter()
                .find(|m| m.name.to_lowercase() == dyn_name || m.type_name.to_lowercase() == dyn_name)
                .ok_or_else(|| LarkError::UnionNoMatch {
                    type_name: type_name.to_string(),
                    kind: dyn_name.clone(),
                })?;
            Ok(Some(member.name.clone()))
        }
    }
}

/// Strategy 1: parse a single string through the type's representation.
fn construct_from_string_repr(
    ts: &Arc<TypeSystem>,
    type_name: &str,
    s: &str,
) -> Result<Value, LarkError> {
    let node = NodeBuilder::for_repr(ts, type_name)?.assign_string(s)?;
    to_host_value(node)
}

/// Strategies 2 and 3: assemble the supplied values under their resolved
/// key identities. When `allow_repr` is set, each value that fails direct
/// assembly is retried through its representation-level builder.
fn construct_using_fields(
    builder: NodeBuilder,
    field_idents: &[HostValue],
    argseq: &ArgSeq,
    allow_repr: bool,
) -> Result<Value, LarkError> {
    if field_idents.len() != argseq.vals.len() {
        let names: Vec<String> = field_idents.iter().map(|k| k.to_string()).collect();
        return Err(LarkError::FieldMismatch {
            expected: field_idents.len(),
            fields: names.join(","),
            got: argseq.vals.len(),
        });
    }
    let mut ma = builder.begin_map(field_idents.len() as i64)?;
    for (ident, value) in field_idents.iter().zip(&argseq.vals) {
        let key = assemble_from(ma.key_builder(), ident)?;
        let vb = ma.value_builder(&key)?;
        let assembled = match assemble_from(vb, value) {
            Ok(node) => node,
            Err(err) if allow_repr => match ma.value_repr_builder(&key)? {
                Some(rb) => assemble_from(rb, value)?,
                None => return Err(err),
            },
            Err(err) => return Err(err),
        };
        ma.put(key, assembled)?;
    }
    to_host_value(ma.finish()?)
}
