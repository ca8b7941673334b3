//! Constructor environments handed to a scripting host.
//!
//! Hosts install these as named globals (or under a single namespace
//! object) so scripts can call `String("x")` or `FooBar(foo="one")`.

use std::sync::Arc;

use tracing::debug;

use crate::errors::LarkError;
use crate::prototype::{ProtoTarget, Prototype};
use crate::schema::TypeSystem;

/// Constructors for the untyped data model primitives.
pub fn primitive_constructors() -> Vec<(String, Prototype)> {
    [
        ("Map", ProtoTarget::Map),
        ("List", ProtoTarget::List),
        ("Bool", ProtoTarget::Bool),
        ("Int", ProtoTarget::Int),
        ("Float", ProtoTarget::Float),
        ("String", ProtoTarget::Str),
        ("Bytes", ProtoTarget::Bytes),
    ]
    .into_iter()
    .map(|(name, target)| (name.to_string(), Prototype::new(name, target)))
    .collect()
}

/// One constructor per declared schema type, in deterministic name order.
pub fn typed_constructors(
    ts: &Arc<TypeSystem>,
) -> Result<Vec<(String, Prototype)>, LarkError> {
    let mut out = Vec::new();
    for name in ts.type_names() {
        out.push((name.to_string(), Prototype::typed(ts, name)?));
    }
    debug!(count = out.len(), "built typed constructor environment");
    Ok(out)
}
