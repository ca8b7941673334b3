//! Shared schema fixtures for the integration tests.

use std::sync::Arc;

use larkdata::schema::{StructField, StructRepr, TypeSystem, UnionMember, UnionRepr};
use larkdata::{HostValue, Kind, Prototype};

/// `String` scalar plus a two-field `FooBar` struct (map representation)
pub fn foobar_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_struct(
        "FooBar",
        vec![
            StructField::new("foo", "String", false),
            StructField::new("bar", "String", false),
        ],
        StructRepr::Map,
    );
    ts.into_shared()
}

/// `FooBar` with the stringjoin representation `foo:bar`
pub fn foobar_stringjoin_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_struct(
        "FooBar",
        vec![
            StructField::new("foo", "String", false),
            StructField::new("bar", "String", false),
        ],
        StructRepr::Stringjoin {
            join: ":".to_string(),
        },
    );
    ts.into_shared()
}

/// A three-field struct for arity error messages
pub fn animals_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_struct(
        "Animals",
        vec![
            StructField::new("cat", "String", false),
            StructField::new("dog", "String", false),
            StructField::new("eel", "String", false),
        ],
        StructRepr::Map,
    );
    ts.into_shared()
}

/// A struct whose fields are all optional
pub fn optionals_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_struct(
        "MaybePair",
        vec![
            StructField::new("left", "String", true),
            StructField::new("right", "String", true),
        ],
        StructRepr::Map,
    );
    ts.into_shared()
}

/// Keyed union `T` over `String` and `Int` members
pub fn union_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_scalar("Int", Kind::Int);
    ts.add_union(
        "T",
        vec![
            UnionMember::new("String", "String"),
            UnionMember::new("Int", "Int"),
        ],
        UnionRepr::Keyed,
    );
    ts.into_shared()
}

/// Typed map from `FooBar` struct keys to `String` values
pub fn struct_keyed_map_types() -> Arc<TypeSystem> {
    let mut ts = TypeSystem::new();
    ts.add_scalar("String", Kind::String);
    ts.add_struct(
        "FooBar",
        vec![
            StructField::new("foo", "String", false),
            StructField::new("bar", "String", false),
        ],
        StructRepr::Stringjoin {
            join: ":".to_string(),
        },
    );
    ts.add_map("Map__FooBar__String", "FooBar", "String");
    ts.into_shared()
}

/// Constructor for a named type out of a fixture type system
pub fn constructor(ts: &Arc<TypeSystem>, name: &str) -> Prototype {
    Prototype::typed(ts, name).unwrap()
}

/// Keyword argument list from (name, value) pairs
pub fn kwargs(pairs: &[(&str, HostValue)]) -> Vec<(String, HostValue)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
