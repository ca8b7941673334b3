//! Constructor prototype behavior: argument reconciliation, the three
//! construction strategies, and their error messages.

use larkdata::{HostValue, Mode, ProtoTarget, Prototype, RESTRUCTURE_KEY};

use crate::helpers::{
    animals_types, constructor, foobar_stringjoin_types, foobar_types, kwargs, optionals_types,
    struct_keyed_map_types, union_types,
};

#[test]
fn struct_kwargs_render_in_declared_order() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    // call order is bar-first; rendering follows the declaration
    let v = p
        .call(
            &[],
            &kwargs(&[("bar", "two".into()), ("foo", "one".into())]),
        )
        .unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn struct_positional_maps_onto_declared_fields() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let v = p.call(&["one".into(), "two".into()], &[]).unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn struct_positional_arity_error_names_fields() {
    let ts = animals_types();
    let p = constructor(&ts, "Animals");
    let err = p.call(&["meow".into(), "woof".into()], &[]).unwrap_err();
    assert_eq!(err.to_string(), "expected 3 values (cat,dog,eel), only got 2");
}

#[test]
fn struct_kwargs_missing_required_field() {
    let ts = animals_types();
    let p = constructor(&ts, "Animals");
    let err = p
        .call(&[], &kwargs(&[("cat", "meow".into()), ("dog", "woof".into())]))
        .unwrap_err();
    assert_eq!(err.to_string(), "expected 3 values (cat,dog,eel), only got 2");
}

#[test]
fn struct_unknown_keyword() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let err = p
        .call(&[], &kwargs(&[("baz", "nope".into())]))
        .unwrap_err();
    assert_eq!(err.to_string(), "type FooBar has no field named baz");
}

#[test]
fn struct_mixed_arguments_rejected() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let err = p
        .call(&["one".into()], &kwargs(&[("bar", "two".into())]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "can use either positional or keyword arguments, but not both"
    );
}

#[test]
fn all_optional_struct_accepts_empty_call() {
    let ts = optionals_types();
    let p = constructor(&ts, "MaybePair");
    let v = p.call(&[], &[]).unwrap();
    assert_eq!(
        v.to_string(),
        "struct<MaybePair>{\n\tleft: absent\n\tright: absent\n}"
    );
}

#[test]
fn stringjoin_single_string_parses_fields() {
    let ts = foobar_stringjoin_types();
    let p = constructor(&ts, "FooBar");
    let v = p.call(&["one:two".into()], &[]).unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn stringjoin_repr_mode_only_accepts_the_joined_form() {
    let ts = foobar_stringjoin_types();
    let p = constructor(&ts, "FooBar").attr("Repr").unwrap();
    assert_eq!(p.mode(), Mode::Repr);
    let v = p.call(&["one:two".into()], &[]).unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn typed_mode_skips_string_repr_strategy() {
    let ts = foobar_stringjoin_types();
    let p = constructor(&ts, "FooBar").attr("Typed").unwrap();
    assert_eq!(p.mode(), Mode::Typed);
    // under Typed the single string is an arity error, not a parse
    let err = p.call(&["one:two".into()], &[]).unwrap_err();
    assert_eq!(err.to_string(), "expected 2 values (foo,bar), only got 1");
}

#[test]
fn prototype_attr_names() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    assert_eq!(p.attr_names(), vec!["Repr", "Typed"]);
    assert!(p.attr("Other").unwrap_err().is_not_found_error());
}

#[test]
fn union_keyword_names_the_member() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let v = p.call(&[], &kwargs(&[("Int", 42i64.into())])).unwrap();
    assert_eq!(v.to_string(), "union<T>{int<Int>{42}}");
}

#[test]
fn union_positional_infers_the_member() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let v = p.call(&[42i64.into()], &[]).unwrap();
    assert_eq!(v.to_string(), "union<T>{int<Int>{42}}");
    let v = p.call(&["hi".into()], &[]).unwrap();
    assert_eq!(v.to_string(), "union<T>{string<String>{\"hi\"}}");
}

#[test]
fn union_keyword_and_positional_agree() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let by_kw = p.call(&[], &kwargs(&[("Int", 42i64.into())])).unwrap();
    let by_pos = p.call(&[42i64.into()], &[]).unwrap();
    assert_eq!(by_kw, by_pos);
}

#[test]
fn union_too_many_keys() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let err = p
        .call(
            &[],
            &kwargs(&[("Int", 42i64.into()), ("String", "x".into())]),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "union must be given a map with only 1 key");
}

#[test]
fn union_no_member_matches() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let err = p.call(&[7.2f64.into()], &[]).unwrap_err();
    assert_eq!(err.to_string(), "no member of union T matches kind float");
}

#[test]
fn restructuring_dict_stands_in_for_kwargs() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let packed = HostValue::Dict(vec![
        ("foo".into(), "one".into()),
        ("bar".into(), "two".into()),
    ]);
    let v = p
        .call(&[], &[(RESTRUCTURE_KEY.to_string(), packed)])
        .unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn restructuring_list_stands_in_for_positional() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let packed = HostValue::List(vec!["one".into(), "two".into()]);
    let v = p
        .call(&[], &[(RESTRUCTURE_KEY.to_string(), packed)])
        .unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}

#[test]
fn restructuring_rejects_scalars() {
    let ts = foobar_types();
    let p = constructor(&ts, "FooBar");
    let err = p
        .call(&[], &[(RESTRUCTURE_KEY.to_string(), HostValue::from(1i64))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "restructuring must use a list or dict of arguments"
    );
}

#[test]
fn typed_scalar_constructor() {
    let ts = foobar_types();
    let p = constructor(&ts, "String");
    let v = p.call(&["one".into()], &[]).unwrap();
    assert_eq!(v.to_string(), "string<String>{\"one\"}");
    assert_eq!(v.type_name(), "larkdata.Scalar<String>");
}

#[test]
fn struct_keyed_map_parses_compound_keys() {
    let ts = struct_keyed_map_types();
    let p = constructor(&ts, "Map__FooBar__String");
    // stringjoin keys arrive as strings and parse through the key type's repr
    let packed = HostValue::Dict(vec![("f:b".into(), "wot".into())]);
    let v = p
        .call(&[], &[(RESTRUCTURE_KEY.to_string(), packed)])
        .unwrap();
    assert_eq!(
        v.to_string(),
        "map<Map__FooBar__String>{\n\tstruct<FooBar>{foo: string<String>{\"f\"}, bar: string<String>{\"b\"}}: string<String>{\"wot\"}\n}"
    );
}

#[test]
fn primitive_environment_round_trip() {
    let env = larkdata::env::primitive_constructors();
    let p = &env.iter().find(|(n, _)| n == "String").unwrap().1;
    let v = p.call(&["yo".into()], &[]).unwrap();
    assert_eq!(v.to_string(), "string{\"yo\"}");
    assert!(v.truth());
}

#[test]
fn typed_environment_contains_every_declared_type() {
    let ts = union_types();
    let env = larkdata::env::typed_constructors(&ts).unwrap();
    let names: Vec<&str> = env.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Int", "String", "T"]);
}

#[test]
fn big_int_is_out_of_range() {
    let p = Prototype::new("Int", ProtoTarget::Int);
    let err = p
        .call(&[HostValue::Int(i128::from(i64::MAX) + 1)], &[])
        .unwrap_err();
    // the scalar constructor wraps the range failure
    assert!(err.is_conversion_error());
}

#[test]
fn wrapper_arguments_reuse_their_node() {
    let ts = foobar_types();
    let string_proto = constructor(&ts, "String");
    let typed = string_proto.call(&["one".into()], &[]).unwrap();
    let p = constructor(&ts, "FooBar");
    let v = p
        .call(
            &[],
            &kwargs(&[("foo", typed.into()), ("bar", "two".into())]),
        )
        .unwrap();
    assert_eq!(
        v.to_string(),
        "struct<FooBar>{\n\tfoo: string<String>{\"one\"}\n\tbar: string<String>{\"two\"}\n}"
    );
}
