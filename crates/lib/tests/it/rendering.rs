//! The canonical textual form, end to end through construction, plus the
//! JSON convenience output.

use larkdata::{HostValue, Node, NodeBuilder, Value, assemble_from};

use crate::helpers::{constructor, foobar_stringjoin_types, kwargs, optionals_types, union_types};

#[test]
fn scalar_wrappers_render_canonically() {
    assert_eq!(Value::new_null().to_string(), "null");
    assert_eq!(Value::new_bool(true).to_string(), "bool{true}");
    assert_eq!(Value::new_int(42).to_string(), "int{42}");
    assert_eq!(Value::new_float(7.2).to_string(), "float{7.2}");
    assert_eq!(Value::new_string("hi").to_string(), "string{\"hi\"}");
    assert_eq!(
        Value::new_bytes(vec![0x12, 0x56, 0x90]).to_string(),
        "bytes{125690}"
    );
}

#[test]
fn nested_composites_indent_with_tabs() {
    let value = HostValue::Dict(vec![(
        "outer".into(),
        HostValue::Dict(vec![("inner".into(), HostValue::List(vec![1i64.into()]))]),
    )]);
    let node = assemble_from(NodeBuilder::basic(), &value).unwrap();
    assert_eq!(
        node.to_string(),
        "map{\n\tstring{\"outer\"}: map{\n\t\tstring{\"inner\"}: list{\n\t\t\t0: int{1}\n\t\t}\n\t}\n}"
    );
}

#[test]
fn absent_fields_render_as_absent() {
    let ts = optionals_types();
    let p = constructor(&ts, "MaybePair");
    let v = p.call(&[], &kwargs(&[("left", "l".into())])).unwrap();
    assert_eq!(
        v.to_string(),
        "struct<MaybePair>{\n\tleft: string<String>{\"l\"}\n\tright: absent\n}"
    );
}

#[test]
fn unions_always_render_inline() {
    let ts = union_types();
    let p = constructor(&ts, "T");
    let v = p.call(&["hi".into()], &[]).unwrap();
    assert_eq!(v.to_string(), "union<T>{string<String>{\"hi\"}}");
}

#[test]
fn stringjoin_round_trips_through_its_repr() {
    let ts = foobar_stringjoin_types();
    let p = constructor(&ts, "FooBar");
    let from_string = p.call(&["one:two".into()], &[]).unwrap();
    let from_fields = p
        .call(&[], &kwargs(&[("foo", "one".into()), ("bar", "two".into())]))
        .unwrap();
    assert_eq!(from_string, from_fields);
}

#[test]
fn rendering_is_deterministic() {
    let value = HostValue::Dict(vec![
        ("b".into(), 2i64.into()),
        ("a".into(), 1i64.into()),
    ]);
    let once = assemble_from(NodeBuilder::basic(), &value).unwrap();
    let twice = assemble_from(NodeBuilder::basic(), &value).unwrap();
    // insertion order is preserved, not sorted
    assert_eq!(
        once.to_string(),
        "map{\n\tstring{\"b\"}: int{2}\n\tstring{\"a\"}: int{1}\n}"
    );
    assert_eq!(once.to_string(), twice.to_string());
}

#[test]
fn json_output_is_lossy_but_readable() {
    let node = Node::map(vec![
        (Node::string("n"), Node::int(123)),
        (Node::string("payload"), Node::bytes(vec![0x12, 0x56])),
        (Node::string("missing"), Node::absent()),
    ]);
    assert_eq!(
        node.to_json_string(),
        r#"{"n":123,"payload":"1256","missing":null}"#
    );
}

#[test]
fn link_nodes_render_and_wrap_as_scalars() {
    let node = NodeBuilder::basic().assign_link("bafyexample").unwrap();
    assert_eq!(node.to_string(), "link{bafyexample}");
    assert_eq!(node.as_link(), Some("bafyexample"));

    let wrapped = larkdata::to_host_value(node).unwrap();
    assert!(matches!(wrapped, Value::Scalar(_)));
    assert_eq!(wrapped.to_string(), "link{bafyexample}");
    assert!(wrapped.truth());

    let direct = Value::new_link("bafyexample");
    assert_eq!(direct, wrapped);
    assert_eq!(direct.type_name(), "larkdata.link");
}

#[test]
fn string_escaping_in_canonical_form() {
    let node = Node::string("say \"hi\" \\ bye");
    assert_eq!(node.to_string(), "string{\"say \\\"hi\\\" \\\\ bye\"}");
}
