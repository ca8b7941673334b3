//! Copy-on-write list and map wrapper behavior, exercised through the
//! same constructor surface a host script would use.

use larkdata::{HostValue, ListValue, MapValue, Value};

use crate::helpers::kwargs;

fn make_map(pairs: &[(&str, i64)]) -> MapValue {
    let env = larkdata::env::primitive_constructors();
    let p = &env.iter().find(|(n, _)| n == "Map").unwrap().1;
    let pairs: Vec<(&str, HostValue)> = pairs
        .iter()
        .map(|(k, v)| (*k, HostValue::from(*v)))
        .collect();
    match p.call(&[], &kwargs(&pairs)).unwrap() {
        Value::Map(m) => m,
        other => panic!("expected a map wrapper, got {other}"),
    }
}

fn make_list(items: &[i64]) -> ListValue {
    let env = larkdata::env::primitive_constructors();
    let p = &env.iter().find(|(n, _)| n == "List").unwrap().1;
    let args: Vec<HostValue> = items.iter().map(|n| HostValue::from(*n)).collect();
    match p.call(&args, &[]).unwrap() {
        Value::List(l) => l,
        other => panic!("expected a list wrapper, got {other}"),
    }
}

#[test]
fn map_mutation_sequence() {
    let mut m = make_map(&[("a", 1), ("b", 2)]);
    m.set_key("c", &3i64.into()).unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.keys(), vec!["a", "b", "c"]);

    m.set_key("b", &9i64.into()).unwrap();
    assert_eq!(m.keys(), vec!["a", "b", "c"]);
    assert_eq!(m.get("b").unwrap().unwrap().to_string(), "int{9}");

    let popped = m.pop("b").unwrap();
    assert_eq!(popped.to_string(), "int{9}");
    assert_eq!(m.keys(), vec!["a", "c"]);

    let items: Vec<String> = m
        .items()
        .unwrap()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    assert_eq!(items, vec!["a=int{1}", "c=int{3}"]);
}

#[test]
fn map_popitem_and_setdefault() {
    let mut m = make_map(&[("a", 1), ("b", 2)]);
    m.set_key("z", &26i64.into()).unwrap();

    // most recently added first
    let (k, v) = m.pop_item().unwrap();
    assert_eq!((k.as_str(), v.to_string().as_str()), ("z", "int{26}"));
    let (k, _) = m.pop_item().unwrap();
    assert_eq!(k, "b");

    let v = m.set_default("a", &0i64.into()).unwrap();
    assert_eq!(v.to_string(), "int{1}");
    let v = m.set_default("q", &0i64.into()).unwrap();
    assert_eq!(v.to_string(), "int{0}");
    assert_eq!(m.keys(), vec!["a", "q"]);
}

#[test]
fn map_materialization_is_idempotent() {
    let mut m = make_map(&[("a", 1)]);
    m.set_key("b", &2i64.into()).unwrap();
    let before = m.to_node();
    m.apply_changes();
    m.apply_changes();
    assert_eq!(m.to_node(), before);
    assert_eq!(
        m.to_string(),
        "map{\n\tstring{\"a\"}: int{1}\n\tstring{\"b\"}: int{2}\n}"
    );
}

#[test]
fn map_clear_and_copy_are_independent() {
    let mut m = make_map(&[("a", 1)]);
    let snapshot = m.copy();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn list_append_and_extend() {
    let mut l = make_list(&[1, 2]);
    l.append(&3i64.into()).unwrap();
    l.extend(&[4i64.into(), 5i64.into()]).unwrap();
    assert_eq!(l.len(), 5);
    assert_eq!(l.get(4).unwrap().to_string(), "int{5}");
}

#[test]
fn list_interior_edits_split_the_base() {
    let mut l = make_list(&[1, 2, 3]);
    l.set_index(0, &9i64.into()).unwrap();
    l.insert(2, &8i64.into()).unwrap();
    assert_eq!(
        l.to_string(),
        "list{\n\t0: int{9}\n\t1: int{2}\n\t2: int{8}\n\t3: int{3}\n}"
    );
}

#[test]
fn list_pop_remove_and_lookup() {
    let mut l = make_list(&[1, 2, 3, 2]);
    assert_eq!(l.count(&2i64.into()).unwrap(), 2);
    assert_eq!(l.index_of(&3i64.into()).unwrap(), 2);

    let v = l.pop(None).unwrap();
    assert_eq!(v.to_string(), "int{2}");

    l.remove(&2i64.into()).unwrap();
    assert_eq!(l.to_string(), "list{\n\t0: int{1}\n\t1: int{3}\n}");

    let err = l.get(5).unwrap_err();
    assert_eq!(err.to_string(), "index out of range, index = 5, len = 2");
}

#[test]
fn list_reverse_sort_clear() {
    let mut l = make_list(&[3, 1]);
    l.append(&2i64.into()).unwrap();
    l.reverse();
    assert_eq!(l.to_string(), "list{\n\t0: int{2}\n\t1: int{1}\n\t2: int{3}\n}");
    l.sort();
    assert_eq!(l.to_string(), "list{\n\t0: int{1}\n\t1: int{2}\n\t2: int{3}\n}");
    l.clear();
    assert_eq!(l.to_string(), "list{}");
}

#[test]
fn wrapper_equality_ignores_pending_buffers() {
    let mut a = make_list(&[1, 2, 3]);
    let b = make_list(&[1, 2, 3]);
    // same merged view, different internal buffering
    a.pop(None).unwrap();
    a.append(&3i64.into()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn struct_attr_access() {
    let ts = crate::helpers::foobar_types();
    let p = crate::helpers::constructor(&ts, "FooBar");
    let v = p
        .call(&[], &kwargs(&[("foo", "one".into()), ("bar", "two".into())]))
        .unwrap();
    let Value::Struct(s) = v else {
        panic!("expected a struct wrapper");
    };
    assert_eq!(s.attr("foo").unwrap().to_string(), "string<String>{\"one\"}");
    assert_eq!(s.attr_names(), vec!["foo", "bar"]);
    assert!(s.attr("nope").unwrap_err().is_not_found_error());
}

#[test]
fn union_member_access() {
    let ts = crate::helpers::union_types();
    let p = crate::helpers::constructor(&ts, "T");
    let v = p.call(&[42i64.into()], &[]).unwrap();
    let Value::Union(u) = v else {
        panic!("expected a union wrapper");
    };
    assert_eq!(u.member_name(), Some("Int"));
    assert_eq!(u.inner().unwrap().to_string(), "int<Int>{42}");
}
