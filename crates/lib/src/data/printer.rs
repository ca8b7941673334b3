//! Canonical textual rendering of nodes.
//!
//! The grammar is stable and bit-exact for tests: scalars render as
//! `<kind>{<literal>}` (typed scalars as `<kind><TypeName>{<literal>}`),
//! composites render one indented `key: value` line per entry, map keys
//! and union members render on a single line.

use crate::schema::TypeKind;

use super::node::{Kind, Node};

/// Renders a node in the canonical indented form.
pub fn print(node: &Node) -> String {
    let mut out = String::new();
    render(node, &mut out, 0);
    out
}

/// Renders a node on a single line, as used for map keys.
pub fn print_inline(node: &Node) -> String {
    let mut out = String::new();
    render_inline(node, &mut out);
    out
}

/// Kind word plus `<TypeName>` when the node is typed.
///
/// Typed composites take their typekind word (`struct<FooBar>`, not
/// `map<FooBar>`); named scalars keep their data kind (`string<String>`).
fn heading(node: &Node) -> String {
    match node.type_tag() {
        Some(tag) => {
            let kind_word = match tag.kind {
                TypeKind::Scalar => node.kind().name(),
                other => other.name(),
            };
            format!("{}<{}>", kind_word, tag.name)
        }
        None => node.kind().to_string(),
    }
}

/// Literal text for scalar payloads; None for composites.
fn scalar_literal(node: &Node) -> Option<String> {
    match node.kind() {
        Kind::Bool => node.as_bool().map(|b| b.to_string()),
        Kind::Int => node.as_int().map(|n| n.to_string()),
        Kind::Float => node.as_float().map(|f| f.to_string()),
        Kind::String => node.as_str().map(quote),
        Kind::Bytes => node.as_bytes().map(hex::encode),
        Kind::Link => node.as_link().map(str::to_string),
        _ => None,
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn is_struct(node: &Node) -> bool {
    node.type_tag().is_some_and(|t| t.kind == TypeKind::Struct)
}

fn is_union(node: &Node) -> bool {
    node.type_tag().is_some_and(|t| t.kind == TypeKind::Union)
}

fn render(node: &Node, out: &mut String, indent: usize) {
    if node.is_absent() {
        out.push_str("absent");
        return;
    }
    match node.kind() {
        Kind::Null => out.push_str("null"),
        Kind::Bool | Kind::Int | Kind::Float | Kind::String | Kind::Bytes | Kind::Link => {
            out.push_str(&heading(node));
            out.push('{');
            if let Some(lit) = scalar_literal(node) {
                out.push_str(&lit);
            }
            out.push('}');
        }
        Kind::List => {
            let items = node.as_list().unwrap_or(&[]);
            out.push_str(&heading(node));
            if items.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, item) in items.iter().enumerate() {
                push_tabs(out, indent + 1);
                out.push_str(&i.to_string());
                out.push_str(": ");
                render(item, out, indent + 1);
                out.push('\n');
            }
            push_tabs(out, indent);
            out.push('}');
        }
        Kind::Map if is_union(node) => render_union(node, out),
        Kind::Map => {
            let entries = node.as_entries().unwrap_or(&[]);
            let struct_keys = is_struct(node);
            out.push_str(&heading(node));
            if entries.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (k, v) in entries {
                push_tabs(out, indent + 1);
                render_key(k, struct_keys, out);
                out.push_str(": ");
                render(v, out, indent + 1);
                out.push('\n');
            }
            push_tabs(out, indent);
            out.push('}');
        }
    }
}

fn render_inline(node: &Node, out: &mut String) {
    if node.is_absent() {
        out.push_str("absent");
        return;
    }
    match node.kind() {
        Kind::Null => out.push_str("null"),
        Kind::Bool | Kind::Int | Kind::Float | Kind::String | Kind::Bytes | Kind::Link => {
            render(node, out, 0)
        }
        Kind::List => {
            let items = node.as_list().unwrap_or(&[]);
            out.push_str(&heading(node));
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&i.to_string());
                out.push_str(": ");
                render_inline(item, out);
            }
            out.push('}');
        }
        Kind::Map if is_union(node) => render_union(node, out),
        Kind::Map => {
            let entries = node.as_entries().unwrap_or(&[]);
            let struct_keys = is_struct(node);
            out.push_str(&heading(node));
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_key(k, struct_keys, out);
                out.push_str(": ");
                render_inline(v, out);
            }
            out.push('}');
        }
    }
}

/// Unions always render their single member inline: `union<T>{int<Int>{42}}`.
fn render_union(node: &Node, out: &mut String) {
    out.push_str(&heading(node));
    out.push('{');
    if let Some([(_, inner)]) = node.as_entries() {
        render_inline(inner, out);
    }
    out.push('}');
}

/// Struct field names render bare; map keys render as values.
fn render_key(key: &Node, struct_keys: bool, out: &mut String) {
    if struct_keys && let Some(name) = key.as_str() {
        out.push_str(name);
    } else {
        render_inline(key, out);
    }
}

fn push_tabs(out: &mut String, n: usize) {
    for _ in 0..n {
        out.push('\t');
    }
}
