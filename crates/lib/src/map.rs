//! Copy-on-write map façade.
//!
//! A [`MapValue`] wraps an immutable base node plus three mutation
//! buffers: appended entries (in insertion order), replacements for base
//! keys, and deletions of base keys. Iteration preserves base entry order
//! with deletions skipped and replacements substituted, then appended
//! entries in insertion order. Mutation buffers are keyed by the key's
//! string form; compound keys use their canonical one-line rendering.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::trace;

use crate::convert::{HostValue, assemble_from, to_host_value};
use crate::data::{Node, NodeBuilder, TypeTag, printer};
use crate::errors::LarkError;
use crate::value::Value;

/// A map wrapper holding pending additions, replacements, and deletions.
#[derive(Debug, Clone)]
pub struct MapValue {
    node: Node,
    added: Vec<(String, Node)>,
    replaced: HashMap<String, Node>,
    deleted: HashSet<String>,
}

fn key_string(key: &Node) -> String {
    match key.as_str() {
        Some(s) => s.to_string(),
        None => printer::print_inline(key),
    }
}

impl MapValue {
    /// Wraps a map node with no pending changes
    pub fn new(node: Node) -> Self {
        Self {
            node,
            added: Vec::new(),
            replaced: HashMap::new(),
            deleted: HashSet::new(),
        }
    }

    pub(crate) fn base_type_tag(&self) -> Option<&TypeTag> {
        self.node.type_tag()
    }

    /// Live entry count
    pub fn len(&self) -> usize {
        self.node.len() - self.deleted.len() + self.added.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn base_get(&self, key: &str) -> Option<&Node> {
        self.node
            .as_entries()
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(k, _)| key_string(k) == key)
                    .map(|(_, v)| v)
            })
    }

    fn get_node(&self, key: &str) -> Option<&Node> {
        if self.deleted.contains(key) {
            return None;
        }
        if let Some((_, v)) = self.added.iter().find(|(k, _)| k == key) {
            return Some(v);
        }
        if let Some(v) = self.replaced.get(key) {
            return Some(v);
        }
        self.base_get(key)
    }

    /// Looks up a value by key
    pub fn get(&self, key: &str) -> Result<Option<Value>, LarkError> {
        match self.get_node(key) {
            Some(node) => Ok(Some(to_host_value(node.clone())?)),
            None => Ok(None),
        }
    }

    /// Returns true if the key is live
    pub fn contains(&self, key: &str) -> bool {
        self.get_node(key).is_some()
    }

    /// Sets a key, replacing in place when the key exists in the base and
    /// appending otherwise.
    pub fn set_key(&mut self, key: &str, value: &HostValue) -> Result<(), LarkError> {
        let node = assemble_from(NodeBuilder::basic(), value)?;
        if let Some((_, slot)) = self.added.iter_mut().find(|(k, _)| k == key) {
            *slot = node;
            return Ok(());
        }
        if let Some(slot) = self.replaced.get_mut(key) {
            *slot = node;
            return Ok(());
        }
        if self.deleted.remove(key) {
            // un-deleting a base key counts as a replace, keeping its
            // original position
            self.replaced.insert(key.to_string(), node);
            return Ok(());
        }
        if self.base_get(key).is_some() {
            self.replaced.insert(key.to_string(), node);
            return Ok(());
        }
        self.added.push((key.to_string(), node));
        Ok(())
    }

    /// Removes a key, returning its value
    pub fn pop(&mut self, key: &str) -> Result<Value, LarkError> {
        if let Some(pos) = self.added.iter().position(|(k, _)| k == key) {
            let (_, node) = self.added.remove(pos);
            return to_host_value(node);
        }
        if let Some(node) = self.replaced.remove(key) {
            self.deleted.insert(key.to_string());
            return to_host_value(node);
        }
        if self.deleted.contains(key) {
            return Err(LarkError::KeyNotFound {
                key: key.to_string(),
            });
        }
        if let Some(node) = self.base_get(key) {
            let node = node.clone();
            self.deleted.insert(key.to_string());
            return to_host_value(node);
        }
        Err(LarkError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Returns the value for a key, setting it to `default` first when absent
    pub fn set_default(&mut self, key: &str, default: &HostValue) -> Result<Value, LarkError> {
        if let Some(node) = self.get_node(key) {
            return to_host_value(node.clone());
        }
        self.set_key(key, default)?;
        self.get(key)?.ok_or_else(|| LarkError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Removes and returns the most recently added live entry
    pub fn pop_item(&mut self) -> Result<(String, Value), LarkError> {
        if let Some((key, node)) = self.added.pop() {
            return Ok((key, to_host_value(node)?));
        }
        let last_live = self
            .node
            .as_entries()
            .unwrap_or(&[])
            .iter()
            .rev()
            .find(|(k, _)| !self.deleted.contains(&key_string(k)));
        match last_live {
            Some((k, v)) => {
                let key = key_string(k);
                let node = v.clone();
                self.deleted.insert(key.clone());
                Ok((key, to_host_value(node)?))
            }
            None => Err(LarkError::EmptyMap),
        }
    }

    /// Live entries in iteration order
    pub fn items(&self) -> Result<Vec<(String, Value)>, LarkError> {
        self.entry_nodes()
            .into_iter()
            .map(|(k, v)| Ok((k, to_host_value(v)?)))
            .collect()
    }

    /// Live keys in iteration order
    pub fn keys(&self) -> Vec<String> {
        self.entry_nodes().into_iter().map(|(k, _)| k).collect()
    }

    /// Live values in iteration order
    pub fn values(&self) -> Result<Vec<Value>, LarkError> {
        self.entry_nodes()
            .into_iter()
            .map(|(_, v)| to_host_value(v))
            .collect()
    }

    fn entry_nodes(&self) -> Vec<(String, Node)> {
        let mut out = Vec::with_capacity(self.len());
        for (k, v) in self.node.as_entries().unwrap_or(&[]) {
            let key = key_string(k);
            if self.deleted.contains(&key) {
                continue;
            }
            let value = self.replaced.get(&key).unwrap_or(v).clone();
            out.push((key, value));
        }
        for (k, v) in &self.added {
            out.push((k.clone(), v.clone()));
        }
        out
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.node = Node::map(vec![]);
        self.added.clear();
        self.replaced.clear();
        self.deleted.clear();
    }

    /// A shallow copy carrying the same pending changes
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Merged node view without materializing pending changes.
    ///
    /// Base key nodes (which may be compound) and the base type tag are
    /// preserved; appended keys become string keys.
    pub fn to_node(&self) -> Node {
        if self.added.is_empty() && self.replaced.is_empty() && self.deleted.is_empty() {
            return self.node.clone();
        }
        let mut entries = Vec::with_capacity(self.len());
        for (k, v) in self.node.as_entries().unwrap_or(&[]) {
            let key = key_string(k);
            if self.deleted.contains(&key) {
                continue;
            }
            let value = self.replaced.get(&key).unwrap_or(v).clone();
            entries.push((k.clone(), value));
        }
        for (k, v) in &self.added {
            entries.push((Node::string(k.clone()), v.clone()));
        }
        let merged = Node::map(entries);
        match self.node.type_tag() {
            Some(tag) => merged.with_type(tag.clone()),
            None => merged,
        }
    }

    /// Materializes pending changes into the base node
    pub fn apply_changes(&mut self) {
        if self.added.is_empty() && self.replaced.is_empty() && self.deleted.is_empty() {
            return;
        }
        trace!(
            added = self.added.len(),
            replaced = self.replaced.len(),
            deleted = self.deleted.len(),
            "materializing map changes"
        );
        self.node = self.to_node();
        self.added.clear();
        self.replaced.clear();
        self.deleted.clear();
    }

    /// Materializes and returns the backing node
    pub fn node(&mut self) -> &Node {
        self.apply_changes();
        &self.node
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_node())
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_node() == other.to_node()
    }
}
