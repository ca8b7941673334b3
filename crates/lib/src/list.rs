//! Copy-on-write list façade.
//!
//! A [`ListValue`] wraps an immutable base node plus a suffix of appended
//! elements. Appends never touch the base; edits at an interior index
//! split the base at that point, moving the tail into the suffix where it
//! can be mutated freely. [`ListValue::node`] materializes everything back
//! into a single immutable node.

use std::fmt;

use tracing::trace;

use crate::convert::{HostValue, assemble_from, to_host_value};
use crate::data::{Node, NodeBuilder, TypeTag, printer};
use crate::errors::LarkError;
use crate::value::Value;

/// A list wrapper holding pending appends and edits.
#[derive(Debug, Clone)]
pub struct ListValue {
    node: Node,
    suffix: Vec<Node>,
}

impl ListValue {
    /// Wraps a list node with no pending changes
    pub fn new(node: Node) -> Self {
        Self {
            node,
            suffix: Vec::new(),
        }
    }

    pub(crate) fn base_type_tag(&self) -> Option<&TypeTag> {
        self.node.type_tag()
    }

    /// Total element count across base and suffix
    pub fn len(&self) -> usize {
        self.node.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`
    pub fn get(&self, index: usize) -> Result<Value, LarkError> {
        let node = self.element(index).ok_or(LarkError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        to_host_value(node.clone())
    }

    fn element(&self, index: usize) -> Option<&Node> {
        let base_len = self.node.len();
        if index < base_len {
            self.node.lookup_index(index)
        } else {
            self.suffix.get(index - base_len)
        }
    }

    /// Appends one element
    pub fn append(&mut self, value: &HostValue) -> Result<(), LarkError> {
        let node = assemble_from(NodeBuilder::basic(), value)?;
        self.suffix.push(node);
        Ok(())
    }

    /// Appends every element of an iterable
    pub fn extend(&mut self, values: &[HostValue]) -> Result<(), LarkError> {
        for value in values {
            self.append(value)?;
        }
        Ok(())
    }

    /// Moves base elements from `index` onward into the suffix, so the
    /// element at `index` (and everything after it) becomes editable.
    fn split_at(&mut self, index: usize) {
        let base_len = self.node.len();
        if index >= base_len {
            return;
        }
        let mut items = std::mem::replace(&mut self.node, Node::list(vec![])).into_items();
        let tail = items.split_off(index);
        self.node = Node::list(items);
        let old_suffix = std::mem::take(&mut self.suffix);
        self.suffix = tail;
        self.suffix.extend(old_suffix);
    }

    /// Replaces the element at `index`
    pub fn set_index(&mut self, index: usize, value: &HostValue) -> Result<(), LarkError> {
        if index >= self.len() {
            return Err(LarkError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let node = assemble_from(NodeBuilder::basic(), value)?;
        self.split_at(index);
        self.suffix[index - self.node.len()] = node;
        Ok(())
    }

    /// Inserts an element before `index`. `index == len` appends.
    pub fn insert(&mut self, index: usize, value: &HostValue) -> Result<(), LarkError> {
        if index > self.len() {
            return Err(LarkError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let node = assemble_from(NodeBuilder::basic(), value)?;
        self.split_at(index);
        self.suffix.insert(index - self.node.len(), node);
        Ok(())
    }

    /// Removes the first element structurally equal to `value`
    pub fn remove(&mut self, value: &HostValue) -> Result<(), LarkError> {
        let needle = assemble_from(NodeBuilder::basic(), value)?;
        let index = self
            .position_of(&needle)
            .ok_or_else(|| LarkError::ElementNotFound {
                value: printer::print_inline(&needle),
            })?;
        self.split_at(index);
        self.suffix.remove(index - self.node.len());
        Ok(())
    }

    /// Removes and returns the element at `index` (the last by default)
    pub fn pop(&mut self, index: Option<usize>) -> Result<Value, LarkError> {
        let len = self.len();
        if len == 0 {
            return Err(LarkError::IndexOutOfRange { index: 0, len: 0 });
        }
        let index = index.unwrap_or(len - 1);
        if index >= len {
            return Err(LarkError::IndexOutOfRange { index, len });
        }
        self.split_at(index);
        let node = self.suffix.remove(index - self.node.len());
        to_host_value(node)
    }

    fn position_of(&self, needle: &Node) -> Option<usize> {
        let base = self.node.as_list().unwrap_or(&[]);
        base.iter()
            .chain(self.suffix.iter())
            .position(|n| n == needle)
    }

    /// Number of elements structurally equal to `value`
    pub fn count(&self, value: &HostValue) -> Result<usize, LarkError> {
        let needle = assemble_from(NodeBuilder::basic(), value)?;
        let base = self.node.as_list().unwrap_or(&[]);
        Ok(base
            .iter()
            .chain(self.suffix.iter())
            .filter(|n| **n == needle)
            .count())
    }

    /// Index of the first element structurally equal to `value`
    pub fn index_of(&self, value: &HostValue) -> Result<usize, LarkError> {
        let needle = assemble_from(NodeBuilder::basic(), value)?;
        self.position_of(&needle)
            .ok_or_else(|| LarkError::ElementNotFound {
                value: printer::print_inline(&needle),
            })
    }

    /// Reverses the elements in place
    pub fn reverse(&mut self) {
        let mut all = self.collect_all();
        all.reverse();
        self.node = Node::list(all);
        self.suffix.clear();
    }

    /// Sorts the elements by their canonical textual rendering (stable)
    pub fn sort(&mut self) {
        let mut all = self.collect_all();
        all.sort_by_key(|n| printer::print(n));
        self.node = Node::list(all);
        self.suffix.clear();
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.node = Node::list(vec![]);
        self.suffix.clear();
    }

    /// A shallow copy carrying the same pending changes
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn collect_all(&self) -> Vec<Node> {
        let base = self.node.as_list().unwrap_or(&[]);
        base.iter().cloned().chain(self.suffix.iter().cloned()).collect()
    }

    /// Merged node view without materializing pending changes
    pub fn to_node(&self) -> Node {
        if self.suffix.is_empty() {
            return self.node.clone();
        }
        Node::list(self.collect_all())
    }

    /// Materializes pending appends into the base node
    pub fn apply_changes(&mut self) {
        if self.suffix.is_empty() {
            return;
        }
        trace!(appended = self.suffix.len(), "materializing list changes");
        self.node = Node::list(self.collect_all());
        self.suffix.clear();
    }

    /// Materializes and returns the backing node
    pub fn node(&mut self) -> &Node {
        self.apply_changes();
        &self.node
    }

    /// Elements as host-facing values
    pub fn items(&self) -> Result<Vec<Value>, LarkError> {
        self.collect_all().into_iter().map(to_host_value).collect()
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_node())
    }
}

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_node() == other.to_node()
    }
}
