//! The immutable data model and its assembly/rendering machinery.
//!
//! `node` holds the kind-tagged node tree, `builder` the single-use
//! assemblers that produce it, and `printer` the canonical textual form.

pub mod builder;
pub mod node;
pub mod printer;

pub use builder::{ListAssembler, MapAssembler, NodeBuilder};
pub use node::{Kind, Node, TypeTag};
