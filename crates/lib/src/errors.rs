//! Error types for structured-data operations.
//!
//! This module defines the structured error enum shared by the data model,
//! the conversion layer, the constructor machinery, and the collection
//! facades. Every variant carries enough context to name the offending
//! value, its dynamic kind, and (for shape errors) the expected field set.

use thiserror::Error;

/// Structured error type for larkdata operations.
///
/// Variants fall into four families: conversion errors (a host value's
/// dynamic kind cannot be coerced into the data model), arity/shape errors
/// (argument counts or key sets do not match a type's declared fields),
/// lookup errors (a requested key or index is absent), and ambiguity errors
/// (a union could not be resolved to exactly one member).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LarkError {
    /// A host value's dynamic kind has no counterpart in the data model
    #[error("cannot coerce {value} of kind {kind} into the data model")]
    CannotCoerce { value: String, kind: String },

    /// A scalar constructor was handed a value it cannot build from
    #[error("cannot create {type_name} from {value} of kind {kind}")]
    CannotCreate {
        type_name: String,
        value: String,
        kind: String,
    },

    /// A host integer does not fit in the 64-bit signed range
    #[error("int64 out of range, could not convert: {value}")]
    IntOutOfRange { value: String },

    /// A call mixed positional and keyword argument forms
    #[error("can use either positional or keyword arguments, but not both")]
    MixedArguments,

    /// The restructuring sentinel was given something other than a list or mapping
    #[error("restructuring must use a list or dict of arguments")]
    BadRestructuring,

    /// Supplied argument count does not cover a type's declared fields
    #[error("expected {expected} values ({fields}), only got {got}")]
    FieldMismatch {
        expected: usize,
        fields: String,
        got: usize,
    },

    /// A supplied name does not correspond to any declared field
    #[error("type {type_name} has no field named {field}")]
    UnknownField { type_name: String, field: String },

    /// A required field was never assigned
    #[error("missing required field {field} for type {type_name}")]
    MissingField { type_name: String, field: String },

    /// A union construction supplied more than one member key
    #[error("union must be given a map with only 1 key")]
    UnionKeyCount,

    /// No union member matched the single value's dynamic kind
    #[error("no member of union {type_name} matches kind {kind}")]
    UnionNoMatch { type_name: String, kind: String },

    /// A scalar constructor needs exactly one positional argument
    #[error("wrong arguments for scalar constructor")]
    ScalarArguments,

    /// An untyped map constructor was called without keyword names
    #[error("no names for arguments")]
    MissingNames,

    /// A type name is not declared by the schema
    #[error("unknown type: {name}")]
    UnknownType { name: String },

    /// A builder was asked to accept a kind its target cannot hold
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A requested map key is absent
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// A requested list index is past the end
    #[error("index out of range, index = {index}, len = {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An element removal found no structurally equal element
    #[error("remove: element {value} not found")]
    ElementNotFound { value: String },

    /// A wrapper attribute lookup failed
    #[error("attribute {name} not found")]
    AttrNotFound { name: String },

    /// popitem on a map with no remaining entries
    #[error("popitem: map is empty")]
    EmptyMap,

    /// A typekind the conversion layer does not implement
    #[error("unsupported typekind: {kind}")]
    Unsupported { kind: String },
}

impl LarkError {
    /// Check if this error is a conversion failure at a leaf value
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            LarkError::CannotCoerce { .. }
                | LarkError::CannotCreate { .. }
                | LarkError::IntOutOfRange { .. }
        )
    }

    /// Check if this error is an arity or call-shape failure
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            LarkError::MixedArguments
                | LarkError::BadRestructuring
                | LarkError::FieldMismatch { .. }
                | LarkError::MissingField { .. }
                | LarkError::UnionKeyCount
                | LarkError::ScalarArguments
                | LarkError::MissingNames
        )
    }

    /// Check if this error is a key, index, or attribute lookup miss
    pub fn is_not_found_error(&self) -> bool {
        matches!(
            self,
            LarkError::KeyNotFound { .. }
                | LarkError::IndexOutOfRange { .. }
                | LarkError::ElementNotFound { .. }
                | LarkError::AttrNotFound { .. }
                | LarkError::EmptyMap
        )
    }

    /// Check if this error is a schema/kind mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            LarkError::TypeMismatch { .. }
                | LarkError::UnknownType { .. }
                | LarkError::UnknownField { .. }
                | LarkError::Unsupported { .. }
        )
    }

    /// Check if this error is a failed or ambiguous union resolution
    pub fn is_union_error(&self) -> bool {
        matches!(
            self,
            LarkError::UnionKeyCount | LarkError::UnionNoMatch { .. }
        )
    }
}

// Conversion from LarkError to the main Error type
impl From<LarkError> for crate::Error {
    fn from(err: LarkError) -> Self {
        crate::Error::Lark(err)
    }
}
