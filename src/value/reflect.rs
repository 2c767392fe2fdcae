//! The capability interface shared by both value backends.
//!
//! Every value the engine can traverse — untyped [`Value`] trees and typed
//! record graphs alike — implements [`Reflect`]. The path machinery in
//! [`crate::path`] is written entirely against this trait, so the evaluator
//! and mutator never branch on which representation they are walking.
//!
//! Reading operations report through [`Lookup`], which keeps "the value is
//! legitimately empty" (`Absent`) separate from "the shape here cannot be
//! classified" (`Unknown`) and from "the type has no such member"
//! (`NoSuchField`). Writing operations allocate on demand: `ensure_field`,
//! `ensure_element`, and `opt_ensure` return a mutable handle to a possibly
//! freshly-created container so a write can descend without special-casing
//! missing intermediates.

use std::any::Any;
use std::fmt;

use super::info::TypeInfo;
use super::node::Value;

/// The broad shape of a value or type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A record with a fixed, named set of members.
    Record,
    /// A string-keyed mapping whose keys are discovered at runtime.
    Mapping,
    /// An ordered sequence.
    Sequence,
    /// An optional reference; read through transparently.
    Optional,
    /// A scalar with no children.
    Leaf,
    /// A polymorphic position whose shape is not statically known.
    Any,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Record => "record",
            Kind::Mapping => "mapping",
            Kind::Sequence => "sequence",
            Kind::Optional => "optional",
            Kind::Leaf => "leaf",
            Kind::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a field read.
pub enum Lookup<'a> {
    /// The member exists and holds a value.
    Found(&'a dyn Reflect),
    /// The member is legitimately empty or the key is not present.
    ///
    /// Carries the declared type of the missing slot when the backend knows
    /// it, so the caller can still validate the rest of a path statically.
    Absent(Option<&'static TypeInfo>),
    /// The shape at this position cannot be classified.
    Unknown,
    /// The type has no member with the requested name.
    NoSuchField,
}

/// A backend-level access failure, located by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The record type has no member with the requested name.
    NoSuchField,
    /// Named-entry access on a value that cannot hold named entries.
    NotAMapping,
    /// Sequence access on a value that is not a sequence.
    NotASequence,
    /// Element index past the end of the sequence.
    OutOfRange,
    /// A write whose value type does not fit the target.
    Incompatible { expected: String, found: String },
}

/// Uniform operations over a traversable value.
///
/// Container methods have non-container defaults so leaf implementations
/// only provide `type_info`, `kind`, `assign`, and the `Any` accessors.
pub trait Reflect: Any {
    /// Static metadata for this value's type.
    fn type_info(&self) -> &'static TypeInfo;

    /// The runtime shape of this particular value.
    fn kind(&self) -> Kind;

    /// Human-readable type name used in error messages.
    fn type_name(&self) -> String {
        self.type_info().name().to_string()
    }

    /// Resolves a named member for reading.
    fn field(&self, _name: &str) -> Lookup<'_> {
        Lookup::NoSuchField
    }

    /// Resolves a named member for writing, creating it if necessary.
    fn ensure_field(&mut self, _name: &str) -> Result<&mut dyn Reflect, AccessError> {
        Err(AccessError::NotAMapping)
    }

    /// Sequence length, or `None` when this value is not a sequence.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Element at `index`, when this value is a sequence and `index` is in
    /// range.
    fn element(&self, _index: usize) -> Option<&dyn Reflect> {
        None
    }

    /// Mutable element at `index`.
    fn element_mut(&mut self, _index: usize) -> Result<&mut dyn Reflect, AccessError> {
        Err(AccessError::NotASequence)
    }

    /// Mutable element at `index`, growing the sequence with zero-valued
    /// elements as needed.
    fn ensure_element(&mut self, _index: usize) -> Result<&mut dyn Reflect, AccessError> {
        Err(AccessError::NotASequence)
    }

    /// Appends a zero-valued element and returns it.
    fn append_default(&mut self) -> Result<&mut dyn Reflect, AccessError> {
        Err(AccessError::NotASequence)
    }

    /// For `Optional` values, the contained value; `None` when empty or when
    /// this value is not an optional.
    fn opt_inner(&self) -> Option<&dyn Reflect> {
        None
    }

    /// For `Optional` values, the contained value, allocating a zero value
    /// when empty; `None` when this value is not an optional.
    fn opt_ensure(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    /// Whether this value stands for an empty slot (the dynamic backend's
    /// `Null`). The walk treats such values like absent optionals.
    fn is_absent_value(&self) -> bool {
        false
    }

    /// Replaces this value with `value`, checking type compatibility.
    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError>;

    /// Converts to an untyped [`Value`] when the conversion is lossless;
    /// `None` for types with no dynamic representation.
    fn to_value(&self) -> Option<Value> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
