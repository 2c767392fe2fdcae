//! Path expression compiler, evaluator, mutator, and type resolver.
//!
//! A path expression addresses a nested location inside a value and is
//! compiled once into a reusable [`Path`].
//!
//! # Supported syntax
//!
//! - `.name` - named member access
//! - `[3]` - fixed sequence index
//! - `[1:3]`, `[1:]`, `[:3]`, `[:]` - sub-sequence (end exclusive, clamped)
//! - `[]` - projection: distribute the rest of the path over every element
//! - `[][]` - nested projection for sequences of sequences
//! - `[.name="literal"]` - first element whose sub-field equals the
//!   literal; on write, created if missing
//!
//! # Examples
//!
//! ```
//! use fieldpath::path::Path;
//! use fieldpath::value::Value;
//!
//! let mut doc = Value::from_yaml("spec:\n  replicas: 2").unwrap();
//!
//! let replicas = Path::compile(".spec.replicas").unwrap();
//! assert_eq!(replicas.get(&doc).unwrap().to_value(), Some(Value::from(2i64)));
//!
//! replicas.set(&mut doc, Value::from(5i64)).unwrap();
//! assert_eq!(replicas.get(&doc).unwrap().to_value(), Some(Value::from(5i64)));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod mutator;
pub mod options;
pub mod parser;
pub mod typecheck;

pub use ast::{Path, Segment};
pub use error::PathError;
pub use evaluator::Resolved;
pub use options::Options;
pub use parser::Parser;
pub use typecheck::ResolvedType;

use crate::value::{Reflect, TypeInfo};

use evaluator::Evaluator;
use mutator::Mutator;

impl Path {
    /// Resolves this path against `root` for reading.
    ///
    /// Returns a single value, a (possibly nested) sequence of projection
    /// results, [`Resolved::Absent`], or [`Resolved::Unknown`]. Errors name
    /// the prefix of the path at which resolution failed.
    pub fn get<'a>(&self, root: &'a dyn Reflect) -> Result<Resolved<'a>, PathError> {
        Evaluator::new(self).get(root)
    }

    /// Flattened, ordered sequence of all non-absent leaf results reachable
    /// through any projections in this path.
    pub fn values<'a>(&self, root: &'a dyn Reflect) -> Result<Vec<&'a dyn Reflect>, PathError> {
        Evaluator::new(self).values(root)
    }

    /// Writes `value` at the location this path addresses, allocating
    /// missing intermediate containers and sequence elements.
    ///
    /// On success the root value graph is mutated in place. A failed write
    /// may already have allocated intermediates; callers must not assume
    /// the graph is unchanged on error.
    pub fn set(&self, root: &mut dyn Reflect, value: impl Reflect) -> Result<(), PathError> {
        self.set_boxed(root, Box::new(value))
    }

    /// Like [`Path::set`], for values that are already boxed.
    pub fn set_boxed(
        &self,
        root: &mut dyn Reflect,
        value: Box<dyn Reflect>,
    ) -> Result<(), PathError> {
        Mutator::new(self).set(root, value)
    }

    /// Computes the type a `get` through this path would yield, without an
    /// instance. Passing through a polymorphic position yields
    /// [`ResolvedType::Unknown`].
    pub fn resolved_type(
        &self,
        root: &'static TypeInfo,
    ) -> Result<ResolvedType, PathError> {
        typecheck::resolve_from(&self.segments, 0, root)
    }

    /// Checks that a `get` through this path yields a value of `expected`
    /// type. Unknown resolution is accepted.
    pub fn validate_type(
        &self,
        root: &'static TypeInfo,
        expected: &'static TypeInfo,
    ) -> Result<(), PathError> {
        match self.resolved_type(root)? {
            ResolvedType::Unknown => Ok(()),
            ResolvedType::Type(actual) if actual.matches(expected) => Ok(()),
            ResolvedType::Type(actual) => Err(PathError::TypeMismatch {
                prefix: ast::prefix_of(&self.segments, self.segments.len()),
                expected: expected.name().to_string(),
                found: actual.name().to_string(),
            }),
        }
    }
}
