//! fieldpath - compiled path expressions for reading, writing, and
//! type-checking nested values.
//!
//! A path expression like `.spec.containers[].name` is compiled once into
//! an immutable [`Path`] and then applied any number of times, and
//! concurrently, to concrete values. The same compiled path works over two
//! very different representations:
//!
//! - **dynamic** values ([`value::Value`]): untyped mappings and sequences,
//!   e.g. parsed YAML or JSON documents, whose shape is discovered while
//!   walking;
//! - **static** values: ordinary structs registered with
//!   [`reflect_record!`], whose shape is known ahead of time and can be
//!   type-checked without an instance.
//!
//! Reads distinguish a present value from *absent* (legitimately empty)
//! and *unknown* (shape not classifiable) outcomes. Writes auto-create
//! missing intermediates, grow sequences, and can find-or-create a keyed
//! element of a list in a single call.
//!
//! # Example
//!
//! ```
//! use fieldpath::path::Path;
//! use fieldpath::value::Value;
//!
//! let mut doc = Value::from_yaml(
//!     "conditions:\n- kind: Ready\n  status: \"False\"",
//! )
//! .unwrap();
//!
//! // Find-or-create the entry keyed by `kind` and write its status.
//! let ready = Path::compile(".conditions[.kind=\"Ready\"].status").unwrap();
//! ready.set(&mut doc, "True".to_string()).unwrap();
//! assert_eq!(ready.get(&doc).unwrap().as_str(), Some("True"));
//!
//! // Projection collects one result per element.
//! let kinds = Path::compile(".conditions[].kind").unwrap();
//! assert_eq!(kinds.values(&doc).unwrap().len(), 1);
//! ```

pub mod path;
pub mod value;

pub use path::{Options, Path, PathError, Resolved, ResolvedType, Segment};
pub use value::{Kind, Reflect, TypeInfo, Typed, Value};
