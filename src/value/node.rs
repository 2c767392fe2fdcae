//! Untyped value representation for dynamic documents.
//!
//! This module provides the core data structures for representing untyped
//! data in fieldpath. A [`Value`] is either a scalar, an insertion-ordered
//! string-keyed mapping, or an ordered sequence, and the shape of a tree is
//! only discovered while walking it. Values round-trip through serde, so
//! YAML and JSON documents can be addressed with compiled paths directly.
//!
//! # Example
//!
//! ```
//! use fieldpath::value::Value;
//!
//! let doc = Value::from_yaml("name: engine\nreplicas: 3").unwrap();
//! assert!(doc.is_mapping());
//! assert_eq!(doc.get("name").and_then(Value::as_str), Some("engine"));
//! assert_eq!(doc.get("replicas").and_then(Value::as_i64), Some(3));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::info::{TypeInfo, Typed};
use super::reflect::{AccessError, Kind, Lookup, Reflect};

/// An untyped number (integer or float).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }
}

/// An untyped value.
///
/// Mappings preserve insertion order. `Null` doubles as the zero value the
/// mutator leaves behind when it vivifies an intermediate container slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty value
    Null,
    /// A boolean
    Bool(bool),
    /// An integer or float
    Number(Number),
    /// A string
    String(String),
    /// An ordered sequence of values
    Sequence(Vec<Value>),
    /// An insertion-ordered mapping with string keys
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Parses a YAML document into a value tree.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldpath::value::Value;
    ///
    /// let doc = Value::from_yaml("items:\n  - a\n  - b").unwrap();
    /// assert_eq!(doc.get("items").and_then(Value::len), Some(2));
    /// ```
    pub fn from_yaml(input: &str) -> Result<Value, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Renders this value tree as a YAML document.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Returns true if this value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns true if this value is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a container (mapping or sequence).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Mapping(_) | Value::Sequence(_))
    }

    /// Looks up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Sequence element by position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    /// Sequence length, or `None` for non-sequences.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }

    /// String contents, or `None` for non-strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer contents, or `None` otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Numeric contents widened to a float, or `None` otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Boolean contents, or `None` otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Mapping(entries)
    }
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static INFO: std::sync::OnceLock<TypeInfo> = std::sync::OnceLock::new();
        INFO.get_or_init(|| TypeInfo::any("Value"))
    }
}

impl Reflect for Value {
    fn type_info(&self) -> &'static TypeInfo {
        <Value as Typed>::type_info()
    }

    fn kind(&self) -> Kind {
        match self {
            Value::Mapping(_) => Kind::Mapping,
            Value::Sequence(_) => Kind::Sequence,
            _ => Kind::Leaf,
        }
    }

    fn type_name(&self) -> String {
        let name = match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        };
        name.to_string()
    }

    fn field(&self, name: &str) -> Lookup<'_> {
        match self {
            Value::Mapping(entries) => match entries.get(name) {
                Some(child) => Lookup::Found(child),
                None => Lookup::Absent(None),
            },
            // An empty slot reads as absent; further lookups stay absent.
            Value::Null => Lookup::Absent(None),
            Value::Sequence(_) => Lookup::Absent(None),
            // A scalar leaf cannot be classified as holding members or not.
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Lookup::Unknown,
        }
    }

    fn ensure_field(&mut self, name: &str) -> Result<&mut dyn Reflect, AccessError> {
        if self.is_null() {
            *self = Value::Mapping(IndexMap::new());
        }
        match self {
            Value::Mapping(entries) => Ok(entries.entry(name.to_string()).or_insert(Value::Null)),
            _ => Err(AccessError::NotAMapping),
        }
    }

    fn len(&self) -> Option<usize> {
        Value::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        match self {
            Value::Sequence(items) => items.get(index).map(|v| v as &dyn Reflect),
            _ => None,
        }
    }

    fn element_mut(&mut self, index: usize) -> Result<&mut dyn Reflect, AccessError> {
        match self {
            Value::Sequence(items) => match items.get_mut(index) {
                Some(v) => Ok(v),
                None => Err(AccessError::OutOfRange),
            },
            _ => Err(AccessError::NotASequence),
        }
    }

    fn ensure_element(&mut self, index: usize) -> Result<&mut dyn Reflect, AccessError> {
        if self.is_null() {
            *self = Value::Sequence(Vec::new());
        }
        match self {
            Value::Sequence(items) => {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                match items.get_mut(index) {
                    Some(v) => Ok(v),
                    None => Err(AccessError::OutOfRange),
                }
            }
            _ => Err(AccessError::NotASequence),
        }
    }

    fn append_default(&mut self) -> Result<&mut dyn Reflect, AccessError> {
        if self.is_null() {
            *self = Value::Sequence(Vec::new());
        }
        match self {
            Value::Sequence(items) => {
                items.push(Value::Null);
                match items.last_mut() {
                    Some(v) => Ok(v),
                    None => Err(AccessError::OutOfRange),
                }
            }
            _ => Err(AccessError::NotASequence),
        }
    }

    fn is_absent_value(&self) -> bool {
        self.is_null()
    }

    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError> {
        match value.to_value() {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(AccessError::Incompatible {
                expected: "value".to_string(),
                found: value.type_name(),
            }),
        }
    }

    fn to_value(&self) -> Option<Value> {
        Some(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
