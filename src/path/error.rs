//! Error types for path compilation and evaluation.

use std::fmt;

/// Errors that can occur while compiling or applying a path expression.
///
/// Evaluation errors carry the prefix of the path that had been resolved
/// when the failure occurred, rooted at the literal `<object>` marker.
/// Absent and Unknown outcomes are not errors; they are variants of
/// [`Resolved`](crate::path::Resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Unexpected character at a specific byte offset.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Expression ended where more input was required.
    UnexpectedEnd { expected: String },
    /// Malformed expression with description.
    InvalidSyntax { message: String },
    /// A named member does not exist on the type at `prefix`.
    NoSuchField { prefix: String, field: String },
    /// A value of the wrong type at `prefix`: a write whose value does not
    /// fit the target, or a sequence operation on a non-sequence.
    TypeMismatch {
        prefix: String,
        expected: String,
        found: String,
    },
    /// Fixed index past the end of the sequence at `prefix` (strict mode).
    OutOfRange {
        prefix: String,
        index: usize,
        len: usize,
    },
    /// A write descended into a segment that does not address a single
    /// location (projection or slice).
    NotWritable { prefix: String, segment: String },
    /// A required path resolved to nothing.
    Required { path: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "unexpected '{}' at offset {}, expected {}",
                found, position, expected
            ),
            PathError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of expression, expected {}", expected)
            }
            PathError::InvalidSyntax { message } => {
                write!(f, "invalid path expression: {}", message)
            }
            PathError::NoSuchField { prefix, field } => {
                write!(f, "{} has no field \"{}\"", prefix, field)
            }
            PathError::TypeMismatch {
                prefix,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", prefix, expected, found),
            PathError::OutOfRange { prefix, index, len } => write!(
                f,
                "{}[{}] is out of range for a sequence of length {}",
                prefix, index, len
            ),
            PathError::NotWritable { prefix, segment } => {
                write!(f, "{}: cannot write through {}", prefix, segment)
            }
            PathError::Required { path } => {
                write!(f, "required path \"{}\" resolved to nothing", path)
            }
        }
    }
}

impl std::error::Error for PathError {}
