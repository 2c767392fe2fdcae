//! Evaluation options attached to a compiled path.
//!
//! Options are fixed at compile time and travel with the
//! [`Path`](crate::path::Path), so a path behaves identically everywhere it
//! is reused. All fields have sensible defaults via `Options::default()`
//! and serialize with serde, so callers can carry them in their own
//! configuration files.

use serde::{Deserialize, Serialize};

/// Behavior switches for a compiled path.
///
/// * `required` - escalate a top-level absent `get` result to
///   [`PathError::Required`](crate::path::PathError::Required)
///   (default: false)
/// * `strict_index` - treat a fixed index past the end of a sequence as
///   [`PathError::OutOfRange`](crate::path::PathError::OutOfRange) instead
///   of absent (default: false)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Escalate a top-level absent result to an error on `get`.
    #[serde(default)]
    pub required: bool,

    /// Error on fixed-index overflow instead of yielding absent.
    #[serde(default)]
    pub strict_index: bool,
}
