//! Compiled form of path expressions.

use std::fmt;
use std::str::FromStr;

use super::error::PathError;
use super::options::Options;
use super::parser::Parser;

/// A segment in a compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Named member access (`.name`)
    Field(String),
    /// Fixed position in a sequence (`[3]`)
    Index(usize),
    /// Sub-sequence (`[1:3]`, `[1:]`, `[:3]`, `[:]`); `from` inclusive,
    /// `to` exclusive
    Slice {
        from: Option<usize>,
        to: Option<usize>,
    },
    /// Distribute the remaining path over every element (`[]`)
    Projection,
    /// First element whose sub-field equals the literal (`[.name="lit"]`)
    Select { field: String, value: String },
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{}", name),
            Segment::Index(i) => write!(f, "[{}]", i),
            Segment::Slice { from, to } => {
                write!(f, "[")?;
                if let Some(from) = from {
                    write!(f, "{}", from)?;
                }
                write!(f, ":")?;
                if let Some(to) = to {
                    write!(f, "{}", to)?;
                }
                write!(f, "]")
            }
            Segment::Projection => write!(f, "[]"),
            Segment::Select { field, value } => {
                write!(f, "[.{}=\"", field)?;
                for ch in value.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                write!(f, "\"]")
            }
        }
    }
}

/// A complete compiled path expression.
///
/// Immutable after compilation, holds no reference to any data value, and
/// is safe to reuse across values and across threads. Compile once, apply
/// many times.
///
/// # Example
///
/// ```
/// use fieldpath::path::Path;
///
/// let path = Path::compile(".spec.containers[].name").unwrap();
/// assert_eq!(path.to_string(), ".spec.containers[].name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub(crate) segments: Vec<Segment>,
    pub(crate) options: Options,
}

impl Path {
    /// Compiles an expression with default [`Options`].
    pub fn compile(expr: &str) -> Result<Self, PathError> {
        Self::compile_with(expr, Options::default())
    }

    /// Compiles an expression with explicit [`Options`].
    pub fn compile_with(expr: &str, options: Options) -> Result<Self, PathError> {
        let segments = Parser::parse(expr)?;
        Ok(Self { segments, options })
    }

    /// Compiles a path whose absence on `get` is itself an error.
    pub fn required(expr: &str) -> Result<Self, PathError> {
        Self::compile_with(
            expr,
            Options {
                required: true,
                ..Options::default()
            },
        )
    }

    /// Compiles a path for which absence is an ordinary outcome. Identical
    /// to [`Path::compile`].
    pub fn optional(expr: &str) -> Result<Self, PathError> {
        Self::compile(expr)
    }

    /// The segments of this path, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The options this path was compiled with.
    pub fn options(&self) -> Options {
        self.options
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::compile(s)
    }
}

/// Renders the resolved prefix of a walk for error messages: the literal
/// `<object>` root marker followed by the first `upto` segments.
pub(crate) fn prefix_of(segments: &[Segment], upto: usize) -> String {
    use fmt::Write;

    let mut out = String::from("<object>");
    for segment in segments.iter().take(upto) {
        let _ = write!(out, "{}", segment);
    }
    out
}
