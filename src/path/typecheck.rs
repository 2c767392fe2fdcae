//! Instance-free type resolution over path expressions.

use crate::value::{Kind, TypeInfo};

use super::ast::{prefix_of, Segment};
use super::error::PathError;

/// Outcome of resolving a path against a type descriptor.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType {
    /// The type a `get` through this path would yield.
    Type(&'static TypeInfo),
    /// The path passes through a polymorphic position; the result type
    /// cannot be determined without an instance.
    Unknown,
}

impl ResolvedType {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Unknown)
    }

    /// The resolved descriptor, when known.
    pub fn info(&self) -> Option<&'static TypeInfo> {
        match self {
            ResolvedType::Type(info) => Some(info),
            ResolvedType::Unknown => None,
        }
    }
}

/// Walks `segments` starting at `from` over type descriptors only.
///
/// Optionals are read through; a polymorphic position short-circuits to
/// `Unknown`. Errors are located with the same `<object>`-rooted prefixes
/// the evaluator uses, so the two agree on where a path goes wrong.
pub(crate) fn resolve_from(
    segments: &[Segment],
    from: usize,
    root: &'static TypeInfo,
) -> Result<ResolvedType, PathError> {
    let mut ty = root;

    for (idx, segment) in segments.iter().enumerate().skip(from) {
        while let Some(inner) = ty.optional_inner() {
            ty = inner;
        }
        if ty.is_any() {
            return Ok(ResolvedType::Unknown);
        }

        match segment {
            Segment::Field(name) => match ty.kind() {
                Kind::Record => match ty.field(name) {
                    Some(field) => ty = field.ty(),
                    None => {
                        return Err(PathError::NoSuchField {
                            prefix: prefix_of(segments, idx),
                            field: name.clone(),
                        })
                    }
                },
                Kind::Mapping => match ty.element() {
                    Some(value_ty) => ty = value_ty,
                    None => {
                        return Err(PathError::NoSuchField {
                            prefix: prefix_of(segments, idx),
                            field: name.clone(),
                        })
                    }
                },
                _ => {
                    return Err(PathError::NoSuchField {
                        prefix: prefix_of(segments, idx),
                        field: name.clone(),
                    })
                }
            },
            Segment::Index(_) | Segment::Slice { .. } | Segment::Projection => {
                ty = element_of(segments, idx, ty)?;
            }
            Segment::Select { field, .. } => {
                let element = element_of(segments, idx, ty)?;
                // The selector field resolves like any other field on the
                // element type; the walk itself continues from the element.
                let mut selector_ty = element;
                while let Some(inner) = selector_ty.optional_inner() {
                    selector_ty = inner;
                }
                let selector_missing = match selector_ty.kind() {
                    Kind::Record => selector_ty.field(field).is_none(),
                    Kind::Leaf | Kind::Sequence => true,
                    Kind::Mapping | Kind::Any | Kind::Optional => false,
                };
                if selector_missing {
                    return Err(PathError::NoSuchField {
                        prefix: prefix_of(segments, idx),
                        field: field.clone(),
                    });
                }
                ty = element;
            }
        }
    }

    while let Some(inner) = ty.optional_inner() {
        ty = inner;
    }
    if ty.is_any() {
        return Ok(ResolvedType::Unknown);
    }
    Ok(ResolvedType::Type(ty))
}

fn element_of(
    segments: &[Segment],
    idx: usize,
    ty: &'static TypeInfo,
) -> Result<&'static TypeInfo, PathError> {
    match ty.kind() {
        Kind::Sequence => match ty.element() {
            Some(element) => Ok(element),
            None => Err(not_a_sequence(segments, idx, ty)),
        },
        _ => Err(not_a_sequence(segments, idx, ty)),
    }
}

fn not_a_sequence(segments: &[Segment], idx: usize, ty: &'static TypeInfo) -> PathError {
    PathError::TypeMismatch {
        prefix: prefix_of(segments, idx),
        expected: "sequence".to_string(),
        found: ty.name().to_string(),
    }
}
