use crate::value::{AccessError, Kind, Reflect};

use super::ast::{prefix_of, Path, Segment};
use super::error::PathError;
use super::evaluator::literal_matches;

/// Walks a path for writing, allocating missing intermediates as it goes.
///
/// Every descent step returns a mutable handle to a possibly
/// freshly-allocated container, so the recursion never distinguishes
/// between slots that existed and slots it just created. A failed write may
/// leave such intermediates behind; there is no rollback.
pub(crate) struct Mutator<'p> {
    path: &'p Path,
}

impl<'p> Mutator<'p> {
    pub fn new(path: &'p Path) -> Self {
        Mutator { path }
    }

    fn segments(&self) -> &[Segment] {
        &self.path.segments
    }

    pub fn set(&self, root: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), PathError> {
        self.descend(root, 0, value)
    }

    fn descend(
        &self,
        node: &mut dyn Reflect,
        idx: usize,
        value: Box<dyn Reflect>,
    ) -> Result<(), PathError> {
        let mut node = node;
        while matches!(node.kind(), Kind::Optional) {
            node = match node.opt_ensure() {
                Some(inner) => inner,
                // Optional values always hand out an inner slot once
                // allocation succeeds; anything else does not report the
                // Optional kind.
                None => {
                    return Err(PathError::TypeMismatch {
                        prefix: self.prefix(idx),
                        expected: "optional reference".to_string(),
                        found: "unallocatable optional".to_string(),
                    })
                }
            };
        }

        if idx == self.segments().len() {
            let found = value.type_name();
            return node.assign(value).map_err(|err| self.locate(idx, err, found));
        }

        match &self.segments()[idx] {
            Segment::Field(name) => {
                let found = node.type_name();
                match node.ensure_field(name) {
                    Ok(child) => self.descend(child, idx + 1, value),
                    Err(err) => Err(self.locate(idx, err, found)),
                }
            }
            Segment::Index(i) => {
                let found = node.type_name();
                match node.ensure_element(*i) {
                    Ok(el) => self.descend(el, idx + 1, value),
                    Err(err) => Err(self.locate(idx, err, found)),
                }
            }
            Segment::Slice { .. } | Segment::Projection => Err(PathError::NotWritable {
                prefix: self.prefix(idx),
                segment: self.segments()[idx].to_string(),
            }),
            Segment::Select {
                field,
                value: literal,
            } => {
                let found = node.type_name();
                let matched = match node.len() {
                    Some(len) => (0..len).find(|&i| {
                        node.element(i)
                            .is_some_and(|el| literal_matches(el, field, literal))
                    }),
                    None => None,
                };
                let el = match matched {
                    Some(i) => match node.element_mut(i) {
                        Ok(el) => el,
                        Err(err) => return Err(self.locate(idx, err, found)),
                    },
                    None => {
                        // No match: append one element and key it by the
                        // selector before descending into it.
                        let el = match node.append_default() {
                            Ok(el) => el,
                            Err(err) => return Err(self.locate(idx, err, found)),
                        };
                        let el_name = el.type_name();
                        let selector = match el.ensure_field(field) {
                            Ok(s) => s,
                            Err(err) => return Err(self.locate(idx, err, el_name)),
                        };
                        selector
                            .assign(Box::new(literal.clone()))
                            .map_err(|err| self.locate(idx, err, "String".to_string()))?;
                        el
                    }
                };
                self.descend(el, idx + 1, value)
            }
        }
    }

    fn locate(&self, idx: usize, err: AccessError, found: String) -> PathError {
        let prefix = self.prefix(idx);
        match err {
            AccessError::NoSuchField => PathError::NoSuchField {
                prefix,
                field: self.field_name(idx),
            },
            AccessError::NotAMapping => PathError::TypeMismatch {
                prefix,
                expected: "mapping or record".to_string(),
                found,
            },
            AccessError::NotASequence => PathError::TypeMismatch {
                prefix,
                expected: "sequence".to_string(),
                found,
            },
            AccessError::OutOfRange => PathError::OutOfRange {
                prefix,
                index: match self.segments().get(idx) {
                    Some(Segment::Index(i)) => *i,
                    _ => 0,
                },
                len: 0,
            },
            AccessError::Incompatible { expected, found } => PathError::TypeMismatch {
                prefix,
                expected,
                found,
            },
        }
    }

    /// The member name involved at `idx`, for NoSuchField messages.
    fn field_name(&self, idx: usize) -> String {
        match self.segments().get(idx) {
            Some(Segment::Field(name)) => name.clone(),
            Some(Segment::Select { field, .. }) => field.clone(),
            _ => String::new(),
        }
    }

    fn prefix(&self, upto: usize) -> String {
        prefix_of(self.segments(), upto)
    }
}
