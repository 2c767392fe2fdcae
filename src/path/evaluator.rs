use crate::value::{Kind, Lookup, Reflect, TypeInfo, Value};

use super::ast::{prefix_of, Path, Segment};
use super::error::PathError;
use super::typecheck;

/// Outcome of applying a path to a value.
///
/// Absent and Unknown are ordinary outcomes, kept apart from each other and
/// from errors so callers cannot conflate "the field is empty" with "the
/// shape here could not be classified".
pub enum Resolved<'a> {
    /// The single value the path addressed.
    Value(&'a dyn Reflect),
    /// Results collected by a projection or slice, in element order;
    /// nested projections nest.
    Sequence(Vec<Resolved<'a>>),
    /// The path ran through a legitimately empty slot.
    Absent,
    /// The path ran through a position whose shape could not be classified.
    Unknown,
}

impl std::fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Value(v) => write!(f, "Value({})", v.type_name()),
            Resolved::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Resolved::Absent => write!(f, "Absent"),
            Resolved::Unknown => write!(f, "Unknown"),
        }
    }
}

impl<'a> Resolved<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Resolved::Unknown)
    }

    /// The addressed value, when the path resolved to exactly one.
    pub fn as_reflect(&self) -> Option<&'a dyn Reflect> {
        match self {
            Resolved::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Downcasts a single resolved value to a concrete type.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&'a T> {
        self.as_reflect().and_then(|v| v.as_any().downcast_ref())
    }

    /// String contents of a single resolved value, for both backends.
    pub fn as_str(&self) -> Option<&'a str> {
        let v = self.as_reflect()?;
        if let Some(s) = v.as_any().downcast_ref::<String>() {
            return Some(s);
        }
        match v.as_any().downcast_ref::<Value>() {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Deep conversion to an untyped [`Value`], when every reached leaf has
    /// a dynamic representation. Absent and Unknown convert to `None`.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Resolved::Value(v) => v.to_value(),
            Resolved::Sequence(items) => items
                .iter()
                .map(Resolved::to_value)
                .collect::<Option<Vec<Value>>>()
                .map(Value::Sequence),
            Resolved::Absent | Resolved::Unknown => None,
        }
    }
}

/// Compares an element's named sub-field to a quoted literal.
pub(crate) fn literal_matches(element: &dyn Reflect, field: &str, literal: &str) -> bool {
    let mut node = element;
    while matches!(node.kind(), Kind::Optional) {
        match node.opt_inner() {
            Some(inner) => node = inner,
            None => return false,
        }
    }
    match node.field(field) {
        Lookup::Found(v) => matches!(v.to_value(), Some(Value::String(s)) if s == literal),
        _ => false,
    }
}

pub(crate) struct Evaluator<'p> {
    path: &'p Path,
}

impl<'p> Evaluator<'p> {
    pub fn new(path: &'p Path) -> Self {
        Evaluator { path }
    }

    fn segments(&self) -> &[Segment] {
        &self.path.segments
    }

    /// Applies the whole path to `root`.
    pub fn get<'a>(&self, root: &'a dyn Reflect) -> Result<Resolved<'a>, PathError> {
        let resolved = self.eval(root, 0)?;
        if self.path.options.required && resolved.is_absent() {
            return Err(PathError::Required {
                path: self.path.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Flattened non-absent leaves reachable through any projections.
    pub fn values<'a>(&self, root: &'a dyn Reflect) -> Result<Vec<&'a dyn Reflect>, PathError> {
        let mut out = Vec::new();
        flatten(self.eval(root, 0)?, &mut out);
        Ok(out)
    }

    fn eval<'a>(&self, root: &'a dyn Reflect, from: usize) -> Result<Resolved<'a>, PathError> {
        let mut node = root;
        let mut idx = from;

        loop {
            // Read through optional references; an empty one still gets the
            // remaining segments validated against its declared inner type.
            while matches!(node.kind(), Kind::Optional) {
                match node.opt_inner() {
                    Some(inner) => node = inner,
                    None => {
                        self.check_rest(idx, node.type_info().optional_inner())?;
                        return Ok(Resolved::Absent);
                    }
                }
            }
            if node.is_absent_value() {
                return Ok(Resolved::Absent);
            }
            if idx == self.segments().len() {
                return Ok(Resolved::Value(node));
            }

            match &self.segments()[idx] {
                Segment::Field(name) => match node.field(name) {
                    Lookup::Found(child) => node = child,
                    Lookup::Absent(ty) => {
                        self.check_rest(idx + 1, ty)?;
                        return Ok(Resolved::Absent);
                    }
                    Lookup::Unknown => return Ok(Resolved::Unknown),
                    Lookup::NoSuchField => {
                        return Err(PathError::NoSuchField {
                            prefix: self.prefix(idx),
                            field: name.clone(),
                        })
                    }
                },
                Segment::Index(i) => {
                    let len = match node.len() {
                        Some(len) => len,
                        None => return Ok(Resolved::Absent),
                    };
                    if *i >= len {
                        return self.index_overflow(idx, *i, len, node.type_info().element());
                    }
                    match node.element(*i) {
                        Some(el) => node = el,
                        None => return Ok(Resolved::Absent),
                    }
                }
                Segment::Slice { from, to } => {
                    let len = match node.len() {
                        Some(len) => len,
                        None => return Ok(Resolved::Absent),
                    };
                    let start = from.unwrap_or(0).min(len);
                    let end = to.unwrap_or(len).min(len).max(start);
                    let mut elems = Vec::with_capacity(end - start);
                    for i in start..end {
                        if let Some(el) = node.element(i) {
                            elems.push(el);
                        }
                    }
                    return self.eval_many(elems, idx + 1);
                }
                Segment::Projection => {
                    let len = match node.len() {
                        Some(len) => len,
                        None => return Err(self.not_a_sequence(idx, node)),
                    };
                    let mut out = Vec::with_capacity(len);
                    for i in 0..len {
                        if let Some(el) = node.element(i) {
                            match self.eval(el, idx + 1)? {
                                Resolved::Absent => {}
                                resolved => out.push(resolved),
                            }
                        }
                    }
                    return Ok(Resolved::Sequence(out));
                }
                Segment::Select { field, value } => {
                    let len = match node.len() {
                        Some(len) => len,
                        None => return Err(self.not_a_sequence(idx, node)),
                    };
                    let mut found = None;
                    for i in 0..len {
                        if let Some(el) = node.element(i) {
                            if literal_matches(el, field, value) {
                                found = Some(el);
                                break;
                            }
                        }
                    }
                    match found {
                        Some(el) => node = el,
                        None => {
                            self.check_rest(idx + 1, node.type_info().element())?;
                            return Ok(Resolved::Absent);
                        }
                    }
                }
            }
            idx += 1;
        }
    }

    /// Applies the remaining segments to a borrowed sub-sequence produced
    /// by a slice.
    fn eval_many<'a>(
        &self,
        elems: Vec<&'a dyn Reflect>,
        idx: usize,
    ) -> Result<Resolved<'a>, PathError> {
        if idx == self.segments().len() {
            let mut out = Vec::with_capacity(elems.len());
            for el in elems {
                match self.eval(el, idx)? {
                    Resolved::Absent => {}
                    resolved => out.push(resolved),
                }
            }
            return Ok(Resolved::Sequence(out));
        }

        match &self.segments()[idx] {
            Segment::Field(name) => Err(PathError::NoSuchField {
                prefix: self.prefix(idx),
                field: name.clone(),
            }),
            Segment::Index(i) => match elems.get(*i) {
                Some(&el) => self.eval(el, idx + 1),
                None => self.index_overflow(idx, *i, elems.len(), None),
            },
            Segment::Slice { from, to } => {
                let len = elems.len();
                let start = from.unwrap_or(0).min(len);
                let end = to.unwrap_or(len).min(len).max(start);
                self.eval_many(elems[start..end].to_vec(), idx + 1)
            }
            Segment::Projection => {
                let mut out = Vec::with_capacity(elems.len());
                for el in elems {
                    match self.eval(el, idx + 1)? {
                        Resolved::Absent => {}
                        resolved => out.push(resolved),
                    }
                }
                Ok(Resolved::Sequence(out))
            }
            Segment::Select { field, value } => {
                for el in elems {
                    if literal_matches(el, field, value) {
                        return self.eval(el, idx + 1);
                    }
                }
                Ok(Resolved::Absent)
            }
        }
    }

    /// Validates the remaining segments against a declared type when one is
    /// known, so `NoSuchField` still surfaces on absent branches.
    fn check_rest(&self, from: usize, ty: Option<&'static TypeInfo>) -> Result<(), PathError> {
        match ty {
            Some(ty) => typecheck::resolve_from(self.segments(), from, ty).map(|_| ()),
            None => Ok(()),
        }
    }

    fn index_overflow<'a>(
        &self,
        idx: usize,
        index: usize,
        len: usize,
        element_ty: Option<&'static TypeInfo>,
    ) -> Result<Resolved<'a>, PathError> {
        if self.path.options.strict_index {
            return Err(PathError::OutOfRange {
                prefix: self.prefix(idx),
                index,
                len,
            });
        }
        self.check_rest(idx + 1, element_ty)?;
        Ok(Resolved::Absent)
    }

    fn not_a_sequence(&self, idx: usize, node: &dyn Reflect) -> PathError {
        PathError::TypeMismatch {
            prefix: self.prefix(idx),
            expected: "sequence".to_string(),
            found: node.type_name(),
        }
    }

    fn prefix(&self, upto: usize) -> String {
        prefix_of(self.segments(), upto)
    }
}

fn flatten<'a>(resolved: Resolved<'a>, out: &mut Vec<&'a dyn Reflect>) {
    match resolved {
        Resolved::Value(v) => out.push(v),
        Resolved::Sequence(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Resolved::Absent | Resolved::Unknown => {}
    }
}
