//! Static type metadata for the record backend.
//!
//! A [`TypeInfo`] describes the shape of a type without an instance: what
//! kind it is, which members a record declares, and what a sequence or
//! optional contains. The type resolver in [`crate::path`] walks these
//! descriptors instead of live values.
//!
//! Metadata is built once per distinct type. Non-generic types hold theirs
//! in a `OnceLock` static; generic containers (`Vec<T>`, `Option<T>`, typed
//! mappings) go through a global cache keyed by `TypeId` so each
//! instantiation is constructed exactly once. Record member lookup uses a
//! name-to-index map built at construction.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use super::reflect::{Kind, Reflect};

/// Late-bound reference to another type's metadata.
///
/// Function pointers keep descriptor construction lazy, which allows
/// recursive record types.
pub type TypeInfoFn = fn() -> &'static TypeInfo;

/// A declared member of a record type.
pub struct FieldInfo {
    name: &'static str,
    ty: TypeInfoFn,
}

impl FieldInfo {
    pub fn new(name: &'static str, ty: TypeInfoFn) -> Self {
        Self { name, ty }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member's declared type.
    pub fn ty(&self) -> &'static TypeInfo {
        (self.ty)()
    }
}

enum TypeData {
    Leaf,
    Any,
    Record {
        fields: Vec<FieldInfo>,
        index: HashMap<&'static str, usize>,
    },
    Sequence(TypeInfoFn),
    Optional(TypeInfoFn),
    Mapping(TypeInfoFn),
}

/// Shape description of a single type.
pub struct TypeInfo {
    name: String,
    data: TypeData,
}

impl TypeInfo {
    /// A scalar with no children.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: TypeData::Leaf,
        }
    }

    /// A polymorphic position; resolution through it yields Unknown.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: TypeData::Any,
        }
    }

    /// A record with the given declared members.
    pub fn record(name: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        Self {
            name: name.into(),
            data: TypeData::Record { fields, index },
        }
    }

    /// An ordered sequence of `element` values.
    pub fn sequence(name: impl Into<String>, element: TypeInfoFn) -> Self {
        Self {
            name: name.into(),
            data: TypeData::Sequence(element),
        }
    }

    /// An optional reference to an `inner` value.
    pub fn optional(name: impl Into<String>, inner: TypeInfoFn) -> Self {
        Self {
            name: name.into(),
            data: TypeData::Optional(inner),
        }
    }

    /// A string-keyed mapping of `value` values.
    pub fn mapping(name: impl Into<String>, value: TypeInfoFn) -> Self {
        Self {
            name: name.into(),
            data: TypeData::Mapping(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        match self.data {
            TypeData::Leaf => Kind::Leaf,
            TypeData::Any => Kind::Any,
            TypeData::Record { .. } => Kind::Record,
            TypeData::Sequence(_) => Kind::Sequence,
            TypeData::Optional(_) => Kind::Optional,
            TypeData::Mapping(_) => Kind::Mapping,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self.data, TypeData::Any)
    }

    /// Looks up a declared record member by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        match &self.data {
            TypeData::Record { fields, index } => index.get(name).map(|&i| &fields[i]),
            _ => None,
        }
    }

    /// Declared members of a record type, in declaration order.
    pub fn fields(&self) -> &[FieldInfo] {
        match &self.data {
            TypeData::Record { fields, .. } => fields,
            _ => &[],
        }
    }

    /// The contained type of a sequence, optional, or mapping.
    pub fn element(&self) -> Option<&'static TypeInfo> {
        match self.data {
            TypeData::Sequence(el) | TypeData::Optional(el) | TypeData::Mapping(el) => Some(el()),
            _ => None,
        }
    }

    /// For optionals, the contained type.
    pub fn optional_inner(&self) -> Option<&'static TypeInfo> {
        match self.data {
            TypeData::Optional(inner) => Some(inner()),
            _ => None,
        }
    }

    /// Whether a value of this type is acceptable where `expected` is
    /// declared. Descriptors are interned per type, so identity comparison
    /// suffices; `Any` on either side accepts everything.
    pub fn matches(&self, expected: &TypeInfo) -> bool {
        std::ptr::eq(self, expected) || self.is_any() || expected.is_any()
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A type with statically known metadata.
pub trait Typed: Reflect {
    /// This type's interned descriptor.
    fn type_info() -> &'static TypeInfo;
}

/// Interns metadata for a generic container instantiation.
///
/// `build` runs outside the cache lock; recursive instantiations (for
/// example `Vec<Vec<String>>`) resolve their inner descriptors during
/// construction.
pub(crate) fn generic_type_info<T: Any>(build: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
    static CACHE: OnceLock<Mutex<HashMap<TypeId, &'static TypeInfo>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let id = TypeId::of::<T>();

    {
        let map = cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(info) = map.get(&id) {
            return info;
        }
    }

    let built = build();
    let mut map = cache.lock().unwrap_or_else(|e| e.into_inner());
    *map.entry(id).or_insert_with(|| Box::leak(Box::new(built)))
}
