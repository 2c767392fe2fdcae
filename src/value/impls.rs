//! `Reflect` implementations for leaves and standard containers.
//!
//! Leaves cover the scalar types record fields are made of. Containers map
//! onto the traversal shapes: `Vec<T>` is a sequence, `Option<T>` an
//! optional reference read through transparently, and
//! `IndexMap<String, T>` a typed mapping. Record types themselves are
//! covered by [`crate::reflect_record!`].

use indexmap::IndexMap;

use super::info::{generic_type_info, TypeInfo, Typed};
use super::node::{Number, Value};
use super::reflect::{AccessError, Kind, Lookup, Reflect};

fn incompatible(expected: &str, found: &dyn Reflect) -> AccessError {
    AccessError::Incompatible {
        expected: expected.to_string(),
        found: found.type_name(),
    }
}

macro_rules! impl_leaf {
    ($ty:ty, $name:literal, to: $to:expr, from: $from:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static INFO: std::sync::OnceLock<TypeInfo> = std::sync::OnceLock::new();
                INFO.get_or_init(|| TypeInfo::leaf($name))
            }
        }

        impl Reflect for $ty {
            fn type_info(&self) -> &'static TypeInfo {
                <$ty as Typed>::type_info()
            }

            fn kind(&self) -> Kind {
                Kind::Leaf
            }

            fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError> {
                if let Some(v) = value.as_any().downcast_ref::<$ty>() {
                    *self = v.clone();
                    return Ok(());
                }
                let converted = value
                    .as_any()
                    .downcast_ref::<Value>()
                    .and_then(|v| $from(v));
                match converted {
                    Some(v) => {
                        *self = v;
                        Ok(())
                    }
                    None => Err(incompatible($name, value.as_ref())),
                }
            }

            fn to_value(&self) -> Option<Value> {
                Some($to(self))
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };
}

impl_leaf!(String, "String",
    to: |v: &String| Value::String(v.clone()),
    from: |v: &Value| v.as_str().map(str::to_string));

impl_leaf!(bool, "bool",
    to: |v: &bool| Value::Bool(*v),
    from: |v: &Value| v.as_bool());

impl_leaf!(i64, "i64",
    to: |v: &i64| Value::Number(Number::Integer(*v)),
    from: |v: &Value| v.as_i64());

impl_leaf!(i32, "i32",
    to: |v: &i32| Value::Number(Number::Integer(i64::from(*v))),
    from: |v: &Value| v.as_i64().and_then(|i| i32::try_from(i).ok()));

impl_leaf!(u64, "u64",
    to: |v: &u64| Value::Number(Number::Integer(*v as i64)),
    from: |v: &Value| v.as_i64().and_then(|i| u64::try_from(i).ok()));

impl_leaf!(u32, "u32",
    to: |v: &u32| Value::Number(Number::Integer(i64::from(*v))),
    from: |v: &Value| v.as_i64().and_then(|i| u32::try_from(i).ok()));

impl_leaf!(f64, "f64",
    to: |v: &f64| Value::Number(Number::Float(*v)),
    from: |v: &Value| v.as_f64());

impl<T> Typed for Vec<T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info() -> &'static TypeInfo {
        generic_type_info::<Vec<T>>(|| {
            TypeInfo::sequence(
                format!("Vec<{}>", <T as Typed>::type_info().name()),
                <T as Typed>::type_info,
            )
        })
    }
}

impl<T> Reflect for Vec<T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info(&self) -> &'static TypeInfo {
        <Vec<T> as Typed>::type_info()
    }

    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn len(&self) -> Option<usize> {
        Some(Vec::len(self))
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }

    fn element_mut(&mut self, index: usize) -> Result<&mut dyn Reflect, AccessError> {
        match self.get_mut(index) {
            Some(v) => Ok(v),
            None => Err(AccessError::OutOfRange),
        }
    }

    fn ensure_element(&mut self, index: usize) -> Result<&mut dyn Reflect, AccessError> {
        if index >= Vec::len(self) {
            self.resize_with(index + 1, T::default);
        }
        match self.get_mut(index) {
            Some(v) => Ok(v),
            None => Err(AccessError::OutOfRange),
        }
    }

    fn append_default(&mut self) -> Result<&mut dyn Reflect, AccessError> {
        self.push(T::default());
        match self.last_mut() {
            Some(v) => Ok(v),
            None => Err(AccessError::OutOfRange),
        }
    }

    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError> {
        match value.as_any().downcast_ref::<Vec<T>>() {
            Some(v) => {
                *self = v.clone();
                Ok(())
            }
            None => Err(incompatible(self.type_info().name(), value.as_ref())),
        }
    }

    fn to_value(&self) -> Option<Value> {
        self.iter()
            .map(|v| v.to_value())
            .collect::<Option<Vec<Value>>>()
            .map(Value::Sequence)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl<T> Typed for Option<T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info() -> &'static TypeInfo {
        generic_type_info::<Option<T>>(|| {
            TypeInfo::optional(
                format!("Option<{}>", <T as Typed>::type_info().name()),
                <T as Typed>::type_info,
            )
        })
    }
}

impl<T> Reflect for Option<T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info(&self) -> &'static TypeInfo {
        <Option<T> as Typed>::type_info()
    }

    fn kind(&self) -> Kind {
        Kind::Optional
    }

    fn opt_inner(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }

    fn opt_ensure(&mut self) -> Option<&mut dyn Reflect> {
        Some(self.get_or_insert_with(T::default))
    }

    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError> {
        if let Some(v) = value.as_any().downcast_ref::<Option<T>>() {
            *self = v.clone();
            return Ok(());
        }
        if let Some(v) = value.as_any().downcast_ref::<T>() {
            *self = Some(v.clone());
            return Ok(());
        }
        Err(incompatible(self.type_info().name(), value.as_ref()))
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Some(Value::Null),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl<T> Typed for IndexMap<String, T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info() -> &'static TypeInfo {
        generic_type_info::<IndexMap<String, T>>(|| {
            TypeInfo::mapping(
                format!("Map<String, {}>", <T as Typed>::type_info().name()),
                <T as Typed>::type_info,
            )
        })
    }
}

impl<T> Reflect for IndexMap<String, T>
where
    T: Reflect + Typed + Default + Clone,
{
    fn type_info(&self) -> &'static TypeInfo {
        <IndexMap<String, T> as Typed>::type_info()
    }

    fn kind(&self) -> Kind {
        Kind::Mapping
    }

    fn field(&self, name: &str) -> Lookup<'_> {
        match self.get(name) {
            Some(v) => Lookup::Found(v),
            None => Lookup::Absent(Some(<T as Typed>::type_info())),
        }
    }

    fn ensure_field(&mut self, name: &str) -> Result<&mut dyn Reflect, AccessError> {
        Ok(self.entry(name.to_string()).or_insert_with(T::default))
    }

    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), AccessError> {
        match value.as_any().downcast_ref::<IndexMap<String, T>>() {
            Some(v) => {
                *self = v.clone();
                Ok(())
            }
            None => Err(incompatible(self.type_info().name(), value.as_ref())),
        }
    }

    fn to_value(&self) -> Option<Value> {
        self.iter()
            .map(|(k, v)| v.to_value().map(|v| (k.clone(), v)))
            .collect::<Option<IndexMap<String, Value>>>()
            .map(Value::Mapping)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_assign_same_type() {
        let mut s = String::from("old");
        s.assign(Box::new(String::from("new"))).unwrap();
        assert_eq!(s, "new");
    }

    #[test]
    fn test_leaf_assign_from_value() {
        let mut n = 0i64;
        n.assign(Box::new(Value::from(7i64))).unwrap();
        assert_eq!(n, 7);
    }

    #[test]
    fn test_leaf_assign_mismatch() {
        let mut n = 0i64;
        let err = n.assign(Box::new(String::from("nope"))).unwrap_err();
        assert!(matches!(err, AccessError::Incompatible { .. }));
    }

    #[test]
    fn test_vec_ensure_element_grows_with_defaults() {
        let mut v: Vec<String> = Vec::new();
        v.ensure_element(2).unwrap();
        assert_eq!(v, vec!["".to_string(), "".to_string(), "".to_string()]);
    }

    #[test]
    fn test_option_reads_through() {
        let v: Option<String> = Some("inner".to_string());
        let inner = v.opt_inner().unwrap();
        assert_eq!(inner.as_any().downcast_ref::<String>().unwrap(), "inner");
        let empty: Option<String> = None;
        assert!(empty.opt_inner().is_none());
    }

    #[test]
    fn test_option_ensure_allocates() {
        let mut v: Option<Vec<String>> = None;
        v.opt_ensure().unwrap();
        assert_eq!(v, Some(Vec::new()));
    }

    #[test]
    fn test_option_assign_wraps_inner_type() {
        let mut v: Option<String> = None;
        v.assign(Box::new("direct".to_string())).unwrap();
        assert_eq!(v.as_deref(), Some("direct"));
    }

    #[test]
    fn test_map_field_absent_carries_value_type() {
        let m: IndexMap<String, i64> = IndexMap::new();
        match Reflect::field(&m, "missing") {
            Lookup::Absent(Some(info)) => assert_eq!(info.name(), "i64"),
            _ => panic!("expected typed absent"),
        }
    }

    #[test]
    fn test_vec_to_value() {
        let v = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            v.to_value(),
            Some(Value::Sequence(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_nested_generic_type_info() {
        let info = <Vec<Vec<String>> as Typed>::type_info();
        assert_eq!(info.name(), "Vec<Vec<String>>");
        let inner = info.element().unwrap();
        assert_eq!(inner.name(), "Vec<String>");
        assert_eq!(inner.element().unwrap().name(), "String");
    }
}
