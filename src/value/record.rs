//! Registration macro for user record types.

/// Implements [`Reflect`](crate::value::Reflect) and
/// [`Typed`](crate::value::Typed) for a struct, exposing the listed fields
/// to path traversal.
///
/// The struct must be `Default + Clone`, and every listed field type must
/// itself be `Reflect + Typed` (leaves, `Vec<T>`, `Option<T>`,
/// `IndexMap<String, T>`, [`Value`](crate::value::Value), or another
/// registered record).
///
/// # Example
///
/// ```
/// use fieldpath::reflect_record;
/// use fieldpath::value::Typed;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Endpoint {
///     host: String,
///     port: i64,
/// }
///
/// reflect_record!(Endpoint { host: String, port: i64 });
///
/// let info = Endpoint::type_info();
/// assert_eq!(info.name(), "Endpoint");
/// assert_eq!(info.field("port").map(|f| f.ty().name()), Some("i64"));
/// ```
#[macro_export]
macro_rules! reflect_record {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::value::Typed for $ty {
            fn type_info() -> &'static $crate::value::TypeInfo {
                static INFO: ::std::sync::OnceLock<$crate::value::TypeInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init(|| {
                    $crate::value::TypeInfo::record(
                        stringify!($ty),
                        vec![
                            $($crate::value::FieldInfo::new(
                                stringify!($field),
                                <$fty as $crate::value::Typed>::type_info,
                            ),)*
                        ],
                    )
                })
            }
        }

        impl $crate::value::Reflect for $ty {
            fn type_info(&self) -> &'static $crate::value::TypeInfo {
                <$ty as $crate::value::Typed>::type_info()
            }

            fn kind(&self) -> $crate::value::Kind {
                $crate::value::Kind::Record
            }

            fn field(&self, name: &str) -> $crate::value::Lookup<'_> {
                match name {
                    $(stringify!($field) => $crate::value::Lookup::Found(&self.$field),)*
                    _ => $crate::value::Lookup::NoSuchField,
                }
            }

            fn ensure_field(
                &mut self,
                name: &str,
            ) -> Result<&mut dyn $crate::value::Reflect, $crate::value::AccessError> {
                match name {
                    $(stringify!($field) => Ok(&mut self.$field),)*
                    _ => Err($crate::value::AccessError::NoSuchField),
                }
            }

            fn assign(
                &mut self,
                value: Box<dyn $crate::value::Reflect>,
            ) -> Result<(), $crate::value::AccessError> {
                match value.as_any().downcast_ref::<$ty>() {
                    Some(v) => {
                        *self = v.clone();
                        Ok(())
                    }
                    None => Err($crate::value::AccessError::Incompatible {
                        expected: stringify!($ty).to_string(),
                        found: value.type_name(),
                    }),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
