//! Macros for declaring coercible enums.

// ============================================================================
// COERCE_ENUM MACRO
// ============================================================================

/// Declares a fieldless enum the engine can coerce to and from.
///
/// Generates the enum itself (with `Debug, Clone, Copy, PartialEq, Eq,
/// Hash`), a [`NamedEnum`](crate::NamedEnum) impl backed by a static
/// [`EnumType`](crate::EnumType) and a [`Coerce`](crate::Coerce) impl whose
/// intrinsic default is the first member.
///
/// ```rust,ignore
/// use pliant_coerce::{coerce_enum, coerce_strict, Value};
///
/// coerce_enum! {
///     /// Traffic light colours.
///     #[derive(serde::Serialize)]
///     pub enum Color { Red, Green, Blue }
/// }
///
/// assert_eq!(coerce_strict::<Color>(&Value::from("green"))?, Color::Green);
/// ```
#[macro_export]
macro_rules! coerce_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$member_meta:meta])* $member:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$member_meta])* $member ),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [Self] = &[$( Self::$member ),+];
        }

        impl $crate::NamedEnum for $name {
            fn enum_type() -> &'static $crate::EnumType {
                static TYPE: $crate::EnumType = $crate::EnumType::new(
                    stringify!($name),
                    module_path!(),
                    &[$( stringify!($member) ),+],
                );
                &TYPE
            }

            fn index(self) -> usize {
                Self::ALL
                    .iter()
                    .position(|member| *member == self)
                    .unwrap_or_default()
            }

            fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }

        impl $crate::Coerce for $name {
            fn target_type() -> $crate::TargetType {
                $crate::TargetType::Enum(<Self as $crate::NamedEnum>::enum_type())
            }

            fn intrinsic_default() -> Self {
                Self::ALL[0]
            }

            fn from_value(value: $crate::Value) -> $crate::CoercionResult<Self> {
                match &value {
                    $crate::Value::Enum(member)
                        if member.enum_type() == <Self as $crate::NamedEnum>::enum_type() =>
                    {
                        <Self as $crate::NamedEnum>::from_index(member.index()).ok_or_else(|| {
                            $crate::CoercionError::UnknownEnumMember {
                                input: member.index().to_string(),
                                enum_name: stringify!($name),
                            }
                        })
                    }
                    _ => Err($crate::CoercionError::TypeMismatch {
                        expected: ::std::borrow::Cow::Borrowed(stringify!($name)),
                        actual: value.type_name(),
                    }),
                }
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Enum($crate::EnumValue::new(
                    <Self as $crate::NamedEnum>::enum_type(),
                    <Self as $crate::NamedEnum>::index(self),
                ))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(<Self as $crate::NamedEnum>::name(*self))
            }
        }
    };
}
