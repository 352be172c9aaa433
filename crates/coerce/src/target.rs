//! Target type descriptors.
//!
//! A [`TargetType`] answers "what am I trying to produce". It is a closed
//! tagged union: every dispatch decision in the engine is a `match` over it,
//! resolved once per call.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::{EnumValue, Value};

// ============================================================================
// ENUM TYPE
// ============================================================================

/// Metadata for a named enumeration.
///
/// Members are identified by declaration index. Instances are normally
/// `static` items generated by [`coerce_enum!`](crate::coerce_enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: &'static str,
    path: &'static str,
    members: &'static [&'static str],
}

impl EnumType {
    /// Creates enum metadata. `path` is the defining module path.
    #[must_use]
    pub const fn new(
        name: &'static str,
        path: &'static str,
        members: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            path,
            members,
        }
    }

    /// Simple enum name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Module path the enum was declared in.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Member names in declaration order.
    #[must_use]
    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Name of the member at `index`.
    #[must_use]
    pub fn member(&self, index: usize) -> Option<&'static str> {
        self.members.get(index).copied()
    }

    /// Case-insensitive member lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|member| member.eq_ignore_ascii_case(name))
    }

    /// `path::Name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.path, self.name)
    }
}

// ============================================================================
// OBJECT TYPE
// ============================================================================

/// Identity of an opaque, non-convertible type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectType {
    name: Cow<'static, str>,
}

impl ObjectType {
    /// The database-null sentinel's type.
    pub const DB_NULL: Self = Self::from_static("DbNull");

    /// The root "any object" type.
    pub const OBJECT: Self = Self::from_static("object");

    /// Creates an object type from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// Creates an object type from any name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Object type for a Rust type, keyed by [`std::any::type_name`].
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_static(std::any::type_name::<T>())
    }

    /// Full type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let name = self.name.as_ref();
        // Generic arguments may contain `::` themselves.
        let head = name.split('<').next().unwrap_or(name);
        match head.rfind("::") {
            Some(idx) => &name[idx + 2..],
            None => name,
        }
    }
}

// ============================================================================
// TARGET TYPE
// ============================================================================

/// The type a coercion is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Char,
    String,
    Guid,
    DateTime,
    Enum(&'static EnumType),
    /// A type descriptor itself.
    Type,
    Object(ObjectType),
    /// Optional wrapper. Always holds exactly one non-nullable descriptor.
    Nullable(Box<TargetType>),
}

impl TargetType {
    /// Every built-in scalar descriptor, in a stable order.
    pub const SCALARS: [Self; 12] = [
        Self::Bool,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Char,
        Self::String,
        Self::Guid,
        Self::DateTime,
    ];

    /// Wraps `inner` in a nullable descriptor.
    ///
    /// Wrapping is flattened: `nullable(nullable(T))` is `nullable(T)`.
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        match inner {
            Self::Nullable(_) => inner,
            other => Self::Nullable(Box::new(other)),
        }
    }

    /// Object descriptor for a Rust type.
    #[must_use]
    pub fn object<T: ?Sized + 'static>() -> Self {
        Self::Object(ObjectType::of::<T>())
    }

    /// Strips a nullable wrapper.
    ///
    /// Returns the underlying descriptor and whether a wrapper was removed.
    /// Unwrapping a non-nullable descriptor is a no-op.
    #[must_use]
    pub fn unwrap_nullable(&self) -> (&Self, bool) {
        match self {
            Self::Nullable(inner) => (inner.as_ref(), true),
            other => (other, false),
        }
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Integer-valued scalar targets.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::Decimal
        )
    }

    /// Targets served by the generic convertible conversion.
    ///
    /// `Bool` is convertible but always claimed earlier in the chain.
    #[must_use]
    pub const fn is_convertible(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::Decimal
                | Self::Char
                | Self::String
                | Self::Guid
                | Self::DateTime
        )
    }

    /// Short display name.
    #[must_use]
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Bool => "bool".into(),
            Self::Byte => "u8".into(),
            Self::Short => "i16".into(),
            Self::Int => "i32".into(),
            Self::Long => "i64".into(),
            Self::Float => "f32".into(),
            Self::Double => "f64".into(),
            Self::Decimal => "Decimal".into(),
            Self::Char => "char".into(),
            Self::String => "String".into(),
            Self::Guid => "Uuid".into(),
            Self::DateTime => "NaiveDateTime".into(),
            Self::Enum(ty) => ty.name().into(),
            Self::Type => "TargetType".into(),
            Self::Object(ty) => ty.simple_name().to_owned().into(),
            Self::Nullable(inner) => format!("Option<{}>", inner.name()).into(),
        }
    }

    /// Fully qualified name, as rendered when a type is coerced to text.
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'static, str> {
        match self {
            Self::Bool => "core::primitive::bool".into(),
            Self::Byte => "core::primitive::u8".into(),
            Self::Short => "core::primitive::i16".into(),
            Self::Int => "core::primitive::i32".into(),
            Self::Long => "core::primitive::i64".into(),
            Self::Float => "core::primitive::f32".into(),
            Self::Double => "core::primitive::f64".into(),
            Self::Decimal => "rust_decimal::Decimal".into(),
            Self::Char => "core::primitive::char".into(),
            Self::String => "alloc::string::String".into(),
            Self::Guid => "uuid::Uuid".into(),
            Self::DateTime => "chrono::NaiveDateTime".into(),
            Self::Enum(ty) => ty.qualified_name().into(),
            Self::Type => "pliant_coerce::TargetType".into(),
            Self::Object(ty) => ty.name().to_owned().into(),
            Self::Nullable(inner) => {
                format!("core::option::Option<{}>", inner.qualified_name()).into()
            }
        }
    }

    /// The intrinsic default for this target: the value produced when an
    /// empty source meets a non-nullable target and no fallback was given.
    #[must_use]
    pub fn intrinsic_default(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Byte => Value::Byte(0),
            Self::Short => Value::Short(0),
            Self::Int => Value::Int(0),
            Self::Long => Value::Long(0),
            Self::Float => Value::Float(0.0),
            Self::Double => Value::Double(0.0),
            Self::Decimal => Value::Decimal(Decimal::ZERO),
            Self::Char => Value::Char('\0'),
            Self::String => Value::Text(String::new()),
            Self::Guid => Value::Guid(Uuid::nil()),
            Self::DateTime => Value::DateTime(default_date_time()),
            Self::Enum(ty) => Value::Enum(EnumValue::new(*ty, 0)),
            Self::Type | Self::Object(_) | Self::Nullable(_) => Value::Null,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// `0001-01-01T00:00:00`, the intrinsic default date-time.
#[must_use]
pub fn default_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumType = EnumType::new("Color", "demo", &["Red", "Green", "Blue"]);

    #[test]
    fn nullable_is_flattened() {
        let once = TargetType::nullable(TargetType::Int);
        let twice = TargetType::nullable(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn unwrap_is_idempotent() {
        let nullable = TargetType::nullable(TargetType::Long);
        let (inner, was_nullable) = nullable.unwrap_nullable();
        assert!(was_nullable);
        assert_eq!(inner, &TargetType::Long);

        let (again, was_nullable) = inner.unwrap_nullable();
        assert!(!was_nullable);
        assert_eq!(again, &TargetType::Long);
    }

    #[test]
    fn intrinsic_defaults_are_per_type() {
        assert_eq!(TargetType::Bool.intrinsic_default(), Value::Bool(false));
        assert_eq!(TargetType::String.intrinsic_default(), Value::Text(String::new()));
        assert_eq!(TargetType::Guid.intrinsic_default(), Value::Guid(Uuid::nil()));
        assert_eq!(
            TargetType::Enum(&COLOR).intrinsic_default(),
            Value::Enum(EnumValue::new(&COLOR, 0))
        );
        assert_eq!(
            TargetType::nullable(TargetType::Int).intrinsic_default(),
            Value::Null
        );
        assert_eq!(default_date_time().to_string(), "0001-01-01 00:00:00");
    }

    #[test]
    fn names() {
        assert_eq!(TargetType::Int.name(), "i32");
        assert_eq!(
            TargetType::nullable(TargetType::Int).qualified_name(),
            "core::option::Option<core::primitive::i32>"
        );
        assert_eq!(TargetType::Enum(&COLOR).qualified_name(), "demo::Color");
        assert_eq!(ObjectType::new("app::model::Point").simple_name(), "Point");
    }

    #[test]
    fn numeric_classification() {
        assert!(TargetType::Long.is_integer());
        assert!(!TargetType::Double.is_integer());
        assert!(TargetType::Double.is_numeric());
        assert!(TargetType::Decimal.is_numeric());
        assert!(!TargetType::String.is_numeric());
        assert!(!TargetType::nullable(TargetType::Int).is_integer());
    }

    #[test]
    fn enum_lookup_ignores_case() {
        assert_eq!(COLOR.find("green"), Some(1));
        assert_eq!(COLOR.find("BLUE"), Some(2));
        assert_eq!(COLOR.find("purple"), None);
    }
}
