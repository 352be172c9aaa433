//! Dynamic source values.
//!
//! [`Value`] is the untyped input to the engine: a runtime type tag plus a
//! payload. `Null` is reference absence; `DbNull` is the database-null
//! sentinel.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::target::{EnumType, ObjectType, TargetType};

/// Layout used for the invariant textual form of date-times.
pub(crate) const DATE_TIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ============================================================================
// VALUE
// ============================================================================

/// An untyped runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all.
    Null,
    /// Database-null marker.
    DbNull,
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Char(char),
    Text(String),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    /// A type descriptor carried as a value.
    Type(TargetType),
    Object(ObjectValue),
}

impl Value {
    /// Wraps an arbitrary payload with no textual rendering.
    pub fn object<T: Any + Send + Sync>(payload: T) -> Self {
        Self::Object(ObjectValue::new(payload))
    }

    /// Wraps an arbitrary payload rendered through its `Display` impl.
    pub fn display_object<T: Any + Send + Sync + fmt::Display>(payload: T) -> Self {
        Self::Object(ObjectValue::with_display(payload))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_db_null(&self) -> bool {
        matches!(self, Self::DbNull)
    }

    /// Borrowed text payload, only for [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Runtime type tag. `None` for [`Value::Null`].
    #[must_use]
    pub fn runtime_type(&self) -> Option<TargetType> {
        let ty = match self {
            Self::Null => return None,
            Self::DbNull => TargetType::Object(ObjectType::DB_NULL),
            Self::Bool(_) => TargetType::Bool,
            Self::Byte(_) => TargetType::Byte,
            Self::Short(_) => TargetType::Short,
            Self::Int(_) => TargetType::Int,
            Self::Long(_) => TargetType::Long,
            Self::Float(_) => TargetType::Float,
            Self::Double(_) => TargetType::Double,
            Self::Decimal(_) => TargetType::Decimal,
            Self::Char(_) => TargetType::Char,
            Self::Text(_) => TargetType::String,
            Self::Guid(_) => TargetType::Guid,
            Self::DateTime(_) => TargetType::DateTime,
            Self::Enum(value) => TargetType::Enum(value.enum_type()),
            Self::Type(_) => TargetType::Type,
            Self::Object(object) => TargetType::Object(object.object_type().clone()),
        };
        Some(ty)
    }

    /// Whether the runtime type is exactly `target`.
    #[must_use]
    pub fn is_of_type(&self, target: &TargetType) -> bool {
        match (self, target) {
            (Self::Enum(value), TargetType::Enum(ty)) => value.enum_type() == *ty,
            (Self::Object(object), TargetType::Object(ty)) => object.object_type() == ty,
            _ => self.runtime_type().as_ref() == Some(target),
        }
    }

    /// Display name of the runtime type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> Cow<'static, str> {
        self.runtime_type()
            .map_or(Cow::Borrowed("null"), |ty| ty.name())
    }

    /// Invariant, culture-free textual form.
    ///
    /// Absence markers render as `""`. Objects render through their
    /// `Display` impl when they carry one, otherwise as their type name.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null | Self::DbNull => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Byte(n) => n.to_string().into(),
            Self::Short(n) => n.to_string().into(),
            Self::Int(n) => n.to_string().into(),
            Self::Long(n) => n.to_string().into(),
            Self::Float(n) => n.to_string().into(),
            Self::Double(n) => n.to_string().into(),
            Self::Decimal(d) => d.to_string().into(),
            Self::Char(c) => c.to_string().into(),
            Self::Text(text) => Cow::Borrowed(text),
            Self::Guid(guid) => guid.hyphenated().to_string().into(),
            Self::DateTime(dt) => dt.format(DATE_TIME_TEXT_FORMAT).to_string().into(),
            Self::Enum(value) => Cow::Borrowed(value.name()),
            Self::Type(ty) => ty.qualified_name(),
            Self::Object(object) => object
                .render()
                .map_or_else(|| Cow::Owned(object.object_type().name().to_owned()), Cow::Owned),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// ============================================================================
// ENUM VALUE
// ============================================================================

/// A member of a named enum, identified by declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    ty: &'static EnumType,
    index: usize,
}

impl EnumValue {
    #[must_use]
    pub const fn new(ty: &'static EnumType, index: usize) -> Self {
        Self { ty, index }
    }

    #[must_use]
    pub const fn enum_type(&self) -> &'static EnumType {
        self.ty
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Member name, or `""` for an index outside the declared members.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.ty.member(self.index).unwrap_or("")
    }
}

// ============================================================================
// OBJECT VALUE
// ============================================================================

type Renderer = fn(&(dyn Any + Send + Sync)) -> Option<String>;

/// An opaque shared payload.
///
/// Equality is identity of the shared allocation.
#[derive(Clone)]
pub struct ObjectValue {
    ty: ObjectType,
    payload: Arc<dyn Any + Send + Sync>,
    render: Option<Renderer>,
}

impl ObjectValue {
    /// Wraps `payload` without a textual rendering.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            ty: ObjectType::of::<T>(),
            payload: Arc::new(payload),
            render: None,
        }
    }

    /// Wraps `payload`, rendering it through `Display`.
    pub fn with_display<T: Any + Send + Sync + fmt::Display>(payload: T) -> Self {
        Self {
            ty: ObjectType::of::<T>(),
            payload: Arc::new(payload),
            render: Some(render_display::<T>),
        }
    }

    /// Overrides the reported object type.
    #[must_use]
    pub fn with_type(mut self, ty: ObjectType) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn object_type(&self) -> &ObjectType {
        &self.ty
    }

    /// Borrows the payload as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether the object carries a textual rendering.
    #[must_use]
    pub fn has_rendering(&self) -> bool {
        self.render.is_some()
    }

    /// Textual rendering, when available.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.render.and_then(|render| render(self.payload.as_ref()))
    }
}

fn render_display<T: Any + fmt::Display>(payload: &(dyn Any + Send + Sync)) -> Option<String> {
    payload.downcast_ref::<T>().map(ToString::to_string)
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type", &self.ty.name())
            .field("rendering", &self.render())
            .finish()
    }
}

// ============================================================================
// CONVERSIONS INTO VALUE
// ============================================================================

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    u8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    char => Char,
    String => Text,
    Uuid => Guid,
    NaiveDateTime => DateTime,
    EnumValue => Enum,
    TargetType => Type,
    ObjectValue => Object,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
