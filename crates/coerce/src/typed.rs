//! Typed entry points.
//!
//! [`Coerce`] ties a Rust type to its [`TargetType`] and intrinsic default.
//! The free functions here run the global [`Coercer`](crate::Coercer) and
//! extract the result as `T`.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::Coercer;
use crate::error::{CoercionError, CoercionResult};
use crate::target::{EnumType, ObjectType, TargetType, default_date_time};
use crate::value::Value;

// ============================================================================
// TRAITS
// ============================================================================

/// A Rust type the engine can produce.
pub trait Coerce: Sized {
    /// Descriptor the engine dispatches on.
    fn target_type() -> TargetType;

    /// Value used when the source is empty and no fallback was given.
    fn intrinsic_default() -> Self;

    /// Extracts `Self` from an engine result.
    ///
    /// # Errors
    ///
    /// [`CoercionError::TypeMismatch`] when `value` does not carry `Self`.
    fn from_value(value: Value) -> CoercionResult<Self>;

    /// Boxes `self` as a dynamic value.
    fn into_value(self) -> Value;
}

/// A Rust enum described by [`EnumType`] metadata.
///
/// Usually implemented through [`coerce_enum!`](crate::coerce_enum).
pub trait NamedEnum: Copy + 'static {
    fn enum_type() -> &'static EnumType;

    /// Declaration index of `self`.
    fn index(self) -> usize;

    fn from_index(index: usize) -> Option<Self>;

    /// Member name of `self`.
    fn name(self) -> &'static str {
        Self::enum_type().member(self.index()).unwrap_or("")
    }
}

pub(crate) fn mismatch(expected: &TargetType, actual: &Value) -> CoercionError {
    CoercionError::TypeMismatch {
        expected: expected.name(),
        actual: actual.type_name(),
    }
}

// ============================================================================
// SCALAR IMPLS
// ============================================================================

macro_rules! impl_coerce_scalar {
    ($($ty:ty => $variant:ident, $target:ident, $default:expr;)*) => {
        $(
            impl Coerce for $ty {
                fn target_type() -> TargetType {
                    TargetType::$target
                }

                fn intrinsic_default() -> Self {
                    $default
                }

                fn from_value(value: Value) -> CoercionResult<Self> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(mismatch(&TargetType::$target, &other)),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_coerce_scalar! {
    bool => Bool, Bool, false;
    u8 => Byte, Byte, 0;
    i16 => Short, Short, 0;
    i32 => Int, Int, 0;
    i64 => Long, Long, 0;
    f32 => Float, Float, 0.0;
    f64 => Double, Double, 0.0;
    Decimal => Decimal, Decimal, Decimal::ZERO;
    char => Char, Char, '\0';
    String => Text, String, String::new();
    Uuid => Guid, Guid, Uuid::nil();
    NaiveDateTime => DateTime, DateTime, default_date_time();
}

impl Coerce for TargetType {
    fn target_type() -> TargetType {
        TargetType::Type
    }

    /// The root object type.
    fn intrinsic_default() -> Self {
        Self::Object(ObjectType::OBJECT)
    }

    fn from_value(value: Value) -> CoercionResult<Self> {
        match value {
            Value::Type(ty) => Ok(ty),
            other => Err(mismatch(&TargetType::Type, &other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Type(self)
    }
}

impl<T: Coerce> Coerce for Option<T> {
    fn target_type() -> TargetType {
        TargetType::nullable(T::target_type())
    }

    fn intrinsic_default() -> Self {
        None
    }

    fn from_value(value: Value) -> CoercionResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, Coerce::into_value)
    }
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

/// Strict typed coercion through the global engine.
///
/// An empty source yields `T::intrinsic_default()`.
///
/// # Errors
///
/// Any [`CoercionError`] raised by the strategy chain or by extraction.
pub fn coerce_strict<T: Coerce>(value: &Value) -> CoercionResult<T> {
    Coercer::global().convert(value)
}

/// Strict typed coercion where an empty source yields `if_empty`.
///
/// # Errors
///
/// Coercion failures only; emptiness never fails.
pub fn coerce_strict_or_empty<T: Coerce>(value: &Value, if_empty: T) -> CoercionResult<T> {
    Coercer::global().convert_or_empty(value, if_empty)
}

/// Never fails; falls back to `T::intrinsic_default()`.
#[must_use]
pub fn coerce_or_default<T: Coerce>(value: &Value) -> T {
    Coercer::global().convert_or_default(value)
}

/// Never fails; falls back to `default`.
#[must_use]
pub fn coerce_or<T: Coerce>(value: &Value, default: T) -> T {
    Coercer::global().convert_or(value, default)
}

/// Never fails; `factory` runs only when the result is needed.
#[must_use]
pub fn coerce_or_else<T: Coerce>(value: &Value, factory: impl FnOnce() -> T) -> T {
    Coercer::global().convert_or_else(value, factory)
}

/// Strict typed coercion through the adapter dispatcher.
///
/// # Errors
///
/// [`CoercionError::NoAdapter`] when no adapter handles the pair, or the
/// adapter's own failure.
pub fn adapt_to<T: Coerce>(value: &Value) -> CoercionResult<T> {
    Coercer::global().adapt_to(value)
}

/// Adapter-based coercion that never fails.
#[must_use]
pub fn adapt_or_default_to<T: Coerce>(value: &Value) -> T {
    Coercer::global().adapt_or_default_to(value)
}
