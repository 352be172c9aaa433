//! Per-primitive convenience methods on [`Value`].
//!
//! Every target gets the same five shapes:
//!
//! | method | empty source | failure |
//! |---|---|---|
//! | `to_x()` | intrinsic default | `Err` |
//! | `to_x_if_empty(v)` | `v` | `Err` |
//! | `to_x_or(v)` | `v` | `v` |
//! | `to_x_or_else(f)` | `f()` | `f()` |
//! | `to_x_or_default()` | intrinsic default | intrinsic default |

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::CoercionResult;
use crate::typed::{self, Coerce};
use crate::value::Value;

macro_rules! coerce_methods {
    ($(
        $(#[$doc:meta])*
        $ty:ty => $to:ident, $if_empty:ident, $or:ident, $or_else:ident, $or_default:ident;
    )*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Any coercion failure.
            fn $to(&self) -> CoercionResult<$ty> {
                typed::coerce_strict(self.as_source())
            }

            /// Like the strict form, but an empty source yields `if_empty`.
            ///
            /// # Errors
            ///
            /// Any coercion failure.
            fn $if_empty(&self, if_empty: $ty) -> CoercionResult<$ty> {
                typed::coerce_strict_or_empty(self.as_source(), if_empty)
            }

            #[must_use]
            fn $or(&self, default: $ty) -> $ty {
                typed::coerce_or(self.as_source(), default)
            }

            #[must_use]
            fn $or_else(&self, factory: impl FnOnce() -> $ty) -> $ty {
                typed::coerce_or_else(self.as_source(), factory)
            }

            #[must_use]
            fn $or_default(&self) -> $ty {
                typed::coerce_or_default(self.as_source())
            }
        )*
    };
}

/// Typed coercion shortcuts, run through the global engine.
///
/// ```rust,ignore
/// use pliant_coerce::prelude::*;
///
/// assert_eq!(Value::from("7").to_int_or(42), 7);
/// assert_eq!(Value::from("abc").to_int_or(42), 42);
/// assert_eq!(Value::Int(-1).to_nullable_bool()?, None);
/// ```
pub trait CoerceExt {
    /// The value being coerced.
    fn as_source(&self) -> &Value;

    /// Strict coercion to any [`Coerce`] type.
    ///
    /// # Errors
    ///
    /// Any coercion failure.
    fn to_target<T: Coerce>(&self) -> CoercionResult<T> {
        typed::coerce_strict(self.as_source())
    }

    coerce_methods! {
        /// Strict coercion to `bool`.
        bool => to_bool, to_bool_if_empty, to_bool_or, to_bool_or_else, to_bool_or_default;
        /// Strict coercion to `u8`.
        u8 => to_byte, to_byte_if_empty, to_byte_or, to_byte_or_else, to_byte_or_default;
        /// Strict coercion to `i16`.
        i16 => to_short, to_short_if_empty, to_short_or, to_short_or_else, to_short_or_default;
        /// Strict coercion to `i32`.
        i32 => to_int, to_int_if_empty, to_int_or, to_int_or_else, to_int_or_default;
        /// Strict coercion to `i64`.
        i64 => to_long, to_long_if_empty, to_long_or, to_long_or_else, to_long_or_default;
        /// Strict coercion to `f32`.
        f32 => to_float, to_float_if_empty, to_float_or, to_float_or_else, to_float_or_default;
        /// Strict coercion to `f64`.
        f64 => to_double, to_double_if_empty, to_double_or, to_double_or_else, to_double_or_default;
        /// Strict coercion to [`Decimal`].
        Decimal => to_decimal, to_decimal_if_empty, to_decimal_or, to_decimal_or_else,
            to_decimal_or_default;
        /// Strict coercion to `char`.
        char => to_char, to_char_if_empty, to_char_or, to_char_or_else, to_char_or_default;
        /// Strict coercion to [`Uuid`].
        Uuid => to_guid, to_guid_if_empty, to_guid_or, to_guid_or_else, to_guid_or_default;
        /// Strict coercion to [`NaiveDateTime`].
        NaiveDateTime => to_date_time, to_date_time_if_empty, to_date_time_or,
            to_date_time_or_else, to_date_time_or_default;
        /// Strict coercion to `String`.
        String => to_string_value, to_string_value_if_empty, to_string_value_or,
            to_string_value_or_else, to_string_value_or_default;
    }

    coerce_methods! {
        /// Strict coercion to `Option<bool>`. `-1` reads as `None`.
        Option<bool> => to_nullable_bool, to_nullable_bool_if_empty, to_nullable_bool_or,
            to_nullable_bool_or_else, to_nullable_bool_or_default;
        Option<u8> => to_nullable_byte, to_nullable_byte_if_empty, to_nullable_byte_or,
            to_nullable_byte_or_else, to_nullable_byte_or_default;
        Option<i16> => to_nullable_short, to_nullable_short_if_empty, to_nullable_short_or,
            to_nullable_short_or_else, to_nullable_short_or_default;
        Option<i32> => to_nullable_int, to_nullable_int_if_empty, to_nullable_int_or,
            to_nullable_int_or_else, to_nullable_int_or_default;
        Option<i64> => to_nullable_long, to_nullable_long_if_empty, to_nullable_long_or,
            to_nullable_long_or_else, to_nullable_long_or_default;
        Option<f32> => to_nullable_float, to_nullable_float_if_empty, to_nullable_float_or,
            to_nullable_float_or_else, to_nullable_float_or_default;
        Option<f64> => to_nullable_double, to_nullable_double_if_empty, to_nullable_double_or,
            to_nullable_double_or_else, to_nullable_double_or_default;
        Option<Decimal> => to_nullable_decimal, to_nullable_decimal_if_empty,
            to_nullable_decimal_or, to_nullable_decimal_or_else, to_nullable_decimal_or_default;
        Option<char> => to_nullable_char, to_nullable_char_if_empty, to_nullable_char_or,
            to_nullable_char_or_else, to_nullable_char_or_default;
        Option<Uuid> => to_nullable_guid, to_nullable_guid_if_empty, to_nullable_guid_or,
            to_nullable_guid_or_else, to_nullable_guid_or_default;
        Option<NaiveDateTime> => to_nullable_date_time, to_nullable_date_time_if_empty,
            to_nullable_date_time_or, to_nullable_date_time_or_else,
            to_nullable_date_time_or_default;
    }
}

impl CoerceExt for Value {
    fn as_source(&self) -> &Value {
        self
    }
}
