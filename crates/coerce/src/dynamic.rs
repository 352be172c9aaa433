//! Dynamic entry points on the global engine.
//!
//! Shorthand for calling [`Coercer::global()`] when the target is only known
//! at runtime. Use [`typed`](crate::typed) when it is known statically.

use crate::engine::Coercer;
use crate::error::CoercionResult;
use crate::fallback::Fallback;
use crate::target::TargetType;
use crate::value::Value;

/// See [`Coercer::coerce`].
///
/// # Errors
///
/// Whatever the first claiming strategy reports.
pub fn coerce(value: &Value, target: &TargetType) -> CoercionResult<Value> {
    Coercer::global().coerce(value, target)
}

/// See [`Coercer::coerce_or_empty`].
///
/// # Errors
///
/// Coercion failures only.
pub fn coerce_or_empty(
    value: &Value,
    target: &TargetType,
    if_empty: Value,
) -> CoercionResult<Value> {
    Coercer::global().coerce_or_empty(value, target, if_empty)
}

#[must_use]
pub fn coerce_or_default(value: &Value, target: &TargetType) -> Value {
    Coercer::global().coerce_or_default(value, target)
}

#[must_use]
pub fn coerce_or(value: &Value, target: &TargetType, default: Value) -> Value {
    Coercer::global().coerce_or(value, target, default)
}

#[must_use]
pub fn coerce_or_else(
    value: &Value,
    target: &TargetType,
    factory: impl FnOnce() -> Value,
) -> Value {
    Coercer::global().coerce_or_else(value, target, factory)
}

#[must_use]
pub fn coerce_with(value: &Value, target: &TargetType, fallback: Fallback<'_, Value>) -> Value {
    Coercer::global().coerce_with(value, target, fallback)
}

/// See [`Coercer::adapt`].
///
/// # Errors
///
/// [`NoAdapter`](crate::CoercionError::NoAdapter) or the adapter's failure.
pub fn adapt(value: &Value, target: &TargetType) -> CoercionResult<Value> {
    Coercer::global().adapt(value, target)
}

#[must_use]
pub fn adapt_or_default(value: &Value, target: &TargetType) -> Value {
    Coercer::global().adapt_or_default(value, target)
}

#[must_use]
pub fn adapt_or(value: &Value, target: &TargetType, default: Value) -> Value {
    Coercer::global().adapt_or(value, target, default)
}

#[must_use]
pub fn adapt_or_else(
    value: &Value,
    target: &TargetType,
    factory: impl FnOnce() -> Value,
) -> Value {
    Coercer::global().adapt_or_else(value, target, factory)
}
