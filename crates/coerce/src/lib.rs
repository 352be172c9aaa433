//! # pliant-coerce
//!
//! Runtime value coercion: take a dynamic [`Value`] and a requested
//! [`TargetType`] and produce a value of that type, or a fallback.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pliant_coerce::prelude::*;
//!
//! assert_eq!(coerce_or(&Value::from("7"), 42i32), 7);
//! assert_eq!(coerce_or(&Value::from("abc"), 42i32), 42);
//! assert_eq!(coerce_or(&Value::from(""), 42i32), 42);
//! assert!(coerce_strict::<i32>(&Value::from("abc")).is_err());
//! ```
//!
//! ## Pipeline
//!
//! 1. **Identity**: a source that already has the target type is returned.
//! 2. **Emptiness**: `Null`, `DbNull` and values whose textual form is `""`
//!    are absent. Absent sources never reach the strategies; they resolve
//!    to `None` for nullable targets, the intrinsic default for strict
//!    calls, or the caller's fallback.
//! 3. **Nullable unwrap**: `Option<T>` targets dispatch on `T`.
//! 4. **Strategy chain**: see [`Strategy::CHAIN`].
//!
//! The adapter family ([`Coercer::adapt`]) swaps step 4 for the
//! [`AdapterRegistry`] dispatcher.
//!
//! ## Entry Points
//!
//! - **Strict** ([`coerce_strict`], [`Coercer::coerce`]): return
//!   [`CoercionError`] on failure.
//! - **Safe** ([`coerce_or`], [`coerce_or_else`], [`coerce_or_default`]):
//!   never fail; every error is logged at `debug` and replaced.
//! - **Per-primitive** ([`CoerceExt`]): `value.to_int_or(0)` and friends.
//! - **Dynamic** ([`dynamic`]): runtime-chosen targets on the global engine.

pub mod adapter;
pub mod config;
pub mod dynamic;
pub mod empty;
pub mod engine;
pub mod error;
pub mod ext;
pub mod fallback;
mod macros;
pub mod predicates;
pub mod prelude;
pub mod registry;
pub mod strategy;
pub mod target;
pub mod typed;
pub mod value;

pub use adapter::{AdapterRegistry, EnumAdapter, ScalarAdapter, TypeAdapter};
pub use config::CoercionConfig;
pub use empty::{is_empty, is_null_or_empty, is_null_or_whitespace};
pub use engine::Coercer;
pub use error::{CoercionError, CoercionResult};
pub use ext::CoerceExt;
pub use fallback::Fallback;
pub use predicates::{can_coerce, can_coerce_to};
pub use registry::TypeRegistry;
pub use strategy::Strategy;
pub use target::{EnumType, ObjectType, TargetType};
pub use typed::{
    Coerce, NamedEnum, adapt_or_default_to, adapt_to, coerce_or, coerce_or_default,
    coerce_or_else, coerce_strict, coerce_strict_or_empty,
};
pub use value::{EnumValue, ObjectValue, Value};
