//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use pliant_coerce::prelude::*;
//!
//! let port = Value::from(" 8080 ").to_int_or(80);
//! ```

pub use crate::adapter::{AdapterRegistry, TypeAdapter};
pub use crate::coerce_enum;
pub use crate::config::CoercionConfig;
pub use crate::engine::Coercer;
pub use crate::error::{CoercionError, CoercionResult};
pub use crate::ext::CoerceExt;
pub use crate::fallback::Fallback;
pub use crate::target::TargetType;
pub use crate::typed::{
    Coerce, NamedEnum, adapt_or_default_to, adapt_to, coerce_or, coerce_or_default,
    coerce_or_else, coerce_strict, coerce_strict_or_empty,
};
pub use crate::value::Value;
