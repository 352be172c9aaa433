//! Fallback resolution for safe entry points.

use std::fmt;

use crate::typed::Coerce;

/// What a safe entry point produces when coercion fails or the source is
/// empty.
///
/// A factory runs at most once, and only when the fallback is actually
/// needed.
pub enum Fallback<'a, T> {
    /// The target's intrinsic default.
    Intrinsic,
    /// A literal value.
    Value(T),
    /// A lazily evaluated value.
    Factory(Box<dyn FnOnce() -> T + 'a>),
}

impl<'a, T> Fallback<'a, T> {
    /// Wraps a lazily evaluated fallback.
    pub fn factory(factory: impl FnOnce() -> T + 'a) -> Self {
        Self::Factory(Box::new(factory))
    }

    #[must_use]
    pub const fn is_intrinsic(&self) -> bool {
        matches!(self, Self::Intrinsic)
    }

    /// Produces the fallback, using `intrinsic` for [`Fallback::Intrinsic`].
    pub fn resolve_with(self, intrinsic: impl FnOnce() -> T) -> T {
        match self {
            Self::Intrinsic => intrinsic(),
            Self::Value(value) => value,
            Self::Factory(factory) => factory(),
        }
    }

    /// Transforms the eventual fallback value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U + 'a) -> Fallback<'a, U>
    where
        T: 'a,
    {
        match self {
            Self::Intrinsic => Fallback::Intrinsic,
            Self::Value(value) => Fallback::Value(f(value)),
            Self::Factory(factory) => Fallback::factory(move || f(factory())),
        }
    }
}

impl<T: Coerce> Fallback<'_, T> {
    /// Produces the fallback, using [`Coerce::intrinsic_default`].
    pub fn resolve(self) -> T {
        self.resolve_with(T::intrinsic_default)
    }
}

impl<T> Default for Fallback<'_, T> {
    fn default() -> Self {
        Self::Intrinsic
    }
}

impl<T: fmt::Debug> fmt::Debug for Fallback<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intrinsic => f.write_str("Intrinsic"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
