//! Error type for coercion failures.
//!
//! Emptiness is not an error: an absent source resolves through the
//! caller's fallback. Everything here is a genuine failure to produce a
//! value of the requested type.

use std::borrow::Cow;

/// Result alias used throughout the crate.
pub type CoercionResult<T> = Result<T, CoercionError>;

/// A failure raised by the strategy chain, the adapter dispatcher or typed
/// extraction.
///
/// Strict entry points return it unmodified. Safe entry points absorb every
/// variant and substitute the configured fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    /// Text could not be parsed as the target type.
    #[error("cannot parse `{input}` as {target}: {reason}")]
    Parse {
        input: String,
        target: Cow<'static, str>,
        reason: String,
    },

    /// A numeric value does not fit the target type.
    #[error("value `{input}` is out of range for {target}")]
    Overflow {
        input: String,
        target: Cow<'static, str>,
    },

    /// No conversion exists between the source and target kinds.
    #[error("cannot convert {source_type} to {target}")]
    InvalidCast {
        source_type: Cow<'static, str>,
        target: Cow<'static, str>,
    },

    /// Text does not name a member of the target enum.
    #[error("`{input}` is not a member of enum {enum_name}")]
    UnknownEnumMember {
        input: String,
        enum_name: &'static str,
    },

    /// Text does not resolve to a known type.
    #[error("unknown type name `{name}`")]
    UnknownType { name: String },

    /// The target is outside the convertible set and pass-through is disabled.
    #[error("no coercion strategy applies from {source_type} to {target}")]
    NoStrategy {
        source_type: Cow<'static, str>,
        target: Cow<'static, str>,
    },

    /// Neither the source nor the target has an adapter for the pair.
    #[error("no adapter converts {source_type} to {target}")]
    NoAdapter {
        source_type: Cow<'static, str>,
        target: Cow<'static, str>,
    },

    /// A registered adapter reported a failure.
    #[error("adapter for {target} failed: {reason}")]
    Adapter {
        target: Cow<'static, str>,
        reason: String,
    },

    /// The engine produced a value the typed caller cannot extract.
    #[error("expected {expected}, engine produced {actual}")]
    TypeMismatch {
        expected: Cow<'static, str>,
        actual: Cow<'static, str>,
    },
}

impl CoercionError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "COERCE_PARSE",
            Self::Overflow { .. } => "COERCE_OVERFLOW",
            Self::InvalidCast { .. } => "COERCE_INVALID_CAST",
            Self::UnknownEnumMember { .. } => "COERCE_UNKNOWN_ENUM_MEMBER",
            Self::UnknownType { .. } => "COERCE_UNKNOWN_TYPE",
            Self::NoStrategy { .. } => "COERCE_NO_STRATEGY",
            Self::NoAdapter { .. } => "COERCE_NO_ADAPTER",
            Self::Adapter { .. } => "COERCE_ADAPTER",
            Self::TypeMismatch { .. } => "COERCE_TYPE_MISMATCH",
        }
    }

    /// Builds a [`CoercionError::Parse`].
    pub fn parse(
        input: impl Into<String>,
        target: impl Into<Cow<'static, str>>,
        reason: impl ToString,
    ) -> Self {
        Self::Parse {
            input: input.into(),
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a [`CoercionError::Overflow`].
    pub fn overflow(input: impl ToString, target: impl Into<Cow<'static, str>>) -> Self {
        Self::Overflow {
            input: input.to_string(),
            target: target.into(),
        }
    }

    /// Builds a [`CoercionError::InvalidCast`].
    pub fn invalid_cast(
        source_type: impl Into<Cow<'static, str>>,
        target: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidCast {
            source_type: source_type.into(),
            target: target.into(),
        }
    }

    /// Builds a [`CoercionError::Adapter`].
    pub fn adapter(target: impl Into<Cow<'static, str>>, reason: impl ToString) -> Self {
        Self::Adapter {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}
