//! Adapter-based conversion.
//!
//! A second dispatcher, independent from the strategy chain. For a
//! non-empty source it tries, in order:
//!
//! 1. identity
//! 2. the source type's adapter, if it can convert *to* the target
//! 3. the target type's adapter, if it can convert *from* the source
//!
//! and gives up with [`CoercionError::NoAdapter`] otherwise.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::error::{CoercionError, CoercionResult};
use crate::strategy::convert;
use crate::target::{EnumType, TargetType};
use crate::typed::NamedEnum;
use crate::value::{EnumValue, Value};

static GLOBAL: LazyLock<AdapterRegistry> = LazyLock::new(AdapterRegistry::with_builtins);

// ============================================================================
// TRAIT
// ============================================================================

/// Per-type conversion capability.
///
/// An adapter belongs to one type ([`TypeAdapter::adapted_type`]) and may
/// convert instances of it to other types, construct it from other types,
/// or both. The defaults claim nothing.
pub trait TypeAdapter: Send + Sync {
    /// The type this adapter is registered for.
    fn adapted_type(&self) -> TargetType;

    fn can_convert_to(&self, _target: &TargetType) -> bool {
        false
    }

    /// Converts an instance of the adapted type to `target`.
    ///
    /// # Errors
    ///
    /// Conversion failures, reported however the adapter sees fit.
    fn convert_to(&self, value: &Value, target: &TargetType) -> CoercionResult<Value> {
        Err(CoercionError::NoAdapter {
            source_type: value.type_name(),
            target: target.name(),
        })
    }

    fn can_convert_from(&self, _source: &TargetType) -> bool {
        false
    }

    /// Builds an instance of the adapted type from `value`.
    ///
    /// # Errors
    ///
    /// Conversion failures, reported however the adapter sees fit.
    fn convert_from(&self, value: &Value) -> CoercionResult<Value> {
        Err(CoercionError::NoAdapter {
            source_type: value.type_name(),
            target: self.adapted_type().name(),
        })
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Adapters keyed by the type they belong to.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<TargetType, Arc<dyn TypeAdapter>>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with string adapters for every built-in scalar.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for ty in TargetType::SCALARS {
            if ty != TargetType::String {
                registry.register(ScalarAdapter::new(ty));
            }
        }
        registry
    }

    /// The process-wide registry used by the default engine.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `adapter`, replacing any adapter for the same type.
    pub fn register(&self, adapter: impl TypeAdapter + 'static) {
        let ty = adapter.adapted_type();
        tracing::debug!(adapted_type = %ty, "registering type adapter");
        self.adapters.write().insert(ty, Arc::new(adapter));
    }

    /// Registers a name-based adapter for a named enum.
    pub fn register_enum<E: NamedEnum>(&self) {
        self.register(EnumAdapter::new(E::enum_type()));
    }

    /// Adapter for `ty`, if any.
    #[must_use]
    pub fn adapter_for(&self, ty: &TargetType) -> Option<Arc<dyn TypeAdapter>> {
        self.adapters.read().get(ty).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let adapters = self.adapters.read();
        f.debug_set()
            .entries(adapters.keys().map(|ty| ty.name()))
            .finish()
    }
}

/// Runs the adapter dispatcher for a non-empty `value`.
///
/// `target` must already be unwrapped from any nullable wrapper.
pub(crate) fn dispatch(
    registry: &AdapterRegistry,
    value: &Value,
    target: &TargetType,
) -> CoercionResult<Value> {
    if value.is_of_type(target) {
        return Ok(value.clone());
    }

    let Some(source) = value.runtime_type() else {
        return Err(no_adapter(value, target));
    };

    // Arcs are cloned out so no lock is held while an adapter runs.
    if let Some(adapter) = registry.adapter_for(&source)
        && adapter.can_convert_to(target)
    {
        return adapter.convert_to(value, target);
    }

    if let Some(adapter) = registry.adapter_for(target)
        && adapter.can_convert_from(&source)
    {
        return adapter.convert_from(value);
    }

    Err(no_adapter(value, target))
}

fn no_adapter(value: &Value, target: &TargetType) -> CoercionError {
    CoercionError::NoAdapter {
        source_type: value.type_name(),
        target: target.name(),
    }
}

// ============================================================================
// BUILT-IN ADAPTERS
// ============================================================================

/// String round-tripping for a built-in scalar.
///
/// Booleans parse only `true`/`false` (case-insensitive); other scalars use
/// the invariant textual parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarAdapter {
    ty: TargetType,
}

impl ScalarAdapter {
    #[must_use]
    pub fn new(ty: TargetType) -> Self {
        Self { ty }
    }
}

impl TypeAdapter for ScalarAdapter {
    fn adapted_type(&self) -> TargetType {
        self.ty.clone()
    }

    fn can_convert_to(&self, target: &TargetType) -> bool {
        *target == TargetType::String
    }

    fn convert_to(&self, value: &Value, _target: &TargetType) -> CoercionResult<Value> {
        Ok(Value::Text(value.to_text().into_owned()))
    }

    fn can_convert_from(&self, source: &TargetType) -> bool {
        *source == TargetType::String
    }

    fn convert_from(&self, value: &Value) -> CoercionResult<Value> {
        let text = value.to_text();
        if self.ty == TargetType::Bool {
            let token = text.trim();
            return if token.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if token.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(CoercionError::parse(token, "bool", "expected `true` or `false`"))
            };
        }
        convert::convert(value, &self.ty, &[])
    }
}

/// Name-based conversion for a named enum.
///
/// Converts members to their name or index and parses names back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumAdapter {
    ty: &'static EnumType,
}

impl EnumAdapter {
    #[must_use]
    pub const fn new(ty: &'static EnumType) -> Self {
        Self { ty }
    }
}

impl TypeAdapter for EnumAdapter {
    fn adapted_type(&self) -> TargetType {
        TargetType::Enum(self.ty)
    }

    fn can_convert_to(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::String | TargetType::Int)
    }

    fn convert_to(&self, value: &Value, target: &TargetType) -> CoercionResult<Value> {
        let Value::Enum(member) = value else {
            return Err(CoercionError::invalid_cast(value.type_name(), self.ty.name()));
        };
        match target {
            TargetType::Int => i32::try_from(member.index())
                .map(Value::Int)
                .map_err(|_| CoercionError::overflow(member.index(), "i32")),
            _ => Ok(Value::Text(member.name().to_owned())),
        }
    }

    fn can_convert_from(&self, source: &TargetType) -> bool {
        *source == TargetType::String
    }

    fn convert_from(&self, value: &Value) -> CoercionResult<Value> {
        let text = value.to_text();
        self.ty
            .find(text.trim())
            .map(|index| Value::Enum(EnumValue::new(self.ty, index)))
            .ok_or_else(|| CoercionError::UnknownEnumMember {
                input: text.into_owned(),
                enum_name: self.ty.name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static SHAPE: EnumType = EnumType::new("Shape", "demo", &["Circle", "Square"]);

    /// Reports a fixed rendering for every target it is asked about.
    struct Loud;

    impl TypeAdapter for Loud {
        fn adapted_type(&self) -> TargetType {
            TargetType::Int
        }

        fn can_convert_to(&self, _target: &TargetType) -> bool {
            true
        }

        fn convert_to(&self, _value: &Value, _target: &TargetType) -> CoercionResult<Value> {
            Ok(Value::from("source-side"))
        }
    }

    #[test]
    fn builtins_cover_scalars_except_string() {
        let registry = AdapterRegistry::with_builtins();
        assert_eq!(registry.len(), TargetType::SCALARS.len() - 1);
        assert!(registry.adapter_for(&TargetType::String).is_none());
    }

    #[test]
    fn scalar_adapters_round_trip_strings() {
        let registry = AdapterRegistry::with_builtins();
        assert_eq!(
            dispatch(&registry, &Value::from("12"), &TargetType::Long),
            Ok(Value::Long(12))
        );
        assert_eq!(
            dispatch(&registry, &Value::Long(12), &TargetType::String),
            Ok(Value::from("12"))
        );
        assert_eq!(
            dispatch(&registry, &Value::from("TRUE"), &TargetType::Bool),
            Ok(Value::Bool(true))
        );
        assert!(dispatch(&registry, &Value::from("yes"), &TargetType::Bool).is_err());
    }

    #[test]
    fn unrelated_scalars_have_no_adapter() {
        let registry = AdapterRegistry::with_builtins();
        let err = dispatch(&registry, &Value::Int(1), &TargetType::Double).unwrap_err();
        assert_eq!(err.code(), "COERCE_NO_ADAPTER");
    }

    /// Builds booleans from any source.
    struct Greedy;

    impl TypeAdapter for Greedy {
        fn adapted_type(&self) -> TargetType {
            TargetType::Bool
        }

        fn can_convert_from(&self, _source: &TargetType) -> bool {
            true
        }

        fn convert_from(&self, _value: &Value) -> CoercionResult<Value> {
            Ok(Value::from("target-side"))
        }
    }

    #[test]
    fn source_side_adapter_wins() {
        let registry = AdapterRegistry::with_builtins();
        registry.register(Greedy);
        assert_eq!(
            dispatch(&registry, &Value::Int(5), &TargetType::Bool),
            Ok(Value::from("target-side"))
        );

        registry.register(Loud);
        assert_eq!(
            dispatch(&registry, &Value::Int(5), &TargetType::Bool),
            Ok(Value::from("source-side"))
        );
    }

    #[test]
    fn enum_adapter_is_name_based() {
        let registry = AdapterRegistry::with_builtins();
        registry.register(EnumAdapter::new(&SHAPE));
        let target = TargetType::Enum(&SHAPE);

        assert_eq!(
            dispatch(&registry, &Value::from("square"), &target),
            Ok(Value::Enum(EnumValue::new(&SHAPE, 1)))
        );
        assert_eq!(
            dispatch(&registry, &Value::Enum(EnumValue::new(&SHAPE, 0)), &TargetType::String),
            Ok(Value::from("Circle"))
        );
        assert_eq!(
            dispatch(&registry, &Value::Enum(EnumValue::new(&SHAPE, 1)), &TargetType::Int),
            Ok(Value::Int(1))
        );
        // Indices are not names.
        assert!(dispatch(&registry, &Value::from("1"), &target).is_err());
    }
}
