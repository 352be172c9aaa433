//! The coercion engine.
//!
//! [`Coercer`] wires the pipeline together:
//!
//! ```text
//! identity fast path → emptiness → nullable unwrap → strategy chain
//! ```
//!
//! Strict entry points return the chain's [`CoercionError`] as is. Safe
//! entry points (`*_or*`, `*_with`) never fail: every error is logged at
//! `debug` and replaced by the caller's [`Fallback`].

use std::sync::{Arc, LazyLock};

use crate::adapter::{self, AdapterRegistry};
use crate::config::CoercionConfig;
use crate::empty::is_empty;
use crate::error::CoercionResult;
use crate::fallback::Fallback;
use crate::registry::TypeRegistry;
use crate::strategy::{self, Request, Strategy};
use crate::target::TargetType;
use crate::typed::Coerce;
use crate::value::Value;

static GLOBAL: LazyLock<Coercer> = LazyLock::new(Coercer::default);

/// Outcome of the shared pipeline before fallbacks are applied.
#[derive(Debug)]
enum Resolution {
    Produced(Value),
    /// The source is empty; the caller decides what that means.
    Empty,
}

/// Which dispatcher a call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatcher {
    Chain,
    Adapters,
}

/// A configured coercion engine.
///
/// Cheap to clone. Registries default to the process-wide ones.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    config: CoercionConfig,
    types: Option<Arc<TypeRegistry>>,
    adapters: Option<Arc<AdapterRegistry>>,
}

impl Coercer {
    /// An engine with `config` and the global registries.
    #[must_use]
    pub fn new(config: CoercionConfig) -> Self {
        Self {
            config,
            types: None,
            adapters: None,
        }
    }

    /// The default engine used by the crate-level functions.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Uses `types` instead of [`TypeRegistry::global`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    /// Uses `adapters` instead of [`AdapterRegistry::global`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_adapters(mut self, adapters: Arc<AdapterRegistry>) -> Self {
        self.adapters = Some(adapters);
        self
    }

    #[must_use]
    pub fn config(&self) -> &CoercionConfig {
        &self.config
    }

    fn types(&self) -> &TypeRegistry {
        self.types.as_deref().unwrap_or_else(|| TypeRegistry::global())
    }

    fn adapters(&self) -> &AdapterRegistry {
        self.adapters.as_deref().unwrap_or_else(|| AdapterRegistry::global())
    }

    // ========================================================================
    // PIPELINE
    // ========================================================================

    fn resolve(
        &self,
        value: &Value,
        target: &TargetType,
        dispatcher: Dispatcher,
    ) -> CoercionResult<Resolution> {
        // Values never carry a nullable runtime type, so nullable targets
        // always reach the emptiness check.
        if value.is_of_type(target) {
            return Ok(Resolution::Produced(value.clone()));
        }
        if is_empty(value) {
            return Ok(Resolution::Empty);
        }

        let (underlying, was_nullable) = target.unwrap_nullable();
        let produced = match dispatcher {
            Dispatcher::Chain => {
                let (strategy, produced) = strategy::dispatch(&Request {
                    value,
                    target: underlying,
                    was_nullable,
                    config: &self.config,
                    types: self.types(),
                })?;
                tracing::trace!(
                    strategy = strategy.name(),
                    source_type = %value.type_name(),
                    target_type = %target,
                    "coercion resolved"
                );
                if strategy == Strategy::PassThrough {
                    tracing::warn!(
                        source_type = %value.type_name(),
                        target_type = %target,
                        "no coercion strategy applies, returning source unchanged"
                    );
                }
                produced
            }
            Dispatcher::Adapters => adapter::dispatch(self.adapters(), value, underlying)?,
        };
        Ok(Resolution::Produced(produced))
    }

    /// Shared safe path: `fallback` runs on emptiness and on every error.
    fn resolve_or<T>(
        &self,
        value: &Value,
        target: &TargetType,
        dispatcher: Dispatcher,
        extract: impl FnOnce(Value) -> CoercionResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match self
            .resolve(value, target, dispatcher)
            .and_then(|resolution| match resolution {
                Resolution::Produced(produced) => extract(produced).map(Some),
                Resolution::Empty => Ok(None),
            }) {
            Ok(Some(produced)) => produced,
            Ok(None) => fallback(),
            Err(error) => {
                if self.config.log_fallbacks {
                    tracing::debug!(
                        source_type = %value.type_name(),
                        target_type = %target,
                        code = error.code(),
                        error = %error,
                        "coercion failed, using fallback"
                    );
                }
                fallback()
            }
        }
    }

    fn strict<T>(
        &self,
        value: &Value,
        target: &TargetType,
        dispatcher: Dispatcher,
        extract: impl FnOnce(Value) -> CoercionResult<T>,
        if_empty: impl FnOnce() -> T,
    ) -> CoercionResult<T> {
        match self.resolve(value, target, dispatcher)? {
            Resolution::Produced(produced) => extract(produced),
            Resolution::Empty => Ok(if_empty()),
        }
    }

    // ========================================================================
    // DYNAMIC ENTRY POINTS
    // ========================================================================

    /// Strict coercion of `value` to `target`.
    ///
    /// An empty source yields the target's intrinsic default, which is
    /// [`Value::Null`] for nullable targets.
    ///
    /// # Errors
    ///
    /// Whatever the first claiming strategy reports.
    pub fn coerce(&self, value: &Value, target: &TargetType) -> CoercionResult<Value> {
        self.strict(value, target, Dispatcher::Chain, Ok, || {
            target.intrinsic_default()
        })
    }

    /// Strict coercion where an empty source yields `if_empty`.
    ///
    /// # Errors
    ///
    /// Coercion failures only; emptiness never fails.
    pub fn coerce_or_empty(
        &self,
        value: &Value,
        target: &TargetType,
        if_empty: Value,
    ) -> CoercionResult<Value> {
        self.strict(value, target, Dispatcher::Chain, Ok, || if_empty)
    }

    /// Never fails; falls back to the target's intrinsic default.
    #[must_use]
    pub fn coerce_or_default(&self, value: &Value, target: &TargetType) -> Value {
        self.coerce_with(value, target, Fallback::Intrinsic)
    }

    /// Never fails; falls back to `default`.
    #[must_use]
    pub fn coerce_or(&self, value: &Value, target: &TargetType, default: Value) -> Value {
        self.coerce_with(value, target, Fallback::Value(default))
    }

    /// Never fails; `factory` runs only when the result is needed.
    #[must_use]
    pub fn coerce_or_else(
        &self,
        value: &Value,
        target: &TargetType,
        factory: impl FnOnce() -> Value,
    ) -> Value {
        self.resolve_or(value, target, Dispatcher::Chain, Ok, factory)
    }

    /// Never fails; resolves `fallback` on emptiness or failure.
    #[must_use]
    pub fn coerce_with(
        &self,
        value: &Value,
        target: &TargetType,
        fallback: Fallback<'_, Value>,
    ) -> Value {
        self.resolve_or(value, target, Dispatcher::Chain, Ok, || {
            fallback.resolve_with(|| target.intrinsic_default())
        })
    }

    // ========================================================================
    // TYPED ENTRY POINTS
    // ========================================================================

    /// Strict typed coercion.
    ///
    /// # Errors
    ///
    /// Chain failures, or [`TypeMismatch`](crate::CoercionError::TypeMismatch)
    /// when the chain hands back something other than `T`.
    pub fn convert<T: Coerce>(&self, value: &Value) -> CoercionResult<T> {
        self.strict(
            value,
            &T::target_type(),
            Dispatcher::Chain,
            T::from_value,
            T::intrinsic_default,
        )
    }

    /// Strict typed coercion where an empty source yields `if_empty`.
    ///
    /// # Errors
    ///
    /// As [`Coercer::convert`], except that emptiness never fails.
    pub fn convert_or_empty<T: Coerce>(&self, value: &Value, if_empty: T) -> CoercionResult<T> {
        self.strict(
            value,
            &T::target_type(),
            Dispatcher::Chain,
            T::from_value,
            || if_empty,
        )
    }

    #[must_use]
    pub fn convert_or_default<T: Coerce>(&self, value: &Value) -> T {
        self.convert_or_else(value, T::intrinsic_default)
    }

    #[must_use]
    pub fn convert_or<T: Coerce>(&self, value: &Value, default: T) -> T {
        self.convert_or_else(value, || default)
    }

    #[must_use]
    pub fn convert_or_else<T: Coerce>(&self, value: &Value, factory: impl FnOnce() -> T) -> T {
        self.resolve_or(
            value,
            &T::target_type(),
            Dispatcher::Chain,
            T::from_value,
            factory,
        )
    }

    #[must_use]
    pub fn convert_with<T: Coerce>(&self, value: &Value, fallback: Fallback<'_, T>) -> T {
        self.convert_or_else(value, || fallback.resolve())
    }

    // ========================================================================
    // ADAPTER ENTRY POINTS
    // ========================================================================

    /// Strict coercion through the adapter dispatcher.
    ///
    /// # Errors
    ///
    /// [`NoAdapter`](crate::CoercionError::NoAdapter) when no adapter
    /// handles the pair, or the adapter's own failure.
    pub fn adapt(&self, value: &Value, target: &TargetType) -> CoercionResult<Value> {
        self.strict(value, target, Dispatcher::Adapters, Ok, || {
            target.intrinsic_default()
        })
    }

    #[must_use]
    pub fn adapt_or_default(&self, value: &Value, target: &TargetType) -> Value {
        self.adapt_or_else(value, target, || target.intrinsic_default())
    }

    #[must_use]
    pub fn adapt_or(&self, value: &Value, target: &TargetType, default: Value) -> Value {
        self.adapt_or_else(value, target, || default)
    }

    #[must_use]
    pub fn adapt_or_else(
        &self,
        value: &Value,
        target: &TargetType,
        factory: impl FnOnce() -> Value,
    ) -> Value {
        self.resolve_or(value, target, Dispatcher::Adapters, Ok, factory)
    }

    /// Strict typed coercion through the adapter dispatcher.
    ///
    /// # Errors
    ///
    /// As [`Coercer::adapt`], plus typed extraction failures.
    pub fn adapt_to<T: Coerce>(&self, value: &Value) -> CoercionResult<T> {
        self.strict(
            value,
            &T::target_type(),
            Dispatcher::Adapters,
            T::from_value,
            T::intrinsic_default,
        )
    }

    #[must_use]
    pub fn adapt_or_default_to<T: Coerce>(&self, value: &Value) -> T {
        self.resolve_or(
            value,
            &T::target_type(),
            Dispatcher::Adapters,
            T::from_value,
            T::intrinsic_default,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ObjectType;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn identity_skips_emptiness() {
        let engine = Coercer::default();
        assert_eq!(
            engine.coerce(&Value::from(""), &TargetType::String),
            Ok(Value::from(""))
        );
        // Nullable targets treat the same source as absent.
        assert_eq!(
            engine.coerce(&Value::from(""), &TargetType::nullable(TargetType::String)),
            Ok(Value::Null)
        );
    }

    #[test]
    fn empty_sources_resolve_without_the_chain() {
        let engine = Coercer::default();
        assert_eq!(engine.coerce(&Value::DbNull, &TargetType::Int), Ok(Value::Int(0)));
        assert_eq!(
            engine.coerce_or_empty(&Value::Null, &TargetType::Int, Value::Int(9)),
            Ok(Value::Int(9))
        );
        assert_eq!(
            engine.coerce_or(&Value::from(""), &TargetType::Int, Value::Int(42)),
            Value::Int(42)
        );
    }

    #[test]
    fn strict_errors_are_returned_and_safe_ones_absorbed() {
        let engine = Coercer::default();
        let err = engine.coerce(&Value::from("abc"), &TargetType::Int).unwrap_err();
        assert_eq!(err.code(), "COERCE_PARSE");
        assert_eq!(
            engine.coerce_or(&Value::from("abc"), &TargetType::Int, Value::Int(42)),
            Value::Int(42)
        );
        assert_eq!(
            engine.coerce_or_default(&Value::from("abc"), &TargetType::Int),
            Value::Int(0)
        );
    }

    #[test]
    fn factory_is_not_called_on_success() {
        let engine = Coercer::default();
        let calls = Cell::new(0);
        let produced = engine.coerce_or_else(&Value::from("7"), &TargetType::Int, || {
            calls.set(calls.get() + 1);
            Value::Int(0)
        });
        assert_eq!(produced, Value::Int(7));
        assert_eq!(calls.get(), 0);

        let produced = engine.convert_with(
            &Value::from("8"),
            Fallback::factory(|| {
                calls.set(calls.get() + 1);
                0i32
            }),
        );
        assert_eq!(produced, 8);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn pass_through_respects_config() {
        let target = TargetType::Object(ObjectType::new("app::Widget"));
        assert_eq!(
            Coercer::default().coerce(&Value::Int(3), &target),
            Ok(Value::Int(3))
        );

        let strict = Coercer::new(CoercionConfig::default().with_pass_through_unsupported(false));
        assert!(strict.coerce(&Value::Int(3), &target).is_err());
        assert_eq!(
            strict.coerce_or_default(&Value::Int(3), &target),
            Value::Null
        );
    }

    #[test]
    fn custom_type_registry() {
        let types = Arc::new(TypeRegistry::new());
        types.register_alias("widget", TargetType::Object(ObjectType::new("app::Widget")));
        let engine = Coercer::default().with_types(types);

        assert_eq!(
            engine.coerce(&Value::from("Widget"), &TargetType::Type),
            Ok(Value::Type(TargetType::Object(ObjectType::new("app::Widget"))))
        );
        assert!(engine.coerce(&Value::from("i32"), &TargetType::Type).is_err());
    }

    #[test]
    fn adapter_family_uses_its_own_dispatcher() {
        let engine = Coercer::default();
        // The chain converts int to double; the adapters do not.
        assert_eq!(
            engine.coerce(&Value::Int(1), &TargetType::Double),
            Ok(Value::Double(1.0))
        );
        assert_eq!(
            engine.adapt(&Value::Int(1), &TargetType::Double).unwrap_err().code(),
            "COERCE_NO_ADAPTER"
        );
        assert_eq!(
            engine.adapt_or(&Value::Int(1), &TargetType::Double, Value::Double(2.0)),
            Value::Double(2.0)
        );
        assert_eq!(engine.adapt_to::<i32>(&Value::from("5")), Ok(5));
        assert!(!engine.adapt_or_default_to::<bool>(&Value::from("yes")));
        assert_eq!(
            engine.adapt(&Value::Null, &TargetType::nullable(TargetType::Int)),
            Ok(Value::Null)
        );
    }
}
