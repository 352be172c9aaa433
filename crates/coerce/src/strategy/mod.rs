//! The ordered strategy chain.
//!
//! Each [`Strategy`] either claims a (source, target) pair and resolves it,
//! declines it, or fails. The first strategy that does not decline wins;
//! its failure is final. The order of [`Strategy::CHAIN`] is load-bearing:
//! the narrow rules must run before the general ones.

pub(crate) mod convert;

use crate::config::CoercionConfig;
use crate::error::{CoercionError, CoercionResult};
use crate::registry::TypeRegistry;
use crate::target::TargetType;
use crate::value::{EnumValue, Value};

/// Inputs to one pass over the chain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Request<'a> {
    /// A non-empty source value.
    pub(crate) value: &'a Value,
    /// The target with any nullable wrapper removed.
    pub(crate) target: &'a TargetType,
    /// Whether the caller's target was nullable.
    pub(crate) was_nullable: bool,
    pub(crate) config: &'a CoercionConfig,
    pub(crate) types: &'a TypeRegistry,
}

/// Result of applying one strategy.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    Resolved(Value),
    Declined,
}

/// A named rule in the coercion chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Source already has the target type.
    Identity,
    /// Case-insensitive member-name parse for enum targets.
    EnumTarget,
    /// `-1` means "no value" for nullable booleans.
    NullableBoolSentinel,
    /// Token table and integer reading for boolean targets.
    BooleanTarget,
    /// Booleans render as `"true"`/`"false"` or `1`/`0`.
    BooleanSource,
    /// Type-name resolution for type targets.
    TypeFromText,
    /// Types render as their qualified name.
    TypeToText,
    /// Generic numeric and textual conversion.
    Convertible,
    /// Nothing applies: hand the source back unchanged.
    PassThrough,
}

impl Strategy {
    /// Strategies in evaluation order.
    pub const CHAIN: [Self; 9] = [
        Self::Identity,
        Self::EnumTarget,
        Self::NullableBoolSentinel,
        Self::BooleanTarget,
        Self::BooleanSource,
        Self::TypeFromText,
        Self::TypeToText,
        Self::Convertible,
        Self::PassThrough,
    ];

    /// Stable name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::EnumTarget => "enum_target",
            Self::NullableBoolSentinel => "nullable_bool_sentinel",
            Self::BooleanTarget => "boolean_target",
            Self::BooleanSource => "boolean_source",
            Self::TypeFromText => "type_from_text",
            Self::TypeToText => "type_to_text",
            Self::Convertible => "convertible",
            Self::PassThrough => "pass_through",
        }
    }

    pub(crate) fn apply(self, req: &Request<'_>) -> CoercionResult<Step> {
        match self {
            Self::Identity => Ok(identity(req)),
            Self::EnumTarget => enum_target(req),
            Self::NullableBoolSentinel => Ok(nullable_bool_sentinel(req)),
            Self::BooleanTarget => boolean_target(req),
            Self::BooleanSource => boolean_source(req),
            Self::TypeFromText => type_from_text(req),
            Self::TypeToText => Ok(type_to_text(req)),
            Self::Convertible => convertible(req),
            Self::PassThrough => pass_through(req),
        }
    }
}

/// Runs the chain and reports which strategy resolved the request.
pub(crate) fn dispatch(req: &Request<'_>) -> CoercionResult<(Strategy, Value)> {
    for strategy in Strategy::CHAIN {
        if let Step::Resolved(value) = strategy.apply(req)? {
            return Ok((strategy, value));
        }
    }
    Err(no_strategy(req))
}

fn no_strategy(req: &Request<'_>) -> CoercionError {
    CoercionError::NoStrategy {
        source_type: req.value.type_name(),
        target: req.target.name(),
    }
}

fn identity(req: &Request<'_>) -> Step {
    if req.value.is_of_type(req.target) {
        Step::Resolved(req.value.clone())
    } else {
        Step::Declined
    }
}

fn enum_target(req: &Request<'_>) -> CoercionResult<Step> {
    let TargetType::Enum(ty) = req.target else {
        return Ok(Step::Declined);
    };

    let text = req.value.to_text();
    let token = text.trim();
    let index = ty.find(token).or_else(|| {
        token
            .parse::<usize>()
            .ok()
            .filter(|index| *index < ty.members().len())
    });

    match index {
        Some(index) => Ok(Step::Resolved(Value::Enum(EnumValue::new(*ty, index)))),
        None => Err(CoercionError::UnknownEnumMember {
            input: text.into_owned(),
            enum_name: ty.name(),
        }),
    }
}

fn nullable_bool_sentinel(req: &Request<'_>) -> Step {
    if !req.was_nullable || *req.target != TargetType::Bool {
        return Step::Declined;
    }
    let as_i32 = convert::to_i64(req.value, &TargetType::Int)
        .ok()
        .and_then(|n| i32::try_from(n).ok());
    if as_i32 == Some(-1) {
        Step::Resolved(Value::Null)
    } else {
        Step::Declined
    }
}

fn boolean_target(req: &Request<'_>) -> CoercionResult<Step> {
    if *req.target != TargetType::Bool {
        return Ok(Step::Declined);
    }
    convert::to_bool(req.value).map(|b| Step::Resolved(Value::Bool(b)))
}

fn boolean_source(req: &Request<'_>) -> CoercionResult<Step> {
    let Value::Bool(b) = req.value else {
        return Ok(Step::Declined);
    };
    if *req.target == TargetType::String {
        return Ok(Step::Resolved(Value::Text(b.to_string())));
    }
    let numeric = Value::Int(i32::from(*b));
    if req.target.is_convertible() {
        convert::convert(&numeric, req.target, &req.config.date_time_formats).map(Step::Resolved)
    } else {
        Ok(Step::Resolved(numeric))
    }
}

fn type_from_text(req: &Request<'_>) -> CoercionResult<Step> {
    if *req.target != TargetType::Type {
        return Ok(Step::Declined);
    }
    let name = req.value.to_text();
    req.types
        .resolve(&name)
        .map(|ty| Step::Resolved(Value::Type(ty)))
        .ok_or_else(|| CoercionError::UnknownType {
            name: name.into_owned(),
        })
}

fn type_to_text(req: &Request<'_>) -> Step {
    match (req.value, req.target) {
        (Value::Type(ty), TargetType::String) => {
            Step::Resolved(Value::Text(ty.qualified_name().into_owned()))
        }
        _ => Step::Declined,
    }
}

fn convertible(req: &Request<'_>) -> CoercionResult<Step> {
    if !req.target.is_convertible() {
        return Ok(Step::Declined);
    }
    convert::convert(req.value, req.target, &req.config.date_time_formats).map(Step::Resolved)
}

fn pass_through(req: &Request<'_>) -> CoercionResult<Step> {
    if req.config.pass_through_unsupported {
        Ok(Step::Resolved(req.value.clone()))
    } else {
        Err(no_strategy(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{EnumType, ObjectType};
    use pretty_assertions::assert_eq;

    static COLOR: EnumType = EnumType::new("Color", "demo", &["Red", "Green", "Blue"]);

    fn run(value: Value, target: TargetType) -> CoercionResult<(Strategy, Value)> {
        run_with(value, target, &CoercionConfig::default())
    }

    fn run_with(
        value: Value,
        target: TargetType,
        config: &CoercionConfig,
    ) -> CoercionResult<(Strategy, Value)> {
        let types = TypeRegistry::with_builtins();
        let (underlying, was_nullable) = target.unwrap_nullable();
        dispatch(&Request {
            value: &value,
            target: underlying,
            was_nullable,
            config,
            types: &types,
        })
    }

    #[test]
    fn chain_order_is_fixed() {
        assert_eq!(Strategy::CHAIN.first(), Some(&Strategy::Identity));
        assert_eq!(Strategy::CHAIN.last(), Some(&Strategy::PassThrough));
        let names: Vec<_> = Strategy::CHAIN.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "identity",
                "enum_target",
                "nullable_bool_sentinel",
                "boolean_target",
                "boolean_source",
                "type_from_text",
                "type_to_text",
                "convertible",
                "pass_through",
            ]
        );
    }

    #[test]
    fn identity_wins_first() {
        let (strategy, value) = run(Value::Int(5), TargetType::Int).unwrap();
        assert_eq!(strategy, Strategy::Identity);
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn enum_members_parse_case_insensitively() {
        for token in ["red", "RED", " Red "] {
            let (strategy, value) = run(Value::from(token), TargetType::Enum(&COLOR)).unwrap();
            assert_eq!(strategy, Strategy::EnumTarget);
            assert_eq!(value, Value::Enum(EnumValue::new(&COLOR, 0)));
        }
        let (_, value) = run(Value::Int(2), TargetType::Enum(&COLOR)).unwrap();
        assert_eq!(value, Value::Enum(EnumValue::new(&COLOR, 2)));

        let err = run(Value::from("purple"), TargetType::Enum(&COLOR)).unwrap_err();
        assert_eq!(err.code(), "COERCE_UNKNOWN_ENUM_MEMBER");
        assert!(run(Value::Int(3), TargetType::Enum(&COLOR)).is_err());
    }

    #[test]
    fn sentinel_only_applies_to_nullable_bool() {
        let nullable_bool = TargetType::nullable(TargetType::Bool);
        let (strategy, value) = run(Value::Int(-1), nullable_bool.clone()).unwrap();
        assert_eq!(strategy, Strategy::NullableBoolSentinel);
        assert_eq!(value, Value::Null);

        let (_, value) = run(Value::from("-1"), nullable_bool).unwrap();
        assert_eq!(value, Value::Null);

        let (strategy, value) = run(Value::Int(-1), TargetType::Bool).unwrap();
        assert_eq!(strategy, Strategy::BooleanTarget);
        assert_eq!(value, Value::Bool(false));
    }

    #[test]
    fn boolean_source_renders_lower_case_or_numeric() {
        let (strategy, value) = run(Value::Bool(true), TargetType::String).unwrap();
        assert_eq!(strategy, Strategy::BooleanSource);
        assert_eq!(value, Value::from("true"));

        let (_, value) = run(Value::Bool(false), TargetType::String).unwrap();
        assert_eq!(value, Value::from("false"));

        let (_, value) = run(Value::Bool(true), TargetType::Double).unwrap();
        assert_eq!(value, Value::Double(1.0));

        let (_, value) = run(Value::Bool(false), TargetType::Decimal).unwrap();
        assert_eq!(value, Value::Decimal(rust_decimal::Decimal::ZERO));
    }

    #[test]
    fn boolean_source_is_numeric_for_non_convertible_targets() {
        let widget = TargetType::Object(ObjectType::new("app::Widget"));
        let (strategy, value) = run(Value::Bool(true), widget).unwrap();
        assert_eq!(strategy, Strategy::BooleanSource);
        assert_eq!(value, Value::Int(1));

        let (strategy, value) = run(Value::Bool(false), TargetType::Type).unwrap();
        assert_eq!(strategy, Strategy::BooleanSource);
        assert_eq!(value, Value::Int(0));
    }

    #[test]
    fn types_round_trip_through_text() {
        let (strategy, value) = run(Value::from("i64"), TargetType::Type).unwrap();
        assert_eq!(strategy, Strategy::TypeFromText);
        assert_eq!(value, Value::Type(TargetType::Long));

        let (strategy, value) = run(Value::Type(TargetType::Long), TargetType::String).unwrap();
        assert_eq!(strategy, Strategy::TypeToText);
        assert_eq!(value, Value::from("core::primitive::i64"));

        let err = run(Value::from("Unknown"), TargetType::Type).unwrap_err();
        assert_eq!(err.code(), "COERCE_UNKNOWN_TYPE");
    }

    #[test]
    fn convertible_handles_primitive_pairs() {
        let (strategy, value) = run(Value::from("7"), TargetType::Int).unwrap();
        assert_eq!(strategy, Strategy::Convertible);
        assert_eq!(value, Value::Int(7));
    }

    #[test]
    fn pass_through_is_gated_by_config() {
        let target = TargetType::Object(ObjectType::new("app::Widget"));

        let (strategy, value) = run(Value::Int(3), target.clone()).unwrap();
        assert_eq!(strategy, Strategy::PassThrough);
        assert_eq!(value, Value::Int(3));

        let strict = CoercionConfig::default().with_pass_through_unsupported(false);
        let err = run_with(Value::Int(3), target, &strict).unwrap_err();
        assert_eq!(err.code(), "COERCE_NO_STRATEGY");
    }
}
