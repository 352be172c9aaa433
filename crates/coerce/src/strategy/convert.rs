//! Generic numeric and textual conversion between scalar kinds.
//!
//! This is the catch-all behind the convertible strategy. Every function
//! reads the source in the invariant textual form; no locale data is used.

use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::error::{CoercionError, CoercionResult};
use crate::target::TargetType;
use crate::value::Value;

/// Date-time layouts tried in order after RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, completed with midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Tokens read as `true` by the boolean rule, before `on`.
const TRUTHY_TOKENS: [&str; 4] = ["true", "t", "1", "yes"];

/// Converts `value` to a convertible `target`.
///
/// `target` must already be unwrapped from any nullable wrapper.
pub(crate) fn convert(
    value: &Value,
    target: &TargetType,
    extra_formats: &[String],
) -> CoercionResult<Value> {
    let converted = match target {
        TargetType::Bool => Value::Bool(to_bool(value)?),
        TargetType::Byte => Value::Byte(narrow(value, to_i64(value, target)?, target)?),
        TargetType::Short => Value::Short(narrow(value, to_i64(value, target)?, target)?),
        TargetType::Int => Value::Int(narrow(value, to_i64(value, target)?, target)?),
        TargetType::Long => Value::Long(to_i64(value, target)?),
        // Out-of-range doubles saturate to infinity, like any f64 -> f32 cast.
        TargetType::Float => Value::Float(to_f64(value, target)? as f32),
        TargetType::Double => Value::Double(to_f64(value, target)?),
        TargetType::Decimal => Value::Decimal(to_decimal(value)?),
        TargetType::Char => Value::Char(to_char(value)?),
        TargetType::String => Value::Text(to_string(value)?),
        TargetType::Guid => Value::Guid(to_guid(value)?),
        TargetType::DateTime => Value::DateTime(to_date_time(value, extra_formats)?),
        other => return Err(CoercionError::invalid_cast(value.type_name(), other.name())),
    };
    Ok(converted)
}

fn narrow<T: TryFrom<i64>>(value: &Value, wide: i64, target: &TargetType) -> CoercionResult<T> {
    T::try_from(wide).map_err(|_| CoercionError::overflow(value.to_text(), target.name()))
}

/// Boolean reading of any value.
///
/// Text matches `true`, `t`, `1`, `yes`, then `on`, case-insensitively;
/// other text is compared to 1 when it is an integer and is `false`
/// otherwise. Non-text values are read as an integer and compared to 1.
pub(crate) fn to_bool(value: &Value) -> CoercionResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Text(text) => {
            let token = text.trim();
            if TRUTHY_TOKENS
                .iter()
                .any(|truthy| token.eq_ignore_ascii_case(truthy))
            {
                return Ok(true);
            }
            if token.eq_ignore_ascii_case("on") {
                return Ok(true);
            }
            Ok(token.parse::<i64>().is_ok_and(|n| n == 1))
        }
        other => Ok(to_i64(other, &TargetType::Bool)? == 1),
    }
}

/// Integer reading of any value.
///
/// Fractional sources round half to even.
pub(crate) fn to_i64(value: &Value, target: &TargetType) -> CoercionResult<i64> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Byte(n) => Ok(i64::from(*n)),
        Value::Short(n) => Ok(i64::from(*n)),
        Value::Int(n) => Ok(i64::from(*n)),
        Value::Long(n) => Ok(*n),
        Value::Float(n) => float_to_i64(f64::from(*n), value, target),
        Value::Double(n) => float_to_i64(*n, value, target),
        Value::Decimal(d) => d
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or_else(|| CoercionError::overflow(d, target.name())),
        Value::Char(c) => Ok(i64::from(u32::from(*c))),
        Value::Enum(member) => Ok(member.index() as i64),
        Value::Text(text) => text.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                CoercionError::overflow(text, target.name())
            }
            _ => CoercionError::parse(text.as_str(), target.name(), e),
        }),
        other => Err(CoercionError::invalid_cast(other.type_name(), target.name())),
    }
}

fn float_to_i64(n: f64, value: &Value, target: &TargetType) -> CoercionResult<i64> {
    let rounded = n.round_ties_even();
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(CoercionError::overflow(value.to_text(), target.name()))
    }
}

fn to_f64(value: &Value, target: &TargetType) -> CoercionResult<f64> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Byte(n) => Ok(f64::from(*n)),
        Value::Short(n) => Ok(f64::from(*n)),
        Value::Int(n) => Ok(f64::from(*n)),
        Value::Long(n) => Ok(*n as f64),
        Value::Float(n) => Ok(f64::from(*n)),
        Value::Double(n) => Ok(*n),
        Value::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| CoercionError::overflow(d, target.name())),
        Value::Enum(member) => Ok(member.index() as f64),
        Value::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| CoercionError::parse(text.as_str(), target.name(), e)),
        other => Err(CoercionError::invalid_cast(other.type_name(), target.name())),
    }
}

fn to_decimal(value: &Value) -> CoercionResult<Decimal> {
    let target = TargetType::Decimal.name();
    match value {
        Value::Bool(b) => Ok(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Byte(n) => Ok(Decimal::from(*n)),
        Value::Short(n) => Ok(Decimal::from(*n)),
        Value::Int(n) => Ok(Decimal::from(*n)),
        Value::Long(n) => Ok(Decimal::from(*n)),
        Value::Float(n) => Decimal::try_from(*n).map_err(|_| CoercionError::overflow(n, target)),
        Value::Double(n) => Decimal::try_from(*n).map_err(|_| CoercionError::overflow(n, target)),
        Value::Decimal(d) => Ok(*d),
        Value::Enum(member) => Ok(Decimal::from(member.index() as u64)),
        Value::Text(text) => {
            let trimmed = text.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|e| CoercionError::parse(text.as_str(), target, e))
        }
        other => Err(CoercionError::invalid_cast(other.type_name(), target)),
    }
}

fn to_char(value: &Value) -> CoercionResult<char> {
    let target = TargetType::Char.name();
    match value {
        Value::Char(c) => Ok(*c),
        Value::Text(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(CoercionError::parse(
                    text.as_str(),
                    target,
                    "expected exactly one character",
                )),
            }
        }
        Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_) => {
            let code = to_i64(value, &TargetType::Char)?;
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| CoercionError::overflow(code, target))
        }
        other => Err(CoercionError::invalid_cast(other.type_name(), target)),
    }
}

fn to_string(value: &Value) -> CoercionResult<String> {
    match value {
        Value::Object(object) if !object.has_rendering() => Err(CoercionError::invalid_cast(
            value.type_name(),
            TargetType::String.name(),
        )),
        other => Ok(other.to_text().into_owned()),
    }
}

fn to_guid(value: &Value) -> CoercionResult<Uuid> {
    match value {
        Value::Guid(guid) => Ok(*guid),
        Value::Text(text) => Uuid::parse_str(text.trim())
            .map_err(|e| CoercionError::parse(text.as_str(), TargetType::Guid.name(), e)),
        other => Err(CoercionError::invalid_cast(
            other.type_name(),
            TargetType::Guid.name(),
        )),
    }
}

fn to_date_time(value: &Value, extra_formats: &[String]) -> CoercionResult<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Text(text) => parse_date_time(text.trim(), extra_formats).ok_or_else(|| {
            CoercionError::parse(
                text.as_str(),
                TargetType::DateTime.name(),
                "no known date-time layout matched",
            )
        }),
        other => Err(CoercionError::invalid_cast(
            other.type_name(),
            TargetType::DateTime.name(),
        )),
    }
}

fn parse_date_time(text: &str, extra_formats: &[String]) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    let builtin = DATE_TIME_FORMATS.iter().copied();
    let extra = extra_formats.iter().map(String::as_str);
    for format in builtin.chain(extra.clone()) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .copied()
        .chain(extra)
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn convert_to(value: impl Into<Value>, target: &TargetType) -> CoercionResult<Value> {
        convert(&value.into(), target, &[])
    }

    #[rstest]
    #[case(Value::from("42"), Value::Int(42))]
    #[case(Value::from("  -7 "), Value::Int(-7))]
    #[case(Value::from("+3"), Value::Int(3))]
    #[case(Value::Double(2.5), Value::Int(2))]
    #[case(Value::Double(3.5), Value::Int(4))]
    #[case(Value::Double(-2.5), Value::Int(-2))]
    #[case(Value::Decimal(Decimal::new(25, 1)), Value::Int(2))]
    #[case(Value::Char('A'), Value::Int(65))]
    #[case(Value::Long(9), Value::Int(9))]
    fn integers(#[case] source: Value, #[case] expected: Value) {
        assert_eq!(convert_to(source, &TargetType::Int).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::from("300"), TargetType::Byte)]
    #[case(Value::Int(-1), TargetType::Byte)]
    #[case(Value::Long(i64::from(i32::MAX) + 1), TargetType::Int)]
    #[case(Value::from("99999999999999999999"), TargetType::Long)]
    #[case(Value::Double(f64::NAN), TargetType::Long)]
    #[case(Value::Double(1e300), TargetType::Long)]
    fn integer_overflow(#[case] source: Value, #[case] target: TargetType) {
        let err = convert_to(source, &target).unwrap_err();
        assert_eq!(err.code(), "COERCE_OVERFLOW");
    }

    #[test]
    fn integer_parse_failure() {
        let err = convert_to("7.5", &TargetType::Int).unwrap_err();
        assert_eq!(err.code(), "COERCE_PARSE");
        let err = convert_to("abc", &TargetType::Long).unwrap_err();
        assert_eq!(err.code(), "COERCE_PARSE");
    }

    #[test]
    fn floats_and_decimals() {
        assert_eq!(convert_to("1.25", &TargetType::Double).unwrap(), Value::Double(1.25));
        assert_eq!(convert_to(3, &TargetType::Float).unwrap(), Value::Float(3.0));
        assert_eq!(
            convert_to(" 12.50 ", &TargetType::Decimal).unwrap(),
            Value::Decimal(Decimal::new(1250, 2))
        );
        assert_eq!(
            convert_to("1e3", &TargetType::Decimal).unwrap(),
            Value::Decimal(Decimal::from(1000))
        );
        assert_eq!(
            convert_to(Decimal::new(15, 1), &TargetType::Double).unwrap(),
            Value::Double(1.5)
        );
        assert!(convert_to(f64::INFINITY, &TargetType::Decimal).is_err());
        assert!(convert_to('x', &TargetType::Double).is_err());
    }

    #[test]
    fn chars() {
        assert_eq!(convert_to("x", &TargetType::Char).unwrap(), Value::Char('x'));
        assert_eq!(convert_to(97, &TargetType::Char).unwrap(), Value::Char('a'));
        assert!(convert_to("xy", &TargetType::Char).is_err());
        assert!(convert_to(0xD800, &TargetType::Char).is_err());
        assert!(convert_to(true, &TargetType::Char).is_err());
    }

    #[test]
    fn strings_use_invariant_text() {
        assert_eq!(convert_to(7, &TargetType::String).unwrap(), Value::from("7"));
        assert_eq!(convert_to(1.5f64, &TargetType::String).unwrap(), Value::from("1.5"));
        assert!(convert_to(Value::object(5u8), &TargetType::String).is_err());
    }

    #[test]
    fn guids() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let expected = Value::Guid(Uuid::parse_str(text).unwrap());
        assert_eq!(convert_to(text, &TargetType::Guid).unwrap(), expected);
        assert_eq!(
            convert_to("{67E55044-10B1-426F-9247-BB680E5FE0C8}", &TargetType::Guid).unwrap(),
            expected
        );
        assert!(convert_to("not-a-guid", &TargetType::Guid).is_err());
        assert!(convert_to(5, &TargetType::Guid).is_err());
    }

    #[rstest]
    #[case("2024-03-01 10:20:30", "2024-03-01 10:20:30")]
    #[case("2024-03-01T10:20:30.5", "2024-03-01 10:20:30.500")]
    #[case("2024-03-01T10:20:30Z", "2024-03-01 10:20:30")]
    #[case("2024-03-01T12:20:30+02:00", "2024-03-01 10:20:30")]
    #[case("2024-03-01", "2024-03-01 00:00:00")]
    #[case("03/01/2024", "2024-03-01 00:00:00")]
    fn date_times(#[case] input: &str, #[case] expected: &str) {
        let Value::DateTime(dt) = convert_to(input, &TargetType::DateTime).unwrap() else {
            panic!("expected a date-time");
        };
        let rendered = dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        assert_eq!(rendered.trim_end_matches(".000"), expected);
    }

    #[test]
    fn extra_date_time_formats() {
        let formats = vec!["%d.%m.%Y".to_string()];
        assert!(convert(&Value::from("01.03.2024"), &TargetType::DateTime, &[]).is_err());
        assert!(convert(&Value::from("01.03.2024"), &TargetType::DateTime, &formats).is_ok());
    }

    #[rstest]
    #[case("true", true)]
    #[case("T", true)]
    #[case("1", true)]
    #[case("YES", true)]
    #[case("on", true)]
    #[case(" On ", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("no", false)]
    #[case("off", false)]
    #[case("2", false)]
    #[case("banana", false)]
    fn boolean_tokens(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(to_bool(&Value::from(token)).unwrap(), expected);
    }

    #[test]
    fn boolean_from_numbers() {
        assert!(to_bool(&Value::Int(1)).unwrap());
        assert!(!to_bool(&Value::Int(2)).unwrap());
        assert!(to_bool(&Value::Double(0.9)).unwrap());
        assert!(to_bool(&Value::Guid(Uuid::nil())).is_err());
    }
}
