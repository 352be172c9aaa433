//! Emptiness classification.
//!
//! An empty source is not an error: it short-circuits the pipeline and
//! resolves through the nullable "no value" state or the caller's fallback.

use crate::value::Value;

/// Whether `value` counts as absent.
///
/// Rules, in order:
/// 1. [`Value::Null`].
/// 2. [`Value::DbNull`].
/// 3. The textual form is `""`.
///
/// Rule 3 is type-agnostic. Numeric zero renders as `"0"` and is not empty;
/// an object whose rendering is `""` is. Whitespace-only text is not empty
/// here, only under [`is_null_or_whitespace`].
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::DbNull => true,
        Value::Text(text) => text.is_empty(),
        other => other.to_text().is_empty(),
    }
}

/// `None` or zero-length.
#[must_use]
pub fn is_null_or_empty(text: Option<&str>) -> bool {
    text.is_none_or(str::is_empty)
}

/// `None`, zero-length, or whitespace only.
#[must_use]
pub fn is_null_or_whitespace(text: Option<&str>) -> bool {
    text.is_none_or(|text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fmt;

    struct Blank;

    impl fmt::Display for Blank {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    #[rstest]
    #[case::null(Value::Null, true)]
    #[case::db_null(Value::DbNull, true)]
    #[case::empty_text(Value::from(""), true)]
    #[case::whitespace(Value::from("   "), false)]
    #[case::zero(Value::from(0), false)]
    #[case::false_bool(Value::from(false), false)]
    #[case::blank_object(Value::display_object(Blank), true)]
    #[case::char_nul(Value::from('\0'), false)]
    fn classifies_values(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_empty(&value), expected);
    }

    #[test]
    fn string_predicates_stay_distinct() {
        assert!(is_null_or_empty(None));
        assert!(is_null_or_empty(Some("")));
        assert!(!is_null_or_empty(Some(" \t")));

        assert!(is_null_or_whitespace(None));
        assert!(is_null_or_whitespace(Some("")));
        assert!(is_null_or_whitespace(Some(" \t\n")));
        assert!(!is_null_or_whitespace(Some(" x ")));
    }
}
