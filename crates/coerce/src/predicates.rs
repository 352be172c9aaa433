//! Textual predicates and coercibility probes.
//!
//! Pattern checks answer "does this text look like an X" without running
//! the engine. [`can_coerce`] answers "would a strict coercion succeed".

use std::sync::LazyLock;

use crate::engine::Coercer;
use crate::target::TargetType;
use crate::typed::Coerce;
use crate::value::Value;

static INTEGER_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\s*[+-]?[0-9]+\s*$").unwrap());

static NUMERIC_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\s*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?\s*$").unwrap()
});

static GUID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?i)(urn:uuid:)?\{?[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}\}?$",
    )
    .unwrap()
});

/// Optionally signed decimal digits, surrounding whitespace allowed.
#[must_use]
pub fn is_integer_text(text: &str) -> bool {
    INTEGER_REGEX.is_match(text)
}

/// Integer, fraction or scientific notation, surrounding whitespace allowed.
#[must_use]
pub fn is_numeric_text(text: &str) -> bool {
    NUMERIC_REGEX.is_match(text)
}

/// Hyphenated, simple, braced or URN guid text.
#[must_use]
pub fn is_guid_text(text: &str) -> bool {
    GUID_REGEX.is_match(text)
}

/// Whether strict coercion of `value` to `target` would succeed with the
/// global engine.
#[must_use]
pub fn can_coerce(value: &Value, target: &TargetType) -> bool {
    Coercer::global().coerce(value, target).is_ok()
}

/// Typed form of [`can_coerce`].
#[must_use]
pub fn can_coerce_to<T: Coerce>(value: &Value) -> bool {
    Coercer::global().convert::<T>(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", true)]
    #[case(" -7 ", true)]
    #[case("+0", true)]
    #[case("4.2", false)]
    #[case("", false)]
    #[case("1e3", false)]
    fn integer_text(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_integer_text(input), expected);
    }

    #[rstest]
    #[case("42", true)]
    #[case("-4.25", true)]
    #[case(".5", true)]
    #[case("1e-3", true)]
    #[case("1.", true)]
    #[case("abc", false)]
    #[case("1.2.3", false)]
    fn numeric_text(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_numeric_text(input), expected);
    }

    #[rstest]
    #[case("67e55044-10b1-426f-9247-bb680e5fe0c8", true)]
    #[case("67E5504410B1426F9247BB680E5FE0C8", true)]
    #[case("{67e55044-10b1-426f-9247-bb680e5fe0c8}", true)]
    #[case("urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8", true)]
    #[case("67e55044-10b1", false)]
    fn guid_text(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_guid_text(input), expected);
    }

    #[test]
    fn probes_follow_strict_coercion() {
        assert!(can_coerce(&Value::from("12"), &TargetType::Int));
        assert!(!can_coerce(&Value::from("twelve"), &TargetType::Int));
        assert!(can_coerce_to::<u8>(&Value::from("255")));
        assert!(!can_coerce_to::<u8>(&Value::from("256")));
    }
}
