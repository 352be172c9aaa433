//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoercionError, CoercionResult};

/// Options for a [`Coercer`](crate::Coercer).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust,ignore
/// let config = CoercionConfig::from_json(r#"{ "pass_through_unsupported": false }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// When no strategy applies (targets outside the convertible set), hand
    /// the source back unchanged instead of failing.
    ///
    /// On by default for compatibility. Turn it off to surface
    /// [`CoercionError::NoStrategy`].
    pub pass_through_unsupported: bool,

    /// Emit a `debug` event each time a safe entry point swallows a failure.
    pub log_fallbacks: bool,

    /// Extra `chrono` layouts tried after the built-in ones when parsing
    /// date-times from text.
    pub date_time_formats: Vec<String>,
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            pass_through_unsupported: true,
            log_fallbacks: true,
            date_time_formats: Vec::new(),
        }
    }
}

impl CoercionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> CoercionResult<Self> {
        serde_json::from_str(json).map_err(|e| CoercionError::parse(json, "CoercionConfig", e))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_pass_through_unsupported(mut self, enabled: bool) -> Self {
        self.pass_through_unsupported = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_log_fallbacks(mut self, enabled: bool) -> Self {
        self.log_fallbacks = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_date_time_format(mut self, format: impl Into<String>) -> Self {
        self.date_time_formats.push(format.into());
        self
    }
}
