//! Argument coercion for `tools/call`.
//!
//! Tool arguments arrive as an untyped JSON object. [`Arguments`] reads single
//! keys out of it with a fixed policy: a value of the right shape is returned,
//! anything else (missing key, wrong type, `null`) yields the zero value of the
//! requested type. Lookups never fail.
//!
//! Each tool decodes the bag into its own typed request on top of these
//! accessors, so the policy is applied in exactly one place per field.

use serde_json::{Map, Value};

/// Untyped argument bag supplied with one `tools/call` invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// String value, or `""` when missing or not a string.
    pub fn string(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Integer value, or `0` when missing or not a number.
    ///
    /// Any JSON number is accepted and truncated toward zero, so `12.9`
    /// reads as `12`. Out-of-range floats saturate.
    pub fn integer(&self, key: &str) -> i64 {
        self.number(key).map(|n| n as i64).unwrap_or(0)
    }

    /// Integer value with `default` substituted for zero.
    ///
    /// Zero is the "absent" marker of [`Arguments::integer`], so an explicit
    /// `0` in the request also becomes `default`. Callers rely on this:
    /// `radius: 0` means the default radius, not a zero-mile map.
    pub fn integer_or(&self, key: &str, default: i64) -> i64 {
        match self.integer(key) {
            0 => default,
            n => n,
        }
    }

    /// Numeric value, or `None` when missing or not a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Array of strings; non-string elements are skipped. Missing or
    /// non-array values read as an empty list.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw value, for fields that may legitimately carry several shapes.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Option<Map<String, Value>>> for Arguments {
    fn from(map: Option<Map<String, Value>>) -> Self {
        Self(map.unwrap_or_default())
    }
}

impl From<&Value> for Arguments {
    /// Non-object values read as an empty bag.
    fn from(value: &Value) -> Self {
        Self(value.as_object().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        Arguments::from(&value)
    }

    #[test]
    fn test_string_zero_value() {
        let a = args(json!({"name": "Ada", "n": 5, "nil": null}));
        assert_eq!(a.string("name"), "Ada");
        assert_eq!(a.string("n"), "");
        assert_eq!(a.string("nil"), "");
        assert_eq!(a.string("missing"), "");
    }

    #[test]
    fn test_integer_truncates_and_rejects_non_numbers() {
        let a = args(json!({"whole": 1000, "frac": 12.9, "neg": -3.7, "text": "42", "flag": true}));
        assert_eq!(a.integer("whole"), 1000);
        assert_eq!(a.integer("frac"), 12);
        assert_eq!(a.integer("neg"), -3);
        assert_eq!(a.integer("text"), 0);
        assert_eq!(a.integer("flag"), 0);
        assert_eq!(a.integer("missing"), 0);
    }

    #[test]
    fn test_integer_or_treats_zero_as_absent() {
        let a = args(json!({"radius": 0, "clusters": 12}));
        assert_eq!(a.integer_or("radius", 50), 50);
        assert_eq!(a.integer_or("clusters", 50), 12);
        assert_eq!(a.integer_or("missing", 50), 50);
    }

    #[test]
    fn test_number_presence() {
        let a = args(json!({"lat": 29.4, "lon": -98, "bad": "29.4"}));
        assert_eq!(a.number("lat"), Some(29.4));
        assert_eq!(a.number("lon"), Some(-98.0));
        assert_eq!(a.number("bad"), None);
        assert_eq!(a.number("missing"), None);
    }

    #[test]
    fn test_strings_skip_non_string_items() {
        let a = args(json!({"channels": ["email", 3, "social", null], "single": "email"}));
        assert_eq!(a.strings("channels"), vec!["email", "social"]);
        assert!(a.strings("single").is_empty());
        assert!(a.strings("missing").is_empty());
    }

    #[test]
    fn test_non_object_is_empty_bag() {
        assert_eq!(args(json!([1, 2])), Arguments::default());
        assert_eq!(Arguments::from(None), Arguments::default());
    }
}
