//! Configuration and Environment Management
//!
//! Everything the server needs from the process environment is read once at
//! startup into a [`Config`] and injected from there. Request handling never
//! touches `std::env`.

use std::time::Duration;

use crate::tools::map_client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Shared secret the map tool accepts.
pub const EXPECTED_API_KEY: &str = "1234";

/// Server configuration loaded from environment variables.
///
/// Environment Variables:
/// - SERVER_NAME: Name reported in `serverInfo` (default: "rave")
/// - SERVER_VERSION: Version reported in `serverInfo` (default: "1.0.0")
/// - RAVE_API_KEY: Shared secret presented to the map tool (default: unset)
/// - RAVE_MAP_API_URL: Map generation endpoint
/// - RAVE_MAP_TIMEOUT_SECS: HTTP timeout for the map endpoint (default: 30)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub api_key: Option<String>,
    pub map_endpoint: String,
    pub map_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a closure over a
    /// fixed table instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let map_timeout = lookup("RAVE_MAP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            server_name: get("SERVER_NAME", "rave"),
            server_version: get("SERVER_VERSION", "1.0.0"),
            api_key: lookup("RAVE_API_KEY"),
            map_endpoint: get("RAVE_MAP_API_URL", DEFAULT_ENDPOINT),
            map_timeout: Duration::from_secs(map_timeout),
        }
    }
}

/// Get environment variable value with a default fallback.
///
/// # Example
/// ```rust
/// let filter = rave_mcp::core::config::get_env_var("RUST_LOG", "info");
/// assert!(!filter.is_empty());
/// ```
pub fn get_env_var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Shared-secret check guarding the map tool.
///
/// Holds the expected secret and compares what the process was started with
/// by exact string equality. An absent key never authorizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyGate {
    expected: String,
}

impl ApiKeyGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn authorizes(&self, presented: Option<&str>) -> bool {
        presented == Some(self.expected.as_str())
    }
}

impl Default for ApiKeyGate {
    fn default() -> Self {
        Self::new(EXPECTED_API_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let table: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| table.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.server_name, "rave");
        assert_eq!(config.server_version, "1.0.0");
        assert_eq!(config.api_key, None);
        assert_eq!(config.map_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.map_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_NAME", "rave-dev"),
            ("RAVE_API_KEY", "1234"),
            ("RAVE_MAP_API_URL", "http://localhost:9000/map"),
            ("RAVE_MAP_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.server_name, "rave-dev");
        assert_eq!(config.api_key.as_deref(), Some("1234"));
        assert_eq!(config.map_endpoint, "http://localhost:9000/map");
        assert_eq!(config.map_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout_falls_back_to_default() {
        for raw in ["abc", "0", "-3", ""] {
            let config = Config::from_lookup(lookup_from(&[("RAVE_MAP_TIMEOUT_SECS", raw)]));
            assert_eq!(config.map_timeout, Duration::from_secs(30), "input {raw:?}");
        }
    }

    #[test]
    fn test_gate_requires_exact_match() {
        let gate = ApiKeyGate::default();
        assert!(gate.authorizes(Some("1234")));
        assert!(!gate.authorizes(Some("12345")));
        assert!(!gate.authorizes(Some(" 1234")));
        assert!(!gate.authorizes(Some("")));
        assert!(!gate.authorizes(None));
    }

    #[test]
    fn test_gate_with_custom_secret() {
        let gate = ApiKeyGate::new("s3cret");
        assert!(gate.authorizes(Some("s3cret")));
        assert!(!gate.authorizes(Some("1234")));
    }
}
