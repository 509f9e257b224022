//! Configuration management for LTIStack.
//!
//! All configuration is driven by environment variables.

use tracing::warn;

/// Global configuration for launch verification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LtiConfig {
    /// Maximum distance, in seconds, between `oauth_timestamp` and now.
    /// Zero disables the timestamp check.
    pub timestamp_window_secs: u64,
    /// Whether `oauth_version` must be present on every launch.
    pub require_oauth_version: bool,
    /// Whether to reject replayed nonces with an in-memory nonce store.
    pub nonce_check: bool,
    /// Scheme used to rebuild the request URL when the request URI is relative.
    pub default_scheme: String,
    /// Log level.
    pub log_level: String,
}

impl Default for LtiConfig {
    fn default() -> Self {
        Self {
            timestamp_window_secs: 300,
            require_oauth_version: true,
            nonce_check: false,
            default_scheme: "https".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl LtiConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Values that fail to parse keep their default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("LTI_TIMESTAMP_WINDOW_SECS") {
            match v.trim().parse() {
                Ok(secs) => config.timestamp_window_secs = secs,
                Err(_) => warn!(value = %v, "ignoring invalid LTI_TIMESTAMP_WINDOW_SECS"),
            }
        }
        if let Some(v) = lookup("LTI_REQUIRE_OAUTH_VERSION") {
            config.require_oauth_version = parse_flag(&v);
        }
        if let Some(v) = lookup("LTI_NONCE_CHECK") {
            config.nonce_check = parse_flag(&v);
        }
        if let Some(v) = lookup("LTI_DEFAULT_SCHEME") {
            if v.eq_ignore_ascii_case("http") || v.eq_ignore_ascii_case("https") {
                config.default_scheme = v.to_ascii_lowercase();
            } else {
                warn!(value = %v, "ignoring invalid LTI_DEFAULT_SCHEME");
            }
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
