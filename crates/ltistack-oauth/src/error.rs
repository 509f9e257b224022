//! Error types for OAuth 1.0a verification.
//!
//! All verification failures are represented by [`OAuthError`]. Each variant maps
//! to a problem code from the OAuth Problem Reporting extension, available via
//! [`OAuthError::problem`].

/// Errors that can occur while signing or verifying an OAuth 1.0a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OAuthError {
    /// One or more required protocol parameters are missing.
    #[error("parameter_absent: {}", .0.join(", "))]
    ParameterAbsent(Vec<String>),

    /// A protocol parameter is present but malformed.
    #[error("parameter_rejected: {name}={value}")]
    ParameterRejected {
        /// Parameter name.
        name: String,
        /// The offending value.
        value: String,
    },

    /// `oauth_version` is present and is not `1.0`.
    #[error("version_rejected: {0}")]
    VersionRejected(String),

    /// `oauth_timestamp` lies outside the accepted window around now.
    #[error("timestamp_refused: {timestamp} is more than {window_secs}s away from {now}")]
    TimestampRefused {
        /// The timestamp carried by the message.
        timestamp: i64,
        /// The server time the timestamp was compared with.
        now: i64,
        /// The accepted distance in seconds.
        window_secs: u64,
    },

    /// The `(consumer key, timestamp, nonce)` triple has been seen before.
    #[error("nonce_used: {0}")]
    NonceUsed(String),

    /// The signature method is unknown or not supported.
    #[error("signature_method_rejected: {0}")]
    SignatureMethodRejected(String),

    /// The computed signature does not match `oauth_signature`.
    #[error("signature_invalid")]
    SignatureInvalid,

    /// The consumer key was not found in the credential store.
    #[error("consumer_key_unknown: {0}")]
    ConsumerKeyUnknown(String),

    /// The request URL cannot be normalized into a base string URI.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl OAuthError {
    /// The OAuth Problem Reporting code for this error.
    #[must_use]
    pub fn problem(&self) -> &'static str {
        match self {
            Self::ParameterAbsent(_) => "parameter_absent",
            Self::ParameterRejected { .. } | Self::InvalidUrl(_) => "parameter_rejected",
            Self::VersionRejected(_) => "version_rejected",
            Self::TimestampRefused { .. } => "timestamp_refused",
            Self::NonceUsed(_) => "nonce_used",
            Self::SignatureMethodRejected(_) => "signature_method_rejected",
            Self::SignatureInvalid => "signature_invalid",
            Self::ConsumerKeyUnknown(_) => "consumer_key_unknown",
        }
    }
}
