//! OAuth 1.0a message validation.
//!
//! [`OAuthValidator::validate`] checks a message in this order:
//!
//! 1. Required protocol parameters are present
//! 2. `oauth_version`, when present, is `1.0`
//! 3. `oauth_timestamp` lies within the accepted window around now
//! 4. The signature method is supported
//! 5. The recomputed signature matches `oauth_signature` (constant-time)
//! 6. The nonce has not been used before, when a [`NonceStore`] is attached
//!
//! The nonce is recorded only after the signature checks out, so forged
//! requests cannot burn nonces of legitimate ones.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::base_string::{OAUTH_SIGNATURE, build_signature_base_string};
use crate::error::OAuthError;
use crate::message::{
    OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_SIGNATURE_METHOD, OAUTH_TIMESTAMP, OAUTH_VERSION,
    OAuthMessage,
};
use crate::nonce::NonceStore;
use crate::signature::{SignatureMethod, compute_signature};

/// Default accepted distance between `oauth_timestamp` and now, in seconds.
pub const DEFAULT_TIMESTAMP_WINDOW_SECS: u64 = 300;

/// The only protocol version accepted.
const SUPPORTED_VERSION: &str = "1.0";

/// Validates signed OAuth 1.0a messages.
#[derive(Clone)]
pub struct OAuthValidator {
    timestamp_window_secs: u64,
    require_version: bool,
    nonce_store: Option<Arc<dyn NonceStore>>,
}

impl fmt::Debug for OAuthValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthValidator")
            .field("timestamp_window_secs", &self.timestamp_window_secs)
            .field("require_version", &self.require_version)
            .field("nonce_store", &self.nonce_store.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for OAuthValidator {
    fn default() -> Self {
        Self {
            timestamp_window_secs: DEFAULT_TIMESTAMP_WINDOW_SECS,
            require_version: true,
            nonce_store: None,
        }
    }
}

impl OAuthValidator {
    /// Create a validator with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted timestamp window. Zero disables the timestamp check.
    #[must_use]
    pub fn with_timestamp_window(mut self, secs: u64) -> Self {
        self.timestamp_window_secs = secs;
        self
    }

    /// Set whether `oauth_version` must be present.
    #[must_use]
    pub fn with_require_version(mut self, require: bool) -> Self {
        self.require_version = require;
        self
    }

    /// Attach a nonce store for replay protection.
    #[must_use]
    pub fn with_nonce_store(mut self, store: Arc<dyn NonceStore>) -> Self {
        self.nonce_store = Some(store);
        self
    }

    /// The parameters a message must carry before its signature is checked.
    #[must_use]
    pub fn required_parameters(&self) -> Vec<&'static str> {
        let mut required = vec![
            OAUTH_CONSUMER_KEY,
            OAUTH_SIGNATURE_METHOD,
            OAUTH_SIGNATURE,
            OAUTH_TIMESTAMP,
            OAUTH_NONCE,
        ];
        if self.require_version {
            required.push(OAUTH_VERSION);
        }
        required
    }

    /// Validate a message against the consumer and token secrets.
    ///
    /// # Errors
    ///
    /// Returns an [`OAuthError`] describing the first check that failed.
    pub fn validate(
        &self,
        message: &OAuthMessage,
        consumer_secret: &str,
        token_secret: &str,
    ) -> Result<(), OAuthError> {
        self.validate_at(
            message,
            consumer_secret,
            token_secret,
            Utc::now().timestamp(),
        )
    }

    /// Validate a message as of the given Unix time.
    ///
    /// # Errors
    ///
    /// Returns an [`OAuthError`] describing the first check that failed.
    pub fn validate_at(
        &self,
        message: &OAuthMessage,
        consumer_secret: &str,
        token_secret: &str,
        now: i64,
    ) -> Result<(), OAuthError> {
        message.require_parameters(&self.required_parameters())?;

        let consumer_key = message.consumer_key()?;
        debug!(
            consumer_key = %consumer_key,
            method = %message.method(),
            url = %message.url(),
            "Validating OAuth message"
        );

        if let Some(version) = message.parameter(OAUTH_VERSION) {
            if version != SUPPORTED_VERSION {
                return Err(OAuthError::VersionRejected(version.to_owned()));
            }
        }

        let timestamp = parse_timestamp(required(message, OAUTH_TIMESTAMP)?)?;
        self.check_timestamp(timestamp, now)?;

        let method: SignatureMethod = required(message, OAUTH_SIGNATURE_METHOD)?.parse()?;
        let provided_signature = required(message, OAUTH_SIGNATURE)?;

        let base_string =
            build_signature_base_string(message.method(), message.url(), message.parameters())?;
        debug!(base_string = %base_string, "Built OAuth signature base string");

        let expected_signature =
            compute_signature(method, &base_string, consumer_secret, token_secret);

        if !bool::from(
            provided_signature
                .as_bytes()
                .ct_eq(expected_signature.as_bytes()),
        ) {
            // PLAINTEXT signatures are the signing key, so neither side is logged.
            debug!(
                consumer_key = %consumer_key,
                signature_method = %method,
                "OAuth signature mismatch"
            );
            return Err(OAuthError::SignatureInvalid);
        }

        if let Some(store) = &self.nonce_store {
            let nonce = required(message, OAUTH_NONCE)?;
            if !store.check_and_record(consumer_key, timestamp, nonce, now) {
                debug!(consumer_key = %consumer_key, nonce = %nonce, "OAuth nonce replayed");
                return Err(OAuthError::NonceUsed(nonce.to_owned()));
            }
        }

        debug!(consumer_key = %consumer_key, "OAuth verification succeeded");
        Ok(())
    }

    fn check_timestamp(&self, timestamp: i64, now: i64) -> Result<(), OAuthError> {
        if self.timestamp_window_secs == 0 {
            return Ok(());
        }

        if timestamp.abs_diff(now) > self.timestamp_window_secs {
            return Err(OAuthError::TimestampRefused {
                timestamp,
                now,
                window_secs: self.timestamp_window_secs,
            });
        }

        Ok(())
    }
}

/// Fetch a parameter already checked by `require_parameters`.
fn required<'a>(message: &'a OAuthMessage, name: &str) -> Result<&'a str, OAuthError> {
    message
        .parameter(name)
        .ok_or_else(|| OAuthError::ParameterAbsent(vec![name.to_owned()]))
}

fn parse_timestamp(value: &str) -> Result<i64, OAuthError> {
    value
        .trim()
        .parse()
        .map_err(|_| OAuthError::ParameterRejected {
            name: OAUTH_TIMESTAMP.to_owned(),
            value: value.to_owned(),
        })
}
