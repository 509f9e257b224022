//! LTI launch verification.
//!
//! [`LtiOauthVerifier`] adapts launches into a [`SignatureVerifier`] and turns
//! its outcome into a [`VerificationResult`]. Two entry points share one
//! verification routine:
//!
//! - [`LtiOauthVerifier::verify_request`] for a live HTTP request
//! - [`LtiOauthVerifier::verify_parameters`] for a bare parameter collection
//!   plus the URL and method it was sent to
//!
//! Every validation failure becomes [`VerificationResult::Failed`] with
//! [`LtiErrorKind::BadRequest`]. Only a request URL that cannot be built
//! surfaces as a [`VerificationError`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ltistack_core::{LtiConfig, LtiErrorKind, VerifyResult};
use ltistack_oauth::message::OAUTH_CONSUMER_KEY;
use ltistack_oauth::nonce::DEFAULT_NONCE_RETENTION_SECS;
use ltistack_oauth::{
    ConsumerSecretProvider, InMemoryNonceStore, OAuthError, OAuthMessage, OAuthValidator,
};
use tracing::{debug, warn};

use crate::launch::LtiLaunch;
use crate::params::{collect_parameters, find_parameter, render_parameters};
use crate::request::LaunchRequest;
use crate::result::VerificationResult;

/// Everything a signature check needs.
#[derive(Debug, Clone, Copy)]
pub struct SignedParts<'a> {
    /// Consumer key found in the parameters.
    pub consumer_key: &'a str,
    /// Shared secret for `consumer_key`.
    pub consumer_secret: &'a str,
    /// HTTP method.
    pub method: &'a str,
    /// Request URL.
    pub url: &'a str,
    /// Every signed parameter, including `oauth_signature`.
    pub parameters: &'a [(String, String)],
}

/// A signature validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    problem: Option<&'static str>,
}

impl ValidationError {
    /// Create an error with a free-form message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            problem: None,
        }
    }

    /// The OAuth problem code, when the validator reported one.
    #[must_use]
    pub fn problem(&self) -> Option<&'static str> {
        self.problem
    }
}

impl From<OAuthError> for ValidationError {
    fn from(err: OAuthError) -> Self {
        Self {
            message: err.to_string(),
            problem: Some(err.problem()),
        }
    }
}

/// Checks an OAuth 1.0a signature. Token secrets are always empty.
pub trait SignatureVerifier: Send + Sync {
    /// Recompute the signature over `parts` and compare it with `oauth_signature`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the signature or any protocol parameter
    /// does not check out.
    fn verify(&self, parts: &SignedParts<'_>) -> Result<(), ValidationError>;
}

impl SignatureVerifier for OAuthValidator {
    fn verify(&self, parts: &SignedParts<'_>) -> Result<(), ValidationError> {
        let message = OAuthMessage::new(parts.method, parts.url, parts.parameters.iter().cloned());
        self.validate(&message, parts.consumer_secret, "")
            .map_err(ValidationError::from)
    }
}

/// Verifies LTI launches.
pub trait LtiVerifier {
    /// Verify a live HTTP request signed with `secret`.
    fn verify_request<B: AsRef<[u8]>>(
        &self,
        request: &http::Request<B>,
        secret: &str,
    ) -> VerifyResult<VerificationResult>;

    /// Verify a parameter collection sent with `method` to `url`, signed with `secret`.
    fn verify_parameters<I, K, V>(
        &self,
        parameters: I,
        url: &str,
        method: &str,
        secret: &str,
    ) -> VerifyResult<VerificationResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
}

/// Where the shared secret comes from.
#[derive(Clone, Copy)]
enum SecretSource<'a> {
    Fixed(&'a str),
    Provider(&'a dyn ConsumerSecretProvider),
}

impl<'a> SecretSource<'a> {
    fn resolve(self, consumer_key: &str) -> Result<Cow<'a, str>, VerificationResult> {
        match self {
            Self::Fixed(secret) => Ok(Cow::Borrowed(secret)),
            Self::Provider(provider) => match provider.consumer_secret(consumer_key) {
                Ok(secret) => Ok(Cow::Owned(secret)),
                Err(OAuthError::ConsumerKeyUnknown(key)) => {
                    debug!(consumer_key = %key, "Unknown consumer key");
                    Err(VerificationResult::failed(
                        LtiErrorKind::UnknownConsumer,
                        format!("Unknown consumer key: {key}"),
                    ))
                }
                Err(e) => Err(VerificationResult::failed(
                    LtiErrorKind::BadRequest,
                    format!("Failed to validate: {e}"),
                )),
            },
        }
    }
}

/// Verifies LTI 1.x launches signed with OAuth 1.0a.
///
/// # Examples
///
/// ```
/// use ltistack_launch::LtiOauthVerifier;
///
/// let verifier = LtiOauthVerifier::default();
/// let result = verifier
///     .verify_parameters([("user_id", "42")], "https://tool.example/launch", "POST", "shh")
///     .unwrap();
/// assert!(!result.is_verified());
/// ```
#[derive(Clone)]
pub struct LtiOauthVerifier {
    signature_verifier: Arc<dyn SignatureVerifier>,
    default_scheme: String,
}

impl fmt::Debug for LtiOauthVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LtiOauthVerifier")
            .field("signature_verifier", &"...")
            .field("default_scheme", &self.default_scheme)
            .finish()
    }
}

impl Default for LtiOauthVerifier {
    fn default() -> Self {
        Self::from_config(&LtiConfig::default())
    }
}

impl LtiOauthVerifier {
    /// Create a verifier around any signature verifier.
    #[must_use]
    pub fn new(signature_verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self {
            signature_verifier,
            default_scheme: LtiConfig::default().default_scheme,
        }
    }

    /// Create a verifier backed by [`OAuthValidator`] configured from `config`.
    #[must_use]
    pub fn from_config(config: &LtiConfig) -> Self {
        let mut validator = OAuthValidator::new()
            .with_timestamp_window(config.timestamp_window_secs)
            .with_require_version(config.require_oauth_version);
        if config.nonce_check {
            if config.timestamp_window_secs == 0 {
                warn!(
                    retention_secs = DEFAULT_NONCE_RETENTION_SECS,
                    "Nonce check without a timestamp window only remembers recent nonces"
                );
            }
            validator = validator.with_nonce_store(Arc::new(InMemoryNonceStore::new(
                config.timestamp_window_secs,
            )));
        }

        Self {
            signature_verifier: Arc::new(validator),
            default_scheme: config.default_scheme.clone(),
        }
    }

    /// Set the scheme used when a request URI is relative.
    #[must_use]
    pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.default_scheme = scheme.into();
        self
    }

    /// Verify a live HTTP request signed with `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`ltistack_core::VerificationError::InvalidUrl`] if no absolute
    /// request URL can be derived. Every other failure is a `Failed` result.
    pub fn verify_request<B: AsRef<[u8]>>(
        &self,
        request: &http::Request<B>,
        secret: &str,
    ) -> VerifyResult<VerificationResult> {
        let launch_request = LaunchRequest::from_http(request, &self.default_scheme)?;
        Ok(self.verify_launch_request(&launch_request, secret))
    }

    /// Verify a live HTTP request, looking the secret up by consumer key.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_request`].
    pub fn verify_request_with_provider<B: AsRef<[u8]>>(
        &self,
        request: &http::Request<B>,
        provider: &dyn ConsumerSecretProvider,
    ) -> VerifyResult<VerificationResult> {
        let launch_request = LaunchRequest::from_http(request, &self.default_scheme)?;
        Ok(self.verify_message(&launch_request, SecretSource::Provider(provider)))
    }

    /// Verify an already extracted launch request signed with `secret`.
    #[must_use]
    pub fn verify_launch_request(
        &self,
        request: &LaunchRequest,
        secret: &str,
    ) -> VerificationResult {
        self.verify_message(request, SecretSource::Fixed(secret))
    }

    /// Verify a parameter collection sent with `method` to `url`.
    ///
    /// The first `oauth_consumer_key` entry is used. On success the launch
    /// holds the collection with duplicate names collapsed, last value winning.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` matches [`Self::verify_request`].
    pub fn verify_parameters<I, K, V>(
        &self,
        parameters: I,
        url: &str,
        method: &str,
        secret: &str,
    ) -> VerifyResult<VerificationResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(self.verify_parameter_list(
            collect_parameters(parameters),
            url,
            method,
            SecretSource::Fixed(secret),
        ))
    }

    /// Verify a parameter collection, looking the secret up by consumer key.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_parameters`].
    pub fn verify_parameters_with_provider<I, K, V>(
        &self,
        parameters: I,
        url: &str,
        method: &str,
        provider: &dyn ConsumerSecretProvider,
    ) -> VerifyResult<VerificationResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(self.verify_parameter_list(
            collect_parameters(parameters),
            url,
            method,
            SecretSource::Provider(provider),
        ))
    }

    fn verify_message(
        &self,
        request: &LaunchRequest,
        secrets: SecretSource<'_>,
    ) -> VerificationResult {
        let signed = request.signed_parameters();

        let Some(consumer_key) = find_parameter(&signed, OAUTH_CONSUMER_KEY) else {
            debug!(url = %request.url(), "Launch request carries no consumer key");
            return VerificationResult::failed(
                LtiErrorKind::BadRequest,
                "Unable to find consumer key in message",
            );
        };

        let secret = match secrets.resolve(consumer_key) {
            Ok(secret) => secret,
            Err(result) => return result,
        };

        let checked =
            self.check_signature(consumer_key, &secret, request.method(), request.url(), &signed);
        match checked {
            Ok(()) => VerificationResult::Verified(request.parameters().iter().cloned().collect()),
            Err(e) => VerificationResult::failed(
                LtiErrorKind::BadRequest,
                format!("Failed to validate: {e}"),
            ),
        }
    }

    fn verify_parameter_list(
        &self,
        parameters: Vec<(String, String)>,
        url: &str,
        method: &str,
        secrets: SecretSource<'_>,
    ) -> VerificationResult {
        let Some(consumer_key) = find_parameter(&parameters, OAUTH_CONSUMER_KEY) else {
            debug!(url = %url, "Launch parameters carry no consumer key");
            return VerificationResult::failed(
                LtiErrorKind::BadRequest,
                format!(
                    "No key found in LTI request with parameters: {}",
                    render_parameters(&parameters)
                ),
            );
        };

        let secret = match secrets.resolve(consumer_key) {
            Ok(secret) => secret,
            Err(result) => return result,
        };

        if let Err(e) = self.check_signature(consumer_key, &secret, method, url, &parameters) {
            return VerificationResult::failed(
                LtiErrorKind::BadRequest,
                format!(
                    "Failed to validate: {e}, Parameters: {}",
                    render_parameters(&parameters)
                ),
            );
        }

        VerificationResult::Verified(parameters.into_iter().collect::<LtiLaunch>())
    }

    fn check_signature(
        &self,
        consumer_key: &str,
        consumer_secret: &str,
        method: &str,
        url: &str,
        parameters: &[(String, String)],
    ) -> Result<(), ValidationError> {
        let parts = SignedParts {
            consumer_key,
            consumer_secret,
            method,
            url,
            parameters,
        };

        self.signature_verifier.verify(&parts).inspect_err(|e| {
            debug!(
                consumer_key = %consumer_key,
                problem = e.problem().unwrap_or("unknown"),
                "Launch signature rejected"
            );
        })
    }
}

impl LtiVerifier for LtiOauthVerifier {
    fn verify_request<B: AsRef<[u8]>>(
        &self,
        request: &http::Request<B>,
        secret: &str,
    ) -> VerifyResult<VerificationResult> {
        Self::verify_request(self, request, secret)
    }

    fn verify_parameters<I, K, V>(
        &self,
        parameters: I,
        url: &str,
        method: &str,
        secret: &str,
    ) -> VerifyResult<VerificationResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::verify_parameters(self, parameters, url, method, secret)
    }
}
