//! Shared secrets of registered tool consumers.
//!
//! An LMS registers with a tool under a consumer key and signs every launch
//! with the secret agreed for that key. A tool serving several LMS instances
//! resolves the secret per launch through a [`ConsumerSecretProvider`].

use std::collections::HashMap;
use std::fmt;

use crate::error::OAuthError;

/// Resolves the secret an LMS signs its launches with.
pub trait ConsumerSecretProvider: Send + Sync {
    /// The secret registered for `consumer_key`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ConsumerKeyUnknown`] when no consumer is
    /// registered under `consumer_key`.
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, OAuthError>;
}

/// A fixed set of consumer registrations. Its `Debug` output lists the
/// consumer keys only.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::credentials::{ConsumerSecretProvider, StaticConsumerSecretProvider};
///
/// let provider = StaticConsumerSecretProvider::new(vec![
///     ("abc".to_owned(), "shh".to_owned()),
/// ]);
///
/// assert_eq!(provider.consumer_secret("abc").unwrap(), "shh");
/// assert!(provider.consumer_secret("xyz").is_err());
/// ```
#[derive(Clone, Default)]
pub struct StaticConsumerSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticConsumerSecretProvider {
    /// Register each `(consumer_key, secret)` pair. A repeated key keeps the last secret.
    pub fn new(secrets: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
        }
    }
}

impl fmt::Debug for StaticConsumerSecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("StaticConsumerSecretProvider")
            .field("consumer_keys", &keys)
            .finish_non_exhaustive()
    }
}

impl ConsumerSecretProvider for StaticConsumerSecretProvider {
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, OAuthError> {
        self.secrets
            .get(consumer_key)
            .cloned()
            .ok_or_else(|| OAuthError::ConsumerKeyUnknown(consumer_key.to_owned()))
    }
}
