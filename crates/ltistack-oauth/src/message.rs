//! The signed message model.
//!
//! An [`OAuthMessage`] is the triple a verifier needs: HTTP method, request URL
//! and every parameter that took part in the signature, in arrival order.
//! Parameters may come from the query string, a form body, or an
//! `Authorization: OAuth ...` header:
//!
//! ```text
//! Authorization: OAuth realm="Example",
//!   oauth_consumer_key="9djdj82h48djs9d2",
//!   oauth_signature_method="HMAC-SHA1",
//!   oauth_signature="djosJKDKJSD8743243%2Fjdk33klY%3D"
//! ```

use crate::encoding::percent_decode;
use crate::error::OAuthError;

/// `oauth_consumer_key`
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_signature_method`
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp`
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_nonce`
pub const OAUTH_NONCE: &str = "oauth_nonce";
/// `oauth_version`
pub const OAUTH_VERSION: &str = "oauth_version";
/// `oauth_token`
pub const OAUTH_TOKEN: &str = "oauth_token";

/// An HTTP request reduced to what OAuth signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthMessage {
    method: String,
    url: String,
    parameters: Vec<(String, String)>,
}

impl OAuthMessage {
    /// Create a message from its method, URL and parameters.
    pub fn new<K, V>(
        method: impl Into<String>,
        url: impl Into<String>,
        parameters: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: method.into(),
            url: url.into(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append the protocol parameters carried by an `Authorization` header.
    ///
    /// Headers using another scheme are ignored.
    #[must_use]
    pub fn with_authorization_header(mut self, header: &str) -> Self {
        if let Some(params) = parse_authorization_header(header) {
            self.parameters.extend(params);
        }
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All parameters, in arrival order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// The first value of the named parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The first `oauth_consumer_key` value.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ParameterAbsent`] if the message carries no consumer key.
    pub fn consumer_key(&self) -> Result<&str, OAuthError> {
        self.parameter(OAUTH_CONSUMER_KEY)
            .ok_or_else(|| OAuthError::ParameterAbsent(vec![OAUTH_CONSUMER_KEY.to_owned()]))
    }

    /// Check that every named parameter is present.
    ///
    /// Empty values count as present.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ParameterAbsent`] listing every missing name.
    pub fn require_parameters(&self, names: &[&str]) -> Result<(), OAuthError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.parameter(name).is_none())
            .map(|name| (*name).to_owned())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OAuthError::ParameterAbsent(missing))
        }
    }
}

/// Parse an `Authorization: OAuth ...` header into its parameters.
///
/// Returns `None` if the header does not use the `OAuth` scheme. `realm` is
/// dropped since it is not signed. Values are unquoted and percent-decoded.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::message::parse_authorization_header;
///
/// let params = parse_authorization_header(
///     r#"OAuth realm="Example", oauth_consumer_key="abc", oauth_nonce="n%201""#,
/// )
/// .unwrap();
/// assert_eq!(
///     params,
///     vec![
///         ("oauth_consumer_key".to_owned(), "abc".to_owned()),
///         ("oauth_nonce".to_owned(), "n 1".to_owned()),
///     ]
/// );
/// assert!(parse_authorization_header("Bearer token").is_none());
/// ```
#[must_use]
pub fn parse_authorization_header(header: &str) -> Option<Vec<(String, String)>> {
    let header = header.trim_start();
    let (scheme, rest) = header.split_once(' ').unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case("OAuth") {
        return None;
    }

    let params = rest
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            let name = percent_decode(name.trim());
            if name.eq_ignore_ascii_case("realm") {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name, percent_decode(value)))
        })
        .collect();

    Some(params)
}
