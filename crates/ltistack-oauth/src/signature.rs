//! OAuth 1.0a signature methods.
//!
//! The signing key is the encoded consumer secret and the encoded token secret
//! joined by `&`. LTI launches are two-legged, so the token secret is empty and
//! the key ends with a bare `&`.
//!
//! ```text
//! HMAC-SHA1   = Base64(HMAC-SHA1(key, base_string))
//! HMAC-SHA256 = Base64(HMAC-SHA256(key, base_string))
//! PLAINTEXT   = key
//! ```

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;

use crate::base_string::build_signature_base_string;
use crate::encoding::percent_encode;
use crate::error::OAuthError;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Signature method named by `oauth_signature_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureMethod {
    /// `HMAC-SHA1`, the method used by LTI 1.x.
    HmacSha1,
    /// `HMAC-SHA256`.
    HmacSha256,
    /// `PLAINTEXT`: the signing key itself, only safe over TLS.
    Plaintext,
}

impl SignatureMethod {
    /// The wire name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::HmacSha256 => "HMAC-SHA256",
            Self::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "HMAC-SHA256" => Ok(Self::HmacSha256),
            "PLAINTEXT" => Ok(Self::Plaintext),
            other => Err(OAuthError::SignatureMethodRejected(other.to_owned())),
        }
    }
}

/// Build the signing key from the consumer and token secrets.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::signature::signing_key;
///
/// assert_eq!(signing_key("shh", ""), "shh&");
/// assert_eq!(signing_key("a&b", "t"), "a%26b&t");
/// ```
#[must_use]
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// Compute the signature of a base string.
#[must_use]
pub fn compute_signature(
    method: SignatureMethod,
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let key = signing_key(consumer_secret, token_secret);
    match method {
        SignatureMethod::HmacSha1 => {
            let mut mac =
                HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
            mac.update(base_string.as_bytes());
            BASE64.encode(mac.finalize().into_bytes())
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .expect("HMAC can accept any key length");
            mac.update(base_string.as_bytes());
            BASE64.encode(mac.finalize().into_bytes())
        }
        SignatureMethod::Plaintext => key,
    }
}

/// Sign a request the way a tool consumer does.
///
/// The method is read from the first `oauth_signature_method` parameter. Any
/// `oauth_signature` already present is ignored. Returns the value to send as
/// `oauth_signature`.
///
/// # Errors
///
/// Returns [`OAuthError::ParameterAbsent`] if no signature method is given,
/// [`OAuthError::SignatureMethodRejected`] if it is not supported, or
/// [`OAuthError::InvalidUrl`] if `url` cannot be normalized.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::signature::sign;
///
/// let params = vec![
///     ("oauth_consumer_key".to_owned(), "abc".to_owned()),
///     ("oauth_signature_method".to_owned(), "PLAINTEXT".to_owned()),
/// ];
/// let signature = sign("POST", "https://tool.example/launch", &params, "shh", "").unwrap();
/// assert_eq!(signature, "shh&");
/// ```
pub fn sign(
    http_method: &str,
    url: &str,
    parameters: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, OAuthError> {
    let method: SignatureMethod = parameters
        .iter()
        .find(|(name, _)| name == "oauth_signature_method")
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| OAuthError::ParameterAbsent(vec!["oauth_signature_method".to_owned()]))?
        .parse()?;

    let base_string = build_signature_base_string(http_method, url, parameters)?;
    debug!(method = %method, base_string = %base_string, "Signing OAuth base string");

    Ok(compute_signature(
        method,
        &base_string,
        consumer_secret,
        token_secret,
    ))
}
