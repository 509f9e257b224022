//! Signature base string construction for OAuth 1.0a.
//!
//! This module implements the base string format from RFC 5849 section 3.4.1:
//!
//! ```text
//! UPPER(HTTPMethod) & enc(BaseStringURI) & enc(NormalizedParameters)
//! ```
//!
//! Each component is normalized so that the signer and the verifier derive the
//! same bytes from the same request.

use crate::encoding::{decode_form, percent_encode};
use crate::error::OAuthError;

/// The parameter that carries the signature and is never part of the base string.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";

/// Build the full signature base string.
///
/// Query parameters embedded in `url` are merged into `parameters` before
/// normalization, so callers may pass either a bare URL plus every parameter,
/// or a URL with its query string plus the remaining parameters.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidUrl`] if `url` is not an absolute HTTP(S) URL.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::base_string::build_signature_base_string;
///
/// let base = build_signature_base_string(
///     "get",
///     "HTTP://Example.com:80/photos?size=original",
///     &[("file".to_owned(), "vacation.jpg".to_owned())],
/// )
/// .unwrap();
/// assert_eq!(
///     base,
///     "GET&http%3A%2F%2Fexample.com%2Fphotos&file%3Dvacation.jpg%26size%3Doriginal"
/// );
/// ```
pub fn build_signature_base_string(
    method: &str,
    url: &str,
    parameters: &[(String, String)],
) -> Result<String, OAuthError> {
    let base_uri = build_base_string_uri(url)?;

    let normalized = match url.split_once('?') {
        Some((_, query)) => {
            let query = query.split_once('#').map_or(query, |(q, _)| q);
            let mut merged = parameters.to_vec();
            merged.extend(decode_form(query));
            normalize_parameters(&merged)
        }
        None => normalize_parameters(parameters),
    };

    Ok(format!(
        "{}&{}&{}",
        percent_encode(&method.to_ascii_uppercase()),
        percent_encode(&base_uri),
        percent_encode(&normalized)
    ))
}

/// Build the base string URI: scheme and host lowercased, default port
/// removed, query and fragment dropped.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidUrl`] if the URL cannot be parsed or lacks a
/// scheme or host.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::base_string::build_base_string_uri;
///
/// assert_eq!(
///     build_base_string_uri("HTTPS://Tool.Example:443/launch?x=1#top").unwrap(),
///     "https://tool.example/launch"
/// );
/// assert_eq!(
///     build_base_string_uri("http://tool.example:8080").unwrap(),
///     "http://tool.example:8080/"
/// );
/// ```
pub fn build_base_string_uri(url: &str) -> Result<String, OAuthError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e| OAuthError::InvalidUrl(format!("{url}: {e}")))?;

    let scheme = uri
        .scheme_str()
        .ok_or_else(|| OAuthError::InvalidUrl(format!("{url}: missing scheme")))?
        .to_ascii_lowercase();
    let host = uri
        .host()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| OAuthError::InvalidUrl(format!("{url}: missing host")))?
        .to_ascii_lowercase();

    let port = match (scheme.as_str(), uri.port_u16()) {
        ("http", Some(80)) | ("https", Some(443)) | (_, None) => String::new(),
        (_, Some(port)) => format!(":{port}"),
    };

    let path = match uri.path() {
        "" => "/",
        p => p,
    };

    Ok(format!("{scheme}://{host}{port}{path}"))
}

/// Normalize request parameters into the `name=value&...` form that is signed.
///
/// `oauth_signature` is excluded. Names and values are percent-encoded, then
/// pairs are sorted by name and, for equal names, by value.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::base_string::normalize_parameters;
///
/// let params = vec![
///     ("b".to_owned(), "2".to_owned()),
///     ("a".to_owned(), "x y".to_owned()),
///     ("oauth_signature".to_owned(), "ignored".to_owned()),
/// ];
/// assert_eq!(normalize_parameters(&params), "a=x%20y&b=2");
/// ```
#[must_use]
pub fn normalize_parameters(parameters: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = parameters
        .iter()
        .filter(|(name, _)| name != OAUTH_SIGNATURE)
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();

    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
