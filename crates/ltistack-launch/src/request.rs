//! Launch requests.
//!
//! A [`LaunchRequest`] is what the verifier needs from a transport: the HTTP
//! method, the absolute request URL and the request parameters. From a live
//! HTTP request it gathers:
//!
//! - query string parameters
//! - form body parameters (`application/x-www-form-urlencoded` only)
//! - protocol parameters from an `Authorization: OAuth ...` header
//!
//! Query and form parameters are the launch parameters. Header parameters take
//! part in the signature only.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use ltistack_core::{VerificationError, VerifyResult};
use ltistack_oauth::encoding::{decode_form, decode_form_bytes};
use ltistack_oauth::message::parse_authorization_header;
use tracing::debug;

use crate::params::collect_parameters;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An inbound launch reduced to method, URL and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    method: String,
    url: String,
    parameters: Vec<(String, String)>,
    header_parameters: Vec<(String, String)>,
}

impl LaunchRequest {
    /// Create a launch request from explicit parts.
    pub fn new<I, K, V>(method: impl Into<String>, url: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: method.into(),
            url: url.into(),
            parameters: collect_parameters(parameters),
            header_parameters: Vec::new(),
        }
    }

    /// Build a launch request from a live HTTP request.
    ///
    /// The URL comes from the request URI when it is absolute, otherwise from
    /// the `Host` header and `default_scheme`. The query string is not part of
    /// the URL; its parameters join the parameter list instead.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::InvalidUrl`] if no absolute URL can be built.
    pub fn from_http<B: AsRef<[u8]>>(
        request: &http::Request<B>,
        default_scheme: &str,
    ) -> VerifyResult<Self> {
        let url = request_url(request.uri(), request.headers(), default_scheme)?;

        let mut parameters = request.uri().query().map(decode_form).unwrap_or_default();
        if is_form(request.headers()) {
            parameters.extend(decode_form_bytes(request.body().as_ref()));
        }

        let header_parameters = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization_header)
            .unwrap_or_default();

        debug!(
            method = %request.method(),
            url = %url,
            parameters = parameters.len(),
            header_parameters = header_parameters.len(),
            "Extracted launch request"
        );

        Ok(Self {
            method: request.method().as_str().to_owned(),
            url,
            parameters,
            header_parameters,
        })
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The absolute request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query and form parameters, in arrival order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Protocol parameters carried by the `Authorization` header.
    #[must_use]
    pub fn header_parameters(&self) -> &[(String, String)] {
        &self.header_parameters
    }

    /// Every parameter that took part in the signature.
    #[must_use]
    pub fn signed_parameters(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .chain(&self.header_parameters)
            .cloned()
            .collect()
    }
}

fn is_form(headers: &http::HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Derive the absolute request URL without its query string.
fn request_url(
    uri: &http::Uri,
    headers: &http::HeaderMap,
    default_scheme: &str,
) -> VerifyResult<String> {
    let path = match uri.path() {
        "" => "/",
        p => p,
    };

    let url = if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        format!("{scheme}://{authority}{path}")
    } else {
        let host = headers
            .get(HOST)
            .ok_or_else(|| {
                VerificationError::InvalidUrl("relative request URI and no Host header".to_owned())
            })?
            .to_str()
            .map_err(|_| VerificationError::InvalidUrl("Host header is not ASCII".to_owned()))?;
        if host.is_empty() {
            return Err(VerificationError::InvalidUrl("empty Host header".to_owned()));
        }
        format!("{default_scheme}://{host}{path}")
    };

    url.parse::<http::Uri>()
        .map_err(|e| VerificationError::InvalidUrl(format!("{url}: {e}")))?;

    Ok(url)
}
