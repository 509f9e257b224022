//! End-to-end tests for LTIStack launch verification.
//!
//! Each test plays the tool consumer: it signs a launch the way an LMS does and
//! feeds it to the verifier as a live HTTP request or as bare parameters.
//!
//! ```text
//! cargo test -p ltistack-integration
//! ```

use std::sync::Once;

use ltistack_core::LtiConfig;
use ltistack_oauth::encoding::percent_encode;
use ltistack_oauth::sign;

/// Consumer key used by the fixtures.
pub const CONSUMER_KEY: &str = "abc";
/// Shared secret used by the fixtures.
pub const CONSUMER_SECRET: &str = "shh";
/// Launch URL used by the fixtures.
pub const LAUNCH_URL: &str = "https://tool.example/launch";

static INIT: Once = Once::new();

/// Initialize tracing (once), honouring `RUST_LOG` and then `LOG_LEVEL`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let config = LtiConfig::from_env();
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
            )
            .with_test_writer()
            .init();
    });
}

/// A typical basic launch from a learner, without any OAuth parameters.
#[must_use]
pub fn basic_launch() -> Vec<(String, String)> {
    pairs(&[
        ("lti_message_type", "basic-lti-launch-request"),
        ("lti_version", "LTI-1p0"),
        ("resource_link_id", "link-1"),
        ("context_id", "course-7"),
        ("user_id", "42"),
        ("roles", "Learner"),
        ("lis_person_name_full", "Ada Lovelace"),
        ("custom_chapter", "3"),
    ])
}

/// Add the OAuth protocol parameters for `signature_method` at `timestamp`.
#[must_use]
pub fn with_oauth(
    mut params: Vec<(String, String)>,
    signature_method: &str,
    timestamp: i64,
    nonce: &str,
) -> Vec<(String, String)> {
    params.extend(pairs(&[
        ("oauth_consumer_key", CONSUMER_KEY),
        ("oauth_signature_method", signature_method),
        ("oauth_nonce", nonce),
        ("oauth_version", "1.0"),
        ("oauth_callback", "about:blank"),
    ]));
    params.push(("oauth_timestamp".to_owned(), timestamp.to_string()));
    params
}

/// Sign `params` in place and return them.
///
/// # Panics
///
/// Panics if the parameters carry no usable signature method or the URL is invalid.
#[must_use]
pub fn signed(
    mut params: Vec<(String, String)>,
    method: &str,
    url: &str,
    secret: &str,
) -> Vec<(String, String)> {
    let signature = sign(method, url, &params, secret, "").expect("fixture should sign");
    params.push(("oauth_signature".to_owned(), signature));
    params
}

/// A freshly signed HMAC-SHA1 basic launch for [`LAUNCH_URL`].
#[must_use]
pub fn signed_launch(nonce: &str) -> Vec<(String, String)> {
    let params = with_oauth(
        basic_launch(),
        "HMAC-SHA1",
        chrono::Utc::now().timestamp(),
        nonce,
    );
    signed(params, "POST", LAUNCH_URL, CONSUMER_SECRET)
}

/// Encode parameters as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(params: &[(String, String)]) -> Vec<u8> {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
        .into_bytes()
}

/// Render an `Authorization: OAuth ...` header value.
#[must_use]
pub fn authorization_header(params: &[(String, String)]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect();
    format!("OAuth realm=\"tool\", {}", rendered.join(", "))
}

/// Build a form-encoded POST to `path` on `tool.example`.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn form_request(path: &str, params: &[(String, String)]) -> http::Request<Vec<u8>> {
    http::Request::builder()
        .method("POST")
        .uri(path)
        .header("host", "tool.example")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(params))
        .expect("fixture request should build")
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

mod test_parameters;
mod test_request;
