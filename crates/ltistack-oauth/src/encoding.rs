//! Percent-encoding and form decoding for OAuth 1.0a.
//!
//! OAuth encodes every character outside the RFC 3986 unreserved set
//! (`ALPHA`, `DIGIT`, `-`, `.`, `_`, `~`) as `%XX` with uppercase hex digits.
//! Unlike `application/x-www-form-urlencoded`, a space becomes `%20`, never `+`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters that must be percent-encoded in OAuth parameter names and values.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string per RFC 5849 section 3.6.
///
/// # Examples
///
/// ```
/// use ltistack_oauth::encoding::percent_encode;
///
/// assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
/// assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Decode an `application/x-www-form-urlencoded` string into ordered pairs.
///
/// Order and duplicates are preserved. A name without `=` decodes to an empty
/// value. Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn decode_form(input: &str) -> Vec<(String, String)> {
    decode_form_bytes(input.as_bytes())
}

/// Decode a raw form body into ordered pairs.
#[must_use]
pub fn decode_form_bytes(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Percent-decode a single component without treating `+` as a space.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    percent_encoding::percent_decode_str(input)
        .decode_utf8_lossy()
        .into_owned()
}
