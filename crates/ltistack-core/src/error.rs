//! Error types for LTI launch verification.

use std::fmt;

/// Category of a failed launch verification.
///
/// The OAuth verifier only ever reports [`LtiErrorKind::BadRequest`]: a missing
/// consumer key, a malformed message and a signature mismatch all land here.
/// Enclosing systems may report the other kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum LtiErrorKind {
    /// The launch could not be verified from its own contents.
    BadRequest,
    /// The consumer key in the launch is not known to the credential store.
    UnknownConsumer,
}

impl LtiErrorKind {
    /// Stable identifier for the error kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::UnknownConsumer => "UNKNOWN_CONSUMER",
        }
    }
}

impl fmt::Display for LtiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Faults raised before a launch can be checked at all.
///
/// Ordinary validation failures are not errors; they are reported as a failed
/// verification result. This type covers transport-level malformity only.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// No absolute request URL could be derived from the request.
    #[error("unable to build request URL: {0}")]
    InvalidUrl(String),
}

/// Convenience result type for verification entry points.
pub type VerifyResult<T> = Result<T, VerificationError>;
