//! The outcome of a launch verification.

use ltistack_core::LtiErrorKind;

use crate::launch::LtiLaunch;

/// Result of verifying one launch: either the launch or the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// The signature checked out.
    Verified(LtiLaunch),
    /// The launch must be rejected.
    Failed {
        /// Failure category.
        kind: LtiErrorKind,
        /// Human-readable diagnostic.
        message: String,
    },
}

impl VerificationResult {
    /// Build a failed result.
    pub fn failed(kind: LtiErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    /// Whether the launch was verified.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    /// The verified launch, if any.
    #[must_use]
    pub fn launch(&self) -> Option<&LtiLaunch> {
        match self {
            Self::Verified(launch) => Some(launch),
            Self::Failed { .. } => None,
        }
    }

    /// Consume the result, returning the verified launch, if any.
    #[must_use]
    pub fn into_launch(self) -> Option<LtiLaunch> {
        match self {
            Self::Verified(launch) => Some(launch),
            Self::Failed { .. } => None,
        }
    }

    /// The failure category, if verification failed.
    #[must_use]
    pub fn error_kind(&self) -> Option<LtiErrorKind> {
        match self {
            Self::Verified(_) => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }

    /// The failure message, if verification failed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Verified(_) => None,
            Self::Failed { message, .. } => Some(message),
        }
    }
}
