//! LTI 1.x launch verification.
//!
//! Tool providers receive launches as signed form posts. This crate checks the
//! OAuth 1.0a signature on such a launch and hands back its parameters:
//!
//! ```
//! use ltistack_launch::{LtiOauthVerifier, VerificationResult};
//!
//! let verifier = LtiOauthVerifier::default();
//! let result = verifier
//!     .verify_parameters(
//!         [("oauth_consumer_key", "abc"), ("oauth_signature", "bogus")],
//!         "https://tool.example/launch",
//!         "POST",
//!         "shh",
//!     )
//!     .unwrap();
//! assert!(matches!(result, VerificationResult::Failed { .. }));
//! ```

pub mod launch;
pub mod params;
pub mod request;
pub mod result;
pub mod verifier;

pub use launch::LtiLaunch;
pub use ltistack_core::{LtiErrorKind, VerificationError, VerifyResult};
pub use request::LaunchRequest;
pub use result::VerificationResult;
pub use verifier::{LtiOauthVerifier, LtiVerifier, SignatureVerifier, SignedParts, ValidationError};
