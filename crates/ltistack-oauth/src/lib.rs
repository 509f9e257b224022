//! OAuth 1.0a request signing and signature verification for LTIStack.
//!
//! This crate provides the verification side of OAuth 1.0a (RFC 5849) as used by
//! LTI 1.x tool launches: given a signed request and the shared secret for its
//! consumer key, it recomputes the signature and checks the protocol parameters.
//! A consumer-side [`sign`] is provided for tool consumers and tests.
//!
//! # Usage
//!
//! ```rust
//! use ltistack_oauth::{OAuthMessage, OAuthValidator, sign};
//!
//! let now = chrono::Utc::now().timestamp().to_string();
//! let mut params = vec![
//!     ("oauth_consumer_key".to_owned(), "abc".to_owned()),
//!     ("oauth_signature_method".to_owned(), "HMAC-SHA1".to_owned()),
//!     ("oauth_timestamp".to_owned(), now),
//!     ("oauth_nonce".to_owned(), "n-1".to_owned()),
//!     ("oauth_version".to_owned(), "1.0".to_owned()),
//!     ("user_id".to_owned(), "42".to_owned()),
//! ];
//! let signature = sign("POST", "https://tool.example/launch", &params, "shh", "").unwrap();
//! params.push(("oauth_signature".to_owned(), signature));
//!
//! let message = OAuthMessage::new("POST", "https://tool.example/launch", params);
//! assert!(OAuthValidator::new().validate(&message, "shh", "").is_ok());
//! ```
//!
//! # Modules
//!
//! - [`base_string`] - Signature base string construction
//! - [`credentials`] - Consumer secret provider trait and in-memory implementation
//! - [`encoding`] - OAuth percent-encoding and form decoding
//! - [`error`] - Verification error types
//! - [`message`] - Signed message model and `Authorization` header parsing
//! - [`nonce`] - Nonce replay protection
//! - [`signature`] - HMAC-SHA1, HMAC-SHA256 and PLAINTEXT signatures
//! - [`validator`] - Message validation

pub mod base_string;
pub mod credentials;
pub mod encoding;
pub mod error;
pub mod message;
pub mod nonce;
pub mod signature;
pub mod validator;

pub use credentials::{ConsumerSecretProvider, StaticConsumerSecretProvider};
pub use error::OAuthError;
pub use message::OAuthMessage;
pub use nonce::{InMemoryNonceStore, NonceStore};
pub use signature::{SignatureMethod, sign};
pub use validator::OAuthValidator;
