//! Core configuration and error types for LTIStack.
//!
//! This crate provides the building blocks shared by the LTIStack crates:
//! the environment-driven [`LtiConfig`], the coarse [`LtiErrorKind`] carried
//! by failed verifications, and [`VerificationError`] for faults that happen
//! before a launch can be verified at all.

mod config;
mod error;

pub use config::LtiConfig;
pub use error::{LtiErrorKind, VerificationError, VerifyResult};
