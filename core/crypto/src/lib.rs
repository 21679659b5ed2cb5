//! Cryptographic primitives for OAuthKit.
//!
//! This module provides:
//! - RFC 3986 percent-encoding as required by OAuth 1.0a
//! - Signature base string construction
//! - HMAC-SHA1, HMAC-SHA256 and PLAINTEXT request signatures
//! - Nonce generation for signed requests
//!
//! # Security Guarantees
//! - Signing keys are zeroized after use
//! - No secret material is ever logged
//! - Signature verification compares in constant time

pub mod encoding;
pub mod signature;

pub use encoding::{encode, generate_nonce};
pub use signature::{Signature, SignatureMethod};
