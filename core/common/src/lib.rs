//! Common utilities and types shared across OAuthKit crates.
//!
//! This module provides the error type, consumer credentials and the
//! provider naming rules used by every other crate in the workspace.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Credentials, ProtocolVersion, ProviderName, Secret};
