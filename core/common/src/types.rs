//! Common types used throughout OAuthKit.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// OAuth protocol version a service implementation speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    OAuth1,
    OAuth2,
}

impl ProtocolVersion {
    /// Versions in resolution order: OAuth2 wins over OAuth1.
    pub const PREFERENCE: [ProtocolVersion; 2] = [ProtocolVersion::OAuth2, ProtocolVersion::OAuth1];

    /// Namespace used to build conventional implementation identifiers.
    pub fn namespace(&self) -> &'static str {
        match self {
            ProtocolVersion::OAuth1 => "oauth1",
            ProtocolVersion::OAuth2 => "oauth2",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::OAuth1 => write!(f, "OAuth1"),
            ProtocolVersion::OAuth2 => write!(f, "OAuth2"),
        }
    }
}

/// Normalized provider name.
///
/// Only the first character is uppercased, so `"github"` and `"Github"`
/// name the same provider while `"GitHub"` stays distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProviderName(String);

impl ProviderName {
    /// Create a normalized provider name.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => {
                let mut normalized = String::with_capacity(name.len());
                normalized.push(first.to_ascii_uppercase());
                normalized.push_str(chars.as_str());
                Self(normalized)
            }
            None => Self(String::new()),
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProviderName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for ProviderName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<ProviderName> for String {
    fn from(name: ProviderName) -> Self {
        name.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secret string that zeroizes on drop and never prints its value.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Access the secret value.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

/// Consumer credentials issued by a provider.
///
/// Owned by the caller and shared read-only with every service built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    consumer_id: String,
    consumer_secret: Secret,
    callback_url: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(
        consumer_id: impl Into<String>,
        consumer_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            consumer_id: consumer_id.into(),
            consumer_secret: Secret::new(consumer_secret),
            callback_url: callback_url.into(),
        }
    }

    /// Client identifier (OAuth2) or consumer key (OAuth1).
    pub fn consumer_id(&self) -> &str {
        &self.consumer_id
    }

    /// Client secret (OAuth2) or consumer secret (OAuth1).
    pub fn consumer_secret(&self) -> &Secret {
        &self.consumer_secret
    }

    /// Redirect target registered with the provider.
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Replace the consumer secret, e.g. after prompting for it.
    pub fn with_consumer_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Secret::new(secret);
        self
    }
}
