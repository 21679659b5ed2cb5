//! Access tokens with expiration tracking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// When a token stops being valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Expiry {
    /// The provider did not say.
    #[default]
    Unknown,
    /// The token never expires.
    Never,
    /// The token expires at the given instant.
    At(DateTime<Utc>),
}

impl Expiry {
    /// Expiry `lifetime` from now, or `None` when that instant is out of
    /// range.
    pub fn after(lifetime: Duration) -> Option<Self> {
        Utc::now().checked_add_signed(lifetime).map(Expiry::At)
    }
}

/// Token obtained from a provider.
///
/// OAuth2 services use `access_token`, `refresh_token` and `expiry`.
/// OAuth1 services additionally track the request token pair and the
/// access token secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Access token for API requests.
    pub access_token: String,
    /// Refresh token for obtaining new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the access token expires.
    #[serde(default)]
    pub expiry: Expiry,
    /// Provider-specific response fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_params: BTreeMap<String, String>,
    /// OAuth1 request token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<String>,
    /// OAuth1 request token secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token_secret: Option<String>,
    /// OAuth1 access token secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
}

impl Token {
    /// Create a token with an unknown lifetime.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Set the expiry.
    pub fn with_expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// Set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Check if the access token is expired.
    ///
    /// Tokens with an unknown or infinite lifetime are never expired.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Expiry::At(at) => at < Utc::now(),
            Expiry::Unknown | Expiry::Never => false,
        }
    }
}
