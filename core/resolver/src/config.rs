//! Factory configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use oauthkit_common::{Error, ProviderName, Result};
use oauthkit_http::HttpConfig;
use oauthkit_service::{DescriptorRef, OAuth1Provider, OAuth2Provider};

/// Provider declared in configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum CustomProvider {
    OAuth1(OAuth1Provider),
    OAuth2(OAuth2Provider),
}

impl CustomProvider {
    /// Name as declared, before normalization.
    pub fn name(&self) -> &str {
        match self {
            CustomProvider::OAuth1(provider) => &provider.name,
            CustomProvider::OAuth2(provider) => &provider.name,
        }
    }

    /// Name the provider is registered and stores its tokens under.
    pub fn provider_name(&self) -> ProviderName {
        ProviderName::new(self.name())
    }

    /// Convert into a registrable descriptor named by
    /// [`provider_name`](Self::provider_name).
    pub fn into_descriptor(self) -> DescriptorRef {
        let name = self.provider_name().into();
        match self {
            CustomProvider::OAuth1(mut provider) => {
                provider.name = name;
                Arc::new(provider)
            }
            CustomProvider::OAuth2(mut provider) => {
                provider.name = name;
                Arc::new(provider)
            }
        }
    }
}

/// Configuration for a [`ServiceFactory`](crate::ServiceFactory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Settings for the default HTTP transport.
    pub http: HttpConfig,
    /// Providers registered on top of the built-in catalog.
    pub providers: Vec<CustomProvider>,
}

impl FactoryConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// - File cannot be read
    /// - File is not valid configuration JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}
