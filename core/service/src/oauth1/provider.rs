//! OAuth1 provider declaration.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{GenericOAuth1Service, OAuth1Service};
use crate::descriptor::{OAuth1Context, OAuth1Descriptor, ServiceDescriptor};
use oauthkit_common::Result;
use oauthkit_crypto::SignatureMethod;

/// Declarative description of an OAuth1 provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth1Provider {
    /// Service name tokens are stored under.
    pub name: String,
    pub request_token_endpoint: Url,
    pub authorization_endpoint: Url,
    pub access_token_endpoint: Url,
    #[serde(default)]
    pub base_api_uri: Option<Url>,
    #[serde(default)]
    pub signature_method: SignatureMethod,
}

impl OAuth1Provider {
    /// Create a provider signing with HMAC-SHA1.
    pub fn new(
        name: impl Into<String>,
        request_token_endpoint: Url,
        authorization_endpoint: Url,
        access_token_endpoint: Url,
    ) -> Self {
        Self {
            name: name.into(),
            request_token_endpoint,
            authorization_endpoint,
            access_token_endpoint,
            base_api_uri: None,
            signature_method: SignatureMethod::default(),
        }
    }

    pub fn with_base_api_uri(mut self, uri: Url) -> Self {
        self.base_api_uri = Some(uri);
        self
    }

    pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = method;
        self
    }
}

impl ServiceDescriptor for OAuth1Provider {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn as_oauth1(&self) -> Option<&dyn OAuth1Descriptor> {
        Some(self)
    }
}

impl OAuth1Descriptor for OAuth1Provider {
    fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    fn build(&self, context: OAuth1Context) -> Result<Box<dyn OAuth1Service>> {
        Ok(Box::new(GenericOAuth1Service::new(self.clone(), context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_is_oauth1_only() {
        let provider: OAuth1Provider = serde_json::from_str(
            r#"{
                "name": "Example",
                "request_token_endpoint": "https://example.com/oauth/request_token",
                "authorization_endpoint": "https://example.com/oauth/authorize",
                "access_token_endpoint": "https://example.com/oauth/access_token",
                "signature_method": "PLAINTEXT"
            }"#,
        )
        .unwrap();

        assert!(provider.as_oauth1().is_some());
        assert!(provider.as_oauth2().is_none());
        assert_eq!(
            OAuth1Descriptor::signature_method(&provider),
            SignatureMethod::Plaintext
        );
    }
}
