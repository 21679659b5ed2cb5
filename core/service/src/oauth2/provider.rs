//! OAuth2 provider declaration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use super::{AuthorizationMethod, GenericOAuth2Service, OAuth2Service};
use crate::descriptor::{OAuth2Context, OAuth2Descriptor, ScopeTable, ServiceDescriptor};
use oauthkit_common::Result;

/// Declarative description of an OAuth2 provider.
///
/// Built-in providers are declared in code; custom ones can be loaded from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Provider {
    /// Service name tokens are stored under.
    pub name: String,
    pub authorization_endpoint: Url,
    pub access_token_endpoint: Url,
    #[serde(default)]
    pub base_api_uri: Option<Url>,
    #[serde(default)]
    pub scopes: ScopeTable,
    #[serde(default)]
    pub authorization_method: AuthorizationMethod,
    /// Whether the `state` parameter must be stored and checked.
    #[serde(default)]
    pub state_required: bool,
    /// Extra headers sent to the token endpoint.
    #[serde(default)]
    pub token_request_headers: BTreeMap<String, String>,
}

impl OAuth2Provider {
    /// Create a provider with bearer authorization and no scopes.
    pub fn new(
        name: impl Into<String>,
        authorization_endpoint: Url,
        access_token_endpoint: Url,
    ) -> Self {
        Self {
            name: name.into(),
            authorization_endpoint,
            access_token_endpoint,
            base_api_uri: None,
            scopes: ScopeTable::new(),
            authorization_method: AuthorizationMethod::default(),
            state_required: false,
            token_request_headers: BTreeMap::new(),
        }
    }

    pub fn with_base_api_uri(mut self, uri: Url) -> Self {
        self.base_api_uri = Some(uri);
        self
    }

    pub fn with_scopes(mut self, scopes: ScopeTable) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_authorization_method(mut self, method: AuthorizationMethod) -> Self {
        self.authorization_method = method;
        self
    }

    pub fn with_state_required(mut self, required: bool) -> Self {
        self.state_required = required;
        self
    }

    pub fn with_token_request_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.token_request_headers.insert(name.into(), value.into());
        self
    }
}

impl ServiceDescriptor for OAuth2Provider {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn as_oauth2(&self) -> Option<&dyn OAuth2Descriptor> {
        Some(self)
    }
}

impl OAuth2Descriptor for OAuth2Provider {
    fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    fn build(&self, context: OAuth2Context) -> Result<Box<dyn OAuth2Service>> {
        Ok(Box::new(GenericOAuth2Service::new(self.clone(), context)))
    }
}
