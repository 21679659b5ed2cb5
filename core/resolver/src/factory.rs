//! Service factory: resolves a provider name into a constructed service.

use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::FactoryConfig;
use crate::registry::CapabilityRegistry;
use crate::scopes::resolve_scopes;
use oauthkit_common::{Credentials, Error, ProtocolVersion, ProviderName, Result};
use oauthkit_crypto::Signature;
use oauthkit_http::{HttpClient, HttpConfig, ReqwestClient};
use oauthkit_service::{DescriptorRef, OAuth1Context, OAuth2Context, ServiceHandle};
use oauthkit_storage::TokenStorage;

/// Builds OAuth services by provider name.
///
/// Each factory owns its registry and its HTTP transport; two factories
/// never share registrations.
pub struct ServiceFactory {
    catalog: Catalog,
    registry: CapabilityRegistry,
    http_client: OnceLock<Arc<dyn HttpClient>>,
    http_config: HttpConfig,
}

impl ServiceFactory {
    /// Create a factory over the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }

    /// Create a factory over a custom catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            registry: CapabilityRegistry::new(),
            http_client: OnceLock::new(),
            http_config: HttpConfig::default(),
        }
    }

    /// Create a factory from configuration.
    ///
    /// Providers declared in `config` are registered on top of the built-in
    /// catalog, in order.
    ///
    /// # Errors
    /// - A declared provider cannot be registered
    pub fn from_config(config: FactoryConfig) -> Result<Self> {
        let mut factory = Self::new();
        factory.http_config = config.http;

        for provider in config.providers {
            let name = provider.provider_name();
            factory.register_service(name, provider.into_descriptor())?;
        }

        Ok(factory)
    }

    /// Replace the HTTP transport handed to constructed services.
    pub fn set_http_client(&mut self, client: Arc<dyn HttpClient>) -> &mut Self {
        self.http_client = OnceLock::from(client);
        self
    }

    /// Transport in use, if one was set or has been created.
    pub fn http_client(&self) -> Option<&Arc<dyn HttpClient>> {
        self.http_client.get()
    }

    /// Settings the default transport is created with.
    pub fn http_config(&self) -> &HttpConfig {
        &self.http_config
    }

    /// Implementation types available by identifier.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Implementations registered on this factory.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Register a custom implementation for a provider.
    ///
    /// # Postconditions
    /// - The implementation shadows the built-in one for the version it
    ///   was registered under
    ///
    /// # Errors
    /// - `InvalidServiceType` if the implementation advertises neither
    ///   capability set
    pub fn register_service(
        &mut self,
        name: impl Into<ProviderName>,
        descriptor: DescriptorRef,
    ) -> Result<&mut Self> {
        self.registry.register(name, descriptor)?;
        Ok(self)
    }

    /// Register a catalog implementation for a provider by identifier.
    ///
    /// # Errors
    /// - `UnknownImplementationType` if the catalog has no such identifier
    /// - `InvalidServiceType` as for [`register_service`](Self::register_service)
    pub fn register_service_type(
        &mut self,
        name: impl Into<ProviderName>,
        identifier: &str,
    ) -> Result<&mut Self> {
        let descriptor = self
            .catalog
            .get(identifier)
            .cloned()
            .ok_or_else(|| Error::UnknownImplementationType(identifier.to_string()))?;
        self.register_service(name, descriptor)
    }

    /// Build the service for `name`.
    ///
    /// The OAuth2 implementation is used whenever one exists; `scopes` are
    /// resolved against its scope constants. Otherwise the OAuth1
    /// implementation is used with a signature helper derived from
    /// `credentials`.
    ///
    /// # Postconditions
    /// - Returns `Ok(None)` when no implementation exists under either version
    /// - The default transport is created on first successful construction
    ///   and reused afterwards
    ///
    /// # Errors
    /// - `UnsupportedOperation` if scopes are requested for an OAuth1 provider
    /// - The default transport could not be created
    /// - The implementation failed to build
    pub fn create_service<S: AsRef<str>>(
        &self,
        name: &str,
        credentials: Arc<Credentials>,
        storage: Arc<dyn TokenStorage>,
        scopes: &[S],
    ) -> Result<Option<ServiceHandle>> {
        let name = ProviderName::new(name);

        if let Some(descriptor) = self
            .resolve(ProtocolVersion::OAuth2, &name)
            .and_then(|d| d.as_oauth2())
        {
            let scopes = resolve_scopes(descriptor.scopes(), scopes);
            debug!(provider = %name, ?scopes, "Resolved to OAuth2");

            let service = descriptor.build(OAuth2Context {
                credentials,
                http_client: self.transport()?,
                storage,
                scopes,
            })?;
            return Ok(Some(ServiceHandle::OAuth2(service)));
        }

        if let Some(descriptor) = self
            .resolve(ProtocolVersion::OAuth1, &name)
            .and_then(|d| d.as_oauth1())
        {
            if !scopes.is_empty() {
                return Err(Error::UnsupportedOperation(format!(
                    "Scopes given for {}, but OAuth1 services do not support scopes",
                    name
                )));
            }
            debug!(provider = %name, "Resolved to OAuth1");

            let signature = Signature::new(&credentials).with_method(descriptor.signature_method());
            let service = descriptor.build(OAuth1Context {
                credentials,
                http_client: self.transport()?,
                storage,
                signature,
            })?;
            return Ok(Some(ServiceHandle::OAuth1(service)));
        }

        debug!(provider = %name, "No implementation found");
        Ok(None)
    }

    /// Registered implementation for `version`, else the catalog's
    /// conventional one.
    fn resolve(&self, version: ProtocolVersion, name: &ProviderName) -> Option<&DescriptorRef> {
        self.registry
            .get(version, name)
            .or_else(|| self.catalog.conventional(version, name))
    }

    fn transport(&self) -> Result<Arc<dyn HttpClient>> {
        if let Some(client) = self.http_client.get() {
            return Ok(client.clone());
        }

        debug!(user_agent = %self.http_config.user_agent, "Creating default HTTP transport");
        let client: Arc<dyn HttpClient> =
            Arc::new(ReqwestClient::with_config(self.http_config.clone())?);
        // A concurrent caller may have won the race; its client is kept.
        Ok(self.http_client.get_or_init(|| client).clone())
    }
}

impl Default for ServiceFactory {
    fn default() -> Self {
        Self::new()
    }
}
